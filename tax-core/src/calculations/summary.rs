//! Dashboard headline figures.
//!
//! Combines the revenue and expense totals with the tax engine to produce the
//! metric cards shown on the dashboard: annual income, income and resident
//! tax, withholding, the resulting payable (or refundable) balance and
//! progress toward the revenue target.
//!
//! | Figure        | Formula |
//! |---------------|---------|
//! | Annual income | revenue − expenses |
//! | Income tax    | engine, on annual income |
//! | Resident tax  | engine, on annual income |
//! | Withholding   | override, else ⌊revenue × 10.21%⌋ |
//! | Tax payable   | income tax − withholding (negative = refund) |

use std::fmt;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::common::format_yen;
use super::engine::TaxEngine;
use super::revenue::{RevenueError, TargetProgress};
use crate::FilingType;

/// Starting figures shown before the user edits anything.
pub const DEFAULT_ANNUAL_REVENUE: i64 = 4_800_000;
pub const DEFAULT_TOTAL_EXPENSES: i64 = 1_000_000;
pub const DEFAULT_TARGET_REVENUE: i64 = 6_000_000;

/// Values the dashboard feeds into the calculation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardInputs {
    pub annual_revenue: i64,
    pub total_expenses: i64,
    pub target_revenue: i64,
    pub filing: FilingType,

    /// Withholding entered by hand. When `None` it is estimated from revenue.
    pub withholding_override: Option<i64>,
}

impl Default for DashboardInputs {
    fn default() -> Self {
        Self {
            annual_revenue: DEFAULT_ANNUAL_REVENUE,
            total_expenses: DEFAULT_TOTAL_EXPENSES,
            target_revenue: DEFAULT_TARGET_REVENUE,
            filing: FilingType::BlueForm,
            withholding_override: None,
        }
    }
}

/// Income tax less withholding.
///
/// A negative balance is a refund and is displayed with the `△` marker
/// used on Japanese tax forms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxPayable(pub i64);

impl TaxPayable {
    pub fn amount(&self) -> i64 {
        self.0
    }

    pub fn is_refund(&self) -> bool {
        self.0 < 0
    }

    pub fn caption(&self) -> &'static str {
        if self.is_refund() {
            "refund"
        } else {
            "income tax - withholding"
        }
    }
}

impl fmt::Display for TaxPayable {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        if self.is_refund() {
            write!(f, "△{}", format_yen(self.0.saturating_abs()))
        } else {
            write!(f, "{}", format_yen(self.0))
        }
    }
}

/// Computed dashboard figures.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardSummary {
    pub annual_revenue: i64,
    pub total_expenses: i64,
    pub annual_income: i64,
    pub filing: FilingType,
    pub income_tax: i64,
    pub resident_tax: i64,
    pub withholding: i64,
    pub tax_payable: TaxPayable,
    pub target: TargetProgress,
}

impl DashboardSummary {
    /// Computes the dashboard figures for `inputs`.
    ///
    /// # Errors
    ///
    /// Returns [`RevenueError::NonPositiveTarget`] if the revenue target is
    /// zero or negative, and [`RevenueError::NegativeAmount`] if revenue,
    /// expenses or the withholding override is negative.
    ///
    /// # Example
    ///
    /// ```
    /// use tax_core::calculations::{DashboardInputs, DashboardSummary, TaxEngine};
    ///
    /// let summary =
    ///     DashboardSummary::compute(&TaxEngine::national(), &DashboardInputs::default()).unwrap();
    ///
    /// assert_eq!(summary.annual_income, 3_800_000);
    /// assert_eq!(summary.income_tax, 217_500);
    /// assert_eq!(summary.withholding, 490_080);
    /// assert_eq!(summary.tax_payable.to_string(), "△¥272,580");
    /// ```
    pub fn compute(
        engine: &TaxEngine,
        inputs: &DashboardInputs,
    ) -> Result<Self, RevenueError> {
        let target = TargetProgress::new(inputs.annual_revenue, inputs.target_revenue)?;
        non_negative("annual revenue", inputs.annual_revenue)?;
        non_negative("total expenses", inputs.total_expenses)?;
        if let Some(withholding) = inputs.withholding_override {
            non_negative("withholding", withholding)?;
        }

        // Both operands are non-negative from here on, so neither
        // subtraction can overflow.
        let annual_income = inputs.annual_revenue - inputs.total_expenses;
        let income_tax = engine.income_tax(annual_income, inputs.filing);
        let resident_tax = engine.resident_tax(annual_income, inputs.filing);
        let withholding = inputs
            .withholding_override
            .unwrap_or_else(|| engine.withholding(inputs.annual_revenue));
        let tax_payable = TaxPayable(income_tax - withholding);

        debug!(
            annual_income,
            income_tax,
            resident_tax,
            withholding,
            tax_payable = tax_payable.amount(),
            "dashboard summary"
        );

        Ok(Self {
            annual_revenue: inputs.annual_revenue,
            total_expenses: inputs.total_expenses,
            annual_income,
            filing: inputs.filing,
            income_tax,
            resident_tax,
            withholding,
            tax_payable,
            target,
        })
    }
}

fn non_negative(
    field: &'static str,
    amount: i64,
) -> Result<(), RevenueError> {
    if amount < 0 {
        return Err(RevenueError::NegativeAmount { field, amount });
    }
    Ok(())
}

impl fmt::Display for DashboardSummary {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        writeln!(f, "Annual revenue:  {}", format_yen(self.annual_revenue))?;
        writeln!(f, "Total expenses:  {}", format_yen(self.total_expenses))?;
        writeln!(f, "Annual income:   {}", format_yen(self.annual_income))?;
        writeln!(f, "Filing:          {}", self.filing.label())?;
        writeln!(f, "Income tax:      {}", format_yen(self.income_tax))?;
        writeln!(f, "Resident tax:    {}", format_yen(self.resident_tax))?;
        writeln!(f, "Withholding:     {}", format_yen(self.withholding))?;
        writeln!(
            f,
            "Tax payable:     {} ({})",
            self.tax_payable,
            self.tax_payable.caption()
        )?;
        write!(f, "Target:          {}", self.target)
    }
}

/// Profit margin (%) below which expenses are flagged as too high.
pub const LOW_MARGIN_PERCENT: Decimal = dec!(30);
/// Profit margin (%) above which expansion is suggested.
pub const HIGH_MARGIN_PERCENT: Decimal = dec!(70);
/// Expense ratio (%) above which an expense review is suggested.
pub const HIGH_EXPENSE_RATIO_PERCENT: Decimal = dec!(50);

/// One-line business advice shown under the dashboard figures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Advice {
    /// Profit margin under 30%.
    CutExpenses,
    /// Profit margin over 70%.
    Expand,
    /// Revenue fell against the previous year.
    WinBackRevenue,
    /// Expenses over half of revenue.
    ReviewExpenses,
    Steady,
}

impl Advice {
    pub fn message(&self) -> &'static str {
        match self {
            Self::CutExpenses => {
                "Expenses are high. Reviewing outsourcing and telecom costs would improve profit."
            }
            Self::Expand => {
                "Profit margin is strong. Consider expanding the business or launching new services."
            }
            Self::WinBackRevenue => {
                "Revenue is down on last year. Strengthen existing client relationships and new sales."
            }
            Self::ReviewExpenses => {
                "Reviewing expenses could lower your tax, especially telecom and supplies."
            }
            Self::Steady => "The business is stable. Look for new areas to grow into.",
        }
    }
}

impl fmt::Display for Advice {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// Picks the advice for `summary` given the year-over-year revenue change
/// `revenue_trend` (in percent).
///
/// Rules are checked in order and the first match wins: low margin, high
/// margin, falling revenue, high expense ratio, otherwise steady. With zero
/// revenue the margin and ratio are undefined; any expenses then count as a
/// low margin.
///
/// # Example
///
/// ```
/// use rust_decimal_macros::dec;
/// use tax_core::calculations::{Advice, DashboardInputs, DashboardSummary, TaxEngine, advice};
///
/// let summary =
///     DashboardSummary::compute(&TaxEngine::national(), &DashboardInputs::default()).unwrap();
///
/// // 3,800,000 / 4,800,000 is a 79% margin.
/// assert_eq!(advice(&summary, dec!(6.4)), Advice::Expand);
/// ```
pub fn advice(
    summary: &DashboardSummary,
    revenue_trend: Decimal,
) -> Advice {
    if summary.annual_revenue == 0 {
        return if summary.total_expenses > 0 {
            Advice::CutExpenses
        } else if revenue_trend < Decimal::ZERO {
            Advice::WinBackRevenue
        } else {
            Advice::Steady
        };
    }

    let revenue = Decimal::from(summary.annual_revenue);
    let margin = Decimal::from(summary.annual_income) / revenue * Decimal::ONE_HUNDRED;
    let expense_ratio = Decimal::from(summary.total_expenses) / revenue * Decimal::ONE_HUNDRED;

    if margin < LOW_MARGIN_PERCENT {
        Advice::CutExpenses
    } else if margin > HIGH_MARGIN_PERCENT {
        Advice::Expand
    } else if revenue_trend < Decimal::ZERO {
        Advice::WinBackRevenue
    } else if expense_ratio > HIGH_EXPENSE_RATIO_PERCENT {
        Advice::ReviewExpenses
    } else {
        Advice::Steady
    }
}
