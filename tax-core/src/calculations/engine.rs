//! Income-tax and resident-tax calculation.
//!
//! # Calculation order
//!
//! | Step | Description |
//! |------|-------------|
//! | 1    | Taxable income: gross income, less the blue-form deduction when it applies, floored at 0 |
//! | 2    | Bracket lookup on taxable income |
//! | 3    | Taxable income × rate − subtracted amount, in exact decimal arithmetic |
//! | 4    | Floor to whole yen (the only rounding step) |
//! | 5    | Clamp at 0 |
//!
//! Resident tax shares step 1 and then applies a flat rate. The withholding
//! estimate is a flat rate on gross revenue and ignores the bracket table.
//!
//! # Example
//!
//! ```
//! use tax_core::calculations::{compute_income_tax, compute_resident_tax, estimate_withholding};
//!
//! // 4,800,000 gross, blue form: taxable income is 4,150,000.
//! assert_eq!(compute_income_tax(4_800_000, true), 402_500);
//! assert_eq!(compute_resident_tax(4_800_000, true), 415_000);
//! assert_eq!(estimate_withholding(4_800_000), 490_080);
//! ```

use std::fmt;
use std::sync::LazyLock;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::brackets::TaxableIncome;
use super::common::{floor_to_yen, format_yen};
use super::rules::{TaxRules, TaxRulesError};
use crate::{FilingType, TaxBracket};

static NATIONAL_ENGINE: LazyLock<TaxEngine> = LazyLock::new(TaxEngine::national);

/// Income tax on `gross_income` under the national rules.
///
/// `preferential` selects blue-form filing, which subtracts the flat
/// deduction first.
pub fn compute_income_tax(
    gross_income: i64,
    preferential: bool,
) -> i64 {
    NATIONAL_ENGINE.income_tax(gross_income, preferential.into())
}

/// Resident tax on `gross_income` under the national rules.
pub fn compute_resident_tax(
    gross_income: i64,
    preferential: bool,
) -> i64 {
    NATIONAL_ENGINE.resident_tax(gross_income, preferential.into())
}

/// Estimated tax withheld at source on `gross_revenue`.
pub fn estimate_withholding(gross_revenue: i64) -> i64 {
    NATIONAL_ENGINE.withholding(gross_revenue)
}

/// Full breakdown of the tax owed on one income figure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxAssessment {
    pub gross_income: i64,
    pub filing: FilingType,
    pub taxable_income: i64,
    pub bracket: TaxBracket,
    pub income_tax: i64,
    pub resident_tax: i64,
}

impl TaxAssessment {
    pub fn total_tax(&self) -> i64 {
        self.income_tax + self.resident_tax
    }
}

impl fmt::Display for TaxAssessment {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        writeln!(f, "Gross income:    {}", format_yen(self.gross_income))?;
        writeln!(f, "Filing:          {}", self.filing.label())?;
        writeln!(f, "Taxable income:  {}", format_yen(self.taxable_income))?;
        writeln!(
            f,
            "Bracket:         {}% (subtract {})",
            (self.bracket.rate * Decimal::ONE_HUNDRED).normalize(),
            format_yen(self.bracket.subtracted_amount)
        )?;
        writeln!(f, "Income tax:      {}", format_yen(self.income_tax))?;
        writeln!(f, "Resident tax:    {}", format_yen(self.resident_tax))?;
        write!(f, "Total:           {}", format_yen(self.total_tax()))
    }
}

/// Calculator for income tax, resident tax and withholding.
///
/// The engine holds a validated [`TaxRules`] and is immutable, so one
/// instance can be shared across threads.
///
/// # Example
///
/// ```
/// use tax_core::FilingType;
/// use tax_core::calculations::TaxEngine;
///
/// let engine = TaxEngine::national();
///
/// assert_eq!(engine.income_tax(50_000_000, FilingType::WhiteForm), 17_704_000);
/// assert_eq!(engine.income_tax(500_000, FilingType::BlueForm), 0);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaxEngine {
    rules: TaxRules,
}

impl TaxEngine {
    /// Creates an engine from custom rules.
    ///
    /// # Errors
    ///
    /// Returns [`TaxRulesError`] if the rules fail validation.
    pub fn new(rules: TaxRules) -> Result<Self, TaxRulesError> {
        rules.validate()?;
        Ok(Self { rules })
    }

    /// Creates an engine with the national rules.
    pub fn national() -> Self {
        Self {
            rules: TaxRules::default(),
        }
    }

    pub fn rules(&self) -> &TaxRules {
        &self.rules
    }

    /// Gross income less the blue-form deduction when it applies, never
    /// below zero.
    pub fn taxable_income(
        &self,
        gross_income: i64,
        filing: FilingType,
    ) -> TaxableIncome {
        if filing.is_preferential() {
            TaxableIncome::new(gross_income.saturating_sub(self.rules.blue_form_deduction))
        } else {
            TaxableIncome::new(gross_income)
        }
    }

    pub fn bracket_for(
        &self,
        taxable_income: TaxableIncome,
    ) -> &TaxBracket {
        self.rules.brackets.bracket_for(taxable_income)
    }

    /// Progressive income tax on `gross_income`.
    pub fn income_tax(
        &self,
        gross_income: i64,
        filing: FilingType,
    ) -> i64 {
        let taxable = self.taxable_income(gross_income, filing);
        let bracket = self.bracket_for(taxable);
        let tax = floor_to_yen(bracket.raw_tax(taxable.get())).max(0);
        debug!(
            gross_income,
            filing = filing.as_str(),
            taxable_income = taxable.get(),
            rate = %bracket.rate,
            tax,
            "income tax"
        );
        tax
    }

    /// Flat-rate resident tax on `gross_income`.
    pub fn resident_tax(
        &self,
        gross_income: i64,
        filing: FilingType,
    ) -> i64 {
        let taxable = self.taxable_income(gross_income, filing);
        let tax = floor_to_yen(Decimal::from(taxable.get()) * self.rules.resident_tax_rate);
        debug!(
            gross_income,
            filing = filing.as_str(),
            taxable_income = taxable.get(),
            tax,
            "resident tax"
        );
        tax
    }

    /// Tax withheld at source on `gross_revenue`, floored at zero.
    pub fn withholding(
        &self,
        gross_revenue: i64,
    ) -> i64 {
        floor_to_yen(Decimal::from(gross_revenue) * self.rules.withholding_rate).max(0)
    }

    /// Computes the full [`TaxAssessment`] for `gross_income`.
    pub fn assess(
        &self,
        gross_income: i64,
        filing: FilingType,
    ) -> TaxAssessment {
        let taxable = self.taxable_income(gross_income, filing);
        TaxAssessment {
            gross_income,
            filing,
            taxable_income: taxable.get(),
            bracket: self.bracket_for(taxable).clone(),
            income_tax: self.income_tax(gross_income, filing),
            resident_tax: self.resident_tax(gross_income, filing),
        }
    }
}

impl Default for TaxEngine {
    fn default() -> Self {
        Self::national()
    }
}
