//! Revenue analytics behind the dashboard charts and progress widgets.
//!
//! Everything here is plain arithmetic over whole-yen amounts; percentages
//! are exact [`Decimal`] values and are only rounded for display.

use std::fmt;

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::common::{decimal_total, format_yen, round_percentage};

/// Errors that can occur in revenue calculations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RevenueError {
    /// A revenue target must be a positive amount.
    #[error("revenue target must be positive, got {0}")]
    NonPositiveTarget(i64),

    /// Revenue, expenses and withholding are never negative.
    #[error("{field} must be non-negative, got {amount}")]
    NegativeAmount { field: &'static str, amount: i64 },
}

/// Percentage change of the `current` total over the `previous` total.
///
/// Returns zero when the previous total is zero, since there is no base to
/// compare against.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use tax_core::calculations::year_over_year_change;
///
/// assert_eq!(year_over_year_change(&[450_000, 450_000], &[400_000, 400_000]), dec!(12.5));
/// assert_eq!(year_over_year_change(&[450_000], &[]), dec!(0));
/// ```
pub fn year_over_year_change(
    current: &[i64],
    previous: &[i64],
) -> Decimal {
    let current_total = decimal_total(current);
    let previous_total = decimal_total(previous);

    if previous_total.is_zero() {
        return Decimal::ZERO;
    }

    (current_total - previous_total) / previous_total * Decimal::ONE_HUNDRED
}

/// Running totals of `monthly`, e.g. for a cumulative revenue line.
///
/// Totals saturate at the `i64` bounds.
pub fn cumulative(monthly: &[i64]) -> Vec<i64> {
    monthly
        .iter()
        .scan(0_i64, |total, &amount| {
            *total = total.saturating_add(amount);
            Some(*total)
        })
        .collect()
}

/// Percentage share of each amount in the overall total, one decimal place.
///
/// All shares are zero when the total is zero.
pub fn share_percentages(amounts: &[i64]) -> Vec<Decimal> {
    let total = decimal_total(amounts);
    amounts
        .iter()
        .map(|&amount| {
            if total.is_zero() {
                Decimal::ZERO
            } else {
                round_percentage(Decimal::from(amount) / total * Decimal::ONE_HUNDRED)
            }
        })
        .collect()
}

/// Number of months of data to show for `selected_year` as of `today`.
///
/// The running year shows the months elapsed so far, including the current
/// one. Any other year shows all twelve.
pub fn months_to_include(
    selected_year: i32,
    today: NaiveDate,
) -> usize {
    if selected_year == today.year() {
        today.month() as usize
    } else {
        12
    }
}

/// Progress of actual revenue toward an annual target.
///
/// # Example
///
/// ```
/// use rust_decimal_macros::dec;
/// use tax_core::calculations::TargetProgress;
///
/// let progress = TargetProgress::new(4_800_000, 6_000_000).unwrap();
///
/// assert_eq!(progress.percentage(), dec!(80));
/// assert_eq!(progress.remaining(), 1_200_000);
/// assert!(!progress.is_achieved());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetProgress {
    current: i64,
    target: i64,
}

impl TargetProgress {
    /// # Errors
    ///
    /// Returns [`RevenueError::NonPositiveTarget`] if `target` is zero or
    /// negative.
    pub fn new(
        current: i64,
        target: i64,
    ) -> Result<Self, RevenueError> {
        if target <= 0 {
            return Err(RevenueError::NonPositiveTarget(target));
        }
        Ok(Self { current, target })
    }

    pub fn current(&self) -> i64 {
        self.current
    }

    pub fn target(&self) -> i64 {
        self.target
    }

    /// Share of the target reached, capped at 100.
    pub fn percentage(&self) -> Decimal {
        let raw = Decimal::from(self.current) / Decimal::from(self.target) * Decimal::ONE_HUNDRED;
        raw.min(Decimal::ONE_HUNDRED)
    }

    /// Revenue still needed, never negative.
    pub fn remaining(&self) -> i64 {
        self.target.saturating_sub(self.current).max(0)
    }

    pub fn is_achieved(&self) -> bool {
        self.current >= self.target
    }
}

impl fmt::Display for TargetProgress {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        write!(
            f,
            "{} / {} ({}%)",
            format_yen(self.current),
            format_yen(self.target),
            round_percentage(self.percentage())
        )?;
        if self.is_achieved() {
            write!(f, " target reached")
        } else {
            write!(f, " {} to go", format_yen(self.remaining()))
        }
    }
}
