//! Common utility functions for tax calculations.
//!
//! This module provides shared functionality used across the tax, revenue and
//! dashboard calculations: the rounding policies, overflow-safe totals and
//! yen formatting.

use num_format::{Locale, ToFormattedString};
use rust_decimal::{Decimal, RoundingStrategy, prelude::ToPrimitive};

/// Drops any fractional yen, rounding toward negative infinity.
///
/// Amounts in this domain are whole yen. Every calculation keeps exact
/// [`Decimal`] precision until the end and floors exactly once, here.
/// Values outside the `i64` range saturate.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use tax_core::calculations::common::floor_to_yen;
///
/// assert_eq!(floor_to_yen(dec!(490080.9)), 490080);
/// assert_eq!(floor_to_yen(dec!(-0.5)), -1);
/// ```
pub fn floor_to_yen(value: Decimal) -> i64 {
    value.floor().to_i64().unwrap_or(if value.is_sign_negative() {
        i64::MIN
    } else {
        i64::MAX
    })
}

/// Rounds a percentage to one decimal place, midpoints away from zero.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use tax_core::calculations::common::round_percentage;
///
/// assert_eq!(round_percentage(dec!(45.05)), dec!(45.1));
/// assert_eq!(round_percentage(dec!(33.333)), dec!(33.3));
/// ```
pub fn round_percentage(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero)
}

/// Sum of `amounts`, or `None` if it does not fit in an `i64`.
pub fn checked_total<I>(amounts: I) -> Option<i64>
where
    I: IntoIterator<Item = i64>,
{
    amounts
        .into_iter()
        .try_fold(0_i64, |total, amount| total.checked_add(amount))
}

/// Sum of `amounts`, clamped to the `i64` range at each step.
pub fn saturating_total<I>(amounts: I) -> i64
where
    I: IntoIterator<Item = i64>,
{
    amounts.into_iter().fold(0_i64, i64::saturating_add)
}

/// Sum of `amounts` as an exact [`Decimal`], for ratios over large totals.
pub fn decimal_total(amounts: &[i64]) -> Decimal {
    amounts.iter().map(|&amount| Decimal::from(amount)).sum()
}

/// Formats a yen amount with thousands separators, e.g. `¥4,800,000`.
///
/// Negative amounts get a leading minus sign: `-¥1,000`.
pub fn format_yen(amount: i64) -> String {
    let digits = amount.unsigned_abs().to_formatted_string(&Locale::en);
    if amount < 0 {
        format!("-¥{digits}")
    } else {
        format!("¥{digits}")
    }
}
