use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One band of the progressive income-tax table.
///
/// The band covers the half-open interval `[lower_bound, upper_bound)`.
/// `upper_bound` is `None` for the top band, which is unbounded.
///
/// Tax inside the band is `taxable_income * rate - subtracted_amount`, the
/// quick-calculation form of a progressive schedule. `subtracted_amount` is
/// chosen so that the result is continuous at `lower_bound`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxBracket {
    pub lower_bound: i64,
    pub upper_bound: Option<i64>,
    pub rate: Decimal,
    pub subtracted_amount: i64,
}

impl TaxBracket {
    /// Returns `true` if `income` falls inside this band.
    pub fn contains(
        &self,
        income: i64,
    ) -> bool {
        income >= self.lower_bound && self.upper_bound.is_none_or(|upper| income < upper)
    }

    /// Unrounded tax for `income` under this band's formula.
    ///
    /// The value is exact; callers decide how to round it.
    pub fn raw_tax(
        &self,
        income: i64,
    ) -> Decimal {
        Decimal::from(income) * self.rate - Decimal::from(self.subtracted_amount)
    }
}
