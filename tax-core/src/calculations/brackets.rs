//! Progressive income-tax bracket table.
//!
//! The table is the quick-calculation form of the national income tax
//! schedule: for taxable income `x` in a band, tax is
//! `x * rate - subtracted_amount`.
//!
//! | Taxable income          | Rate | Subtracted  |
//! |-------------------------|------|-------------|
//! | 0 – 1,949,999           | 5%   | 0           |
//! | 1,950,000 – 3,299,999   | 10%  | 97,500      |
//! | 3,300,000 – 6,949,999   | 20%  | 427,500     |
//! | 6,950,000 – 8,999,999   | 23%  | 636,000     |
//! | 9,000,000 – 17,999,999  | 33%  | 1,536,000   |
//! | 18,000,000 – 39,999,999 | 40%  | 2,796,000   |
//! | 40,000,000 and over     | 45%  | 4,796,000   |
//!
//! A [`TaxBracketTable`] can only be built from a list that passes
//! [`TaxBracketTable::validate`], so lookups on it always find exactly one
//! band. A malformed list is a configuration fault reported when the table
//! is built, never at lookup time.
//!
//! # Example
//!
//! ```
//! use tax_core::calculations::{TaxBracketTable, TaxableIncome};
//!
//! let table = TaxBracketTable::national();
//! let bracket = table.bracket_for(TaxableIncome::new(4_150_000));
//!
//! assert_eq!(bracket.lower_bound, 3_300_000);
//! assert_eq!(bracket.subtracted_amount, 427_500);
//! ```

use std::borrow::Cow;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::trace;

use crate::TaxBracket;

/// The national income-tax table.
pub static NATIONAL_BRACKETS: [TaxBracket; 7] = [
    TaxBracket {
        lower_bound: 0,
        upper_bound: Some(1_950_000),
        rate: dec!(0.05),
        subtracted_amount: 0,
    },
    TaxBracket {
        lower_bound: 1_950_000,
        upper_bound: Some(3_300_000),
        rate: dec!(0.10),
        subtracted_amount: 97_500,
    },
    TaxBracket {
        lower_bound: 3_300_000,
        upper_bound: Some(6_950_000),
        rate: dec!(0.20),
        subtracted_amount: 427_500,
    },
    TaxBracket {
        lower_bound: 6_950_000,
        upper_bound: Some(9_000_000),
        rate: dec!(0.23),
        subtracted_amount: 636_000,
    },
    TaxBracket {
        lower_bound: 9_000_000,
        upper_bound: Some(18_000_000),
        rate: dec!(0.33),
        subtracted_amount: 1_536_000,
    },
    TaxBracket {
        lower_bound: 18_000_000,
        upper_bound: Some(40_000_000),
        rate: dec!(0.40),
        subtracted_amount: 2_796_000,
    },
    TaxBracket {
        lower_bound: 40_000_000,
        upper_bound: None,
        rate: dec!(0.45),
        subtracted_amount: 4_796_000,
    },
];

/// Ways a bracket list can fail to form a valid progressive table.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BracketTableError {
    /// The list has no brackets at all.
    #[error("bracket table is empty")]
    Empty,

    /// The first bracket must start at zero.
    #[error("first bracket must start at 0, got {0}")]
    FirstLowerBound(i64),

    /// A bracket's interval contains no values.
    #[error("bracket {index} has an empty interval [{lower}, {upper})")]
    EmptyInterval { index: usize, lower: i64, upper: i64 },

    /// Only the last bracket may be unbounded.
    #[error("bracket {index} is unbounded but is not the last bracket")]
    UnboundedBeforeEnd { index: usize },

    /// The last bracket must be unbounded.
    #[error("top bracket must be unbounded, got upper bound {0}")]
    BoundedTop(i64),

    /// Adjacent brackets leave income values uncovered.
    #[error("gap between bracket {index} (ends at {upper}) and the next (starts at {next_lower})")]
    Gap {
        index: usize,
        upper: i64,
        next_lower: i64,
    },

    /// Adjacent brackets cover the same income values.
    #[error("bracket {index} (ends at {upper}) overlaps the next (starts at {next_lower})")]
    Overlap {
        index: usize,
        upper: i64,
        next_lower: i64,
    },

    /// Rates must lie in (0, 1].
    #[error("bracket {index} rate must be between 0 and 1, got {rate}")]
    RateOutOfRange { index: usize, rate: Decimal },

    /// Rates must strictly increase from one bracket to the next.
    #[error("bracket {index} rate {rate} does not exceed the previous rate {previous}")]
    RateNotIncreasing {
        index: usize,
        rate: Decimal,
        previous: Decimal,
    },

    /// The two formulas meeting at a boundary disagree.
    #[error("tax is discontinuous at {boundary}: {below} below vs {above} above")]
    Discontinuous {
        boundary: i64,
        below: Decimal,
        above: Decimal,
    },

    /// A bracket's formula yields negative tax at its own lower bound.
    #[error("bracket starting at {lower_bound} yields negative tax {tax}")]
    NegativeTax { lower_bound: i64, tax: Decimal },
}

/// Taxable income: gross income after deductions, never negative.
///
/// Construction clamps negative amounts to zero, which is what makes
/// [`TaxBracketTable::bracket_for`] total.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct TaxableIncome(i64);

impl TaxableIncome {
    pub fn new(amount: i64) -> Self {
        Self(amount.max(0))
    }

    pub fn get(self) -> i64 {
        self.0
    }
}

/// A validated, ordered list of [`TaxBracket`]s partitioning `[0, ∞)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<TaxBracket>", into = "Vec<TaxBracket>")]
pub struct TaxBracketTable {
    brackets: Cow<'static, [TaxBracket]>,
}

impl TaxBracketTable {
    /// Builds a table from `brackets`, which must be sorted by lower bound.
    ///
    /// # Errors
    ///
    /// Returns [`BracketTableError`] if the list fails [`Self::validate`].
    pub fn new(brackets: Vec<TaxBracket>) -> Result<Self, BracketTableError> {
        Self::validate(&brackets)?;
        Ok(Self {
            brackets: Cow::Owned(brackets),
        })
    }

    /// The national table ([`NATIONAL_BRACKETS`]).
    pub fn national() -> Self {
        debug_assert_eq!(Self::validate(&NATIONAL_BRACKETS), Ok(()));
        Self {
            brackets: Cow::Borrowed(&NATIONAL_BRACKETS),
        }
    }

    pub fn brackets(&self) -> &[TaxBracket] {
        &self.brackets
    }

    /// Returns the bracket whose interval contains `income`.
    ///
    /// Exactly one bracket matches because the table is a validated
    /// partition starting at zero and `income` is non-negative.
    pub fn bracket_for(
        &self,
        income: TaxableIncome,
    ) -> &TaxBracket {
        let index = self
            .brackets
            .partition_point(|b| b.lower_bound <= income.get())
            .saturating_sub(1);
        let bracket = &self.brackets[index];
        trace!(
            income = income.get(),
            index,
            rate = %bracket.rate,
            "bracket lookup"
        );
        bracket
    }

    /// Checks that `brackets` partition `[0, ∞)` into a continuous,
    /// progressive schedule.
    ///
    /// # Errors
    ///
    /// Returns the first violation found, in bracket order:
    /// - the list is empty or does not start at 0
    /// - an interval is empty, or a bracket other than the last is unbounded
    /// - adjacent brackets leave a gap or overlap
    /// - a rate is outside (0, 1] or does not exceed the previous rate
    /// - tax jumps at a boundary or is negative at a lower bound
    ///
    /// # Example
    ///
    /// ```
    /// use rust_decimal_macros::dec;
    /// use tax_core::TaxBracket;
    /// use tax_core::calculations::{BracketTableError, TaxBracketTable};
    ///
    /// let brackets = vec![
    ///     TaxBracket { lower_bound: 0, upper_bound: Some(1_000), rate: dec!(0.10), subtracted_amount: 0 },
    ///     TaxBracket { lower_bound: 2_000, upper_bound: None, rate: dec!(0.20), subtracted_amount: 100 },
    /// ];
    ///
    /// assert_eq!(
    ///     TaxBracketTable::validate(&brackets),
    ///     Err(BracketTableError::Gap { index: 0, upper: 1_000, next_lower: 2_000 }),
    /// );
    /// ```
    pub fn validate(brackets: &[TaxBracket]) -> Result<(), BracketTableError> {
        let first = brackets.first().ok_or(BracketTableError::Empty)?;
        if first.lower_bound != 0 {
            return Err(BracketTableError::FirstLowerBound(first.lower_bound));
        }

        let last_index = brackets.len() - 1;
        for (index, bracket) in brackets.iter().enumerate() {
            if bracket.rate <= Decimal::ZERO || bracket.rate > Decimal::ONE {
                return Err(BracketTableError::RateOutOfRange {
                    index,
                    rate: bracket.rate,
                });
            }

            let tax_at_lower = bracket.raw_tax(bracket.lower_bound);
            if tax_at_lower < Decimal::ZERO {
                return Err(BracketTableError::NegativeTax {
                    lower_bound: bracket.lower_bound,
                    tax: tax_at_lower,
                });
            }

            match (bracket.upper_bound, index == last_index) {
                (Some(upper), true) => return Err(BracketTableError::BoundedTop(upper)),
                (None, false) => return Err(BracketTableError::UnboundedBeforeEnd { index }),
                (Some(upper), false) if upper <= bracket.lower_bound => {
                    return Err(BracketTableError::EmptyInterval {
                        index,
                        lower: bracket.lower_bound,
                        upper,
                    });
                }
                _ => {}
            }
        }

        for (index, pair) in brackets.windows(2).enumerate() {
            let (below, above) = (&pair[0], &pair[1]);
            // Unbounded-before-end was rejected above.
            let Some(upper) = below.upper_bound else {
                continue;
            };

            if upper < above.lower_bound {
                return Err(BracketTableError::Gap {
                    index,
                    upper,
                    next_lower: above.lower_bound,
                });
            }
            if upper > above.lower_bound {
                return Err(BracketTableError::Overlap {
                    index,
                    upper,
                    next_lower: above.lower_bound,
                });
            }
            if above.rate <= below.rate {
                return Err(BracketTableError::RateNotIncreasing {
                    index: index + 1,
                    rate: above.rate,
                    previous: below.rate,
                });
            }

            let tax_below = below.raw_tax(upper);
            let tax_above = above.raw_tax(upper);
            if tax_below != tax_above {
                return Err(BracketTableError::Discontinuous {
                    boundary: upper,
                    below: tax_below,
                    above: tax_above,
                });
            }
        }

        Ok(())
    }
}

impl Default for TaxBracketTable {
    fn default() -> Self {
        Self::national()
    }
}

impl TryFrom<Vec<TaxBracket>> for TaxBracketTable {
    type Error = BracketTableError;

    fn try_from(brackets: Vec<TaxBracket>) -> Result<Self, Self::Error> {
        Self::new(brackets)
    }
}

impl From<TaxBracketTable> for Vec<TaxBracket> {
    fn from(table: TaxBracketTable) -> Self {
        table.brackets.into_owned()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn bracket(
        lower_bound: i64,
        upper_bound: Option<i64>,
        rate: Decimal,
        subtracted_amount: i64,
    ) -> TaxBracket {
        TaxBracket {
            lower_bound,
            upper_bound,
            rate,
            subtracted_amount,
        }
    }

    fn two_band_brackets() -> Vec<TaxBracket> {
        vec![
            bracket(0, Some(1_000), dec!(0.10), 0),
            bracket(1_000, None, dec!(0.20), 100),
        ]
    }

    // =========================================================================
    // national table
    // =========================================================================

    #[test]
    fn national_table_is_valid() {
        assert_eq!(TaxBracketTable::validate(&NATIONAL_BRACKETS), Ok(()));
    }

    #[test]
    fn national_table_partitions_from_zero() {
        let table = TaxBracketTable::national();
        let brackets = table.brackets();

        assert_eq!(brackets[0].lower_bound, 0);
        for pair in brackets.windows(2) {
            assert_eq!(pair[0].upper_bound, Some(pair[1].lower_bound));
            assert!(pair[1].rate > pair[0].rate);
        }
        assert_eq!(brackets.last().map(|b| b.upper_bound), Some(None));
    }

    #[test]
    fn national_table_never_relies_on_zero_clamp() {
        // Tax at each lower bound is already non-negative, so the engine's
        // clamp at zero is never what keeps a result valid.
        for b in TaxBracketTable::national().brackets() {
            assert!(b.raw_tax(b.lower_bound) >= Decimal::ZERO, "{b:?}");
        }
    }

    // =========================================================================
    // bracket_for tests
    // =========================================================================

    #[test]
    fn bracket_for_zero_is_first_bracket() {
        let table = TaxBracketTable::national();

        assert_eq!(table.bracket_for(TaxableIncome::new(0)).rate, dec!(0.05));
    }

    #[test]
    fn bracket_for_lower_bound_is_inclusive() {
        let table = TaxBracketTable::national();

        let bracket = table.bracket_for(TaxableIncome::new(1_950_000));

        assert_eq!(bracket.lower_bound, 1_950_000);
        assert_eq!(bracket.rate, dec!(0.10));
    }

    #[test]
    fn bracket_for_upper_bound_is_exclusive() {
        let table = TaxBracketTable::national();

        let bracket = table.bracket_for(TaxableIncome::new(1_949_999));

        assert_eq!(bracket.lower_bound, 0);
    }

    #[test]
    fn bracket_for_top_bracket_is_unbounded() {
        let table = TaxBracketTable::national();

        let bracket = table.bracket_for(TaxableIncome::new(i64::MAX));

        assert_eq!(bracket.lower_bound, 40_000_000);
        assert_eq!(bracket.upper_bound, None);
    }

    #[test]
    fn bracket_for_matches_exactly_one_bracket() {
        let table = TaxBracketTable::national();
        let samples = [0, 1, 1_949_999, 1_950_000, 4_150_000, 8_999_999, 9_000_000, 50_000_000];

        for income in samples {
            let matching = table.brackets().iter().filter(|b| b.contains(income)).count();
            assert_eq!(matching, 1, "income {income}");
            assert!(table.bracket_for(TaxableIncome::new(income)).contains(income));
        }
    }

    #[test]
    fn taxable_income_clamps_negative_amounts() {
        assert_eq!(TaxableIncome::new(-150_000).get(), 0);
        assert_eq!(TaxableIncome::new(150_000).get(), 150_000);
    }

    // =========================================================================
    // validate tests
    // =========================================================================

    #[test]
    fn validate_accepts_minimal_table() {
        let brackets = vec![bracket(0, None, dec!(0.10), 0)];

        assert_eq!(TaxBracketTable::validate(&brackets), Ok(()));
    }

    #[test]
    fn validate_rejects_empty_table() {
        assert_eq!(TaxBracketTable::validate(&[]), Err(BracketTableError::Empty));
    }

    #[test]
    fn validate_rejects_nonzero_start() {
        let mut brackets = two_band_brackets();
        brackets[0].lower_bound = 10;

        assert_eq!(
            TaxBracketTable::validate(&brackets),
            Err(BracketTableError::FirstLowerBound(10))
        );
    }

    #[test]
    fn validate_rejects_gap() {
        let mut brackets = two_band_brackets();
        brackets[0].upper_bound = Some(900);

        assert_eq!(
            TaxBracketTable::validate(&brackets),
            Err(BracketTableError::Gap {
                index: 0,
                upper: 900,
                next_lower: 1_000,
            })
        );
    }

    #[test]
    fn validate_rejects_overlap() {
        let mut brackets = two_band_brackets();
        brackets[0].upper_bound = Some(1_100);

        assert_eq!(
            TaxBracketTable::validate(&brackets),
            Err(BracketTableError::Overlap {
                index: 0,
                upper: 1_100,
                next_lower: 1_000,
            })
        );
    }

    #[test]
    fn validate_rejects_bounded_top() {
        let mut brackets = two_band_brackets();
        brackets[1].upper_bound = Some(5_000);

        assert_eq!(
            TaxBracketTable::validate(&brackets),
            Err(BracketTableError::BoundedTop(5_000))
        );
    }

    #[test]
    fn validate_rejects_unbounded_middle_bracket() {
        let mut brackets = two_band_brackets();
        brackets[0].upper_bound = None;

        assert_eq!(
            TaxBracketTable::validate(&brackets),
            Err(BracketTableError::UnboundedBeforeEnd { index: 0 })
        );
    }

    #[test]
    fn validate_rejects_empty_interval() {
        let brackets = vec![
            bracket(0, Some(0), dec!(0.10), 0),
            bracket(0, None, dec!(0.20), 0),
        ];

        assert_eq!(
            TaxBracketTable::validate(&brackets),
            Err(BracketTableError::EmptyInterval {
                index: 0,
                lower: 0,
                upper: 0,
            })
        );
    }

    #[test]
    fn validate_rejects_rate_out_of_range() {
        let mut brackets = two_band_brackets();
        brackets[1].rate = dec!(1.5);

        assert_eq!(
            TaxBracketTable::validate(&brackets),
            Err(BracketTableError::RateOutOfRange {
                index: 1,
                rate: dec!(1.5),
            })
        );
    }

    #[test]
    fn validate_rejects_non_increasing_rates() {
        let brackets = vec![
            bracket(0, Some(1_000), dec!(0.20), 0),
            bracket(1_000, None, dec!(0.20), 0),
        ];

        assert_eq!(
            TaxBracketTable::validate(&brackets),
            Err(BracketTableError::RateNotIncreasing {
                index: 1,
                rate: dec!(0.20),
                previous: dec!(0.20),
            })
        );
    }

    #[test]
    fn validate_rejects_discontinuity() {
        let mut brackets = two_band_brackets();
        brackets[1].subtracted_amount = 50;

        assert_eq!(
            TaxBracketTable::validate(&brackets),
            Err(BracketTableError::Discontinuous {
                boundary: 1_000,
                below: dec!(100.00),
                above: dec!(150.00),
            })
        );
    }

    #[test]
    fn validate_rejects_negative_tax_at_lower_bound() {
        let brackets = vec![bracket(0, None, dec!(0.10), 10)];

        assert_eq!(
            TaxBracketTable::validate(&brackets),
            Err(BracketTableError::NegativeTax {
                lower_bound: 0,
                tax: dec!(-10.00),
            })
        );
    }

    #[test]
    fn new_rejects_malformed_table() {
        let mut brackets = two_band_brackets();
        brackets[0].upper_bound = Some(900);

        assert!(TaxBracketTable::new(brackets).is_err());
    }
}
