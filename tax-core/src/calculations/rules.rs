//! Tax rule configuration.
//!
//! [`TaxRules`] bundles every constant the engine uses. The default is the
//! national rule set; a caller may load a custom set (for example from a
//! configuration file) and must validate it before building an engine.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::brackets::TaxBracketTable;

/// Flat special deduction for blue-form filers (青色申告特別控除), in yen.
pub const BLUE_FORM_DEDUCTION: i64 = 650_000;

/// Flat resident-tax rate applied to taxable income.
pub const RESIDENT_TAX_RATE: Decimal = dec!(0.10);

/// Withholding rate applied to gross revenue (10.21% including the
/// reconstruction surtax).
pub const WITHHOLDING_RATE: Decimal = dec!(0.1021);

/// Errors that can occur when validating [`TaxRules`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TaxRulesError {
    /// The blue-form deduction must be non-negative.
    #[error("blue form deduction must be non-negative, got {0}")]
    InvalidBlueFormDeduction(i64),

    /// The resident-tax rate must lie in (0, 1].
    #[error("resident tax rate must be above 0 and at most 1, got {0}")]
    InvalidResidentTaxRate(Decimal),

    /// The withholding rate must lie in (0, 1].
    #[error("withholding rate must be above 0 and at most 1, got {0}")]
    InvalidWithholdingRate(Decimal),
}

/// Rates, deductions and the bracket table used by the tax engine.
///
/// # Example
///
/// ```
/// use rust_decimal_macros::dec;
/// use tax_core::calculations::TaxRules;
///
/// let rules = TaxRules::default();
///
/// assert_eq!(rules.blue_form_deduction, 650_000);
/// assert_eq!(rules.resident_tax_rate, dec!(0.10));
/// assert_eq!(rules.withholding_rate, dec!(0.1021));
/// assert!(rules.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxRules {
    /// Progressive income-tax table. Always a valid partition.
    pub brackets: TaxBracketTable,

    /// Deduction subtracted from gross income for blue-form filers.
    pub blue_form_deduction: i64,

    /// Flat resident-tax rate.
    pub resident_tax_rate: Decimal,

    /// Rate used to estimate tax withheld at source from gross revenue.
    pub withholding_rate: Decimal,
}

impl Default for TaxRules {
    fn default() -> Self {
        Self {
            brackets: TaxBracketTable::national(),
            blue_form_deduction: BLUE_FORM_DEDUCTION,
            resident_tax_rate: RESIDENT_TAX_RATE,
            withholding_rate: WITHHOLDING_RATE,
        }
    }
}

impl TaxRules {
    /// Validates the scalar rule values.
    ///
    /// The bracket table is validated when it is built, so it is not
    /// re-checked here.
    ///
    /// # Errors
    ///
    /// Returns [`TaxRulesError`] if:
    /// - `blue_form_deduction` is negative
    /// - `resident_tax_rate` is not in (0, 1]
    /// - `withholding_rate` is not in (0, 1]
    pub fn validate(&self) -> Result<(), TaxRulesError> {
        if self.blue_form_deduction < 0 {
            return Err(TaxRulesError::InvalidBlueFormDeduction(
                self.blue_form_deduction,
            ));
        }
        if self.resident_tax_rate <= Decimal::ZERO || self.resident_tax_rate > Decimal::ONE {
            return Err(TaxRulesError::InvalidResidentTaxRate(
                self.resident_tax_rate,
            ));
        }
        if self.withholding_rate <= Decimal::ZERO || self.withholding_rate > Decimal::ONE {
            return Err(TaxRulesError::InvalidWithholdingRate(
                self.withholding_rate,
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn default_rules_are_valid() {
        assert_eq!(TaxRules::default().validate(), Ok(()));
    }

    #[test]
    fn validate_rejects_negative_deduction() {
        let rules = TaxRules {
            blue_form_deduction: -1,
            ..TaxRules::default()
        };

        assert_eq!(
            rules.validate(),
            Err(TaxRulesError::InvalidBlueFormDeduction(-1))
        );
    }

    #[test]
    fn validate_rejects_resident_rate_above_one() {
        let rules = TaxRules {
            resident_tax_rate: dec!(1.01),
            ..TaxRules::default()
        };

        assert_eq!(
            rules.validate(),
            Err(TaxRulesError::InvalidResidentTaxRate(dec!(1.01)))
        );
    }

    #[test]
    fn validate_rejects_negative_withholding_rate() {
        let rules = TaxRules {
            withholding_rate: dec!(-0.1),
            ..TaxRules::default()
        };

        assert_eq!(
            rules.validate(),
            Err(TaxRulesError::InvalidWithholdingRate(dec!(-0.1)))
        );
    }

    #[test]
    fn validate_rejects_zero_rates() {
        let resident = TaxRules {
            resident_tax_rate: Decimal::ZERO,
            ..TaxRules::default()
        };
        let withholding = TaxRules {
            withholding_rate: Decimal::ZERO,
            ..TaxRules::default()
        };

        assert_eq!(
            resident.validate(),
            Err(TaxRulesError::InvalidResidentTaxRate(Decimal::ZERO))
        );
        assert_eq!(
            withholding.validate(),
            Err(TaxRulesError::InvalidWithholdingRate(Decimal::ZERO))
        );
    }

    #[test]
    fn validate_accepts_rate_of_one() {
        let rules = TaxRules {
            resident_tax_rate: Decimal::ONE,
            withholding_rate: Decimal::ONE,
            ..TaxRules::default()
        };

        assert_eq!(rules.validate(), Ok(()));
    }

    #[test]
    fn validate_accepts_zero_deduction() {
        let rules = TaxRules {
            blue_form_deduction: 0,
            ..TaxRules::default()
        };

        assert_eq!(rules.validate(), Ok(()));
    }
}
