//! TOML configuration for the dashboard.
//!
//! Every section and key is optional; anything left out falls back to the
//! national tax rules and the dashboard defaults. Command-line flags are
//! applied on top of the loaded values.
//!
//! ```toml
//! [dashboard]
//! annual_revenue = 4800000
//! total_expenses = 1000000
//! target_revenue = 6000000
//! filing = "blue"
//!
//! [logging]
//! level = "debug"
//! file = "tax-dashboard.log"
//!
//! [tax]
//! blue_form_deduction = 650000
//! resident_tax_rate = "0.10"
//! withholding_rate = "0.1021"
//!
//! [[tax.brackets]]
//! lower_bound = 0
//! rate = "0.10"
//! subtracted_amount = 0
//! ```
//!
//! A `[[tax.brackets]]` list replaces the whole national table and must form
//! a valid progressive table; it is checked while the file is parsed.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use rust_decimal::Decimal;
use serde::Deserialize;
use tax_core::FilingType;
use tax_core::calculations::{DashboardInputs, TaxBracketTable, TaxRules, TaxRulesError};
use thiserror::Error;
use tracing::debug;

/// Loaded when no `--config` is given and the file exists.
pub const DEFAULT_CONFIG_FILE: &str = "tax-dashboard.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid tax rules: {0}")]
    Rules(#[from] TaxRulesError),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DashboardSection {
    pub annual_revenue: Option<i64>,
    pub total_expenses: Option<i64>,
    pub target_revenue: Option<i64>,
    pub withholding: Option<i64>,
    pub filing: Option<FilingType>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingSection {
    pub level: Option<String>,
    pub file: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TaxSection {
    pub blue_form_deduction: Option<i64>,
    pub resident_tax_rate: Option<Decimal>,
    pub withholding_rate: Option<Decimal>,
    pub brackets: Option<TaxBracketTable>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    pub dashboard: DashboardSection,
    pub logging: LoggingSection,
    pub tax: TaxSection,
}

impl AppConfig {
    pub fn parse(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path.display(), "loading config");
        Self::parse(&text)
    }

    /// Loads `path` if given, else [`DEFAULT_CONFIG_FILE`] if it exists,
    /// else the defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::load(path),
            None => {
                let default_path = Path::new(DEFAULT_CONFIG_FILE);
                if default_path.is_file() {
                    Self::load(default_path)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    /// National rules with this file's `[tax]` overrides applied.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Rules`] if the merged rules fail validation.
    pub fn tax_rules(&self) -> Result<TaxRules, ConfigError> {
        let defaults = TaxRules::default();
        let rules = TaxRules {
            brackets: self.tax.brackets.clone().unwrap_or(defaults.brackets),
            blue_form_deduction: self
                .tax
                .blue_form_deduction
                .unwrap_or(defaults.blue_form_deduction),
            resident_tax_rate: self
                .tax
                .resident_tax_rate
                .unwrap_or(defaults.resident_tax_rate),
            withholding_rate: self.tax.withholding_rate.unwrap_or(defaults.withholding_rate),
        };
        rules.validate()?;
        Ok(rules)
    }

    /// Dashboard defaults with this file's `[dashboard]` overrides applied.
    pub fn dashboard_inputs(&self) -> DashboardInputs {
        let defaults = DashboardInputs::default();
        let section = &self.dashboard;
        DashboardInputs {
            annual_revenue: section.annual_revenue.unwrap_or(defaults.annual_revenue),
            total_expenses: section.total_expenses.unwrap_or(defaults.total_expenses),
            target_revenue: section.target_revenue.unwrap_or(defaults.target_revenue),
            filing: section.filing.unwrap_or(defaults.filing),
            withholding_override: section.withholding.or(defaults.withholding_override),
        }
    }
}
