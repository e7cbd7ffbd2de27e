//! Tax and dashboard calculations.
//!
//! The tax engine (bracket table, income tax, resident tax, withholding) sits
//! at the bottom; revenue analytics and the dashboard summary build on it.

pub mod brackets;
pub mod common;
pub mod engine;
pub mod revenue;
pub mod rules;
pub mod summary;

pub use brackets::{BracketTableError, NATIONAL_BRACKETS, TaxBracketTable, TaxableIncome};
pub use engine::{
    TaxAssessment, TaxEngine, compute_income_tax, compute_resident_tax, estimate_withholding,
};
pub use revenue::{
    RevenueError, TargetProgress, cumulative, months_to_include, share_percentages,
    year_over_year_change,
};
pub use rules::{BLUE_FORM_DEDUCTION, RESIDENT_TAX_RATE, TaxRules, TaxRulesError, WITHHOLDING_RATE};
pub use summary::{
    Advice, DEFAULT_ANNUAL_REVENUE, DEFAULT_TARGET_REVENUE, DEFAULT_TOTAL_EXPENSES, DashboardInputs,
    DashboardSummary, HIGH_EXPENSE_RATIO_PERCENT, HIGH_MARGIN_PERCENT, LOW_MARGIN_PERCENT,
    TaxPayable, advice,
};
