use serde::{Deserialize, Serialize};

use crate::calculations::common::saturating_total;

/// Month-by-month revenue and expenses, January first.
///
/// Both vectors have the same length; a series for the running year is
/// truncated to the months elapsed so far.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlySeries {
    pub revenue: Vec<i64>,
    pub expenses: Vec<i64>,
}

impl MonthlySeries {
    /// Saturates at the `i64` bounds, as do all totals here.
    pub fn total_revenue(&self) -> i64 {
        saturating_total(self.revenue.iter().copied())
    }

    pub fn total_expenses(&self) -> i64 {
        saturating_total(self.expenses.iter().copied())
    }

    /// Keeps only the first `months` entries of each series.
    pub fn truncated(
        &self,
        months: usize,
    ) -> Self {
        Self {
            revenue: self.revenue.iter().take(months).copied().collect(),
            expenses: self.expenses.iter().take(months).copied().collect(),
        }
    }
}

/// Current and previous year series, used for year-over-year comparisons.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearData {
    pub current_year: MonthlySeries,
    pub previous_year: MonthlySeries,
}
