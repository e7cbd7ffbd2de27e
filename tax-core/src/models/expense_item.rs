use serde::{Deserialize, Serialize};

/// Total spent in one expense category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpenseItem {
    pub category: String,
    pub amount: i64,
}
