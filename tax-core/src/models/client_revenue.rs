use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Revenue billed to a single client during the year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientRevenue {
    pub name: String,
    pub revenue: i64,
    pub projects: u32,
    pub last_invoice: NaiveDate,
}
