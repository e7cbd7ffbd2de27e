use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    Invoice,
    Payment,
    Tax,
}

impl EventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Invoice => "invoice",
            Self::Payment => "payment",
            Self::Tax => "tax",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "invoice" => Some(Self::Invoice),
            "payment" => Some(Self::Payment),
            "tax" => Some(Self::Tax),
            _ => None,
        }
    }
}

/// A dated entry on the financial calendar (invoice sent, payment made, tax due).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinancialEvent {
    pub date: NaiveDate,
    pub kind: EventKind,
    pub client: Option<String>,
    pub amount: Option<i64>,
    pub description: String,
}

impl FinancialEvent {
    /// Returns `true` if the event falls in `month` (1-12), any year.
    pub fn is_in_month(
        &self,
        month: u32,
    ) -> bool {
        self.date.month() == month
    }
}
