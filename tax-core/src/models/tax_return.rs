use chrono::NaiveDate;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

const BYTES_PER_MB: i64 = 1024 * 1024;

/// Kind of document filed with a return.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReturnKind {
    /// 確定申告書, the return itself.
    FinalReturn,
    /// 収支内訳書, the white-form income statement.
    IncomeStatement,
    /// 青色申告決算書, the blue-form financial statement.
    BlueFormStatement,
}

impl ReturnKind {
    pub fn label(&self) -> &'static str {
        match self {
            Self::FinalReturn => "確定申告書",
            Self::IncomeStatement => "収支内訳書",
            Self::BlueFormStatement => "青色申告決算書",
        }
    }
}

/// One archived tax-return document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxReturn {
    pub id: String,
    /// Tax year the document covers.
    pub year: i32,
    pub file_name: String,
    pub uploaded_on: NaiveDate,
    pub size_bytes: u64,
    pub kind: ReturnKind,
}

impl TaxReturn {
    /// File size in megabytes to one decimal place, e.g. `2.4 MB`.
    pub fn size_label(&self) -> String {
        let megabytes = (Decimal::from(self.size_bytes) / Decimal::from(BYTES_PER_MB))
            .round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero);
        format!("{megabytes:.1} MB")
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn document(size_bytes: u64) -> TaxReturn {
        TaxReturn {
            id: "1".to_string(),
            year: 2023,
            file_name: "令和5年分確定申告書.pdf".to_string(),
            uploaded_on: NaiveDate::from_ymd_opt(2024, 3, 15).unwrap(),
            size_bytes,
            kind: ReturnKind::FinalReturn,
        }
    }

    #[test]
    fn size_label_in_megabytes() {
        assert_eq!(document(2_516_582).size_label(), "2.4 MB");
        assert_eq!(document(1_048_576).size_label(), "1.0 MB");
        assert_eq!(document(0).size_label(), "0.0 MB");
    }

    #[test]
    fn kind_labels() {
        assert_eq!(ReturnKind::FinalReturn.label(), "確定申告書");
        assert_eq!(ReturnKind::BlueFormStatement.label(), "青色申告決算書");
    }
}
