//! Sample dashboard data.
//!
//! The data ships inside the binary as CSV fixtures (see `data/`) and is
//! parsed on demand. Each parser accepts any [`Read`] so tests can feed
//! inline strings.
//!
//! ## Fixture formats
//!
//! | File           | Columns |
//! |----------------|---------|
//! | `monthly.csv`  | `year`, `month` (1-12), `revenue`, `expenses` |
//! | `clients.csv`  | `name`, `revenue`, `projects`, `last_invoice` (YYYY-MM-DD) |
//! | `expenses.csv` | `category`, `amount` |
//! | `events.csv`   | `date`, `kind` (`invoice`/`payment`/`tax`), `client`, `amount`, `description` |
//! | `tax_returns.csv` | `id`, `year`, `file_name`, `uploaded_on`, `size_bytes`, `kind` (`final_return`/`income_statement`/`blue_form_statement`) |
//!
//! Empty `client` and `amount` cells in `events.csv` mean "none".

use std::collections::BTreeMap;
use std::io::Read;

use chrono::{Datelike, NaiveDate};
use serde::Deserialize;
use tax_core::calculations::months_to_include;
use tax_core::{
    ClientRevenue, EventKind, ExpenseItem, FinancialEvent, MonthlySeries, TaxReturn, YearData,
};
use thiserror::Error;
use tracing::debug;

const MONTHLY_CSV: &str = include_str!("../data/monthly.csv");
const CLIENTS_CSV: &str = include_str!("../data/clients.csv");
const EXPENSES_CSV: &str = include_str!("../data/expenses.csv");
const EVENTS_CSV: &str = include_str!("../data/events.csv");
const TAX_RETURNS_CSV: &str = include_str!("../data/tax_returns.csv");

/// Errors that can occur when parsing sample data.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SampleDataError {
    #[error("CSV parse error: {0}")]
    CsvParse(String),

    #[error("invalid month {month} for year {year}")]
    InvalidMonth { year: i32, month: u32 },

    #[error("months for year {year} must run 1, 2, 3, ... without gaps or repeats")]
    NonContiguousMonths { year: i32 },

    #[error("unknown event kind '{0}'")]
    UnknownEventKind(String),
}

impl From<csv::Error> for SampleDataError {
    fn from(err: csv::Error) -> Self {
        SampleDataError::CsvParse(err.to_string())
    }
}

#[derive(Debug, Deserialize)]
struct MonthlyRecord {
    year: i32,
    month: u32,
    revenue: i64,
    expenses: i64,
}

#[derive(Debug, Deserialize)]
struct EventRecord {
    date: NaiveDate,
    kind: String,
    client: Option<String>,
    amount: Option<i64>,
    description: String,
}

/// All sample data behind the dashboard.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SampleData {
    /// Monthly series keyed by year.
    pub monthly: BTreeMap<i32, MonthlySeries>,
    pub clients: Vec<ClientRevenue>,
    pub expenses: Vec<ExpenseItem>,
    pub events: Vec<FinancialEvent>,
    pub tax_returns: Vec<TaxReturn>,
}

impl SampleData {
    /// Parses the fixtures bundled with the crate.
    pub fn load() -> Result<Self, SampleDataError> {
        let data = Self {
            monthly: Self::parse_monthly(MONTHLY_CSV.as_bytes())?,
            clients: Self::parse_clients(CLIENTS_CSV.as_bytes())?,
            expenses: Self::parse_expenses(EXPENSES_CSV.as_bytes())?,
            events: Self::parse_events(EVENTS_CSV.as_bytes())?,
            tax_returns: Self::parse_tax_returns(TAX_RETURNS_CSV.as_bytes())?,
        };
        debug!(
            years = data.monthly.len(),
            clients = data.clients.len(),
            expenses = data.expenses.len(),
            events = data.events.len(),
            tax_returns = data.tax_returns.len(),
            "sample data loaded"
        );
        Ok(data)
    }

    /// Parses monthly revenue and expenses, grouped by year.
    ///
    /// Rows may appear in any order, but each year's months must form a
    /// contiguous run starting at January.
    pub fn parse_monthly<R: Read>(
        reader: R
    ) -> Result<BTreeMap<i32, MonthlySeries>, SampleDataError> {
        let mut csv_reader = csv::Reader::from_reader(reader);
        let mut by_year: BTreeMap<i32, Vec<MonthlyRecord>> = BTreeMap::new();

        for result in csv_reader.deserialize() {
            let record: MonthlyRecord = result?;
            if !(1..=12).contains(&record.month) {
                return Err(SampleDataError::InvalidMonth {
                    year: record.year,
                    month: record.month,
                });
            }
            by_year.entry(record.year).or_default().push(record);
        }

        by_year
            .into_iter()
            .map(|(year, mut records)| {
                records.sort_by_key(|r| r.month);
                let contiguous = records
                    .iter()
                    .zip(1..)
                    .all(|(record, expected)| record.month == expected);
                if !contiguous {
                    return Err(SampleDataError::NonContiguousMonths { year });
                }
                let series = MonthlySeries {
                    revenue: records.iter().map(|r| r.revenue).collect(),
                    expenses: records.iter().map(|r| r.expenses).collect(),
                };
                Ok((year, series))
            })
            .collect()
    }

    pub fn parse_clients<R: Read>(reader: R) -> Result<Vec<ClientRevenue>, SampleDataError> {
        let mut csv_reader = csv::Reader::from_reader(reader);
        let clients = csv_reader.deserialize().collect::<Result<Vec<_>, _>>()?;
        Ok(clients)
    }

    pub fn parse_expenses<R: Read>(reader: R) -> Result<Vec<ExpenseItem>, SampleDataError> {
        let mut csv_reader = csv::Reader::from_reader(reader);
        let expenses = csv_reader.deserialize().collect::<Result<Vec<_>, _>>()?;
        Ok(expenses)
    }

    pub fn parse_events<R: Read>(reader: R) -> Result<Vec<FinancialEvent>, SampleDataError> {
        let mut csv_reader = csv::Reader::from_reader(reader);
        let mut events = Vec::new();

        for result in csv_reader.deserialize() {
            let record: EventRecord = result?;
            let kind = EventKind::parse(&record.kind)
                .ok_or_else(|| SampleDataError::UnknownEventKind(record.kind.clone()))?;
            events.push(FinancialEvent {
                date: record.date,
                kind,
                client: record.client,
                amount: record.amount,
                description: record.description,
            });
        }

        events.sort_by_key(|e| e.date);
        Ok(events)
    }

    pub fn parse_tax_returns<R: Read>(reader: R) -> Result<Vec<TaxReturn>, SampleDataError> {
        let mut csv_reader = csv::Reader::from_reader(reader);
        let tax_returns = csv_reader.deserialize().collect::<Result<Vec<_>, _>>()?;
        Ok(tax_returns)
    }

    /// Most recent year with monthly data.
    pub fn latest_year(&self) -> Option<i32> {
        self.monthly.keys().next_back().copied()
    }

    /// Series for `selected_year` and the year before, truncated to the
    /// months elapsed as of `today`.
    ///
    /// Years without data yield empty series.
    pub fn year_data(
        &self,
        selected_year: i32,
        today: NaiveDate,
    ) -> YearData {
        let months = months_to_include(selected_year, today);
        let series_for = |year: i32| {
            self.monthly
                .get(&year)
                .map(|series| series.truncated(months))
                .unwrap_or_default()
        };

        YearData {
            current_year: series_for(selected_year),
            previous_year: series_for(selected_year - 1),
        }
    }

    /// Revenue and expenses for one month, zero when there is no data.
    pub fn month_totals(
        &self,
        year: i32,
        month: u32,
    ) -> (i64, i64) {
        let index = month.saturating_sub(1) as usize;
        self.monthly
            .get(&year)
            .map(|series| {
                (
                    series.revenue.get(index).copied().unwrap_or(0),
                    series.expenses.get(index).copied().unwrap_or(0),
                )
            })
            .unwrap_or((0, 0))
    }

    /// Events dated in `month` of `year`, oldest first.
    pub fn events_in_month(
        &self,
        year: i32,
        month: u32,
    ) -> Vec<&FinancialEvent> {
        self.events
            .iter()
            .filter(|e| e.date.year() == year && e.is_in_month(month))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use tax_core::ReturnKind;

    use super::*;

    // =========================================================================
    // parse_monthly tests
    // =========================================================================

    #[test]
    fn parse_monthly_groups_by_year_and_sorts() {
        let csv = "year,month,revenue,expenses\n\
                   2024,2,200,20\n\
                   2024,1,100,10\n\
                   2023,1,50,5\n";

        let monthly = SampleData::parse_monthly(csv.as_bytes()).unwrap();

        assert_eq!(monthly.len(), 2);
        assert_eq!(monthly[&2024].revenue, vec![100, 200]);
        assert_eq!(monthly[&2024].expenses, vec![10, 20]);
        assert_eq!(monthly[&2023].revenue, vec![50]);
    }

    #[test]
    fn parse_monthly_rejects_month_out_of_range() {
        let csv = "year,month,revenue,expenses\n2024,13,100,10\n";

        assert_eq!(
            SampleData::parse_monthly(csv.as_bytes()),
            Err(SampleDataError::InvalidMonth {
                year: 2024,
                month: 13,
            })
        );
    }

    #[test]
    fn parse_monthly_rejects_gap() {
        let csv = "year,month,revenue,expenses\n2024,1,100,10\n2024,3,100,10\n";

        assert_eq!(
            SampleData::parse_monthly(csv.as_bytes()),
            Err(SampleDataError::NonContiguousMonths { year: 2024 })
        );
    }

    #[test]
    fn parse_monthly_rejects_repeated_month() {
        let csv = "year,month,revenue,expenses\n2024,1,100,10\n2024,1,100,10\n";

        assert_eq!(
            SampleData::parse_monthly(csv.as_bytes()),
            Err(SampleDataError::NonContiguousMonths { year: 2024 })
        );
    }

    #[test]
    fn parse_monthly_rejects_non_numeric_amount() {
        let csv = "year,month,revenue,expenses\n2024,1,lots,10\n";

        assert!(matches!(
            SampleData::parse_monthly(csv.as_bytes()),
            Err(SampleDataError::CsvParse(_))
        ));
    }

    // =========================================================================
    // parse_events tests
    // =========================================================================

    #[test]
    fn parse_events_reads_optional_cells() {
        let csv = "date,kind,client,amount,description\n\
                   2024-03-15,tax,,,Filing deadline\n\
                   2024-01-15,invoice,Acme,220000,January invoice\n";

        let events = SampleData::parse_events(csv.as_bytes()).unwrap();

        assert_eq!(events.len(), 2);
        // sorted by date
        assert_eq!(events[0].kind, EventKind::Invoice);
        assert_eq!(events[0].client.as_deref(), Some("Acme"));
        assert_eq!(events[0].amount, Some(220_000));
        assert_eq!(events[1].kind, EventKind::Tax);
        assert_eq!(events[1].client, None);
        assert_eq!(events[1].amount, None);
    }

    #[test]
    fn parse_events_rejects_unknown_kind() {
        let csv = "date,kind,client,amount,description\n2024-01-01,refund,,,x\n";

        assert_eq!(
            SampleData::parse_events(csv.as_bytes()),
            Err(SampleDataError::UnknownEventKind("refund".to_string()))
        );
    }

    // =========================================================================
    // parse_tax_returns tests
    // =========================================================================

    #[test]
    fn parse_tax_returns_reads_kind_codes() {
        let csv = "id,year,file_name,uploaded_on,size_bytes,kind\n\
                   7,2021,r3.pdf,2022-03-14,1024,income_statement\n";

        let returns = SampleData::parse_tax_returns(csv.as_bytes()).unwrap();

        assert_eq!(returns.len(), 1);
        assert_eq!(returns[0].id, "7");
        assert_eq!(returns[0].kind, ReturnKind::IncomeStatement);
        assert_eq!(
            returns[0].uploaded_on,
            NaiveDate::from_ymd_opt(2022, 3, 14).unwrap()
        );
    }

    #[test]
    fn parse_tax_returns_rejects_unknown_kind() {
        let csv = "id,year,file_name,uploaded_on,size_bytes,kind\n\
                   7,2021,r3.pdf,2022-03-14,1024,receipt\n";

        assert!(matches!(
            SampleData::parse_tax_returns(csv.as_bytes()),
            Err(SampleDataError::CsvParse(_))
        ));
    }

    // =========================================================================
    // SampleData query tests
    // =========================================================================

    fn small_data() -> SampleData {
        let monthly = SampleData::parse_monthly(
            "year,month,revenue,expenses\n\
             2023,1,90,9\n2023,2,90,9\n2023,3,90,9\n\
             2024,1,100,10\n2024,2,110,11\n2024,3,120,12\n"
                .as_bytes(),
        )
        .unwrap();
        SampleData {
            monthly,
            ..SampleData::default()
        }
    }

    #[test]
    fn year_data_truncates_running_year() {
        let today = NaiveDate::from_ymd_opt(2024, 2, 10).unwrap();

        let data = small_data().year_data(2024, today);

        assert_eq!(data.current_year.revenue, vec![100, 110]);
        assert_eq!(data.previous_year.revenue, vec![90, 90]);
    }

    #[test]
    fn year_data_past_year_is_not_truncated() {
        let today = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();

        let data = small_data().year_data(2024, today);

        assert_eq!(data.current_year.revenue, vec![100, 110, 120]);
    }

    #[test]
    fn year_data_missing_year_is_empty() {
        let today = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();

        let data = small_data().year_data(2023, today);

        assert_eq!(data.previous_year, MonthlySeries::default());
    }

    #[test]
    fn month_totals_defaults_to_zero() {
        let data = small_data();

        assert_eq!(data.month_totals(2024, 2), (110, 11));
        assert_eq!(data.month_totals(2024, 7), (0, 0));
        assert_eq!(data.month_totals(1999, 1), (0, 0));
    }

    #[test]
    fn latest_year_is_highest_key() {
        assert_eq!(small_data().latest_year(), Some(2024));
        assert_eq!(SampleData::default().latest_year(), None);
    }
}
