//! Integration tests for the bundled sample data, exercised together with
//! the tax-core calculations the dashboard runs on it.

use chrono::NaiveDate;
use pretty_assertions::assert_eq;
use rust_decimal_macros::dec;
use tax_core::ReturnKind;
use tax_core::calculations::{
    DashboardInputs, DashboardSummary, TaxEngine, common::round_percentage, cumulative,
    share_percentages, year_over_year_change,
};
use tax_core::ledger::EditableLedger;
use tax_data::{CalendarMonth, SampleData, TaxReturnArchive};

fn end_of_2024() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 1, 10).unwrap()
}

#[test]
fn test_load_bundled_fixtures() {
    let data = SampleData::load().expect("bundled fixtures should parse");

    assert_eq!(data.monthly.keys().copied().collect::<Vec<_>>(), vec![2023, 2024]);
    assert_eq!(data.clients.len(), 4);
    assert_eq!(data.expenses.len(), 4);
    assert_eq!(data.events.len(), 8);
    assert_eq!(data.tax_returns.len(), 4);
}

#[test]
fn test_archive_holds_both_documents_per_year() {
    let data = SampleData::load().unwrap();
    let archive = TaxReturnArchive::new(data.tax_returns);

    for year in [2022, 2023] {
        let kinds: Vec<ReturnKind> = archive.for_year(year).iter().map(|r| r.kind).collect();
        assert_eq!(kinds, vec![ReturnKind::FinalReturn, ReturnKind::BlueFormStatement]);
    }
    assert_eq!(archive.total_size(), 2_516_582 + 1_887_437 + 2_202_010 + 1_677_722);
}

#[test]
fn test_every_year_has_twelve_months() {
    let data = SampleData::load().unwrap();

    for (year, series) in &data.monthly {
        assert_eq!(series.revenue.len(), 12, "year {year}");
        assert_eq!(series.expenses.len(), 12, "year {year}");
    }
}

#[test]
fn test_client_and_expense_totals() {
    let data = SampleData::load().unwrap();

    let clients = EditableLedger::new(data.clients);
    let expenses = EditableLedger::new(data.expenses);

    assert_eq!(clients.total(), 4_850_000);
    assert_eq!(expenses.total(), 1_000_000);
}

#[test]
fn test_expense_shares() {
    let data = SampleData::load().unwrap();
    let amounts: Vec<i64> = data.expenses.iter().map(|e| e.amount).collect();

    let shares = share_percentages(&amounts);

    assert_eq!(shares, vec![dec!(45.0), dec!(18.0), dec!(12.0), dec!(25.0)]);
}

#[test]
fn test_year_over_year_change_for_2024() {
    let data = SampleData::load().unwrap();
    let year = data.year_data(2024, end_of_2024());

    let change = round_percentage(year_over_year_change(
        &year.current_year.revenue,
        &year.previous_year.revenue,
    ));

    // 5,250,000 vs 4,935,000
    assert_eq!(change.to_string(), "6.4");
}

#[test]
fn test_cumulative_revenue_ends_at_annual_total() {
    let data = SampleData::load().unwrap();
    let year = data.year_data(2024, end_of_2024());

    let running = cumulative(&year.current_year.revenue);

    assert_eq!(running.first(), Some(&420_000));
    assert_eq!(running.last(), Some(&year.current_year.total_revenue()));
    assert_eq!(year.current_year.total_revenue(), 5_250_000);
}

#[test]
fn test_confirmed_client_edit_flows_into_summary() {
    let data = SampleData::load().unwrap();
    let mut clients = EditableLedger::new(data.clients);
    let expenses = EditableLedger::new(data.expenses);

    clients.stage_edit_text(3, "¥400,000").unwrap();
    let revenue = clients.confirm().unwrap();

    let inputs = DashboardInputs {
        annual_revenue: revenue,
        total_expenses: expenses.total(),
        ..DashboardInputs::default()
    };
    let summary = DashboardSummary::compute(&TaxEngine::national(), &inputs).unwrap();

    // 4,800,000 - 1,000,000 matches the dashboard defaults.
    assert_eq!(summary.annual_income, 3_800_000);
    assert_eq!(summary.income_tax, 217_500);
    assert_eq!(summary.withholding, 490_080);
}

#[test]
fn test_tax_deadline_on_march_calendar() {
    let data = SampleData::load().unwrap();

    let march = CalendarMonth::build(&data, 2024, 3).unwrap();

    assert_eq!(march.days, 31);
    assert_eq!(march.event_days(), vec![15, 29]);
}
