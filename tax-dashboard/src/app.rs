//! Command dispatch and report rendering.
//!
//! Each command renders to a `String` so the binary only has to print it
//! and tests can inspect it.

use std::fmt::Write;

use anyhow::{Context, Result};
use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use tax_core::calculations::common::{format_yen, round_percentage};
use tax_core::calculations::{
    DashboardSummary, TaxBracketTable, TaxEngine, advice, cumulative, share_percentages,
    year_over_year_change,
};
use tax_core::ledger::{EditableLedger, LedgerEntry, LedgerError};
use tax_core::{ClientRevenue, ExpenseItem};
use tax_data::{CalendarMonth, SampleData, TaxReturnArchive};
use tracing::{info, warn};

use crate::cli::{ArchiveArgs, Command, EditArgs, SummaryArgs};
use crate::config::AppConfig;

/// Runs `command` and returns the report to print.
pub fn run(
    command: &Command,
    engine: &TaxEngine,
    config: &AppConfig,
    today: NaiveDate,
) -> Result<String> {
    match command {
        Command::Tax { income, filing } => {
            let filing = filing.unwrap_or(config.dashboard_inputs().filing);
            Ok(engine.assess(*income, filing).to_string())
        }
        Command::Summary(args) => summary_report(args, engine, config, today),
        Command::Brackets => brackets_report(&engine.rules().brackets),
        Command::Clients(args) => clients_report(args),
        Command::Expenses(args) => expenses_report(args),
        Command::Monthly { year } => monthly_report(*year, today),
        Command::Calendar { year, month } => {
            let data = load_sample_data()?;
            let year = year.or(data.latest_year()).unwrap_or(today.year());
            Ok(CalendarMonth::build(&data, year, *month)?.to_string())
        }
        Command::Archive(args) => archive_report(args),
    }
}

fn load_sample_data() -> Result<SampleData> {
    SampleData::load().context("failed to load sample data")
}

fn summary_report(
    args: &SummaryArgs,
    engine: &TaxEngine,
    config: &AppConfig,
    today: NaiveDate,
) -> Result<String> {
    let mut inputs = config.dashboard_inputs();
    let data = load_sample_data()?;

    let revenue_trend = match args.trend {
        Some(trend) => trend,
        None => {
            let year = data.latest_year().unwrap_or(today.year());
            let year_data = data.year_data(year, today);
            year_over_year_change(
                &year_data.current_year.revenue,
                &year_data.previous_year.revenue,
            )
        }
    };
    if args.from_sample {
        inputs.annual_revenue = EditableLedger::new(data.clients).total();
        inputs.total_expenses = EditableLedger::new(data.expenses).total();
    }
    if let Some(revenue) = args.revenue {
        inputs.annual_revenue = revenue;
    }
    if let Some(expenses) = args.expenses {
        inputs.total_expenses = expenses;
    }
    if let Some(target) = args.target {
        inputs.target_revenue = target;
    }
    if let Some(filing) = args.filing {
        inputs.filing = filing;
    }
    if args.withholding.is_some() {
        inputs.withholding_override = args.withholding;
    }

    let summary = DashboardSummary::compute(engine, &inputs)?;
    let advice = advice(&summary, revenue_trend);
    info!(
        income_tax = summary.income_tax,
        tax_payable = summary.tax_payable.amount(),
        ?advice,
        "summary computed"
    );
    Ok(format!(
        "{summary}\nRevenue trend:   {:+.1}%\nAdvice:          {advice}",
        round_percentage(revenue_trend)
    ))
}

fn brackets_report(table: &TaxBracketTable) -> Result<String> {
    let mut out = String::new();
    writeln!(
        out,
        "{:>14}  {:>14}  {:>5}  {:>12}",
        "From", "Below", "Rate", "Subtract"
    )?;
    for bracket in table.brackets() {
        let upper = bracket
            .upper_bound
            .map(format_yen)
            .unwrap_or_else(|| "-".to_string());
        writeln!(
            out,
            "{:>14}  {:>14}  {:>4}%  {:>12}",
            format_yen(bracket.lower_bound),
            upper,
            (bracket.rate * Decimal::ONE_HUNDRED).normalize(),
            format_yen(bracket.subtracted_amount)
        )?;
    }
    Ok(out.trim_end().to_string())
}

/// Stages `args.edit` on `ledger` and commits it when `args.confirm` is set.
///
/// Returns a status line describing what happened, or `None` when no edit
/// was requested.
fn apply_edit<T: LedgerEntry>(
    ledger: &mut EditableLedger<T>,
    args: &EditArgs,
) -> Result<Option<String>> {
    let Some(edit) = &args.edit else {
        return Ok(None);
    };

    let staged = ledger.stage_edit_text(edit.index, &edit.amount).map(|p| *p);
    let pending = match staged {
        Ok(pending) => pending,
        Err(LedgerError::Unchanged { index, amount }) => {
            let label = ledger.entries()[index].label();
            return Ok(Some(format!("No change: {label} is already {}", format_yen(amount))));
        }
        Err(err) => {
            return Err(err).with_context(|| format!("cannot edit row {}", edit.index + 1));
        }
    };
    let label = ledger.entries()[pending.index].label().to_string();
    let change = format!(
        "{label}: {} -> {}",
        format_yen(pending.previous),
        format_yen(pending.amount)
    );

    if args.confirm {
        let total = ledger.confirm()?;
        Ok(Some(format!("Applied {change} (new total {})", format_yen(total))))
    } else {
        ledger.cancel();
        warn!(%change, "edit not confirmed");
        Ok(Some(format!("Not applied {change} (pass --confirm to apply)")))
    }
}

fn clients_report(args: &EditArgs) -> Result<String> {
    let data = load_sample_data()?;
    let mut ledger = EditableLedger::new(data.clients);
    let status = apply_edit(&mut ledger, args)?;

    let clients: &[ClientRevenue] = ledger.entries();
    let shares = share_percentages(&ledger.amounts());

    let mut out = String::new();
    for (row, (client, share)) in clients.iter().zip(&shares).enumerate() {
        writeln!(
            out,
            "{:>2}. {}  {}  {share:.1}%  {} projects  last invoice {}",
            row + 1,
            client.name,
            format_yen(client.revenue),
            client.projects,
            client.last_invoice
        )?;
    }
    let projects = clients
        .iter()
        .fold(0_u32, |total, c| total.saturating_add(c.projects));
    write!(
        out,
        "Total: {}  {projects} projects",
        format_yen(ledger.total())
    )?;
    if let Some(status) = status {
        write!(out, "\n{status}")?;
    }
    Ok(out)
}

fn expenses_report(args: &EditArgs) -> Result<String> {
    let data = load_sample_data()?;
    let mut ledger = EditableLedger::new(data.expenses);
    let status = apply_edit(&mut ledger, args)?;

    let expenses: &[ExpenseItem] = ledger.entries();
    let shares = share_percentages(&ledger.amounts());

    let mut out = String::new();
    for (row, (expense, share)) in expenses.iter().zip(&shares).enumerate() {
        writeln!(
            out,
            "{:>2}. {}  {}  {share:.1}%",
            row + 1,
            expense.category,
            format_yen(expense.amount)
        )?;
    }
    write!(out, "Total: {}", format_yen(ledger.total()))?;
    if let Some(status) = status {
        write!(out, "\n{status}")?;
    }
    Ok(out)
}

fn monthly_report(
    year: Option<i32>,
    today: NaiveDate,
) -> Result<String> {
    let data = load_sample_data()?;
    let year = year.or(data.latest_year()).unwrap_or(today.year());
    let year_data = data.year_data(year, today);
    let current = &year_data.current_year;
    let running = cumulative(&current.revenue);

    let mut out = String::new();
    writeln!(
        out,
        "{year}  {:>12}  {:>12}  {:>12}",
        "Revenue", "Expenses", "Cumulative"
    )?;
    for (index, ((revenue, expenses), total)) in current
        .revenue
        .iter()
        .zip(&current.expenses)
        .zip(&running)
        .enumerate()
    {
        writeln!(
            out,
            "{:>4}  {:>12}  {:>12}  {:>12}",
            index + 1,
            format_yen(*revenue),
            format_yen(*expenses),
            format_yen(*total)
        )?;
    }

    let change = round_percentage(year_over_year_change(
        &current.revenue,
        &year_data.previous_year.revenue,
    ));
    writeln!(
        out,
        "Total revenue {}  expenses {}",
        format_yen(current.total_revenue()),
        format_yen(current.total_expenses())
    )?;
    write!(out, "Year over year: {change:+.1}%")?;
    Ok(out)
}

fn archive_report(args: &ArchiveArgs) -> Result<String> {
    let data = load_sample_data()?;
    let mut archive = TaxReturnArchive::new(data.tax_returns);

    let mut status = None;
    if let Some(id) = &args.delete {
        let Some(found) = archive.find(id) else {
            anyhow::bail!("no tax return with id '{id}'");
        };
        let file_name = found.file_name.clone();
        if args.confirm {
            archive.delete(id)?;
            status = Some(format!("Deleted {file_name}"));
        } else {
            warn!(id = %id, "deletion not confirmed");
            status = Some(format!("Not deleted {file_name} (pass --confirm to delete)"));
        }
    }

    let shown = match args.year {
        Some(year) => archive.for_year(year),
        None => archive.returns().iter().collect(),
    };

    let mut out = String::new();
    if shown.is_empty() {
        write!(out, "No tax returns archived")?;
    } else {
        for tax_return in &shown {
            writeln!(
                out,
                "{:>3}  {}  {}  {}  {}  uploaded {}",
                tax_return.id,
                tax_return.year,
                tax_return.kind.label(),
                tax_return.file_name,
                tax_return.size_label(),
                tax_return.uploaded_on
            )?;
        }
        write!(out, "{} files", shown.len())?;
    }
    if let Some(status) = status {
        write!(out, "\n{status}")?;
    }
    Ok(out)
}
