use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use rust_decimal::Decimal;
use tax_core::FilingType;

/// Freelance tax dashboard.
///
/// Prints the figures behind the dashboard: income and resident tax,
/// withholding and the payable or refundable balance, progress toward the
/// revenue target, client and expense breakdowns, monthly revenue, the
/// financial calendar and the tax-return archive.
#[derive(Debug, Parser)]
#[command(name = "tax-dashboard", version, about, long_about = None)]
pub struct Cli {
    /// TOML configuration file (default: ./tax-dashboard.toml if present).
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Log level or EnvFilter directive; RUST_LOG takes precedence.
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Also append log output to this file.
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Income tax and resident tax for one annual income.
    Tax {
        /// Annual income (revenue less expenses), in yen.
        #[arg(long, allow_hyphen_values = true)]
        income: i64,

        /// Filing type: `blue` (preferential) or `white`.
        #[arg(long, value_parser = parse_filing)]
        filing: Option<FilingType>,
    },

    /// Dashboard metrics: taxes, withholding, payable balance, target progress.
    Summary(SummaryArgs),

    /// The active income-tax bracket table.
    Brackets,

    /// Revenue by client.
    Clients(EditArgs),

    /// Expenses by category.
    Expenses(EditArgs),

    /// Monthly and cumulative revenue with the year-over-year change.
    Monthly {
        /// Year to show (default: latest year with data).
        #[arg(long)]
        year: Option<i32>,
    },

    /// One month of the financial calendar.
    Calendar {
        /// Year to show (default: latest year with data).
        #[arg(long)]
        year: Option<i32>,

        /// Month, 1-12.
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..=12))]
        month: u32,
    },

    /// Archived tax-return documents.
    Archive(ArchiveArgs),
}

#[derive(Debug, Default, Args)]
pub struct SummaryArgs {
    /// Annual revenue, in yen.
    #[arg(long)]
    pub revenue: Option<i64>,

    /// Total expenses, in yen.
    #[arg(long)]
    pub expenses: Option<i64>,

    /// Withholding actually deducted, replacing the estimate.
    #[arg(long)]
    pub withholding: Option<i64>,

    /// Annual revenue target, in yen.
    #[arg(long)]
    pub target: Option<i64>,

    /// Filing type: `blue` (preferential) or `white`.
    #[arg(long, value_parser = parse_filing)]
    pub filing: Option<FilingType>,

    /// Take revenue and expenses from the sample client and expense lists.
    #[arg(long, conflicts_with_all = ["revenue", "expenses"])]
    pub from_sample: bool,

    /// Year-over-year revenue change in percent, used for the advice line
    /// (default: the latest sample year's change).
    #[arg(long, allow_hyphen_values = true)]
    pub trend: Option<Decimal>,
}

#[derive(Debug, Default, Args)]
pub struct ArchiveArgs {
    /// Only list returns for this tax year.
    #[arg(long)]
    pub year: Option<i32>,

    /// Delete the return with this id.
    #[arg(long)]
    pub delete: Option<String>,

    /// Commit the deletion. Without it the deletion is shown and discarded.
    #[arg(long, requires = "delete")]
    pub confirm: bool,
}

#[derive(Debug, Default, Args)]
pub struct EditArgs {
    /// Stage an edit as ROW=AMOUNT (row numbers start at 1), e.g. `2=¥1,500,000`.
    #[arg(long, value_parser = parse_edit)]
    pub edit: Option<EditArg>,

    /// Commit the staged edit. Without it the edit is shown and discarded.
    #[arg(long, requires = "edit")]
    pub confirm: bool,
}

/// A `ROW=AMOUNT` edit request. `index` is zero-based.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditArg {
    pub index: usize,
    pub amount: String,
}

pub fn parse_filing(s: &str) -> Result<FilingType, String> {
    FilingType::parse(&s.to_ascii_lowercase())
        .ok_or_else(|| format!("unknown filing type '{s}' (expected 'blue' or 'white')"))
}

pub fn parse_edit(s: &str) -> Result<EditArg, String> {
    let (row, amount) = s
        .split_once('=')
        .ok_or_else(|| format!("expected ROW=AMOUNT, got '{s}'"))?;
    let row: usize = row
        .trim()
        .parse()
        .map_err(|_| format!("invalid row number '{row}'"))?;
    let index = row
        .checked_sub(1)
        .ok_or_else(|| "row numbers start at 1".to_string())?;
    Ok(EditArg {
        index,
        amount: amount.trim().to_string(),
    })
}
