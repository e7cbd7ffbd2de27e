use anyhow::Context;
use chrono::Local;
use clap::Parser;
use tracing::debug;

use tax_core::calculations::TaxEngine;
use tax_dashboard::{app, cli::Cli, config::AppConfig, logging};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = AppConfig::load_or_default(cli.config.as_deref())
        .context("failed to load configuration")?;

    let level = cli
        .log_level
        .as_deref()
        .or(config.logging.level.as_deref())
        .unwrap_or(logging::DEFAULT_LOG_LEVEL);
    let log_file = cli.log_file.as_deref().or(config.logging.file.as_deref());
    logging::init_logging(level, log_file)?;

    // Custom rules are validated here, before any calculation runs.
    let rules = config.tax_rules().context("invalid tax configuration")?;
    let engine = TaxEngine::new(rules)?;
    debug!(command = ?cli.command, "running");

    let report = app::run(&cli.command, &engine, &config, Local::now().date_naive())?;
    println!("{report}");

    Ok(())
}
