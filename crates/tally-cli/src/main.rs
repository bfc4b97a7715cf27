//! Tally CLI - Financial attribute metrics
//!
//! Usage:
//!   tally assets --report asset_report.json      Cash flow, debt and balance metrics
//!   tally income --report bank_income.json       Monthly income and next pay dates
//!   tally refresh --response bank_income.json    What changed after a refresh
//!   tally config                                 Show resolved configuration

mod cli;
mod commands;


use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact().with_writer(std::io::stderr))
        .init();

    let format = commands::parse_format(&cli.format)?;
    let config = commands::load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Assets {
            report,
            account,
            as_of,
            outlier_threshold,
        } => commands::cmd_assets(
            &config,
            &report,
            account.as_deref(),
            as_of.as_deref(),
            outlier_threshold,
            format,
        ),
        Commands::Income {
            report,
            active_window,
            avg_window,
            as_of,
        } => commands::cmd_income(
            &config,
            &report,
            active_window,
            avg_window,
            as_of.as_deref(),
            format,
        ),
        Commands::Refresh { response } => commands::cmd_refresh(&response, format),
        Commands::Config => commands::cmd_config(&config, cli.config.as_deref(), format),
    }
}
