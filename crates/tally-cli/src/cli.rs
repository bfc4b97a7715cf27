//! CLI argument definitions using clap
//!
//! This module contains all the clap structs and enums for parsing CLI arguments.
//! The actual command implementations are in the `commands` module.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tally_core::config::MAX_WINDOW_DAYS;

/// Tally - Financial attribute metrics from aggregator reports
#[derive(Parser)]
#[command(name = "tally")]
#[command(about = "Cash flow, debt, balance and income metrics from aggregator reports", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Metrics config file (defaults to ~/.config/tally/metrics.toml if present)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format: table, json, csv
    #[arg(short, long, default_value = "table", global = true)]
    pub format: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Asset report metrics (cash flow, debt, negative balances, balances)
    Assets {
        /// Asset report JSON (bare report or /asset_report/get response)
        #[arg(short, long)]
        report: PathBuf,

        /// Only compute metrics for this account ID
        #[arg(short, long)]
        account: Option<String>,

        /// Evaluate as of this date (YYYY-MM-DD), defaults to today
        #[arg(long)]
        as_of: Option<String>,

        /// Absolute amount above which a transaction counts as an outlier
        #[arg(long)]
        outlier_threshold: Option<f64>,
    },

    /// Bank income metrics (active sources, monthly income, next pay dates)
    Income {
        /// Bank income JSON (single report or /credit/bank_income/get response)
        #[arg(short, long)]
        report: PathBuf,

        /// Days since the last pay event within which a source is active
        #[arg(long, value_parser = clap::value_parser!(i64).range(0..=MAX_WINDOW_DAYS))]
        active_window: Option<i64>,

        /// Days averaged over for long-running sources
        #[arg(long, value_parser = clap::value_parser!(i64).range(0..=MAX_WINDOW_DAYS))]
        avg_window: Option<i64>,

        /// Evaluate as of this date (YYYY-MM-DD), defaults to today
        #[arg(long)]
        as_of: Option<String>,
    },

    /// Compare a refreshed bank income report with the one it replaced
    Refresh {
        /// /credit/bank_income/get response holding the refreshed and original reports
        #[arg(short, long)]
        response: PathBuf,
    },

    /// Show the resolved metrics configuration
    Config,
}
