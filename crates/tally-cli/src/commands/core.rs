//! Shared command utilities and the `config` command
//!
//! This module contains:
//! - `load_config` - Resolve the metrics config (--config, user override, defaults)
//! - `parse_format` / `parse_as_of` - Argument parsing shared by commands
//! - `read_report` - Read a report file from disk
//! - `cmd_config` - Show the resolved configuration

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{NaiveDate, Utc};
use tally_core::config::default_config_path;
use tally_core::export::{self, ExportFormat};
use tally_core::MetricsConfig;

/// Load the metrics config. An explicit path must exist; otherwise the user
/// override is used if present, then the embedded defaults.
pub fn load_config(path: Option<&Path>) -> Result<MetricsConfig> {
    match path {
        Some(path) => {
            if !path.exists() {
                anyhow::bail!("Config file not found: {}", path.display());
            }
            MetricsConfig::load_from(path)
                .with_context(|| format!("Failed to load config from {}", path.display()))
        }
        None => MetricsConfig::load().context("Failed to load config"),
    }
}

pub fn parse_format(format: &str) -> Result<ExportFormat> {
    format
        .parse::<ExportFormat>()
        .map_err(|e| anyhow::anyhow!("{}. Available: table, json, csv", e))
}

/// Parse `--as-of`, defaulting to today (UTC)
pub fn parse_as_of(as_of: Option<&str>) -> Result<NaiveDate> {
    match as_of {
        Some(s) => NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .context("Invalid --as-of date format (use YYYY-MM-DD)"),
        None => Ok(Utc::now().date_naive()),
    }
}

pub fn read_report(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

pub fn cmd_config(config: &MetricsConfig, path: Option<&Path>, format: ExportFormat) -> Result<()> {
    if format == ExportFormat::Json {
        println!("{}", export::to_json(config)?);
        return Ok(());
    }

    let source = match path {
        Some(path) => path.display().to_string(),
        None => match default_config_path() {
            Some(p) if p.exists() => p.display().to_string(),
            _ => "embedded defaults".to_string(),
        },
    };

    println!();
    println!("⚙️  Metrics Configuration");
    println!("   Source: {}", source);
    println!("   ─────────────────────────────────────────────");
    println!("   Income");
    println!(
        "     Active source window:   {} days",
        config.income.active_source_window_days
    );
    println!(
        "     Averaging window:       {} days",
        config.income.avg_calculation_window_days
    );
    let categories: Vec<&str> = config
        .income
        .categories_to_include
        .iter()
        .map(|c| c.as_str())
        .collect();
    println!("     Categories:             {}", categories.join(", "));
    println!("   Assets");
    println!(
        "     Outlier threshold:      {:.2}",
        config.assets.outlier_threshold
    );

    Ok(())
}
