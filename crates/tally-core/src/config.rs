//! Metrics configuration
//!
//! Config is loaded with a two-layer resolution:
//! 1. An explicit path, or the per-user override (~/.config/tally/metrics.toml)
//! 2. Fall back to embedded defaults (compiled into binary)
//!
//! Values missing from an override file keep their defaults.

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::models::IncomeCategory;

/// Embedded default config (compiled into binary)
const DEFAULT_CONFIG: &str = include_str!("../../../config/metrics.toml");

/// Longest accepted income window (about 100 years)
pub const MAX_WINDOW_DAYS: i64 = 36_500;

/// Income categories included in estimates unless overridden
pub const DEFAULT_INCOME_CATEGORIES: &[IncomeCategory] = &[
    IncomeCategory::Salary,
    IncomeCategory::GigEconomy,
    IncomeCategory::Military,
    IncomeCategory::ChildSupport,
    IncomeCategory::LongTermDisability,
    IncomeCategory::RetirementPension,
    IncomeCategory::Unemployment,
    IncomeCategory::Rental,
    IncomeCategory::TaxRefund,
];

/// Income estimation parameters
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IncomeConfig {
    /// Days since the last pay event within which a source is active
    pub active_source_window_days: i64,
    /// Maximum number of days averaged over for long-running sources
    pub avg_calculation_window_days: i64,
    /// Only sources in these categories are considered
    pub categories_to_include: BTreeSet<IncomeCategory>,
}

impl Default for IncomeConfig {
    fn default() -> Self {
        Self {
            active_source_window_days: 30,
            avg_calculation_window_days: 90,
            categories_to_include: DEFAULT_INCOME_CATEGORIES.iter().copied().collect(),
        }
    }
}

impl IncomeConfig {
    pub fn with_active_source_window(mut self, days: i64) -> Self {
        self.active_source_window_days = days;
        self
    }

    pub fn with_avg_calculation_window(mut self, days: i64) -> Self {
        self.avg_calculation_window_days = days;
        self
    }

    pub fn with_categories(mut self, categories: impl IntoIterator<Item = IncomeCategory>) -> Self {
        self.categories_to_include = categories.into_iter().collect();
        self
    }

    pub fn includes(&self, category: IncomeCategory) -> bool {
        self.categories_to_include.contains(&category)
    }
}

/// Asset report metric parameters
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssetConfig {
    /// Absolute amount above which a transaction is an outlier
    pub outlier_threshold: f64,
}

impl Default for AssetConfig {
    fn default() -> Self {
        Self {
            outlier_threshold: 10_000.0,
        }
    }
}

/// Full metrics configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MetricsConfig {
    pub income: IncomeConfig,
    pub assets: AssetConfig,
}

impl MetricsConfig {
    /// Load from the default override location, or embedded defaults
    pub fn load() -> Result<Self> {
        load_config(None)
    }

    /// Load from `path` if it exists, or embedded defaults
    pub fn load_from(path: &Path) -> Result<Self> {
        load_config(Some(path))
    }

    /// Parse a TOML document over the defaults
    pub fn from_toml(content: &str) -> Result<Self> {
        parse_config(content)
    }
}

/// Default config override path
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("tally").join("metrics.toml"))
}

/// Load configuration (override first, then default)
fn load_config(override_path: Option<&Path>) -> Result<MetricsConfig> {
    let path = match override_path {
        Some(path) => Some(path.to_path_buf()),
        None => default_config_path(),
    };

    let content = match path {
        Some(path) if path.exists() => {
            info!("Loading metrics config from {}", path.display());
            fs::read_to_string(&path)
                .map_err(|e| Error::Config(format!("Failed to read {}: {}", path.display(), e)))?
        }
        Some(path) => {
            debug!("No config at {}, using embedded defaults", path.display());
            DEFAULT_CONFIG.to_string()
        }
        None => DEFAULT_CONFIG.to_string(),
    };

    parse_config(&content)
}

/// Raw config structure for TOML parsing
#[derive(Debug, Deserialize)]
struct RawConfig {
    income: Option<RawIncome>,
    assets: Option<RawAssets>,
}

#[derive(Debug, Deserialize)]
struct RawIncome {
    active_source_window_days: Option<i64>,
    avg_calculation_window_days: Option<i64>,
    categories_to_include: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
struct RawAssets {
    outlier_threshold: Option<f64>,
}

/// Parse config from TOML content
fn parse_config(content: &str) -> Result<MetricsConfig> {
    let raw: RawConfig = toml::from_str(content)
        .map_err(|e| Error::Config(format!("Invalid config TOML: {}", e)))?;

    let mut config = MetricsConfig::default();

    if let Some(income) = raw.income {
        if let Some(days) = income.active_source_window_days {
            config.income.active_source_window_days = days;
        }
        if let Some(days) = income.avg_calculation_window_days {
            config.income.avg_calculation_window_days = days;
        }
        if let Some(names) = income.categories_to_include {
            let mut categories = BTreeSet::new();
            for name in names {
                match name.parse::<IncomeCategory>() {
                    Ok(category) => {
                        categories.insert(category);
                    }
                    Err(e) => warn!("Skipping income category in config: {}", e),
                }
            }
            config.income.categories_to_include = categories;
        }
    }

    if let Some(assets) = raw.assets {
        if let Some(threshold) = assets.outlier_threshold {
            config.assets.outlier_threshold = threshold;
        }
    }

    validate(&config)?;
    Ok(config)
}

fn validate(config: &MetricsConfig) -> Result<()> {
    validate_window(
        "active_source_window_days",
        config.income.active_source_window_days,
    )?;
    validate_window(
        "avg_calculation_window_days",
        config.income.avg_calculation_window_days,
    )?;
    if config.assets.outlier_threshold < 0.0 {
        return Err(Error::Config(
            "outlier_threshold must not be negative".to_string(),
        ));
    }
    Ok(())
}

fn validate_window(name: &str, days: i64) -> Result<()> {
    if days < 0 {
        return Err(Error::Config(format!("{} must not be negative", name)));
    }
    if days > MAX_WINDOW_DAYS {
        return Err(Error::Config(format!(
            "{} must be at most {} days, got {}",
            name, MAX_WINDOW_DAYS, days
        )));
    }
    Ok(())
}
