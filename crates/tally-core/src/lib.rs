//! Tally Core Library
//!
//! Financial attribute metrics over aggregator reports:
//! - Report models for asset reports and bank income reports
//! - Transaction and balance aggregation (category filters, monthly summaries)
//! - Asset metrics: cash flow, debt, negative balances, balance statistics
//! - Income metrics: active sources, monthly estimates, next pay dates
//! - Refresh diffing between two bank income reports
//! - Metrics configuration with embedded defaults
//! - CSV and JSON export of computed summaries

pub mod aggregate;
pub mod assets;
pub mod config;
pub mod error;
pub mod export;
pub mod income;
pub mod models;

pub use aggregate::{AccountFilter, AccountScope, AmountStats, MonthlySummary};
pub use assets::{AssetSummary, BalanceStats, CashFlow, CategoryActivity, NegativeBalances};
pub use config::{AssetConfig, IncomeConfig, MetricsConfig};
pub use error::{Error, Result};
pub use export::ExportFormat;
pub use income::{
    EstimateBasis, IncomeEstimator, IncomeSummary, PayDatePrediction, RefreshDiff,
    SourceEstimate,
};
pub use models::{
    Account, AccountType, AssetReport, BankIncomeReport, BankIncomeResponse,
    BankIncomeSnapshot, IncomeCategory, IncomeSource, PayFrequency, Transaction,
};
