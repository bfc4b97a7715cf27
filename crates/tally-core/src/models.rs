//! Domain models for Tally
//!
//! Shapes follow the aggregator's JSON payloads:
//! - Asset reports: items -> accounts -> transactions / historical balances
//! - Bank income reports: items -> income sources -> historical summary -> transactions

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

// =============================================================================
// Asset reports
// =============================================================================

/// Credit category assigned to an asset report transaction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreditCategory {
    pub primary: String,
    #[serde(default)]
    pub detailed: String,
}

/// A transaction on an asset report account
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    #[serde(default)]
    pub transaction_id: Option<String>,
    pub date: NaiveDate,
    /// Positive = outflow, negative = inflow
    pub amount: f64,
    #[serde(default)]
    pub credit_category: Option<CreditCategory>,
    #[serde(default)]
    pub original_description: Option<String>,
    #[serde(default)]
    pub pending: bool,
}

impl Transaction {
    pub fn is_inflow(&self) -> bool {
        self.amount < 0.0
    }

    pub fn is_outflow(&self) -> bool {
        self.amount > 0.0
    }

    /// Whether the transaction falls in `primary` (and `detailed`, when given)
    pub fn matches_category(&self, primary: &str, detailed: Option<&str>) -> bool {
        let Some(category) = &self.credit_category else {
            return false;
        };
        if category.primary != primary {
            return false;
        }
        match detailed {
            Some(detailed) if !detailed.is_empty() => category.detailed == detailed,
            _ => true,
        }
    }
}

/// Account types reported by the aggregator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum AccountType {
    Depository,
    Credit,
    Loan,
    Investment,
    Brokerage,
    /// Anything the aggregator reports that we don't model
    #[default]
    #[serde(other)]
    Other,
}

impl AccountType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Depository => "depository",
            Self::Credit => "credit",
            Self::Loan => "loan",
            Self::Investment => "investment",
            Self::Brokerage => "brokerage",
            Self::Other => "other",
        }
    }
}

impl std::str::FromStr for AccountType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "depository" => Ok(Self::Depository),
            "credit" => Ok(Self::Credit),
            "loan" => Ok(Self::Loan),
            "investment" => Ok(Self::Investment),
            "brokerage" => Ok(Self::Brokerage),
            "other" => Ok(Self::Other),
            _ => Err(format!("Unknown account type: {}", s)),
        }
    }
}

impl std::fmt::Display for AccountType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A dated snapshot of an account's ending balance
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoricalBalance {
    pub date: NaiveDate,
    pub current: f64,
    #[serde(default)]
    pub iso_currency_code: Option<String>,
}

/// Balances as of report generation
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AccountBalances {
    #[serde(default)]
    pub current: Option<f64>,
    #[serde(default)]
    pub available: Option<f64>,
    #[serde(default)]
    pub iso_currency_code: Option<String>,
}

/// An account on an asset report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    pub account_id: String,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type", default)]
    pub account_type: AccountType,
    #[serde(default)]
    pub balances: AccountBalances,
    #[serde(default)]
    pub transactions: Vec<Transaction>,
    #[serde(default)]
    pub historical_balances: Vec<HistoricalBalance>,
}

impl Account {
    pub fn is_depository(&self) -> bool {
        self.account_type == AccountType::Depository
    }
}

/// An institution connection on an asset report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssetItem {
    #[serde(default)]
    pub item_id: String,
    #[serde(default)]
    pub institution_name: Option<String>,
    #[serde(default)]
    pub accounts: Vec<Account>,
}

/// An asset report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssetReport {
    #[serde(default)]
    pub asset_report_id: String,
    #[serde(default)]
    pub date_generated: Option<DateTime<Utc>>,
    #[serde(default)]
    pub days_requested: Option<u32>,
    pub items: Vec<AssetItem>,
}

impl AssetReport {
    /// Decode an asset report from JSON, either bare or wrapped in the
    /// `/asset_report/get` response envelope
    pub fn from_json(json: &str) -> Result<Self> {
        let value: serde_json::Value = serde_json::from_str(json)?;
        let report = match value.get("report") {
            Some(report) => AssetReport::deserialize(report)?,
            None => AssetReport::deserialize(&value)?,
        };
        Ok(report)
    }

    /// All accounts across all items
    pub fn accounts(&self) -> impl Iterator<Item = &Account> {
        self.items.iter().flat_map(|item| item.accounts.iter())
    }

    pub fn account(&self, account_id: &str) -> Option<&Account> {
        self.accounts().find(|a| a.account_id == account_id)
    }
}

// =============================================================================
// Bank income reports
// =============================================================================

/// Income category of a bank income source
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IncomeCategory {
    Salary,
    TaxRefund,
    GigEconomy,
    Military,
    ChildSupport,
    LongTermDisability,
    RetirementPension,
    Unemployment,
    Rental,
    BankInterest,
    Cash,
    Other,
    /// Category string we don't recognise; never matches an allow-list
    #[default]
    #[serde(other)]
    Unknown,
}

impl IncomeCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Salary => "SALARY",
            Self::TaxRefund => "TAX_REFUND",
            Self::GigEconomy => "GIG_ECONOMY",
            Self::Military => "MILITARY",
            Self::ChildSupport => "CHILD_SUPPORT",
            Self::LongTermDisability => "LONG_TERM_DISABILITY",
            Self::RetirementPension => "RETIREMENT_PENSION",
            Self::Unemployment => "UNEMPLOYMENT",
            Self::Rental => "RENTAL",
            Self::BankInterest => "BANK_INTEREST",
            Self::Cash => "CASH",
            Self::Other => "OTHER",
            Self::Unknown => "UNKNOWN",
        }
    }
}

impl std::str::FromStr for IncomeCategory {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "SALARY" => Ok(Self::Salary),
            "TAX_REFUND" => Ok(Self::TaxRefund),
            "GIG_ECONOMY" => Ok(Self::GigEconomy),
            "MILITARY" => Ok(Self::Military),
            "CHILD_SUPPORT" => Ok(Self::ChildSupport),
            "LONG_TERM_DISABILITY" => Ok(Self::LongTermDisability),
            "RETIREMENT_PENSION" => Ok(Self::RetirementPension),
            "UNEMPLOYMENT" => Ok(Self::Unemployment),
            "RENTAL" => Ok(Self::Rental),
            "BANK_INTEREST" => Ok(Self::BankInterest),
            "CASH" => Ok(Self::Cash),
            "OTHER" => Ok(Self::Other),
            _ => Err(format!("Unknown income category: {}", s)),
        }
    }
}

impl std::fmt::Display for IncomeCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// How often an income source pays out
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PayFrequency {
    Weekly,
    Biweekly,
    SemiMonthly,
    Monthly,
    /// No recognisable cadence
    #[default]
    #[serde(other)]
    Unknown,
}

impl PayFrequency {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Weekly => "WEEKLY",
            Self::Biweekly => "BIWEEKLY",
            Self::SemiMonthly => "SEMI_MONTHLY",
            Self::Monthly => "MONTHLY",
            Self::Unknown => "UNKNOWN",
        }
    }

    /// Expected days between pay events
    pub const fn expected_cadence_days(&self) -> Option<i64> {
        match self {
            Self::Weekly => Some(7),
            Self::Biweekly => Some(14),
            Self::Monthly => Some(30),
            Self::SemiMonthly => Some(15),
            Self::Unknown => None,
        }
    }

    /// Days of slack allowed past the expected cadence before a pay event is missed
    pub const fn buffer_days(&self) -> Option<i64> {
        match self {
            Self::Weekly => Some(1),
            Self::Biweekly => Some(2),
            Self::Monthly => Some(3),
            Self::SemiMonthly => Some(4),
            Self::Unknown => None,
        }
    }

    /// Days without a pay event after which a source counts as inactive
    pub const fn inactivity_threshold_days(&self) -> i64 {
        match self {
            Self::Weekly => 14,
            Self::Biweekly | Self::SemiMonthly => 32,
            Self::Monthly | Self::Unknown => 45,
        }
    }
}

impl std::str::FromStr for PayFrequency {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "WEEKLY" => Ok(Self::Weekly),
            "BIWEEKLY" => Ok(Self::Biweekly),
            "SEMI_MONTHLY" => Ok(Self::SemiMonthly),
            "MONTHLY" => Ok(Self::Monthly),
            "UNKNOWN" => Ok(Self::Unknown),
            _ => Err(format!("Unknown pay frequency: {}", s)),
        }
    }
}

impl std::fmt::Display for PayFrequency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single pay event observed for an income source
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IncomeTransaction {
    #[serde(default)]
    pub transaction_id: Option<String>,
    pub date: NaiveDate,
    /// Positive = income
    pub amount: f64,
    #[serde(default)]
    pub name: Option<String>,
}

/// A period of an income source's history
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoricalSummary {
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub total_amount: f64,
    /// Absent when the aggregator didn't attach transactions to this period
    #[serde(default)]
    pub transactions: Option<Vec<IncomeTransaction>>,
}

/// A stream of income identified on a bank income report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IncomeSource {
    pub income_source_id: String,
    #[serde(default)]
    pub income_description: String,
    #[serde(default)]
    pub income_category: IncomeCategory,
    #[serde(default)]
    pub account_id: Option<String>,
    pub start_date: NaiveDate,
    /// Date of the most recent pay event seen when the report was generated
    pub end_date: NaiveDate,
    #[serde(default)]
    pub pay_frequency: PayFrequency,
    /// Cumulative amount observed between start_date and end_date
    pub total_amount: f64,
    #[serde(default)]
    pub transaction_count: Option<u32>,
    #[serde(default)]
    pub historical_summary: Vec<HistoricalSummary>,
}

impl IncomeSource {
    /// Every pay event across the historical summary
    pub fn transactions(&self) -> impl Iterator<Item = &IncomeTransaction> {
        self.historical_summary
            .iter()
            .filter_map(|period| period.transactions.as_ref())
            .flatten()
    }

    /// Sum of pay events dated within `[start, end]`
    pub fn total_amount_between(&self, start: NaiveDate, end: NaiveDate) -> f64 {
        self.transactions()
            .filter(|tx| tx.date >= start && tx.date <= end)
            .map(|tx| tx.amount)
            .sum()
    }
}

/// An institution connection on a bank income report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BankIncomeItem {
    #[serde(default)]
    pub item_id: String,
    #[serde(default)]
    pub institution_name: Option<String>,
    #[serde(default)]
    pub bank_income_sources: Vec<IncomeSource>,
}

/// A bank income report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BankIncomeReport {
    #[serde(default)]
    pub bank_income_id: String,
    pub report_generation_time: DateTime<Utc>,
    #[serde(default)]
    pub days_requested: Option<u32>,
    pub items: Vec<BankIncomeItem>,
}

impl BankIncomeReport {
    /// Decode a report from JSON.
    ///
    /// Accepts a bare report or a `/credit/bank_income/get` response, in which
    /// case the first (most recent) report is used.
    pub fn from_json(json: &str) -> Result<Self> {
        let value: serde_json::Value = serde_json::from_str(json)?;
        if value.get("bank_income").is_none() {
            return Ok(BankIncomeReport::deserialize(&value)?);
        }

        BankIncomeResponse::deserialize(&value)?
            .bank_income
            .into_iter()
            .next()
            .ok_or_else(|| Error::NotFound("bank income report".to_string()))
    }

    /// All income sources across all items
    pub fn sources(&self) -> impl Iterator<Item = &IncomeSource> {
        self.items
            .iter()
            .flat_map(|item| item.bank_income_sources.iter())
    }

    pub fn source(&self, income_source_id: &str) -> Option<&IncomeSource> {
        self.sources()
            .find(|s| s.income_source_id == income_source_id)
    }
}

/// The `/credit/bank_income/get` response: most recent report first
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BankIncomeResponse {
    pub bank_income: Vec<BankIncomeReport>,
}

/// A refreshed bank income report paired with the report it replaced
#[derive(Debug, Clone)]
pub struct BankIncomeSnapshot {
    pub refreshed: BankIncomeReport,
    pub original: BankIncomeReport,
}

impl BankIncomeSnapshot {
    pub fn new(refreshed: BankIncomeReport, original: BankIncomeReport) -> Self {
        Self {
            refreshed,
            original,
        }
    }

    /// Build from a response after a refresh: index 0 is the refreshed report,
    /// index 1 the original
    pub fn from_response(response: BankIncomeResponse) -> Result<Self> {
        let count = response.bank_income.len();
        let mut reports = response.bank_income.into_iter();
        match (reports.next(), reports.next()) {
            (Some(refreshed), Some(original)) => Ok(Self::new(refreshed, original)),
            _ => Err(Error::InvalidData(format!(
                "refresh comparison needs two bank income reports, found {}",
                count
            ))),
        }
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let response: BankIncomeResponse = serde_json::from_str(json)?;
        Self::from_response(response)
    }
}
