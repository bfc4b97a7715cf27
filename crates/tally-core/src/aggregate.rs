//! Transaction and balance aggregation
//!
//! Reducers shared by the asset report metrics: category filters, monthly
//! bucketing, most-recent lookup, and merging per-account daily balances into
//! a per-user series.

use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::models::{Account, AssetReport, Transaction};

/// Net amount per `YYYY-MM` month. Months without transactions are absent.
pub type MonthlySummary = BTreeMap<String, f64>;

/// Which accounts a report-wide metric looks at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AccountFilter {
    #[default]
    All,
    DepositoryOnly,
}

impl AccountFilter {
    fn admits(&self, account: &Account) -> bool {
        match self {
            Self::All => true,
            Self::DepositoryOnly => account.is_depository(),
        }
    }
}

/// A set of accounts a metric can run over: a whole report or one account.
///
/// The account filter only narrows a report. A single account was picked by
/// the caller, so it is always in scope.
pub trait AccountScope {
    fn scoped_accounts(&self, filter: AccountFilter) -> Vec<&Account>;

    /// Transactions of every account in scope
    fn scoped_transactions(&self, filter: AccountFilter) -> Vec<&Transaction> {
        self.scoped_accounts(filter)
            .into_iter()
            .flat_map(|account| account.transactions.iter())
            .collect()
    }
}

impl AccountScope for AssetReport {
    fn scoped_accounts(&self, filter: AccountFilter) -> Vec<&Account> {
        self.accounts().filter(|a| filter.admits(a)).collect()
    }
}

impl AccountScope for Account {
    fn scoped_accounts(&self, _filter: AccountFilter) -> Vec<&Account> {
        vec![self]
    }
}

/// Transactions in scope matching a primary category, and optionally a detailed one
pub fn filter_transactions_by_category<'a, S: AccountScope + ?Sized>(
    scope: &'a S,
    primary: &str,
    detailed: Option<&str>,
    filter: AccountFilter,
) -> Vec<&'a Transaction> {
    scope
        .scoped_transactions(filter)
        .into_iter()
        .filter(|tx| tx.matches_category(primary, detailed))
        .collect()
}

/// Sum transaction amounts per calendar month
pub fn monthly_summary<'a, I>(transactions: I) -> MonthlySummary
where
    I: IntoIterator<Item = &'a Transaction>,
{
    let mut summary = MonthlySummary::new();
    for tx in transactions {
        *summary
            .entry(tx.date.format("%Y-%m").to_string())
            .or_insert(0.0) += tx.amount;
    }
    summary
}

/// The latest-dated transaction, if any
pub fn most_recent_transaction<'a>(transactions: &[&'a Transaction]) -> Option<&'a Transaction> {
    transactions.iter().copied().max_by_key(|tx| tx.date)
}

/// Daily ending balance summed across every account in scope
pub fn user_historical_balances<S: AccountScope + ?Sized>(
    scope: &S,
    filter: AccountFilter,
) -> BTreeMap<NaiveDate, f64> {
    let mut balances = BTreeMap::new();
    for account in scope.scoped_accounts(filter) {
        for balance in &account.historical_balances {
            *balances.entry(balance.date).or_insert(0.0) += balance.current;
        }
    }
    balances
}

/// Count, sum, min, max and mean of a set of amounts
#[derive(Debug, Clone, Copy, PartialEq, Default, serde::Serialize)]
pub struct AmountStats {
    pub count: usize,
    pub total: f64,
    /// 0.0 when empty
    pub min: f64,
    /// 0.0 when empty
    pub max: f64,
    /// 0.0 when empty
    pub average: f64,
}

impl AmountStats {
    pub fn from_amounts<I: IntoIterator<Item = f64>>(amounts: I) -> Self {
        let mut stats = Self::default();
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;

        for amount in amounts {
            stats.count += 1;
            stats.total += amount;
            min = min.min(amount);
            max = max.max(amount);
        }

        if stats.count > 0 {
            stats.min = min;
            stats.max = max;
            stats.average = stats.total / stats.count as f64;
        }
        stats
    }
}
