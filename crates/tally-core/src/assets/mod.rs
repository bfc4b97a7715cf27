//! Asset report metrics
//!
//! Every metric runs over an [`AccountScope`]: a whole [`AssetReport`] or a
//! single [`Account`]. Report-wide debt, overdraft and balance metrics only
//! look at depository accounts.
//!
//! - `cash_flow` - inflow/outflow counts, totals and monthly summaries
//! - `debt` - loan disbursements and loan payments
//! - `negative_record` - negative balance days and overdraft/NSF fees
//! - `balances` - historical balance statistics
//! - `activity` - unusually large transactions
//!
//! [`AssetReport`]: crate::models::AssetReport
//! [`Account`]: crate::models::Account

pub mod activity;
pub mod balances;
pub mod cash_flow;
pub mod debt;
pub mod negative_record;

use chrono::NaiveDate;
use serde::Serialize;

use crate::aggregate::{
    filter_transactions_by_category, monthly_summary, most_recent_transaction, AccountFilter,
    AccountScope, AmountStats, MonthlySummary,
};
use crate::config::AssetConfig;

pub use activity::num_outlier_transactions;
pub use balances::BalanceStats;
pub use cash_flow::CashFlow;
pub use debt::{loan_disbursements, loan_payments};
pub use negative_record::{od_nsf, NegativeBalances};

/// Primary credit category of loan disbursements
pub const LOAN_DISBURSEMENTS: &str = "LOAN_DISBURSEMENTS";
/// Primary credit category of loan payments
pub const LOAN_PAYMENTS: &str = "LOAN_PAYMENTS";
/// Primary credit category of overdraft and NSF fees
pub const BANK_PENALTIES: &str = "BANK_PENALTIES";

/// Metrics over every transaction in one credit category
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct CategoryActivity {
    pub category: String,
    pub stats: AmountStats,
    pub monthly: MonthlySummary,
    /// Days since the most recent matching transaction, `None` if there are none
    pub days_since_most_recent: Option<i64>,
}

impl CategoryActivity {
    pub fn count(&self) -> usize {
        self.stats.count
    }

    pub fn amount(&self) -> f64 {
        self.stats.total
    }
}

/// Collect [`CategoryActivity`] for one primary credit category
pub fn category_activity<S: AccountScope + ?Sized>(
    scope: &S,
    primary: &str,
    filter: AccountFilter,
    today: NaiveDate,
) -> CategoryActivity {
    let transactions = filter_transactions_by_category(scope, primary, None, filter);

    CategoryActivity {
        category: primary.to_string(),
        stats: AmountStats::from_amounts(transactions.iter().map(|tx| tx.amount)),
        monthly: monthly_summary(transactions.iter().copied()),
        days_since_most_recent: most_recent_transaction(&transactions)
            .map(|tx| (today - tx.date).num_days()),
    }
}

/// Every asset metric for one scope
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssetSummary {
    pub as_of: NaiveDate,
    pub cash_flow: CashFlow,
    pub loan_disbursements: CategoryActivity,
    pub loan_payments: CategoryActivity,
    pub od_nsf: CategoryActivity,
    pub negative_balances: NegativeBalances,
    pub balances: BalanceStats,
    pub outlier_transactions: usize,
}

impl AssetSummary {
    pub fn compute<S: AccountScope + ?Sized>(
        scope: &S,
        config: &AssetConfig,
        today: NaiveDate,
    ) -> Self {
        Self {
            as_of: today,
            cash_flow: CashFlow::compute(scope),
            loan_disbursements: loan_disbursements(scope, today),
            loan_payments: loan_payments(scope, today),
            od_nsf: od_nsf(scope, today),
            negative_balances: NegativeBalances::compute(scope),
            balances: BalanceStats::compute(scope),
            outlier_transactions: num_outlier_transactions(scope, config.outlier_threshold),
        }
    }
}
