//! Unusual account activity

use crate::aggregate::{AccountFilter, AccountScope};

/// Transactions whose absolute amount exceeds `threshold`
pub fn num_outlier_transactions<S: AccountScope + ?Sized>(scope: &S, threshold: f64) -> usize {
    scope
        .scoped_transactions(AccountFilter::All)
        .iter()
        .filter(|tx| tx.amount.abs() > threshold)
        .count()
}
