//! Negative record: days spent below zero and overdraft/NSF fees
//!
//! Report-wide, balances are the merged daily series of depository accounts.

use chrono::NaiveDate;
use serde::Serialize;

use crate::aggregate::{user_historical_balances, AccountFilter, AccountScope};

use super::{category_activity, CategoryActivity, BANK_PENALTIES};

/// Daily balance classification for one scope
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct NegativeBalances {
    /// Days ending below zero
    pub count_negative: usize,
    /// Days ending at or above zero
    pub count_nonnegative: usize,
    /// Lowest negative daily balance, 0.0 if there was none
    pub lowest_negative: f64,
    /// Mean of the negative daily balances, 0.0 if there were none
    pub average_negative: f64,
}

impl NegativeBalances {
    pub fn compute<S: AccountScope + ?Sized>(scope: &S) -> Self {
        let balances = user_historical_balances(scope, AccountFilter::DepositoryOnly);

        let mut result = Self::default();
        let mut negative_total = 0.0;

        for &balance in balances.values() {
            if balance < 0.0 {
                result.count_negative += 1;
                negative_total += balance;
                result.lowest_negative = result.lowest_negative.min(balance);
            } else {
                result.count_nonnegative += 1;
            }
        }

        if result.count_negative > 0 {
            result.average_negative = negative_total / result.count_negative as f64;
        }
        result
    }
}

pub fn count_negative_historical_balances<S: AccountScope + ?Sized>(scope: &S) -> usize {
    NegativeBalances::compute(scope).count_negative
}

pub fn count_nonnegative_historical_balances<S: AccountScope + ?Sized>(scope: &S) -> usize {
    NegativeBalances::compute(scope).count_nonnegative
}

pub fn lowest_negative_historical_balance<S: AccountScope + ?Sized>(scope: &S) -> f64 {
    NegativeBalances::compute(scope).lowest_negative
}

pub fn average_negative_historical_balance<S: AccountScope + ?Sized>(scope: &S) -> f64 {
    NegativeBalances::compute(scope).average_negative
}

/// Overdraft and NSF fees. Report-wide, only depository accounts count.
pub fn od_nsf<S: AccountScope + ?Sized>(scope: &S, today: NaiveDate) -> CategoryActivity {
    category_activity(scope, BANK_PENALTIES, AccountFilter::DepositoryOnly, today)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::fixtures::*;
    use crate::models::{AccountType, AssetReport};

    fn sample_report() -> AssetReport {
        report(vec![
            account(
                "checking",
                AccountType::Depository,
                vec![
                    tx(date(2024, 1, 2), 35.0, Some(BANK_PENALTIES)),
                    tx(date(2024, 1, 3), 35.0, Some(BANK_PENALTIES)),
                ],
                &[
                    (date(2024, 1, 1), 10.0),
                    (date(2024, 1, 2), -40.0),
                    (date(2024, 1, 3), -90.0),
                    (date(2024, 1, 4), 0.0),
                ],
            ),
            account(
                "savings",
                AccountType::Depository,
                vec![],
                &[(date(2024, 1, 2), 100.0), (date(2024, 1, 3), 50.0)],
            ),
            account(
                "card",
                AccountType::Credit,
                vec![tx(date(2024, 1, 5), 29.0, Some(BANK_PENALTIES))],
                &[(date(2024, 1, 1), -1000.0)],
            ),
        ])
    }

    #[test]
    fn test_report_balances_merge_depository_accounts() {
        let report = sample_report();
        let negative = NegativeBalances::compute(&report);

        // 01: 10, 02: 60, 03: -40, 04: 0
        assert_eq!(negative.count_negative, 1);
        assert_eq!(negative.count_nonnegative, 3);
        assert_eq!(negative.lowest_negative, -40.0);
        assert_eq!(negative.average_negative, -40.0);
    }

    #[test]
    fn test_classification_partitions_series() {
        let report = sample_report();
        let days = user_historical_balances(&report, AccountFilter::DepositoryOnly).len();

        assert_eq!(
            count_negative_historical_balances(&report)
                + count_nonnegative_historical_balances(&report),
            days
        );
    }

    #[test]
    fn test_account_balances() {
        let report = sample_report();
        let checking = report.account("checking").unwrap();

        assert_eq!(count_negative_historical_balances(checking), 2);
        assert_eq!(lowest_negative_historical_balance(checking), -90.0);
        assert_eq!(average_negative_historical_balance(checking), -65.0);
    }

    #[test]
    fn test_no_negative_balances() {
        let report = sample_report();
        let savings = report.account("savings").unwrap();

        assert_eq!(lowest_negative_historical_balance(savings), 0.0);
        assert_eq!(average_negative_historical_balance(savings), 0.0);
    }

    #[test]
    fn test_od_nsf() {
        let report = sample_report();
        let today = date(2024, 1, 10);

        let fees = od_nsf(&report, today);
        assert_eq!(fees.count(), 2);
        assert_eq!(fees.amount(), 70.0);
        assert_eq!(fees.monthly["2024-01"], 70.0);
        assert_eq!(fees.days_since_most_recent, Some(7));

        let card_fees = od_nsf(report.account("card").unwrap(), today);
        assert_eq!(card_fees.count(), 1);
    }
}
