//! Historical balance statistics

use serde::Serialize;

use crate::aggregate::{user_historical_balances, AccountFilter, AccountScope};

/// Average, minimum and maximum daily ending balance.
///
/// Report-wide, the series is the per-day sum over depository accounts. All
/// three are 0.0 when there are no balances.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct BalanceStats {
    pub days: usize,
    pub average: f64,
    pub min: f64,
    pub max: f64,
}

impl BalanceStats {
    pub fn compute<S: AccountScope + ?Sized>(scope: &S) -> Self {
        let balances = user_historical_balances(scope, AccountFilter::DepositoryOnly);
        if balances.is_empty() {
            return Self::default();
        }

        let values: Vec<f64> = balances.into_values().collect();
        let total: f64 = values.iter().sum();

        Self {
            days: values.len(),
            average: total / values.len() as f64,
            min: values.iter().copied().fold(f64::INFINITY, f64::min),
            max: values.iter().copied().fold(f64::NEG_INFINITY, f64::max),
        }
    }
}

pub fn avg_historical_balance<S: AccountScope + ?Sized>(scope: &S) -> f64 {
    BalanceStats::compute(scope).average
}

pub fn min_historical_balance<S: AccountScope + ?Sized>(scope: &S) -> f64 {
    BalanceStats::compute(scope).min
}

pub fn max_historical_balance<S: AccountScope + ?Sized>(scope: &S) -> f64 {
    BalanceStats::compute(scope).max
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::fixtures::*;
    use crate::models::AccountType;

    #[test]
    fn test_report_balance_stats() {
        let report = report(vec![
            account(
                "checking",
                AccountType::Depository,
                vec![],
                &[(date(2024, 1, 1), 100.0), (date(2024, 1, 2), -20.0)],
            ),
            account(
                "savings",
                AccountType::Depository,
                vec![],
                &[(date(2024, 1, 1), 200.0), (date(2024, 1, 2), 200.0)],
            ),
            account(
                "card",
                AccountType::Credit,
                vec![],
                &[(date(2024, 1, 1), 9999.0)],
            ),
        ]);

        let stats = BalanceStats::compute(&report);
        assert_eq!(stats.days, 2);
        assert_eq!(stats.average, 240.0);
        assert_eq!(stats.min, 180.0);
        assert_eq!(stats.max, 300.0);
    }

    #[test]
    fn test_account_balance_stats() {
        let checking = account(
            "checking",
            AccountType::Depository,
            vec![],
            &[
                (date(2024, 1, 1), 100.0),
                (date(2024, 1, 2), -20.0),
                (date(2024, 1, 3), 40.0),
            ],
        );

        assert_eq!(avg_historical_balance(&checking), 40.0);
        assert_eq!(min_historical_balance(&checking), -20.0);
        assert_eq!(max_historical_balance(&checking), 100.0);
    }

    #[test]
    fn test_empty_balances() {
        let checking = account("checking", AccountType::Depository, vec![], &[]);
        assert_eq!(BalanceStats::compute(&checking), BalanceStats::default());
    }
}
