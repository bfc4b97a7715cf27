//! Bank income metrics
//!
//! Everything here works on [`BankIncomeReport`]s: choosing which income
//! sources are active, normalizing them to a monthly figure, predicting the
//! next pay date, and comparing a refreshed report with its predecessor.
//!
//! All functions take an explicit `today` so results are reproducible;
//! [`IncomeEstimator`] binds one for convenience.

pub mod active;
pub mod monthly;
pub mod pay_date;
pub mod refresh;

pub use active::{active_sources, is_active};
pub use monthly::{
    gross_from_net, monthly_average_gross_income, monthly_average_net_income,
    source_estimates, source_monthly_avg_net_income, EstimateBasis, IncomeEstimator,
    SourceEstimate, DAYS_PER_MONTH, SALARY_GROSS_UP,
};
pub use pay_date::{next_expected_pay_date, next_pay_dates, PayDatePrediction};
pub use refresh::{
    is_source_inactive, new_sources, newly_inactive_sources, sources_with_new_transactions,
    RefreshDiff,
};

use chrono::NaiveDate;
use serde::Serialize;

use crate::config::IncomeConfig;
use crate::models::BankIncomeReport;

/// Every income metric for one report
#[derive(Debug, Clone, Serialize)]
pub struct IncomeSummary {
    pub as_of: NaiveDate,
    pub bank_income_id: String,
    pub active_window_days: i64,
    pub avg_window_days: i64,
    pub total_sources: usize,
    pub active_sources: usize,
    pub net_monthly: f64,
    pub gross_monthly: f64,
    pub estimates: Vec<SourceEstimate>,
    pub next_pay_dates: Vec<PayDatePrediction>,
}

impl IncomeSummary {
    pub fn compute(report: &BankIncomeReport, config: &IncomeConfig, today: NaiveDate) -> Self {
        let estimates = source_estimates(report, config, today);
        Self {
            as_of: today,
            bank_income_id: report.bank_income_id.clone(),
            active_window_days: config.active_source_window_days,
            avg_window_days: config.avg_calculation_window_days,
            total_sources: report.sources().count(),
            active_sources: estimates.len(),
            net_monthly: estimates.iter().map(|e| e.net_monthly).sum(),
            gross_monthly: estimates.iter().map(|e| e.gross_monthly).sum(),
            next_pay_dates: next_pay_dates(report, today),
            estimates,
        }
    }
}


#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;
    use crate::models::{IncomeCategory, PayFrequency};

    #[test]
    fn test_income_summary() {
        let today = date(2024, 6, 30);
        let mut salary = source("s", IncomeCategory::Salary, date(2024, 6, 5), date(2024, 6, 28));
        salary.total_amount = 3000.0;
        salary.pay_frequency = PayFrequency::Biweekly;
        let mut refund = source("r", IncomeCategory::TaxRefund, date(2024, 4, 1), date(2024, 4, 1));
        refund.total_amount = 2400.0;
        let stale = source("old", IncomeCategory::Rental, date(2022, 1, 1), date(2023, 1, 1));

        let report = report(today, vec![salary, refund, stale]);
        let summary = IncomeSummary::compute(&report, &IncomeConfig::default(), today);

        let salary_net = 3000.0 / 30.0 * DAYS_PER_MONTH;
        assert_eq!(summary.total_sources, 3);
        assert_eq!(summary.active_sources, 2);
        assert!((summary.net_monthly - (salary_net + 200.0)).abs() < 1e-6);
        assert!((summary.gross_monthly - (salary_net * 1.25 + 200.0)).abs() < 1e-6);
        assert_eq!(summary.next_pay_dates.len(), 3);
        assert_eq!(summary.next_pay_dates[0].next_pay_date, Some(date(2024, 7, 12)));
    }
}
