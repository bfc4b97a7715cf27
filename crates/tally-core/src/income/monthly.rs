//! Monthly income estimation
//!
//! Each active source is normalized to an average month of
//! [`DAYS_PER_MONTH`] days using the first rule that applies:
//!
//! 1. Tax refunds are annual, so the total is spread over 12 months.
//! 2. Sources that started inside the active window are extrapolated from the
//!    active window length.
//! 3. Sources that started inside the averaging window are divided by the days
//!    elapsed since they started.
//! 4. Older sources are averaged over the pay events inside the averaging window.
//!
//! Gross income applies a flat 25% gross-up to salary; other categories are
//! assumed to be untaxed at source.

use chrono::{Duration, NaiveDate, Utc};
use serde::Serialize;
use tracing::{debug, warn};

use crate::config::IncomeConfig;
use crate::models::{BankIncomeReport, IncomeCategory, IncomeSource};

use super::active::active_sources;

/// Length of an average month in days
pub const DAYS_PER_MONTH: f64 = 30.4167;

/// Net-to-gross multiplier for salary (approximately a 25% effective tax rate)
pub const SALARY_GROSS_UP: f64 = 1.25;

/// Which rule produced a source's monthly estimate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EstimateBasis {
    /// Annual refund spread over 12 months
    TaxRefund,
    /// Started within the active window
    NewSource,
    /// Started within the averaging window, before the active window
    RecentSource,
    /// Started before the averaging window
    LongRunning,
}

impl EstimateBasis {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TaxRefund => "tax_refund",
            Self::NewSource => "new_source",
            Self::RecentSource => "recent_source",
            Self::LongRunning => "long_running",
        }
    }
}

impl std::fmt::Display for EstimateBasis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Monthly estimate for one active source
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SourceEstimate {
    pub income_source_id: String,
    pub income_category: IncomeCategory,
    pub basis: EstimateBasis,
    pub net_monthly: f64,
    pub gross_monthly: f64,
}

/// Scale `amount` observed over `days` to one month. A non-positive span
/// contributes nothing.
fn per_month(amount: f64, days: i64, source_id: &str) -> f64 {
    if days <= 0 {
        warn!(
            "Income source {} has a {} day averaging span, counting it as 0",
            source_id, days
        );
        return 0.0;
    }
    amount / days as f64 * DAYS_PER_MONTH
}

/// First day of a window of `days` ending on `today`. Windows reaching past the
/// calendar range start at [`NaiveDate::MIN`].
fn window_start(today: NaiveDate, days: i64) -> NaiveDate {
    Duration::try_days(days)
        .and_then(|span| today.checked_sub_signed(span))
        .unwrap_or(NaiveDate::MIN)
}

/// Normalized monthly net income for one source, with the rule that produced it
pub fn source_monthly_avg_net_income(
    source: &IncomeSource,
    config: &IncomeConfig,
    today: NaiveDate,
) -> (EstimateBasis, f64) {
    let active_window_start = window_start(today, config.active_source_window_days);
    let avg_window_start = window_start(today, config.avg_calculation_window_days);
    let id = source.income_source_id.as_str();

    let (basis, amount) = if source.income_category == IncomeCategory::TaxRefund {
        (EstimateBasis::TaxRefund, source.total_amount / 12.0)
    } else if source.start_date >= active_window_start {
        (
            EstimateBasis::NewSource,
            per_month(source.total_amount, config.active_source_window_days, id),
        )
    } else if source.start_date >= avg_window_start {
        let elapsed = (today - source.start_date).num_days();
        (
            EstimateBasis::RecentSource,
            per_month(source.total_amount, elapsed, id),
        )
    } else {
        let windowed = source.total_amount_between(avg_window_start, today);
        (
            EstimateBasis::LongRunning,
            per_month(windowed, config.avg_calculation_window_days, id),
        )
    };

    debug!(
        "Income source {} ({}): {} -> {:.2}/month",
        id, source.income_category, basis, amount
    );
    (basis, amount)
}

/// Convert a monthly net amount to an estimated gross amount
pub fn gross_from_net(net: f64, category: IncomeCategory) -> f64 {
    match category {
        IncomeCategory::Salary => net * SALARY_GROSS_UP,
        _ => net,
    }
}

/// Per-source estimates for every active source on the report
pub fn source_estimates(
    report: &BankIncomeReport,
    config: &IncomeConfig,
    today: NaiveDate,
) -> Vec<SourceEstimate> {
    active_sources(report, config, today)
        .into_iter()
        .map(|source| {
            let (basis, net) = source_monthly_avg_net_income(source, config, today);
            SourceEstimate {
                income_source_id: source.income_source_id.clone(),
                income_category: source.income_category,
                basis,
                net_monthly: net,
                gross_monthly: gross_from_net(net, source.income_category),
            }
        })
        .collect()
}

/// Estimated average monthly net income across active sources
pub fn monthly_average_net_income(
    report: &BankIncomeReport,
    config: &IncomeConfig,
    today: NaiveDate,
) -> f64 {
    source_estimates(report, config, today)
        .iter()
        .map(|e| e.net_monthly)
        .sum()
}

/// Estimated average monthly gross income across active sources
pub fn monthly_average_gross_income(
    report: &BankIncomeReport,
    config: &IncomeConfig,
    today: NaiveDate,
) -> f64 {
    source_estimates(report, config, today)
        .iter()
        .map(|e| e.gross_monthly)
        .sum()
}

/// Income estimator bound to a configuration and an "as of" date
#[derive(Debug, Clone)]
pub struct IncomeEstimator {
    config: IncomeConfig,
    today: NaiveDate,
}

impl IncomeEstimator {
    /// Default configuration, as of today (UTC)
    pub fn new() -> Self {
        Self::with_config(IncomeConfig::default())
    }

    pub fn with_config(config: IncomeConfig) -> Self {
        Self {
            config,
            today: Utc::now().date_naive(),
        }
    }

    /// Evaluate as if today were `date`
    pub fn as_of(mut self, date: NaiveDate) -> Self {
        self.today = date;
        self
    }

    pub fn config(&self) -> &IncomeConfig {
        &self.config
    }

    pub fn today(&self) -> NaiveDate {
        self.today
    }

    pub fn active_sources<'a>(&self, report: &'a BankIncomeReport) -> Vec<&'a IncomeSource> {
        active_sources(report, &self.config, self.today)
    }

    pub fn source_estimates(&self, report: &BankIncomeReport) -> Vec<SourceEstimate> {
        source_estimates(report, &self.config, self.today)
    }

    pub fn monthly_average_net_income(&self, report: &BankIncomeReport) -> f64 {
        monthly_average_net_income(report, &self.config, self.today)
    }

    pub fn monthly_average_gross_income(&self, report: &BankIncomeReport) -> f64 {
        monthly_average_gross_income(report, &self.config, self.today)
    }
}

impl Default for IncomeEstimator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::income::fixtures::*;
    use crate::models::IncomeSource;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-6
    }

    fn today() -> NaiveDate {
        date(2024, 6, 30)
    }

    fn with_total(mut source: IncomeSource, total: f64) -> IncomeSource {
        source.total_amount = total;
        source
    }

    #[test]
    fn test_tax_refund_amortized_over_year() {
        let refund = with_total(
            source("r", IncomeCategory::TaxRefund, date(2024, 4, 1), date(2024, 4, 1)),
            1200.0,
        );

        for (active, avg) in [(30, 90), (7, 365), (0, 0)] {
            let config = IncomeConfig::default()
                .with_active_source_window(active)
                .with_avg_calculation_window(avg);
            let (basis, net) = source_monthly_avg_net_income(&refund, &config, today());
            assert_eq!(basis, EstimateBasis::TaxRefund);
            assert_eq!(net, 100.0);
        }
    }

    #[test]
    fn test_new_source_extrapolates_active_window() {
        let gig = with_total(
            source("g", IncomeCategory::GigEconomy, date(2024, 6, 10), date(2024, 6, 25)),
            600.0,
        );

        let (basis, net) = source_monthly_avg_net_income(&gig, &IncomeConfig::default(), today());
        assert_eq!(basis, EstimateBasis::NewSource);
        assert!(approx(net, 600.0 / 30.0 * DAYS_PER_MONTH));
    }

    #[test]
    fn test_recent_source_uses_elapsed_days() {
        // Started 60 days before today: inside the 90 day window, outside the 30 day one
        let salary = with_total(
            source("s", IncomeCategory::Salary, date(2024, 5, 1), date(2024, 6, 28)),
            4000.0,
        );

        let (basis, net) = source_monthly_avg_net_income(&salary, &IncomeConfig::default(), today());
        assert_eq!(basis, EstimateBasis::RecentSource);
        assert!(approx(net, 4000.0 / 60.0 * DAYS_PER_MONTH));
    }

    #[test]
    fn test_long_running_source_averages_window_transactions() {
        let mut salary = with_total(
            source("s", IncomeCategory::Salary, date(2023, 1, 1), date(2024, 6, 15)),
            50_000.0,
        );
        salary.historical_summary = vec![summary(&[
            (date(2024, 3, 31), 9999.0), // one day before the window opens
            (date(2024, 4, 1), 3000.0),
            (date(2024, 5, 15), 3000.0),
            (date(2024, 6, 15), 3000.0),
        ])];

        let (basis, net) = source_monthly_avg_net_income(&salary, &IncomeConfig::default(), today());
        assert_eq!(basis, EstimateBasis::LongRunning);
        assert!(approx(net, 9000.0 / 90.0 * DAYS_PER_MONTH));
    }

    #[test]
    fn test_zero_day_window_contributes_nothing() {
        let gig = with_total(
            source("g", IncomeCategory::GigEconomy, date(2024, 6, 30), date(2024, 6, 30)),
            500.0,
        );
        let config = IncomeConfig::default().with_active_source_window(0);

        let (basis, net) = source_monthly_avg_net_income(&gig, &config, today());
        assert_eq!(basis, EstimateBasis::NewSource);
        assert_eq!(net, 0.0);
    }

    #[test]
    fn test_zero_day_averaging_window_contributes_nothing() {
        let mut rent = with_total(
            source("rent", IncomeCategory::Rental, date(2023, 1, 1), date(2024, 6, 1)),
            18_000.0,
        );
        rent.historical_summary = vec![summary(&[(date(2024, 6, 1), 1500.0)])];
        let config = IncomeConfig::default().with_avg_calculation_window(0);

        let (basis, net) = source_monthly_avg_net_income(&rent, &config, today());
        assert_eq!(basis, EstimateBasis::LongRunning);
        assert_eq!(net, 0.0);
    }

    #[test]
    fn test_recent_source_starting_today_contributes_nothing() {
        // A negative active window opens after today, so a source starting
        // today falls through to the elapsed-days rule with 0 days elapsed
        let gig = with_total(
            source("g", IncomeCategory::GigEconomy, today(), today()),
            250.0,
        );
        let config = IncomeConfig::default().with_active_source_window(-1);

        let (basis, net) = source_monthly_avg_net_income(&gig, &config, today());
        assert_eq!(basis, EstimateBasis::RecentSource);
        assert_eq!(net, 0.0);
    }

    #[test]
    fn test_oversized_windows_do_not_overflow() {
        let salary = with_total(
            source("s", IncomeCategory::Salary, date(2023, 1, 1), date(2024, 6, 15)),
            36_500.0,
        );

        for days in [1_000_000_000, i64::MAX] {
            let config = IncomeConfig::default()
                .with_active_source_window(days)
                .with_avg_calculation_window(days);
            let (basis, net) = source_monthly_avg_net_income(&salary, &config, today());
            assert_eq!(basis, EstimateBasis::NewSource);
            assert!(net.is_finite() && net >= 0.0);
        }

        let config = IncomeConfig::default().with_avg_calculation_window(i64::MAX);
        let (basis, net) = source_monthly_avg_net_income(&salary, &config, today());
        assert_eq!(basis, EstimateBasis::RecentSource);
        assert!(net > 0.0);
    }

    #[test]
    fn test_zero_active_sources() {
        let report = report(
            today(),
            vec![source("old", IncomeCategory::Salary, date(2023, 1, 1), date(2024, 1, 1))],
        );

        assert_eq!(monthly_average_net_income(&report, &IncomeConfig::default(), today()), 0.0);
        assert_eq!(monthly_average_gross_income(&report, &IncomeConfig::default(), today()), 0.0);
    }

    #[test]
    fn test_gross_up_only_applies_to_salary() {
        assert_eq!(gross_from_net(4000.0, IncomeCategory::Salary), 5000.0);
        assert_eq!(gross_from_net(1000.0, IncomeCategory::GigEconomy), 1000.0);
        assert_eq!(gross_from_net(100.0, IncomeCategory::TaxRefund), 100.0);
    }

    #[test]
    fn test_net_and_gross_totals() {
        // Salary: 2 x 2000 inside a 90 day window -> 4000 / 90 * 30.4167
        let mut salary = with_total(
            source("s", IncomeCategory::Salary, date(2022, 1, 1), date(2024, 6, 14)),
            80_000.0,
        );
        salary.historical_summary = vec![summary(&[
            (date(2024, 5, 15), 2000.0),
            (date(2024, 6, 14), 2000.0),
        ])];
        let refund = with_total(
            source("r", IncomeCategory::TaxRefund, date(2024, 4, 1), date(2024, 4, 1)),
            1200.0,
        );
        let report = report(today(), vec![salary, refund]);

        let estimator = IncomeEstimator::new().as_of(today());
        let salary_net = 4000.0 / 90.0 * DAYS_PER_MONTH;

        assert!(approx(estimator.monthly_average_net_income(&report), salary_net + 100.0));
        assert!(approx(
            estimator.monthly_average_gross_income(&report),
            salary_net * 1.25 + 100.0
        ));

        let estimates = estimator.source_estimates(&report);
        assert_eq!(estimates.len(), 2);
        assert_eq!(estimates[0].basis, EstimateBasis::LongRunning);
        assert_eq!(estimates[1].gross_monthly, 100.0);
    }

    #[test]
    fn test_estimates_are_idempotent() {
        let report = report(
            today(),
            vec![with_total(
                source("g", IncomeCategory::GigEconomy, date(2024, 6, 1), date(2024, 6, 29)),
                750.0,
            )],
        );
        let estimator = IncomeEstimator::new().as_of(today());

        let first = estimator.source_estimates(&report);
        let second = estimator.source_estimates(&report);
        assert_eq!(first, second);
        assert_eq!(
            estimator.monthly_average_net_income(&report),
            estimator.monthly_average_net_income(&report)
        );
    }
}
