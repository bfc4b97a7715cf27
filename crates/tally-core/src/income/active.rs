//! Active income source selection

use chrono::NaiveDate;

use crate::config::IncomeConfig;
use crate::models::{BankIncomeReport, IncomeCategory, IncomeSource};

/// Whether a source counts toward income estimates as of `today`.
///
/// The category must be allowed. Tax refunds arrive yearly, so they stay
/// active however long ago they were paid; anything else needs a pay event
/// within the active window.
pub fn is_active(source: &IncomeSource, config: &IncomeConfig, today: NaiveDate) -> bool {
    if !config.includes(source.income_category) {
        return false;
    }
    if source.income_category == IncomeCategory::TaxRefund {
        return true;
    }
    (today - source.end_date).num_days() <= config.active_source_window_days
}

/// Sources on the report that are active as of `today`, in report order
pub fn active_sources<'a>(
    report: &'a BankIncomeReport,
    config: &IncomeConfig,
    today: NaiveDate,
) -> Vec<&'a IncomeSource> {
    report
        .sources()
        .filter(|source| is_active(source, config, today))
        .collect()
}
