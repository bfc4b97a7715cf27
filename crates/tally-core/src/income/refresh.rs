//! Compare a refreshed bank income report with the report it replaced

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Duration, NaiveTime, Utc};
use serde::Serialize;
use tracing::debug;

use crate::models::{BankIncomeSnapshot, IncomeSource};

/// Whether `source` had gone quiet when the report was generated.
///
/// The threshold depends on pay frequency; the gap must strictly exceed it.
pub fn is_source_inactive(source: &IncomeSource, report_generation_time: DateTime<Utc>) -> bool {
    let last_paid = source.end_date.and_time(NaiveTime::MIN).and_utc();
    let threshold = Duration::days(source.pay_frequency.inactivity_threshold_days());
    report_generation_time - last_paid > threshold
}

/// Sources that only appear in the refreshed report
pub fn new_sources(snapshot: &BankIncomeSnapshot) -> Vec<&IncomeSource> {
    let original_ids: HashSet<&str> = snapshot
        .original
        .sources()
        .map(|s| s.income_source_id.as_str())
        .collect();

    snapshot
        .refreshed
        .sources()
        .filter(|s| !original_ids.contains(s.income_source_id.as_str()))
        .collect()
}

/// Sources present in both reports whose last pay event moved forward
pub fn sources_with_new_transactions(snapshot: &BankIncomeSnapshot) -> Vec<&IncomeSource> {
    let original_end_dates: HashMap<&str, _> = snapshot
        .original
        .sources()
        .map(|s| (s.income_source_id.as_str(), s.end_date))
        .collect();

    snapshot
        .refreshed
        .sources()
        .filter(|s| {
            original_end_dates
                .get(s.income_source_id.as_str())
                .is_some_and(|&original_end| s.end_date > original_end)
        })
        .collect()
}

/// Sources inactive in the refreshed report that weren't already inactive
/// in the original
pub fn newly_inactive_sources(snapshot: &BankIncomeSnapshot) -> Vec<&IncomeSource> {
    let original_time = snapshot.original.report_generation_time;
    let already_inactive: HashSet<&str> = snapshot
        .original
        .sources()
        .filter(|s| is_source_inactive(s, original_time))
        .map(|s| s.income_source_id.as_str())
        .collect();

    let refreshed_time = snapshot.refreshed.report_generation_time;
    snapshot
        .refreshed
        .sources()
        .filter(|s| is_source_inactive(s, refreshed_time))
        .filter(|s| !already_inactive.contains(s.income_source_id.as_str()))
        .collect()
}

/// Everything that changed between the two reports
#[derive(Debug, Clone, Serialize)]
pub struct RefreshDiff<'a> {
    pub new_sources: Vec<&'a IncomeSource>,
    pub updated_sources: Vec<&'a IncomeSource>,
    pub newly_inactive: Vec<&'a IncomeSource>,
}

impl<'a> RefreshDiff<'a> {
    pub fn compute(snapshot: &'a BankIncomeSnapshot) -> Self {
        let diff = Self {
            new_sources: new_sources(snapshot),
            updated_sources: sources_with_new_transactions(snapshot),
            newly_inactive: newly_inactive_sources(snapshot),
        };
        debug!(
            "Refresh diff: {} new, {} updated, {} newly inactive",
            diff.new_sources.len(),
            diff.updated_sources.len(),
            diff.newly_inactive.len()
        );
        diff
    }

    pub fn is_empty(&self) -> bool {
        self.new_sources.is_empty() && self.updated_sources.is_empty() && self.newly_inactive.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::income::fixtures::*;
    use crate::models::{IncomeCategory, PayFrequency};

    fn with_frequency(mut s: IncomeSource, frequency: PayFrequency) -> IncomeSource {
        s.pay_frequency = frequency;
        s
    }

    fn ids(sources: &[&IncomeSource]) -> Vec<String> {
        sources.iter().map(|s| s.income_source_id.clone()).collect()
    }

    #[test]
    fn test_inactivity_threshold_is_strict() {
        let generated = date(2024, 6, 30).and_time(NaiveTime::MIN).and_utc();
        let weekly = |end| {
            with_frequency(
                source("w", IncomeCategory::Salary, date(2024, 1, 1), end),
                PayFrequency::Weekly,
            )
        };

        assert!(!is_source_inactive(&weekly(date(2024, 6, 16)), generated));
        assert!(is_source_inactive(&weekly(date(2024, 6, 15)), generated));

        // Time of day on the generation timestamp counts
        let later = generated + Duration::hours(1);
        assert!(is_source_inactive(&weekly(date(2024, 6, 16)), later));
    }

    #[test]
    fn test_thresholds_by_frequency() {
        let generated = date(2024, 6, 30).and_time(NaiveTime::MIN).and_utc();
        let end = date(2024, 5, 25); // 36 days before

        for (frequency, inactive) in [
            (PayFrequency::Weekly, true),
            (PayFrequency::Biweekly, true),
            (PayFrequency::SemiMonthly, true),
            (PayFrequency::Monthly, false),
            (PayFrequency::Unknown, false),
        ] {
            let s = with_frequency(source("s", IncomeCategory::Salary, date(2024, 1, 1), end), frequency);
            assert_eq!(is_source_inactive(&s, generated), inactive, "{}", frequency);
        }
    }

    #[test]
    fn test_new_and_updated_sources() {
        let original = report(
            date(2024, 1, 5),
            vec![
                source("a", IncomeCategory::Salary, date(2023, 1, 1), date(2024, 1, 1)),
                source("b", IncomeCategory::Salary, date(2023, 1, 1), date(2024, 1, 1)),
            ],
        );
        let refreshed = report(
            date(2024, 2, 5),
            vec![
                source("a", IncomeCategory::Salary, date(2023, 1, 1), date(2024, 2, 1)),
                source("b", IncomeCategory::Salary, date(2023, 1, 1), date(2024, 1, 1)),
                source("c", IncomeCategory::GigEconomy, date(2024, 1, 20), date(2024, 2, 1)),
            ],
        );
        let snapshot = BankIncomeSnapshot::new(refreshed, original);

        assert_eq!(ids(&new_sources(&snapshot)), vec!["c"]);
        assert_eq!(ids(&sources_with_new_transactions(&snapshot)), vec!["a"]);
    }

    #[test]
    fn test_newly_inactive_excludes_already_inactive() {
        let weekly = |id, end| {
            with_frequency(
                source(id, IncomeCategory::Salary, date(2023, 1, 1), end),
                PayFrequency::Weekly,
            )
        };
        let original = report(
            date(2024, 3, 1),
            vec![weekly("quiet", date(2024, 1, 1)), weekly("lapsed", date(2024, 2, 28))],
        );
        let refreshed = report(
            date(2024, 4, 1),
            vec![
                weekly("quiet", date(2024, 1, 1)),
                weekly("lapsed", date(2024, 2, 28)),
                weekly("steady", date(2024, 3, 29)),
            ],
        );
        let snapshot = BankIncomeSnapshot::new(refreshed, original);

        assert_eq!(ids(&newly_inactive_sources(&snapshot)), vec!["lapsed"]);
    }

    #[test]
    fn test_refresh_diff_bundle() {
        let same = vec![source("a", IncomeCategory::Salary, date(2024, 1, 1), date(2024, 6, 1))];
        let snapshot = BankIncomeSnapshot::new(report(date(2024, 6, 2), same.clone()), report(date(2024, 6, 2), same));

        let diff = RefreshDiff::compute(&snapshot);
        assert!(diff.is_empty());
    }
}
