//! Next pay date prediction from pay frequency and the last observed pay event

use chrono::{Duration, NaiveDate};
use serde::Serialize;
use tracing::debug;

use crate::models::{BankIncomeReport, IncomeSource, PayFrequency};

/// Predicted next pay date for one source
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PayDatePrediction {
    pub income_source_id: String,
    pub pay_frequency: PayFrequency,
    pub last_pay_date: NaiveDate,
    /// None when the cadence is unknown or the stream looks finished
    pub next_pay_date: Option<NaiveDate>,
}

/// Predict when `source` will next pay out.
///
/// With `d` days since the last pay event, `expected` the cadence and
/// `buffer` the allowed slack:
/// - `d < expected`: one cadence after the last pay event
/// - `d <= expected + buffer`: tomorrow
/// - `d < 2 * expected`: two cadences after the last pay event
/// - otherwise no prediction
pub fn next_expected_pay_date(source: &IncomeSource, today: NaiveDate) -> Option<NaiveDate> {
    let frequency = source.pay_frequency;
    let (expected, buffer) = match (frequency.expected_cadence_days(), frequency.buffer_days()) {
        (Some(expected), Some(buffer)) => (expected, buffer),
        _ => return None,
    };

    let elapsed = (today - source.end_date).num_days();

    if elapsed < expected {
        Some(source.end_date + Duration::days(expected))
    } else if elapsed <= expected + buffer {
        Some(today + Duration::days(1))
    } else if elapsed < 2 * expected {
        // One pay event missed
        Some(source.end_date + Duration::days(2 * expected))
    } else {
        debug!(
            "Income source {} last paid {} days ago ({}), assuming it ended",
            source.income_source_id, elapsed, frequency
        );
        None
    }
}

/// Predictions for every source on the report, in report order
pub fn next_pay_dates(report: &BankIncomeReport, today: NaiveDate) -> Vec<PayDatePrediction> {
    report
        .sources()
        .map(|source| PayDatePrediction {
            income_source_id: source.income_source_id.clone(),
            pay_frequency: source.pay_frequency,
            last_pay_date: source.end_date,
            next_pay_date: next_expected_pay_date(source, today),
        })
        .collect()
}
