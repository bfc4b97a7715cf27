//! Export of computed metrics
//!
//! Supports:
//! - CSV for monthly summaries, cash flow, per-source income estimates,
//!   pay date predictions and refresh diffs
//! - JSON via serde for any summary struct

use serde::Serialize;

use crate::aggregate::MonthlySummary;
use crate::assets::CashFlow;
use crate::error::{Error, Result};
use crate::income::{PayDatePrediction, RefreshDiff, SourceEstimate};
use crate::models::IncomeSource;

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportFormat {
    #[default]
    Table,
    Json,
    Csv,
}

impl ExportFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Table => "table",
            Self::Json => "json",
            Self::Csv => "csv",
        }
    }
}

impl std::str::FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "table" => Ok(Self::Table),
            "json" => Ok(Self::Json),
            "csv" => Ok(Self::Csv),
            _ => Err(format!("Unknown format: {}", s)),
        }
    }
}

impl std::fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Pretty-printed JSON for any serializable summary
pub fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

fn finish(writer: csv::Writer<Vec<u8>>) -> Result<String> {
    let bytes = writer.into_inner().map_err(|e| Error::Io(e.into_error()))?;
    String::from_utf8(bytes).map_err(|e| Error::InvalidData(format!("CSV output: {}", e)))
}

/// `month,amount` rows in month order
pub fn monthly_summary_csv(summary: &MonthlySummary) -> Result<String> {
    let mut writer = csv::Writer::from_writer(vec![]);
    writer.write_record(["month", "amount"])?;

    for (month, amount) in summary {
        writer.write_record([month.clone(), format!("{:.2}", amount)])?;
    }
    finish(writer)
}

/// `month,inflows,outflows,net` rows; a month missing from one side reads 0
pub fn cash_flow_csv(flow: &CashFlow) -> Result<String> {
    let mut writer = csv::Writer::from_writer(vec![]);
    writer.write_record(["month", "inflows", "outflows", "net"])?;

    for (month, net) in &flow.net_monthly {
        let inflows = flow.inflows_monthly.get(month).copied().unwrap_or(0.0);
        let outflows = flow.outflows_monthly.get(month).copied().unwrap_or(0.0);
        writer.write_record([
            month.clone(),
            format!("{:.2}", inflows),
            format!("{:.2}", outflows),
            format!("{:.2}", net),
        ])?;
    }
    finish(writer)
}

/// One row per active source estimate
pub fn source_estimates_csv(estimates: &[SourceEstimate]) -> Result<String> {
    let mut writer = csv::Writer::from_writer(vec![]);
    writer.write_record([
        "income_source_id",
        "income_category",
        "basis",
        "net_monthly",
        "gross_monthly",
    ])?;

    for e in estimates {
        writer.write_record([
            e.income_source_id.clone(),
            e.income_category.to_string(),
            e.basis.to_string(),
            format!("{:.2}", e.net_monthly),
            format!("{:.2}", e.gross_monthly),
        ])?;
    }
    finish(writer)
}

/// One row per source; an empty `next_pay_date` means no prediction
pub fn pay_dates_csv(predictions: &[PayDatePrediction]) -> Result<String> {
    let mut writer = csv::Writer::from_writer(vec![]);
    writer.write_record(["income_source_id", "pay_frequency", "last_pay_date", "next_pay_date"])?;

    for p in predictions {
        writer.write_record([
            p.income_source_id.clone(),
            p.pay_frequency.to_string(),
            p.last_pay_date.to_string(),
            p.next_pay_date.map(|d| d.to_string()).unwrap_or_default(),
        ])?;
    }
    finish(writer)
}

/// `change,income_source_id,...` rows for every source in the diff
pub fn refresh_diff_csv(diff: &RefreshDiff<'_>) -> Result<String> {
    let mut writer = csv::Writer::from_writer(vec![]);
    writer.write_record([
        "change",
        "income_source_id",
        "income_category",
        "pay_frequency",
        "end_date",
    ])?;

    let groups: [(&str, &[&IncomeSource]); 3] = [
        ("new", diff.new_sources.as_slice()),
        ("updated", diff.updated_sources.as_slice()),
        ("newly_inactive", diff.newly_inactive.as_slice()),
    ];
    for (change, sources) in groups {
        for source in sources {
            writer.write_record([
                change.to_string(),
                source.income_source_id.clone(),
                source.income_category.to_string(),
                source.pay_frequency.to_string(),
                source.end_date.to_string(),
            ])?;
        }
    }
    finish(writer)
}
