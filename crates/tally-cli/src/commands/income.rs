//! Bank income command implementation

use std::path::Path;

use anyhow::{Context, Result};
use tally_core::export::{self, ExportFormat};
use tally_core::income::IncomeSummary;
use tally_core::{BankIncomeReport, MetricsConfig};

use super::{parse_as_of, read_report, truncate};

pub fn cmd_income(
    config: &MetricsConfig,
    report_path: &Path,
    active_window: Option<i64>,
    avg_window: Option<i64>,
    as_of: Option<&str>,
    format: ExportFormat,
) -> Result<()> {
    let today = parse_as_of(as_of)?;
    let content = read_report(report_path)?;
    let report = BankIncomeReport::from_json(&content)
        .with_context(|| format!("Invalid bank income report in {}", report_path.display()))?;

    let mut income_config = config.income.clone();
    if let Some(days) = active_window {
        income_config = income_config.with_active_source_window(days);
    }
    if let Some(days) = avg_window {
        income_config = income_config.with_avg_calculation_window(days);
    }

    let summary = IncomeSummary::compute(&report, &income_config, today);

    match format {
        ExportFormat::Json => println!("{}", export::to_json(&summary)?),
        ExportFormat::Csv => {
            print!("{}", export::source_estimates_csv(&summary.estimates)?);
            println!();
            print!("{}", export::pay_dates_csv(&summary.next_pay_dates)?);
        }
        ExportFormat::Table => print_income_summary(&summary),
    }

    Ok(())
}

fn print_income_summary(summary: &IncomeSummary) {
    println!();
    println!("💰 Income Estimate");
    println!("   Report: {}", summary.bank_income_id);
    println!(
        "   As of: {}   Active window: {} days   Averaging window: {} days",
        summary.as_of, summary.active_window_days, summary.avg_window_days
    );
    println!("   ─────────────────────────────────────────────────────────────");
    println!(
        "   Active sources: {} of {}",
        summary.active_sources, summary.total_sources
    );
    println!("   Monthly net:   {:>10.2}", summary.net_monthly);
    println!("   Monthly gross: {:>10.2}", summary.gross_monthly);

    if !summary.estimates.is_empty() {
        println!();
        println!(
            "   {:24} │ {:20} │ {:13} │ {:>10} │ {:>10}",
            "Source", "Category", "Basis", "Net", "Gross"
        );
        println!("   ─────────────────────────┼──────────────────────┼───────────────┼────────────┼────────────");
        for e in &summary.estimates {
            println!(
                "   {:24} │ {:20} │ {:13} │ {:>10.2} │ {:>10.2}",
                truncate(&e.income_source_id, 24),
                e.income_category.as_str(),
                e.basis.as_str(),
                e.net_monthly,
                e.gross_monthly
            );
        }
    }

    if !summary.next_pay_dates.is_empty() {
        println!();
        println!("📅 Next Pay Dates");
        for p in &summary.next_pay_dates {
            let next = match p.next_pay_date {
                Some(date) => date.to_string(),
                None => "\x1b[2mnone expected\x1b[0m".to_string(),
            };
            println!(
                "   {:24} {:12} last {}   next {}",
                truncate(&p.income_source_id, 24),
                p.pay_frequency.as_str(),
                p.last_pay_date,
                next
            );
        }
    }
}
