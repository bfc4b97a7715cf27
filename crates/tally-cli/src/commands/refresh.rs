//! Refresh comparison command implementation

use std::path::Path;

use anyhow::{Context, Result};
use tally_core::export::{self, ExportFormat};
use tally_core::{BankIncomeSnapshot, IncomeSource, RefreshDiff};

use super::{read_report, truncate};

pub fn cmd_refresh(response_path: &Path, format: ExportFormat) -> Result<()> {
    let content = read_report(response_path)?;
    let snapshot = BankIncomeSnapshot::from_json(&content)
        .with_context(|| format!("Invalid bank income response in {}", response_path.display()))?;

    let diff = RefreshDiff::compute(&snapshot);

    match format {
        ExportFormat::Json => println!("{}", export::to_json(&diff)?),
        ExportFormat::Csv => print!("{}", export::refresh_diff_csv(&diff)?),
        ExportFormat::Table => {
            println!();
            println!("🔄 Refresh Comparison");
            println!(
                "   {} ({}) → {} ({})",
                snapshot.original.bank_income_id,
                snapshot.original.report_generation_time.format("%Y-%m-%d %H:%M"),
                snapshot.refreshed.bank_income_id,
                snapshot.refreshed.report_generation_time.format("%Y-%m-%d %H:%M"),
            );
            println!("   ─────────────────────────────────────────────────────────────");

            if diff.is_empty() {
                println!("   No changes since the original report.");
                return Ok(());
            }

            print_sources("🆕 New sources", &diff.new_sources);
            print_sources("📈 Sources with new transactions", &diff.updated_sources);
            print_sources("💤 Newly inactive sources", &diff.newly_inactive);
        }
    }

    Ok(())
}

fn print_sources(title: &str, sources: &[&IncomeSource]) {
    println!();
    println!("{} ({})", title, sources.len());
    for source in sources {
        println!(
            "   {:24} {:20} {:12} last paid {}",
            truncate(&source.income_source_id, 24),
            source.income_category.as_str(),
            source.pay_frequency.as_str(),
            source.end_date
        );
    }
}
