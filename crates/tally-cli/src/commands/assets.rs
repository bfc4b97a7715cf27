//! Asset report command implementation

use std::path::Path;

use anyhow::{Context, Result};
use tally_core::assets::{AssetSummary, CategoryActivity};
use tally_core::export::{self, ExportFormat};
use tally_core::{AssetReport, MetricsConfig};
use tracing::debug;

use super::{parse_as_of, read_report, truncate};

pub fn cmd_assets(
    config: &MetricsConfig,
    report_path: &Path,
    account_id: Option<&str>,
    as_of: Option<&str>,
    outlier_threshold: Option<f64>,
    format: ExportFormat,
) -> Result<()> {
    let today = parse_as_of(as_of)?;
    let content = read_report(report_path)?;
    let report = AssetReport::from_json(&content)
        .with_context(|| format!("Invalid asset report in {}", report_path.display()))?;

    let mut assets_config = config.assets.clone();
    if let Some(threshold) = outlier_threshold {
        if threshold < 0.0 {
            anyhow::bail!("--outlier-threshold must not be negative");
        }
        assets_config.outlier_threshold = threshold;
    }

    let (scope, summary) = match account_id {
        Some(id) => {
            let account = report
                .account(id)
                .with_context(|| format!("Account not found: {}", id))?;
            debug!("Computing asset metrics for account {}", id);
            let label = match account.balances.current {
                Some(current) => format!(
                    "{} ({}, current balance {:.2})",
                    account.name, account.account_type, current
                ),
                None => format!("{} ({})", account.name, account.account_type),
            };
            (label, AssetSummary::compute(account, &assets_config, today))
        }
        None => {
            debug!(
                "Computing asset metrics for report {} ({} accounts)",
                report.asset_report_id,
                report.accounts().count()
            );
            (
                format!("Report {}", report.asset_report_id),
                AssetSummary::compute(&report, &assets_config, today),
            )
        }
    };

    match format {
        ExportFormat::Json => println!("{}", export::to_json(&summary)?),
        ExportFormat::Csv => print!("{}", export::cash_flow_csv(&summary.cash_flow)?),
        ExportFormat::Table => print_asset_summary(&scope, &summary, assets_config.outlier_threshold),
    }

    Ok(())
}

fn print_asset_summary(scope: &str, summary: &AssetSummary, outlier_threshold: f64) {
    let flow = &summary.cash_flow;

    println!();
    println!("📊 Asset Metrics");
    println!("   Scope: {}", truncate(scope, 60));
    println!("   As of: {}", summary.as_of);
    println!("   ─────────────────────────────────────────────────────────────");
    println!(
        "   Transactions: {}   Inflows: {} ({:.2})   Outflows: {} ({:.2})",
        flow.num_transactions, flow.num_inflows, flow.total_inflows, flow.num_outflows, flow.total_outflows
    );
    println!("   Net cash flow: {:.2}", flow.net_cash_flow);

    if !flow.net_monthly.is_empty() {
        println!();
        println!(
            "   {:8} │ {:>12} │ {:>12} │ {:>12}",
            "Month", "Inflows", "Outflows", "Net"
        );
        println!("   ─────────┼──────────────┼──────────────┼──────────────");
        for (month, net) in &flow.net_monthly {
            println!(
                "   {:8} │ {:>12.2} │ {:>12.2} │ {:>12.2}",
                month,
                flow.inflows_monthly.get(month).copied().unwrap_or(0.0),
                flow.outflows_monthly.get(month).copied().unwrap_or(0.0),
                net
            );
        }
    }

    println!();
    println!("💳 Debt & Fees");
    print_category("Loan disbursements", &summary.loan_disbursements);
    print_category("Loan payments", &summary.loan_payments);
    print_category("Overdraft/NSF fees", &summary.od_nsf);

    let negative = &summary.negative_balances;
    let balances = &summary.balances;
    println!();
    println!("🏦 Balances");
    if balances.days == 0 {
        println!("   No historical balances.");
    } else {
        println!(
            "   {} days   Average: {:.2}   Min: {:.2}   Max: {:.2}",
            balances.days, balances.average, balances.min, balances.max
        );
        println!(
            "   Negative days: {}   Non-negative days: {}",
            negative.count_negative, negative.count_nonnegative
        );
        if negative.count_negative > 0 {
            println!(
                "   Lowest negative: {:.2}   Average negative: {:.2}",
                negative.lowest_negative, negative.average_negative
            );
        }
    }

    println!();
    println!(
        "⚠️  Transactions above {:.2}: {}",
        outlier_threshold, summary.outlier_transactions
    );
}

fn print_category(label: &str, activity: &CategoryActivity) {
    if activity.count() == 0 {
        println!("   {:20} none", label);
        return;
    }

    let recency = activity
        .days_since_most_recent
        .map(|d| format!("{} days ago", d))
        .unwrap_or_default();
    println!(
        "   {:20} {:>3} × avg {:>10.2}   total {:>10.2}   last {}",
        label,
        activity.count(),
        activity.stats.average,
        activity.amount(),
        recency
    );
}
