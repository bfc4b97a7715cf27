//! Cash flow metrics
//!
//! Amounts keep the aggregator's sign convention: inflows are negative,
//! outflows positive. Totals are not sign-flipped.

use serde::Serialize;

use crate::aggregate::{monthly_summary, AccountFilter, AccountScope, MonthlySummary};
use crate::models::Transaction;

fn transactions<S: AccountScope + ?Sized>(scope: &S) -> Vec<&Transaction> {
    scope.scoped_transactions(AccountFilter::All)
}

pub fn num_inflows<S: AccountScope + ?Sized>(scope: &S) -> usize {
    transactions(scope).iter().filter(|tx| tx.is_inflow()).count()
}

pub fn total_inflows_amount<S: AccountScope + ?Sized>(scope: &S) -> f64 {
    transactions(scope)
        .iter()
        .filter(|tx| tx.is_inflow())
        .map(|tx| tx.amount)
        .sum()
}

pub fn inflows_monthly_summary<S: AccountScope + ?Sized>(scope: &S) -> MonthlySummary {
    monthly_summary(transactions(scope).into_iter().filter(|tx| tx.is_inflow()))
}

pub fn num_outflows<S: AccountScope + ?Sized>(scope: &S) -> usize {
    transactions(scope).iter().filter(|tx| tx.is_outflow()).count()
}

pub fn total_outflows_amount<S: AccountScope + ?Sized>(scope: &S) -> f64 {
    transactions(scope)
        .iter()
        .filter(|tx| tx.is_outflow())
        .map(|tx| tx.amount)
        .sum()
}

pub fn outflows_monthly_summary<S: AccountScope + ?Sized>(scope: &S) -> MonthlySummary {
    monthly_summary(transactions(scope).into_iter().filter(|tx| tx.is_outflow()))
}

pub fn num_transactions<S: AccountScope + ?Sized>(scope: &S) -> usize {
    transactions(scope).len()
}

pub fn net_cash_flow<S: AccountScope + ?Sized>(scope: &S) -> f64 {
    transactions(scope).iter().map(|tx| tx.amount).sum()
}

pub fn cash_flow_monthly_summary<S: AccountScope + ?Sized>(scope: &S) -> MonthlySummary {
    monthly_summary(transactions(scope))
}

/// All cash flow metrics for one scope
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct CashFlow {
    pub num_inflows: usize,
    pub total_inflows: f64,
    pub inflows_monthly: MonthlySummary,
    pub num_outflows: usize,
    pub total_outflows: f64,
    pub outflows_monthly: MonthlySummary,
    pub num_transactions: usize,
    pub net_cash_flow: f64,
    pub net_monthly: MonthlySummary,
}

impl CashFlow {
    pub fn compute<S: AccountScope + ?Sized>(scope: &S) -> Self {
        Self {
            num_inflows: num_inflows(scope),
            total_inflows: total_inflows_amount(scope),
            inflows_monthly: inflows_monthly_summary(scope),
            num_outflows: num_outflows(scope),
            total_outflows: total_outflows_amount(scope),
            outflows_monthly: outflows_monthly_summary(scope),
            num_transactions: num_transactions(scope),
            net_cash_flow: net_cash_flow(scope),
            net_monthly: cash_flow_monthly_summary(scope),
        }
    }
}
