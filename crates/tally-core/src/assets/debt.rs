//! Debt insights: loan disbursements and loan payments

use chrono::NaiveDate;

use crate::aggregate::{AccountFilter, AccountScope};

use super::{category_activity, CategoryActivity, LOAN_DISBURSEMENTS, LOAN_PAYMENTS};

/// Loan disbursements received. Report-wide, only depository accounts count.
pub fn loan_disbursements<S: AccountScope + ?Sized>(scope: &S, today: NaiveDate) -> CategoryActivity {
    category_activity(scope, LOAN_DISBURSEMENTS, AccountFilter::DepositoryOnly, today)
}

/// Loan payments made from any account
pub fn loan_payments<S: AccountScope + ?Sized>(scope: &S, today: NaiveDate) -> CategoryActivity {
    category_activity(scope, LOAN_PAYMENTS, AccountFilter::All, today)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::fixtures::*;
    use crate::models::{AccountType, AssetReport};

    fn sample_report() -> AssetReport {
        report(vec![
            account(
                "checking",
                AccountType::Depository,
                vec![
                    tx(date(2024, 1, 2), -1000.0, Some(LOAN_DISBURSEMENTS)),
                    tx(date(2024, 1, 28), 250.0, Some(LOAN_PAYMENTS)),
                    tx(date(2024, 2, 28), 250.0, Some(LOAN_PAYMENTS)),
                ],
                &[],
            ),
            account(
                "loan",
                AccountType::Loan,
                vec![
                    tx(date(2024, 3, 1), -4000.0, Some(LOAN_DISBURSEMENTS)),
                    tx(date(2024, 3, 5), 100.0, Some(LOAN_PAYMENTS)),
                ],
                &[],
            ),
        ])
    }

    #[test]
    fn test_report_disbursements_only_count_depository() {
        let report = sample_report();
        let today = date(2024, 3, 10);

        let disbursements = loan_disbursements(&report, today);
        assert_eq!(disbursements.count(), 1);
        assert_eq!(disbursements.amount(), -1000.0);
        assert_eq!(disbursements.days_since_most_recent, Some(68));
    }

    #[test]
    fn test_account_disbursements_ignore_account_type() {
        let report = sample_report();
        let loan = report.account("loan").unwrap();

        let disbursements = loan_disbursements(loan, date(2024, 3, 10));
        assert_eq!(disbursements.count(), 1);
        assert_eq!(disbursements.stats.max, -4000.0);
        assert_eq!(disbursements.days_since_most_recent, Some(9));
    }

    #[test]
    fn test_payments_span_all_accounts() {
        let report = sample_report();
        let payments = loan_payments(&report, date(2024, 3, 10));

        assert_eq!(payments.count(), 3);
        assert_eq!(payments.amount(), 600.0);
        assert_eq!(payments.stats.min, 100.0);
        assert_eq!(payments.stats.max, 250.0);
        assert_eq!(payments.stats.average, 200.0);
        assert_eq!(payments.monthly.len(), 3);
        assert_eq!(payments.days_since_most_recent, Some(5));
    }
}
