//! Aggregate totals across all loans, computed per currency.

use crate::currency::Currency;

use super::core::Loan;

/// Per-currency totals across all loans.
///
/// Interest is derived from each loan's principal and rate, never stored,
/// so the totals are recomputed on every read.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct LoanSummary {
    /// The sum of rupiah principals.
    pub idr_principal: f64,
    /// The sum of interest owed on rupiah loans.
    pub idr_interest: f64,
    /// The sum of baht principals.
    pub thb_principal: f64,
    /// The sum of interest owed on baht loans.
    pub thb_interest: f64,
}

/// Accumulate the per-currency principal and interest totals for `loans`.
///
/// An empty slice produces all-zero totals.
pub fn summarize_loans(loans: &[Loan]) -> LoanSummary {
    loans
        .iter()
        .fold(LoanSummary::default(), |mut summary, loan| {
            match loan.currency {
                Currency::Idr => {
                    summary.idr_principal += loan.principal;
                    summary.idr_interest += loan.interest();
                }
                Currency::Thb => {
                    summary.thb_principal += loan.principal;
                    summary.thb_interest += loan.interest();
                }
            }

            summary
        })
}
