//! The loan vertical slice: domain types, database operations, the loans
//! page and the HTTP endpoints (htmx fragments and JSON API) for creating
//! and deleting loans.

mod api;
mod core;
mod create_endpoint;
mod delete_endpoint;
mod loans_page;
mod summary;

pub use api::{add_loan_api, delete_loan_api, get_loans_api};
pub use core::{
    Loan, LoanForm, LoanId, NewLoan, create_loan, create_loan_table, delete_loan, get_all_loans,
    map_row_to_loan,
};
pub use create_endpoint::create_loan_endpoint;
pub use delete_endpoint::delete_loan_endpoint;
pub use loans_page::get_loans_page;
pub use summary::{LoanSummary, summarize_loans};
