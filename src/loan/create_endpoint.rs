//! Defines the endpoint for creating a new loan from the add loan form.

use std::sync::{Arc, Mutex};

use axum::{
    Form,
    extract::{FromRef, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_htmx::HxRedirect;
use rusqlite::Connection;

use crate::{
    AppState, endpoints,
    loan::{
        core::{LoanForm, NewLoan, create_loan},
        loans_page::loan_form_view,
    },
};

/// The state needed to create a loan.
#[derive(Debug, Clone)]
pub struct CreateLoanState {
    /// The database connection for managing loans.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CreateLoanState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler for creating a new loan, redirects to the loans view on
/// success.
///
/// A payload that fails validation re-renders the add loan form with an
/// inline error message instead of touching the store.
pub async fn create_loan_endpoint(
    State(state): State<CreateLoanState>,
    Form(form): Form<LoanForm>,
) -> Response {
    let new_loan = match NewLoan::new(&form) {
        Ok(new_loan) => new_loan,
        Err(error) => {
            return loan_form_view(&format!("Error: {error}")).into_response();
        }
    };

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return crate::Error::DatabaseLockError.into_alert_response();
        }
    };

    match create_loan(new_loan, &connection) {
        Ok(_) => (
            HxRedirect(endpoints::LOANS_VIEW.to_owned()),
            StatusCode::SEE_OTHER,
        )
            .into_response(),
        Err(error) => {
            tracing::error!("could not create loan with {form:?}: {error}");

            error.into_alert_response()
        }
    }
}
