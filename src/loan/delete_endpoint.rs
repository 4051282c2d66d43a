//! Defines the endpoint for deleting a loan from the loans page.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Path, State},
    response::{IntoResponse, Response},
};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    alert::Alert,
    loan::core::{LoanId, delete_loan},
};

/// The state needed to delete a loan.
#[derive(Debug, Clone)]
pub struct DeleteLoanState {
    /// The database connection for managing loans.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for DeleteLoanState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler for deleting a loan, responds with an alert.
///
/// Deleting an id that is no longer in the database still responds with
/// success: the end state is the same and the row has already gone from the
/// client's view.
pub async fn delete_loan_endpoint(
    State(state): State<DeleteLoanState>,
    Path(loan_id): Path<LoanId>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match delete_loan(loan_id, &connection) {
        // The status code has to be 200 OK or HTMX will not delete the table row.
        Ok(rows_affected) => {
            if rows_affected == 0 {
                tracing::debug!("delete for missing loan {loan_id} was a no-op");
            }

            Alert::Success {
                message: "Loan deleted successfully".to_owned(),
            }
            .into_response()
        }
        Err(error) => {
            tracing::error!("could not delete loan {loan_id}: {error}");
            error.into_alert_response()
        }
    }
}
