//! The JSON API for loans.
//!
//! Mirrors the operations available from the loans page for programmatic
//! access: fetch all loans, add a loan and delete a loan by id. Failures are
//! reported as `{"error": ...}` with a generic message for store failures so
//! that no database detail leaks to the client.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use crate::{
    AppState,
    loan::core::{LoanForm, LoanId, NewLoan, create_loan, delete_loan, get_all_loans},
};

/// The state needed by the JSON API handlers.
#[derive(Debug, Clone)]
pub struct LoanApiState {
    /// The database connection for managing loans.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for LoanApiState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The JSON body for failed requests.
#[derive(Debug, Serialize)]
struct ApiError {
    error: String,
}

/// The JSON body for successful requests that do not return a record.
#[derive(Debug, Serialize)]
struct ApiMessage {
    success: bool,
    message: String,
}

fn api_error(status: StatusCode, message: &str) -> Response {
    (
        status,
        Json(ApiError {
            error: message.to_owned(),
        }),
    )
        .into_response()
}

/// A route handler that returns all loans as a JSON array, most recently
/// recorded first.
pub async fn get_loans_api(State(state): State<LoanApiState>) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return api_error(StatusCode::INTERNAL_SERVER_ERROR, "Failed to fetch loans");
        }
    };

    match get_all_loans(&connection) {
        Ok(loans) => (StatusCode::OK, Json(loans)).into_response(),
        Err(error) => {
            tracing::error!("could not get all loans: {error}");
            api_error(StatusCode::INTERNAL_SERVER_ERROR, "Failed to fetch loans")
        }
    }
}

/// A route handler that validates a loan payload and inserts it.
///
/// Responds with 201 and the inserted record on success, or 400 and the
/// validation failure for a bad payload.
pub async fn add_loan_api(
    State(state): State<LoanApiState>,
    Json(payload): Json<LoanForm>,
) -> Response {
    let new_loan = match NewLoan::new(&payload) {
        Ok(new_loan) => new_loan,
        Err(error) => return api_error(StatusCode::BAD_REQUEST, &error.to_string()),
    };

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return api_error(StatusCode::INTERNAL_SERVER_ERROR, "Failed to add loan");
        }
    };

    match create_loan(new_loan, &connection) {
        Ok(loan) => (StatusCode::CREATED, Json(loan)).into_response(),
        Err(error) => {
            tracing::error!("could not create loan with {payload:?}: {error}");
            api_error(StatusCode::INTERNAL_SERVER_ERROR, "Failed to add loan")
        }
    }
}

/// The query parameters for [delete_loan_api].
#[derive(Debug, Deserialize)]
pub struct DeleteLoanParams {
    /// The id of the loan to delete.
    pub id: Option<LoanId>,
}

/// A route handler that deletes the loan named by the `id` query parameter.
///
/// A missing `id` fails with 400 before the store is touched. Deleting an id
/// that is not in the database still responds with success.
pub async fn delete_loan_api(
    State(state): State<LoanApiState>,
    Query(params): Query<DeleteLoanParams>,
) -> Response {
    let Some(id) = params.id else {
        return api_error(StatusCode::BAD_REQUEST, "Missing id parameter");
    };

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return api_error(StatusCode::INTERNAL_SERVER_ERROR, "Failed to delete loan");
        }
    };

    match delete_loan(id, &connection) {
        Ok(rows_affected) => {
            if rows_affected == 0 {
                tracing::debug!("delete for missing loan {id} was a no-op");
            }

            (
                StatusCode::OK,
                Json(ApiMessage {
                    success: true,
                    message: "Loan deleted successfully.".to_owned(),
                }),
            )
                .into_response()
        }
        Err(error) => {
            tracing::error!("could not delete loan {id}: {error}");
            api_error(StatusCode::INTERNAL_SERVER_ERROR, "Failed to delete loan")
        }
    }
}
