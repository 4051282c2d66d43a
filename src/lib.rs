//! Pinjaman is a small web app for keeping track of personal loans: who
//! borrowed money, how much, in which currency, and at what interest rate.
//!
//! This library provides a REST API that directly serves HTML pages, plus a
//! JSON API mirroring the same operations for programmatic access.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_server::Handle;
use tokio::signal;

mod alert;
mod app_state;
mod currency;
mod db;
mod endpoints;
mod html;
mod internal_server_error;
mod loan;
mod not_found;
mod routing;
#[cfg(test)]
mod test_utils;

pub use app_state::AppState;
pub use currency::{Currency, format_amount, format_currency};
pub use db::initialize as initialize_db;
pub use loan::{Loan, LoanForm, NewLoan, create_loan};
pub use routing::build_router;

use crate::{
    alert::Alert, internal_server_error::InternalServerError,
    not_found::get_404_not_found_response,
};

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// An empty string was used for the borrower name.
    #[error("Borrower name cannot be empty")]
    EmptyBorrowerName,

    /// A zero, negative or non-finite amount was used for the loan principal.
    #[error("The loan amount must be a positive number, got {0}")]
    InvalidPrincipal(f64),

    /// A negative or non-finite interest rate was used to create a loan.
    #[error("The interest rate must be zero or greater, got {0}")]
    NegativeInterestRate(f64),

    /// A currency code other than the supported ones was used to create a loan.
    #[error("\"{0}\" is not a supported currency, expected one of IDR, THB")]
    UnsupportedCurrency(String),

    /// The requested resource was not found.
    ///
    /// For HTTP request handlers, the client should check that the parameters
    /// (e.g., ID) are correct and that the resource has been created.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("the requested resource could not be found")]
    NotFound,

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// Could not acquire the database lock
    #[error("could not acquire the database lock")]
    DatabaseLockError,
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

impl Error {
    /// Whether the error was caused by a bad client payload rather than a
    /// fault on the server side.
    pub fn is_validation_error(&self) -> bool {
        matches!(
            self,
            Error::EmptyBorrowerName
                | Error::InvalidPrincipal(_)
                | Error::NegativeInterestRate(_)
                | Error::UnsupportedCurrency(_)
        )
    }

    fn into_alert_response(self) -> Response {
        if self.is_validation_error() {
            return (
                StatusCode::BAD_REQUEST,
                Alert::Error {
                    message: "Invalid loan details".to_owned(),
                    details: self.to_string(),
                }
                .into_markup(),
            )
                .into_response();
        }

        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Alert::Error {
                message: "Something went wrong".to_owned(),
                details: "An unexpected error occurred, check the server logs for more details."
                    .to_owned(),
            }
            .into_markup(),
        )
            .into_response()
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Error::NotFound => get_404_not_found_response(),
            Error::DatabaseLockError => InternalServerError::default().into_response(),
            // Any errors that are not handled above are not intended to be shown to the client.
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                InternalServerError::default().into_response()
            }
        }
    }
}
