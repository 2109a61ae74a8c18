//! A personal finance tracker.
//!
//! The library provides a JSON REST API for recording, listing, editing and
//! deleting transactions, a server-rendered page with a form, a transaction
//! table and a monthly totals chart, and an HTTP client for the API.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_server::Handle;
use serde_json::json;
use tokio::signal;

mod alert;
mod app_state;
mod chart;
pub mod client;
mod database_id;
mod db;
pub mod endpoints;
mod error_page;
mod html;
mod logging;
mod routing;
mod timezone;
mod transaction;

#[cfg(test)]
mod test_utils;

pub use app_state::AppState;
pub use chart::{CHART_MONTHS, MonthlyTotal, monthly_totals};
pub use database_id::TransactionId;
pub use db::initialize as initialize_db;
pub use logging::{LOG_BODY_LENGTH_LIMIT, logging_middleware};
pub use routing::build_router;
pub use transaction::{
    Amount, Transaction, TransactionData, count_transactions, create_transaction, format_date,
    list_transactions, parse_date,
};

use crate::{
    alert::Alert,
    error_page::{InternalServerError, NotFound},
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
    /// The amount could not be parsed as a finite number of dollars.
    #[error("\"{0}\" is not a valid amount")]
    InvalidAmount(String),

    /// The date was neither a `YYYY-MM-DD` date nor an RFC 3339 date-time.
    #[error("\"{0}\" is not a valid date")]
    InvalidDate(String),

    /// The form was submitted without a description.
    #[error("the description cannot be empty")]
    EmptyDescription,

    /// The request body could not be parsed as transaction data.
    #[error("could not parse the request body: {0}")]
    InvalidRequestBody(String),

    /// The requested resource was not found.
    ///
    /// For HTTP request handlers, the client should check that the parameters
    /// (e.g., ID) are correct and that the resource has been created.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("the requested resource could not be found")]
    NotFound,

    /// Tried to update a transaction that does not exist
    #[error("tried to update a transaction that is not in the database")]
    UpdateMissingTransaction,

    /// Tried to delete a transaction that does not exist
    #[error("tried to delete a transaction that is not in the database")]
    DeleteMissingTransaction,

    /// Could not acquire the database lock
    #[error("could not acquire the database lock")]
    DatabaseLockError,

    /// The configured timezone is not a canonical timezone name.
    #[error("invalid timezone {0}")]
    InvalidTimezoneError(String),

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),
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

/// Full HTML error pages, used by the page handlers.
impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Error::NotFound => NotFound.into_response(),
            Error::InvalidTimezoneError(timezone) => InternalServerError {
                description: "Invalid Timezone Settings",
                fix: &format!(
                    "Could not get local timezone \"{timezone}\". Check your server settings and \
                    ensure the timezone has been set to valid, canonical timezone string"
                ),
            }
            .into_response(),
            // Any errors that are not handled above are not intended to be shown to the client.
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                InternalServerError::default().into_response()
            }
        }
    }
}

impl Error {
    /// Convert the error into a JSON response for the REST API.
    ///
    /// Missing records on read and update become `404 Not Found`. Everything
    /// else is logged and collapsed into `500 Internal Server Error` with
    /// `failure_message` as the body's `error` field.
    pub(crate) fn into_api_response(self, failure_message: &str) -> Response {
        match self {
            Error::NotFound | Error::UpdateMissingTransaction => (
                StatusCode::NOT_FOUND,
                Json(json!({ "error": "Transaction not found" })),
            )
                .into_response(),
            error => {
                tracing::error!("{failure_message}: {error}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": failure_message })),
                )
                    .into_response()
            }
        }
    }

    /// Convert the error into an alert fragment for htmx requests.
    pub(crate) fn into_alert_response(self) -> Response {
        match self {
            Error::InvalidAmount(amount) => Alert {
                message: "Invalid amount".to_owned(),
                details: format!("\"{amount}\" is not a number. Enter an amount such as 12.34."),
            }
            .into_response_with_status(StatusCode::BAD_REQUEST),
            Error::InvalidDate(date) => Alert {
                message: "Invalid date".to_owned(),
                details: format!("\"{date}\" is not a valid date."),
            }
            .into_response_with_status(StatusCode::BAD_REQUEST),
            Error::EmptyDescription => Alert {
                message: "Missing description".to_owned(),
                details: "Enter a description, e.g. \"Groceries\".".to_owned(),
            }
            .into_response_with_status(StatusCode::BAD_REQUEST),
            Error::InvalidRequestBody(details) => Alert {
                message: "Failed to save transaction".to_owned(),
                details,
            }
            .into_response_with_status(StatusCode::BAD_REQUEST),
            Error::NotFound | Error::UpdateMissingTransaction => Alert {
                message: "Could not update transaction".to_owned(),
                details: "The transaction could not be found.".to_owned(),
            }
            .into_response_with_status(StatusCode::NOT_FOUND),
            Error::DeleteMissingTransaction => Alert {
                message: "Could not delete transaction".to_owned(),
                details: "The transaction could not be found. \
                    Try refreshing the page to see if the transaction has already been deleted."
                    .to_owned(),
            }
            .into_response_with_status(StatusCode::NOT_FOUND),
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                Alert {
                    message: "Something went wrong".to_owned(),
                    details: "An unexpected error occurred, check the server logs for more details."
                        .to_owned(),
                }
                .into_response_with_status(StatusCode::INTERNAL_SERVER_ERROR)
            }
        }
    }
}
