//! Expense tracker is a JSON web service for recording income and expenses
//! and summarising them on a dashboard.
//!
//! This library provides a REST API over a SQLite database. The dashboard
//! endpoints compute monthly summaries and multi-month trends from each
//! user's transactions.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum::{
    Json,
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_server::Handle;
use serde_json::json;
use tokio::signal;

mod app_state;
mod dashboard;
mod database_id;
mod db;
mod endpoints;
mod logging;
mod not_found;
mod owner;
mod pagination;
mod routing;
#[cfg(test)]
mod test_utils;
mod timezone;
mod transaction;
mod user;

pub use app_state::AppState;
pub use dashboard::{
    CategoryTotal, MonthPeriod, PeriodTotals, Summary, TrendPoint, TrendRange, Trends,
    get_summary, get_trends,
};
pub use db::initialize as initialize_db;
pub use logging::{LOG_BODY_LENGTH_LIMIT, logging_middleware};
pub use owner::OWNER_HEADER;
pub use pagination::PaginationConfig;
pub use routing::build_router;
pub use timezone::get_timezone;
pub use transaction::{
    Category, DateInterval, SQLiteTransactionStore, Transaction, TransactionBuilder,
    TransactionKind, TransactionStore, create_transaction,
};
pub use user::UserID;

use crate::transaction::TransactionId;

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
    /// A transaction was given an amount less than zero.
    ///
    /// The direction of a transaction is given by its kind, so amounts are
    /// always recorded as magnitudes.
    #[error("the amount {0} is negative, amounts must be zero or greater")]
    NegativeAmount(rust_decimal::Decimal),

    /// A transaction was given an empty description.
    #[error("the description cannot be empty")]
    EmptyDescription,

    /// The category of a transaction does not belong to the vocabulary of the
    /// transaction's kind, e.g. an expense tagged as `salary`.
    #[error("the category \"{category}\" cannot be used for {kind} transactions")]
    CategoryKindMismatch {
        /// The offending category key.
        category: String,
        /// The kind of the transaction.
        kind: String,
    },

    /// A string did not match any known category or transaction kind.
    #[error("\"{0}\" is not a valid category")]
    InvalidCategory(String),

    /// The requested month and year could not be represented as a calendar
    /// date, e.g. because the year is too large.
    #[error("month {month} of year {year} is not a representable period")]
    InvalidPeriod {
        /// The requested month, 1-indexed.
        month: i32,
        /// The requested year.
        year: i32,
    },

    /// The request body, query string or path could not be parsed.
    #[error("invalid request: {0}")]
    InvalidPayload(String),

    /// The request did not carry a valid owner ID.
    ///
    /// The owner is forwarded by the authenticating proxy in front of the
    /// service in the [OWNER_HEADER] header.
    #[error("the request is missing a valid owner ID")]
    MissingOwner,

    /// The requested resource was not found.
    ///
    /// For HTTP request handlers, the client should check that the parameters
    /// (e.g., ID) are correct and that the resource has been created.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("the requested resource could not be found")]
    NotFound,

    /// Tried to get a transaction that does not exist
    #[error("tried to get a transaction that is not in the database")]
    GetMissingTransaction(TransactionId),

    /// Tried to update a transaction that does not exist
    #[error("tried to update a transaction that is not in the database")]
    UpdateMissingTransaction(TransactionId),

    /// Tried to delete a transaction that does not exist
    #[error("tried to delete a transaction that is not in the database")]
    DeleteMissingTransaction(TransactionId),

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// Could not acquire the database lock
    #[error("could not acquire the database lock")]
    DatabaseLockError,

    /// An error occurred while getting the local timezone from a canonical timezone string.
    #[error("invalid timezone {0}")]
    InvalidTimezoneError(String),

    /// An error occurred while serializing a struct as JSON
    #[error("could not serialize as JSON: {0}")]
    JSONSerializationError(String),

    /// A dashboard summary or trend could not be computed because the
    /// transaction store failed.
    ///
    /// The string holds the underlying error and should only be logged.
    #[error("the dashboard computation failed: {0}")]
    ComputationFailed(String),
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

impl From<JsonRejection> for Error {
    fn from(rejection: JsonRejection) -> Self {
        Error::InvalidPayload(rejection.body_text())
    }
}

impl From<QueryRejection> for Error {
    fn from(rejection: QueryRejection) -> Self {
        Error::InvalidPayload(rejection.body_text())
    }
}

impl From<PathRejection> for Error {
    fn from(rejection: PathRejection) -> Self {
        Error::InvalidPayload(rejection.body_text())
    }
}

impl Error {
    fn status_code(&self) -> StatusCode {
        match self {
            Error::NegativeAmount(_)
            | Error::EmptyDescription
            | Error::CategoryKindMismatch { .. }
            | Error::InvalidCategory(_)
            | Error::InvalidPeriod { .. }
            | Error::InvalidPayload(_) => StatusCode::BAD_REQUEST,
            Error::MissingOwner => StatusCode::UNAUTHORIZED,
            Error::NotFound
            | Error::GetMissingTransaction(_)
            | Error::UpdateMissingTransaction(_)
            | Error::DeleteMissingTransaction(_) => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status_code = self.status_code();

        let message = match self {
            Error::NotFound => "Not found".to_owned(),
            Error::GetMissingTransaction(_)
            | Error::UpdateMissingTransaction(_)
            | Error::DeleteMissingTransaction(_) => "Transaction not found".to_owned(),
            Error::InvalidTimezoneError(timezone) => {
                tracing::error!("Could not get local timezone \"{timezone}\"");
                "Server error".to_owned()
            }
            // Any other server errors are not intended to be shown to the client.
            error if status_code == StatusCode::INTERNAL_SERVER_ERROR => {
                tracing::error!("An unexpected error occurred: {}", error);
                "Server error".to_owned()
            }
            error => error.to_string(),
        };

        (
            status_code,
            Json(json!({
                "success": false,
                "message": message,
            })),
        )
            .into_response()
    }
}
