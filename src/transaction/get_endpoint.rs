//! Defines the endpoint for getting a single transaction.

use axum::{
    Extension, Json,
    extract::{Path, State, rejection::PathRejection},
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::{
    Error,
    transaction::{TransactionId, core::get_transaction, state::TransactionState},
    user::UserID,
};

/// A route handler for getting one of the owner's transactions by ID.
///
/// Transactions owned by other users are reported as not found.
pub async fn get_transaction_endpoint(
    State(state): State<TransactionState>,
    Extension(owner): Extension<UserID>,
    transaction_id: Result<Path<TransactionId>, PathRejection>,
) -> Result<Response, Error> {
    let Path(transaction_id) = transaction_id?;
    let connection = state.lock()?;

    let transaction =
        get_transaction(owner, transaction_id, &connection).map_err(|error| match error {
            Error::NotFound => Error::GetMissingTransaction(transaction_id),
            error => error,
        })?;

    Ok(Json(json!({
        "success": true,
        "transaction": transaction,
    }))
    .into_response())
}
