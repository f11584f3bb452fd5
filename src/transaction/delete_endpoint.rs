//! Defines the endpoint for deleting a transaction.

use axum::{
    Extension, Json,
    extract::{Path, State, rejection::PathRejection},
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::{
    Error,
    transaction::{TransactionId, core::delete_transaction, state::TransactionState},
    user::UserID,
};

/// A route handler for deleting one of the owner's transactions.
pub async fn delete_transaction_endpoint(
    State(state): State<TransactionState>,
    Extension(owner): Extension<UserID>,
    transaction_id: Result<Path<TransactionId>, PathRejection>,
) -> Result<Response, Error> {
    let Path(transaction_id) = transaction_id?;
    let connection = state.lock()?;

    delete_transaction(owner, transaction_id, &connection)?;

    Ok(Json(json!({
        "success": true,
        "message": "Transaction deleted successfully",
    }))
    .into_response())
}
