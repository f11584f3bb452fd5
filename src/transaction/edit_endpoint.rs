//! Defines the endpoint for replacing the fields of an existing transaction.

use axum::{
    Extension, Json,
    extract::{
        Path, State,
        rejection::{JsonRejection, PathRejection},
    },
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::{
    Error,
    transaction::{
        TransactionId, core::update_transaction, form::TransactionForm, state::TransactionState,
    },
    user::UserID,
};

/// A route handler for updating one of the owner's transactions.
///
/// Every field except the date is replaced. If the request does not include
/// a date, the stored date is kept.
pub async fn edit_transaction_endpoint(
    State(state): State<TransactionState>,
    Extension(owner): Extension<UserID>,
    transaction_id: Result<Path<TransactionId>, PathRejection>,
    payload: Result<Json<TransactionForm>, JsonRejection>,
) -> Result<Response, Error> {
    let Path(transaction_id) = transaction_id?;
    let Json(form) = payload?;
    let connection = state.lock()?;

    let transaction = update_transaction(owner, transaction_id, form.into(), &connection)
        .inspect_err(|error| {
            tracing::debug!("could not update transaction {transaction_id}: {error}")
        })?;

    Ok(Json(json!({
        "success": true,
        "message": "Transaction updated successfully",
        "transaction": transaction,
    }))
    .into_response())
}
