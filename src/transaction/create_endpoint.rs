//! Defines the endpoint for creating a new transaction.

use axum::{
    Extension, Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::{
    Error,
    transaction::{core::create_transaction, form::TransactionForm, state::TransactionState},
    user::UserID,
};

/// A route handler for creating a new transaction.
///
/// Responds with `201 Created` and the stored transaction. If the request
/// does not include a date, the transaction is dated now.
pub async fn create_transaction_endpoint(
    State(state): State<TransactionState>,
    Extension(owner): Extension<UserID>,
    payload: Result<Json<TransactionForm>, JsonRejection>,
) -> Result<Response, Error> {
    let Json(form) = payload?;
    let connection = state.lock()?;

    let transaction = create_transaction(owner, form.into(), &connection)
        .inspect_err(|error| tracing::debug!("could not create transaction: {error}"))?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "message": "Transaction created successfully",
            "transaction": transaction,
        })),
    )
        .into_response())
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use serde_json::{Value, json};

    use crate::{
        endpoints,
        owner::OWNER_HEADER,
        test_utils::{get_test_server, get_test_state},
        transaction::get_transaction,
        user::UserID,
    };

    #[tokio::test]
    async fn can_create_transaction() {
        let state = get_test_state();
        let server = get_test_server(state.clone());

        let response = server
            .post(endpoints::TRANSACTIONS_API)
            .add_header(OWNER_HEADER, "1")
            .json(&json!({
                "type": "expense",
                "amount": 12.3,
                "description": "  test transaction ",
                "category": "food",
                "date": "2024-04-10T08:00:00Z",
                "tags": ["lunch"],
            }))
            .await;

        response.assert_status(StatusCode::CREATED);
        let body: Value = response.json();
        assert_eq!(body["success"], Value::Bool(true));
        assert_eq!(body["transaction"]["description"], "test transaction");
        assert_eq!(body["transaction"]["type"], "expense");
        assert_eq!(body["transaction"]["user"], 1);
        assert_eq!(body["transaction"]["amount"].as_f64(), Some(12.3));
        assert_eq!(body["transaction"]["date"], "2024-04-10T08:00:00Z");

        let id = body["transaction"]["id"].as_i64().unwrap();
        let connection = state.db_connection.lock().unwrap();
        let stored = get_transaction(UserID::new(1), id, &connection).unwrap();
        assert_eq!(stored.tags, vec!["lunch".to_owned()]);
    }

    #[tokio::test]
    async fn rejects_category_of_other_kind() {
        let server = get_test_server(get_test_state());

        let response = server
            .post(endpoints::TRANSACTIONS_API)
            .add_header(OWNER_HEADER, "1")
            .json(&json!({
                "type": "expense",
                "amount": 1000,
                "description": "Pay",
                "category": "salary",
            }))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let body: Value = response.json();
        assert_eq!(body["success"], Value::Bool(false));
    }

    #[tokio::test]
    async fn rejects_negative_amount() {
        let server = get_test_server(get_test_state());

        let response = server
            .post(endpoints::TRANSACTIONS_API)
            .add_header(OWNER_HEADER, "1")
            .json(&json!({
                "type": "expense",
                "amount": -5,
                "description": "Refund",
                "category": "food",
            }))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn rejects_malformed_body() {
        let server = get_test_server(get_test_state());

        let response = server
            .post(endpoints::TRANSACTIONS_API)
            .add_header(OWNER_HEADER, "1")
            .json(&json!({ "type": "expense" }))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let body: Value = response.json();
        assert_eq!(body["success"], Value::Bool(false));
    }

    #[tokio::test]
    async fn requires_owner() {
        let server = get_test_server(get_test_state());

        let response = server
            .post(endpoints::TRANSACTIONS_API)
            .json(&json!({
                "type": "expense",
                "amount": 5,
                "description": "Coffee",
                "category": "food",
            }))
            .await;

        response.assert_status(StatusCode::UNAUTHORIZED);
    }
}
