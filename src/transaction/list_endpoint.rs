//! Defines the endpoint for listing transactions a page at a time.

use axum::{
    Extension, Json,
    extract::{Query, State, rejection::QueryRejection},
    response::{IntoResponse, Response},
};
use serde::Serialize;

use crate::{
    Error,
    timezone::get_timezone,
    transaction::{
        form::ListTransactionsParams,
        query::{TransactionPage, query_transactions},
        state::TransactionState,
    },
    user::UserID,
};

#[derive(Serialize)]
struct ListTransactionsResponse {
    success: bool,
    #[serde(flatten)]
    page: TransactionPage,
}

/// A route handler for listing the owner's transactions, newest first.
///
/// Dates in the query string are interpreted as whole days in the server's
/// local timezone.
pub async fn list_transactions_endpoint(
    State(state): State<TransactionState>,
    Extension(owner): Extension<UserID>,
    params: Result<Query<ListTransactionsParams>, QueryRejection>,
) -> Result<Response, Error> {
    let Query(params) = params?;

    let timezone = get_timezone(&state.local_timezone)?;
    let (page, page_size) = state.pagination_config.resolve(params.page, params.limit);
    let query = params.into_query(timezone, page, page_size);

    let connection = state.lock()?;
    let page = query_transactions(owner, &query, &connection)?;

    Ok(Json(ListTransactionsResponse {
        success: true,
        page,
    })
    .into_response())
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use rust_decimal::Decimal;
    use serde_json::Value;
    use time::macros::datetime;

    use crate::{
        endpoints,
        owner::OWNER_HEADER,
        test_utils::{get_test_server, get_test_state},
        transaction::{Category, test_utils::insert_transaction},
        user::UserID,
    };

    #[tokio::test]
    async fn lists_pages_newest_first() {
        let state = get_test_state();
        {
            let connection = state.db_connection.lock().unwrap();
            for day in 1..=15 {
                insert_transaction(
                    UserID::new(1),
                    Decimal::from(day),
                    Category::Food,
                    datetime!(2024-04-01 12:00:00 UTC).replace_day(day).unwrap(),
                    &connection,
                );
            }
        }
        let server = get_test_server(state);

        let response = server
            .get(endpoints::TRANSACTIONS_API)
            .add_query_param("page", 2)
            .add_query_param("limit", 10)
            .add_header(OWNER_HEADER, "1")
            .await;

        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["success"], Value::Bool(true));
        assert_eq!(body["count"], 5);
        assert_eq!(body["total"], 15);
        assert_eq!(body["pages"], 2);
        assert_eq!(body["page"], 2);
        assert_eq!(body["transactions"][0]["date"], "2024-04-05T12:00:00Z");
    }

    #[tokio::test]
    async fn filters_by_type_and_dates() {
        let state = get_test_state();
        {
            let connection = state.db_connection.lock().unwrap();
            insert_transaction(
                UserID::new(1),
                Decimal::from(1000),
                Category::Salary,
                datetime!(2024-04-05 09:00:00 UTC),
                &connection,
            );
            insert_transaction(
                UserID::new(1),
                Decimal::from(40),
                Category::Food,
                datetime!(2024-04-30 23:00:00 UTC),
                &connection,
            );
            insert_transaction(
                UserID::new(1),
                Decimal::from(30),
                Category::Food,
                datetime!(2024-05-01 00:00:00 UTC),
                &connection,
            );
        }
        let server = get_test_server(state);

        let response = server
            .get(endpoints::TRANSACTIONS_API)
            .add_query_param("type", "expense")
            .add_query_param("startDate", "2024-04-01")
            .add_query_param("endDate", "2024-04-30")
            .add_header(OWNER_HEADER, "1")
            .await;

        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["total"], 1);
        assert_eq!(body["transactions"][0]["amount"].as_f64(), Some(40.0));
    }

    #[tokio::test]
    async fn rejects_unknown_category() {
        let server = get_test_server(get_test_state());

        let response = server
            .get(endpoints::TRANSACTIONS_API)
            .add_query_param("category", "groceries")
            .add_header(OWNER_HEADER, "1")
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
    }
}
