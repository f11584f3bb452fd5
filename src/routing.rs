//! Application router configuration with protected and unprotected route definitions.

use axum::{
    Json, Router, middleware,
    response::{IntoResponse, Response},
    routing::get,
};
use serde_json::json;

use crate::{
    AppState,
    dashboard::{get_summary_endpoint, get_trends_endpoint},
    endpoints,
    not_found::get_404_not_found,
    owner::owner_guard,
    transaction::{
        create_transaction_endpoint, delete_transaction_endpoint, edit_transaction_endpoint,
        get_transaction_endpoint, list_transactions_endpoint,
    },
};

/// Return a router with all the app's routes.
///
/// Every route except the health check requires the owner header, see
/// [crate::OWNER_HEADER].
pub fn build_router(state: AppState) -> Router {
    let unprotected_routes = Router::new().route(endpoints::HEALTH, get(get_health));

    let protected_routes = Router::new()
        .route(endpoints::DASHBOARD_SUMMARY, get(get_summary_endpoint))
        .route(endpoints::DASHBOARD_TRENDS, get(get_trends_endpoint))
        .route(
            endpoints::TRANSACTIONS_API,
            get(list_transactions_endpoint).post(create_transaction_endpoint),
        )
        .route(
            endpoints::TRANSACTION,
            get(get_transaction_endpoint)
                .put(edit_transaction_endpoint)
                .delete(delete_transaction_endpoint),
        )
        .layer(middleware::from_fn(owner_guard));

    protected_routes
        .merge(unprotected_routes)
        .fallback(get_404_not_found)
        .with_state(state)
}

/// Report that the server is running.
async fn get_health() -> Response {
    Json(json!({
        "success": true,
        "message": "Expense tracker API is running",
    }))
    .into_response()
}
