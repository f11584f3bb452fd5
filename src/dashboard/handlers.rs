//! Dashboard HTTP handlers.
//!
//! This module contains:
//! - Route handlers for the summary and trends endpoints
//! - State and query types used by the handlers

use std::{fmt::Display, str::FromStr};

use axum::{
    Extension, Json,
    extract::{FromRef, Query, State, rejection::QueryRejection},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Deserializer};
use time::OffsetDateTime;
use time_tz::OffsetDateTimeExt;

use crate::{
    AppState, Error,
    dashboard::{
        format::{SummaryResponse, TrendsResponse},
        period::TrendRange,
        summary::get_summary,
        trends::get_trends,
    },
    timezone::get_timezone,
    transaction::SQLiteTransactionStore,
    user::UserID,
};

/// The state needed for the dashboard endpoints.
#[derive(Debug, Clone)]
pub struct DashboardState {
    /// The store to read transactions from.
    pub store: SQLiteTransactionStore,
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
}

impl FromRef<AppState> for DashboardState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            store: SQLiteTransactionStore::new(state.db_connection.clone()),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// The query string of the summary endpoint.
///
/// Empty values are treated the same as missing ones.
#[derive(Debug, Default, Deserialize)]
pub struct SummaryParams {
    /// The month to summarise, 1 for January. Defaults to the current month.
    #[serde(default, deserialize_with = "empty_as_none")]
    pub month: Option<i32>,
    /// The year to summarise. Defaults to the current year.
    #[serde(default, deserialize_with = "empty_as_none")]
    pub year: Option<i32>,
}

fn empty_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: Display,
{
    match Option::<String>::deserialize(deserializer)?.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => value.parse().map(Some).map_err(serde::de::Error::custom),
    }
}

/// The query string of the trends endpoint.
#[derive(Debug, Default, Deserialize)]
pub struct TrendsParams {
    /// One of "3months", "6months" or "12months".
    pub range: Option<String>,
}

/// Get the owner's totals for one calendar month.
pub async fn get_summary_endpoint(
    State(state): State<DashboardState>,
    Extension(owner): Extension<UserID>,
    params: Result<Query<SummaryParams>, QueryRejection>,
) -> Result<Response, Error> {
    let Query(params) = params?;
    let timezone = get_timezone(&state.local_timezone)?;
    let now = OffsetDateTime::now_utc().to_timezone(timezone);

    let summary = get_summary(
        &state.store,
        owner,
        params.month,
        params.year,
        now,
        timezone,
    )?;

    Ok(Json(SummaryResponse::from(summary)).into_response())
}

/// Get the owner's monthly totals and top expense categories over a rolling
/// window.
pub async fn get_trends_endpoint(
    State(state): State<DashboardState>,
    Extension(owner): Extension<UserID>,
    params: Result<Query<TrendsParams>, QueryRejection>,
) -> Result<Response, Error> {
    let Query(params) = params?;
    let timezone = get_timezone(&state.local_timezone)?;
    let now = OffsetDateTime::now_utc().to_timezone(timezone);
    let range = TrendRange::from_token(params.range.as_deref());

    let trends = get_trends(&state.store, owner, range, now, timezone)?;

    Ok(Json(TrendsResponse::from(trends)).into_response())
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use rust_decimal::Decimal;
    use serde_json::{Value, json};
    use time::{OffsetDateTime, macros::datetime};

    use crate::{
        endpoints,
        owner::OWNER_HEADER,
        test_utils::{get_test_server, get_test_state},
        transaction::{Category, test_utils::insert_transaction},
        user::UserID,
    };

    #[tokio::test]
    async fn summary_endpoint_returns_month_totals() {
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
                Decimal::from(400),
                Category::Food,
                datetime!(2024-04-20 18:00:00 UTC),
                &connection,
            );
            insert_transaction(
                UserID::new(2),
                Decimal::from(99),
                Category::Food,
                datetime!(2024-04-20 18:00:00 UTC),
                &connection,
            );
        }
        let server = get_test_server(state);

        let response = server
            .get(endpoints::DASHBOARD_SUMMARY)
            .add_query_param("month", 4)
            .add_query_param("year", 2024)
            .add_header(OWNER_HEADER, "1")
            .await;

        response.assert_status_ok();
        let body: Value = response.json();
        let summary = &body["summary"];
        assert_eq!(body["success"], Value::Bool(true));
        assert_eq!(summary["totalIncome"].as_f64(), Some(1000.0));
        assert_eq!(summary["totalExpenses"].as_f64(), Some(400.0));
        assert_eq!(summary["balance"].as_f64(), Some(600.0));
        assert_eq!(summary["transactionCount"], 2);
        assert_eq!(summary["month"], 4);
        assert_eq!(summary["year"], 2024);
        assert_eq!(summary["expensesByCategory"], json!({ "food": 400.0 }));
        assert_eq!(summary["incomeByCategory"], json!({ "salary": 1000.0 }));
        assert_eq!(summary["recentTransactions"].as_array().map(Vec::len), Some(2));
    }

    #[tokio::test]
    async fn summary_endpoint_defaults_to_current_month() {
        let server = get_test_server(get_test_state());

        let response = server
            .get(endpoints::DASHBOARD_SUMMARY)
            .add_header(OWNER_HEADER, "1")
            .await;

        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["summary"]["transactionCount"], 0);
        assert_eq!(body["summary"]["expensesByCategory"], json!({}));
    }

    #[tokio::test]
    async fn summary_endpoint_treats_empty_values_as_missing() {
        let server = get_test_server(get_test_state());

        let response = server
            .get(&format!("{}?month=&year=", endpoints::DASHBOARD_SUMMARY))
            .add_header(OWNER_HEADER, "1")
            .await;

        response.assert_status_ok();
        let body: Value = response.json();
        let now = OffsetDateTime::now_utc();
        assert_eq!(body["summary"]["month"], u8::from(now.month()));
        assert_eq!(body["summary"]["year"], now.year());
    }

    #[tokio::test]
    async fn summary_endpoint_rejects_non_numeric_month() {
        let server = get_test_server(get_test_state());

        let response = server
            .get(endpoints::DASHBOARD_SUMMARY)
            .add_query_param("month", "april")
            .add_header(OWNER_HEADER, "1")
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn summary_endpoint_rejects_unrepresentable_year() {
        let server = get_test_server(get_test_state());

        let response = server
            .get(endpoints::DASHBOARD_SUMMARY)
            .add_query_param("month", 1)
            .add_query_param("year", 2_000_000)
            .add_header(OWNER_HEADER, "1")
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn trends_endpoint_defaults_unknown_range() {
        let server = get_test_server(get_test_state());

        let response = server
            .get(endpoints::DASHBOARD_TRENDS)
            .add_query_param("range", "forever")
            .add_header(OWNER_HEADER, "1")
            .await;

        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["dateRange"]["range"], "6months");
        assert_eq!(body["trends"], json!([]));
        assert_eq!(body["categories"], json!([]));
    }

    #[tokio::test]
    async fn dashboard_requires_owner() {
        let server = get_test_server(get_test_state());

        let response = server.get(endpoints::DASHBOARD_TRENDS).await;

        response.assert_status(StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn invalid_timezone_is_server_error() {
        let mut state = get_test_state();
        state.local_timezone = "Middle/Earth".to_owned();
        let server = get_test_server(state);

        let response = server
            .get(endpoints::DASHBOARD_SUMMARY)
            .add_header(OWNER_HEADER, "1")
            .await;

        response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
        let body: Value = response.json();
        assert_eq!(body["message"], "Server error");
    }
}
