//! Middleware that identifies the user who owns the data a request touches.
//!
//! Authentication happens in the proxy in front of this service. The proxy
//! forwards the authenticated user's ID in the [OWNER_HEADER] header.

use axum::{
    extract::Request,
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::{Error, user::UserID};

/// The header carrying the ID of the authenticated user.
pub const OWNER_HEADER: &str = "x-user-id";

/// Middleware function that checks for a valid owner ID header.
///
/// The user ID is placed into the request extensions and the request executed
/// normally if the header is valid, otherwise [Error::MissingOwner] is
/// returned.
///
/// **Note**: Route handlers can use the function argument
/// `Extension(owner): Extension<UserID>` to receive the user ID.
pub async fn owner_guard(request: Request, next: Next) -> Response {
    let (mut parts, body) = request.into_parts();

    let owner = parts
        .headers
        .get(OWNER_HEADER)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.parse::<UserID>().ok());

    let Some(owner) = owner else {
        tracing::warn!(
            "Rejected request to {} without a valid {OWNER_HEADER} header",
            parts.uri
        );
        return Error::MissingOwner.into_response();
    };

    parts.extensions.insert(owner);
    let request = Request::from_parts(parts, body);

    next.run(request).await
}

#[cfg(test)]
mod owner_guard_tests {
    use axum::{
        Extension, Router,
        http::StatusCode,
        middleware,
        routing::get,
    };
    use axum_test::TestServer;
    use serde_json::Value;

    use crate::{
        owner::{OWNER_HEADER, owner_guard},
        user::UserID,
    };

    const TEST_ROUTE: &str = "/protected";

    async fn echo_owner(Extension(owner): Extension<UserID>) -> String {
        owner.to_string()
    }

    fn get_test_server() -> TestServer {
        let app = Router::new()
            .route(TEST_ROUTE, get(echo_owner))
            .layer(middleware::from_fn(owner_guard));

        TestServer::new(app)
    }

    #[tokio::test]
    async fn passes_owner_to_handler() {
        let server = get_test_server();

        let response = server
            .get(TEST_ROUTE)
            .add_header(OWNER_HEADER, "42")
            .await;

        response.assert_status_ok();
        response.assert_text("42");
    }

    #[tokio::test]
    async fn rejects_missing_header() {
        let server = get_test_server();

        let response = server.get(TEST_ROUTE).await;

        response.assert_status(StatusCode::UNAUTHORIZED);
        let body: Value = response.json();
        assert_eq!(body["success"], Value::Bool(false));
    }

    #[tokio::test]
    async fn rejects_invalid_header() {
        let server = get_test_server();

        let response = server
            .get(TEST_ROUTE)
            .add_header(OWNER_HEADER, "not-a-number")
            .await;

        response.assert_status(StatusCode::UNAUTHORIZED);
    }
}
