use axum_test::TestServer;
use rusqlite::Connection;

use crate::{AppState, PaginationConfig, routing::build_router};

/// An app state backed by an empty in-memory database, in UTC.
pub(crate) fn get_test_state() -> AppState {
    let conn = Connection::open_in_memory().expect("Could not open database in memory.");

    AppState::new(conn, "Etc/UTC", PaginationConfig::default())
        .expect("Could not create app state.")
}

/// A test server running the full router over `state`.
pub(crate) fn get_test_server(state: AppState) -> TestServer {
    TestServer::new(build_router(state))
}
