//! Liveness and database connectivity handlers.
//!
//! Both always answer 200 with a plain-text body; the body alone tells the
//! connectivity outcomes apart.

use axum::extract::State;
use tracing::trace;

use crate::probe;
use crate::state::AppState;

/// Liveness check, independent of the database.
pub(super) async fn health() -> &'static str {
    trace!("health check requested");
    "OK"
}

/// Opens and closes one database connection, reporting the outcome as text.
pub(super) async fn dbtest(State(state): State<AppState>) -> String {
    probe::check(state.driver.as_ref(), &state.datasource)
        .await
        .to_string()
}
