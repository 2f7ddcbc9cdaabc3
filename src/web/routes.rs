//! Web router construction.

use axum::Router;
use axum::http::HeaderValue;
use axum::http::header::CACHE_CONTROL;
use axum::routing::get;
use tower_http::set_header::SetResponseHeaderLayer;

use crate::state::AppState;
use crate::web::middleware::request_id::RequestIdLayer;
use crate::web::status;

pub const PATH_HEALTH: &str = "/health";
pub const PATH_DBTEST: &str = "/dbtest";

/// Probe results describe the present moment and must never be served from a cache.
const NO_STORE: &str = "no-store";

/// Creates the web server router
pub fn create_router(app_state: AppState) -> Router {
    Router::new()
        .route(PATH_HEALTH, get(status::health))
        .route(PATH_DBTEST, get(status::dbtest))
        .with_state(app_state)
        .layer((
            // Outermost: per-request ID span + severity-proportional response logging.
            RequestIdLayer,
            SetResponseHeaderLayer::overriding(CACHE_CONTROL, HeaderValue::from_static(NO_STORE)),
        ))
}
