//! API route definitions.

use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::handlers::{health, snapshots, test_details};
use crate::middleware::{cors_layer, request_id};
use crate::state::AppState;

/// Create the main API router.
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .nest("/api/0", api_routes())
        .route("/health", get(health::health))
        .route("/ready", get(health::ready))
        .with_state(state)
}

/// The router with request tracing, CORS and request ids applied.
pub fn build_app(state: Arc<AppState>) -> Router {
    create_router(state)
        .layer(axum::middleware::from_fn(request_id))
        .layer(cors_layer())
        .layer(TraceLayer::new_for_http())
}

fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/tests/{test_id}/", get(test_details::get_test_details))
        .route(
            "/clusters/{cluster}/cached-snapshot-images/",
            get(snapshots::list_cached_snapshot_images),
        )
        .route(
            "/snapshots/{snapshot_id}/cache/",
            post(snapshots::cache_snapshot),
        )
}
