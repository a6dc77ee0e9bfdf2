//! HTTP API server for Ripple CI.

pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod state;

pub use routes::{build_app, create_router};
pub use state::AppState;
