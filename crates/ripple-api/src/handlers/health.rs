//! Health check handlers.

use axum::{Json, http::StatusCode};
use serde::Serialize;

#[derive(Serialize)]
pub struct HealthResponse {
    pub service: &'static str,
    pub status: &'static str,
    pub version: &'static str,
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        service: "ripple",
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
    })
}

pub async fn ready() -> StatusCode {
    StatusCode::OK
}
