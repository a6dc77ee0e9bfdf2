//! Snapshot cache handlers.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use ripple_core::ids::SnapshotId;
use ripple_core::snapshot::CachedSnapshotImage;
use serde::Serialize;
use std::sync::Arc;
use tracing::info;

use super::error_response;
use crate::state::AppState;

#[derive(Serialize)]
pub struct CachedImagesResponse {
    pub cluster: String,
    pub images: Vec<CachedSnapshotImage>,
    pub total: usize,
}

pub async fn list_cached_snapshot_images(
    State(state): State<Arc<AppState>>,
    Path(cluster): Path<String>,
) -> Result<Json<CachedImagesResponse>, (StatusCode, String)> {
    let images = state
        .snapshot_cache
        .get_cached_snapshot_images(&cluster)
        .await
        .map_err(error_response)?;

    Ok(Json(CachedImagesResponse {
        cluster,
        total: images.len(),
        images,
    }))
}

pub async fn cache_snapshot(
    State(state): State<Arc<AppState>>,
    Path(snapshot_id): Path<String>,
) -> Result<StatusCode, (StatusCode, String)> {
    let id: SnapshotId = snapshot_id
        .parse()
        .map_err(|_| (StatusCode::BAD_REQUEST, "Invalid snapshot ID".to_string()))?;

    let snapshot = state
        .snapshots
        .get(id)
        .await
        .map_err(error_response)?
        .ok_or((StatusCode::NOT_FOUND, "Snapshot not found".to_string()))?;

    state
        .snapshot_cache
        .cache_snapshot(&snapshot)
        .await
        .map_err(error_response)?;

    info!(snapshot_id = %id, "Snapshot cached via API");
    Ok(StatusCode::NO_CONTENT)
}
