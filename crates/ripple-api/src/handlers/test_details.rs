//! Test details handlers.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use ripple_core::ids::TestId;
use ripple_core::test_details::TestDetails;
use std::sync::Arc;

use super::error_response;
use crate::state::AppState;

pub async fn get_test_details(
    State(state): State<Arc<AppState>>,
    Path(test_id): Path<String>,
) -> Result<Json<TestDetails>, (StatusCode, String)> {
    let id: TestId = test_id
        .parse()
        .map_err(|_| (StatusCode::BAD_REQUEST, "Invalid test ID".to_string()))?;

    let details = state.test_details.get(id).await.map_err(error_response)?;

    Ok(Json(details))
}
