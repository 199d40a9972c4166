// src/api/http/mood.rs

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};
use std::sync::Arc;
use tracing::{debug, info};

use crate::api::error::{ApiError, ApiResult};
use crate::api::types::{SuccessResponse, UpdateMoodRequest, check_mood};
use crate::state::AppState;

/// Record how the user feels after the story. Unknown ids are accepted and
/// change nothing.
pub async fn update_mood(
    State(app_state): State<Arc<AppState>>,
    payload: Result<Json<UpdateMoodRequest>, JsonRejection>,
) -> ApiResult<Json<SuccessResponse>> {
    let Json(request) = payload?;

    let session_id = request
        .session_id
        .ok_or_else(|| ApiError::bad_request("Missing required field: session_id"))?;
    let mood_after = request
        .mood_after
        .ok_or_else(|| ApiError::bad_request("Missing required field: mood_after"))?;
    let mood_after = check_mood("mood_after", mood_after)?;

    let updated = app_state.store.update_mood_after(&session_id, mood_after).await?;
    if updated == 0 {
        debug!("mood_after for unknown session {}", session_id);
    } else {
        info!("Session {} completed with mood_after={}", session_id, mood_after);
    }

    Ok(Json(SuccessResponse::ok()))
}
