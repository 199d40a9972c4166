// src/api/http/handlers.rs

use axum::{Json, extract::State, response::IntoResponse};
use chrono::Utc;
use serde_json::json;
use std::sync::Arc;

use crate::api::error::ApiResult;
use crate::state::AppState;

/// Health check handler
pub async fn health_handler(State(app_state): State<Arc<AppState>>) -> ApiResult<impl IntoResponse> {
    let info = &app_state.catalog.app_info;
    let sessions = app_state.store.count().await?;

    Ok(Json(json!({
        "status": "healthy",
        "name": info.name,
        "version": info.version,
        "description": info.description,
        "llm": app_state.generator.client_name(),
        "llm_available": app_state.generator.is_available(),
        "sessions": sessions,
        "timestamp": Utc::now().to_rfc3339()
    })))
}
