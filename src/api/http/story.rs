// src/api/http/story.rs

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};
use std::sync::Arc;
use tracing::info;

use crate::api::error::ApiResult;
use crate::api::types::{
    DEFAULT_MOOD_BEFORE, DEFAULT_USER_NAME, GenerateStoryRequest, GenerateStoryResponse, check_mood,
};
use crate::state::AppState;
use crate::store::SessionRecord;

/// Analyse the input, write a story, pick a soundscape and record the session.
pub async fn generate_story(
    State(app_state): State<Arc<AppState>>,
    payload: Result<Json<GenerateStoryRequest>, JsonRejection>,
) -> ApiResult<Json<GenerateStoryResponse>> {
    let Json(request) = payload?;

    let user_input = request.user_input.unwrap_or_default();
    let user_name = request
        .user_name
        .filter(|name| !name.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_USER_NAME.to_string());
    let mood_before = check_mood("mood_before", request.mood_before.unwrap_or(DEFAULT_MOOD_BEFORE))?;

    let analysis = app_state.generator.classify(&user_input).await;
    let story = app_state.generator.compose_story(&analysis, &user_name).await;
    let soundscape = app_state.selector.recommend(&story.text, &analysis.story_tone);

    let record = SessionRecord::new(
        user_name,
        analysis.clone(),
        story.text.clone(),
        soundscape.clone(),
        mood_before,
    );
    app_state.store.insert(&record).await?;

    info!(
        "Session {} created: emotion={}, story={:?}, soundscape={}",
        record.id,
        analysis.primary_emotion.as_str(),
        story.source,
        soundscape.kind
    );

    Ok(Json(GenerateStoryResponse {
        success: true,
        session_id: record.id,
        story: story.text,
        story_source: story.source,
        emotional_analysis: analysis,
        ambient_sound: soundscape,
    }))
}
