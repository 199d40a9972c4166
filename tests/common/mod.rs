// tests/common/mod.rs
#![allow(dead_code)]

use axum::Router;
use axum::body::Body;
use axum::http::{Request, Response};
use serde_json::Value;
use sqlx::SqlitePool;
use std::sync::Arc;

use echo_muse::AppState;
use echo_muse::api::build_router;
use echo_muse::llm::{CompletionClient, GenerationSettings};
use echo_muse::random::RandomSource;
use echo_muse::store::{SessionStore, create_pool};

pub const ANXIOUS_ANALYSIS: &str = r#"{"primary_emotion": "anxiety", "intensity": 8, "key_themes": ["overwhelm", "uncertainty", "pressure"], "therapeutic_focus": "grounding", "story_tone": "calming"}"#;

/// App over an in-memory database with the given collaborator and randomness.
pub async fn create_test_app(
    client: Arc<dyn CompletionClient>,
    rng: Arc<dyn RandomSource>,
) -> (Router, Arc<AppState>) {
    let (app, state, _pool) = create_test_app_with_pool(client, rng).await;
    (app, state)
}

/// Same as `create_test_app`, also handing back the pool for direct SQL.
pub async fn create_test_app_with_pool(
    client: Arc<dyn CompletionClient>,
    rng: Arc<dyn RandomSource>,
) -> (Router, Arc<AppState>, SqlitePool) {
    let pool = create_pool("sqlite::memory:", 1).await.expect("create in-memory sqlite");
    SessionStore::new(pool.clone()).init().await.expect("create sessions table");

    let state = Arc::new(
        AppState::new(pool.clone(), client, rng, GenerationSettings::default()).expect("load templates"),
    );
    (build_router(state.clone()), state, pool)
}

pub fn post_json(uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_vec(body).unwrap()))
        .unwrap()
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder().method("GET").uri(uri).body(Body::empty()).unwrap()
}

pub async fn body_json(response: Response<Body>) -> Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&body).unwrap()
}

pub async fn body_text(response: Response<Body>) -> String {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(body.to_vec()).unwrap()
}
