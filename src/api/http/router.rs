// src/api/http/router.rs
// HTTP router composition

use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use super::{
    handlers::health_handler,
    mood::update_mood,
    pages::{app_js_handler, index_handler, progress_handler},
    story::generate_story,
};
use crate::state::AppState;

/// All routes, state still to be provided.
pub fn http_router() -> Router<Arc<AppState>> {
    Router::new()
        // Pages
        .route("/", get(index_handler))
        .route("/progress", get(progress_handler))
        .route("/static/app.js", get(app_js_handler))

        // Story flow (JSON)
        .route("/generate_story", post(generate_story))
        .route("/update_mood", post(update_mood))

        // Health
        .route("/health", get(health_handler))
}

/// Complete application with state and request tracing.
pub fn build_router(app_state: Arc<AppState>) -> Router {
    http_router()
        .with_state(app_state)
        .layer(TraceLayer::new_for_http())
}
