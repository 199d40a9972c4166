// src/api/http/pages.rs

use axum::{
    extract::State,
    http::{StatusCode, header},
    response::{Html, IntoResponse, Response},
};
use std::sync::Arc;
use tracing::error;

use crate::progress::{PROGRESS_LIMIT, ProgressView};
use crate::state::AppState;
use crate::templates::APP_JS;

pub async fn index_handler(State(app_state): State<Arc<AppState>>) -> Response {
    match app_state
        .templates
        .render_index(&app_state.catalog.app_info, app_state.generator.is_available())
    {
        Ok(html) => Html(html).into_response(),
        Err(e) => {
            error!("Failed to render index page: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, Html(format!("Error loading page: {e}"))).into_response()
        }
    }
}

/// Last completed sessions, newest first.
pub async fn progress_handler(State(app_state): State<Arc<AppState>>) -> Response {
    let rendered = async {
        let entries = app_state.store.select_recent(PROGRESS_LIMIT).await?;
        let view = ProgressView::build(&entries, &app_state.catalog);
        let html = app_state
            .templates
            .render_progress(&app_state.catalog.app_info, &view)?;
        Ok::<_, anyhow::Error>(html)
    }
    .await;

    match rendered {
        Ok(html) => Html(html).into_response(),
        Err(e) => {
            error!("Failed to load progress: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, Html(format!("Error loading progress: {e}"))).into_response()
        }
    }
}

pub async fn app_js_handler() -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "application/javascript; charset=utf-8")], APP_JS)
}
