// src/api/types.rs
use serde::{Deserialize, Serialize};

use crate::api::error::{ApiError, ApiResult};
use crate::soundscape::Soundscape;
use crate::story::{Classification, ContentSource};

pub const DEFAULT_USER_NAME: &str = "friend";
pub const DEFAULT_MOOD_BEFORE: i64 = 5;
pub const MOOD_MIN: i64 = 1;
pub const MOOD_MAX: i64 = 10;

/// Moods are self-reported on the 1..=10 scale.
pub fn check_mood(field: &str, value: i64) -> ApiResult<i64> {
    if (MOOD_MIN..=MOOD_MAX).contains(&value) {
        Ok(value)
    } else {
        Err(ApiError::bad_request(format!(
            "{field} must be between {MOOD_MIN} and {MOOD_MAX}, got {value}"
        )))
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct GenerateStoryRequest {
    #[serde(default)]
    pub user_input: Option<String>,
    #[serde(default)]
    pub user_name: Option<String>,
    #[serde(default)]
    pub mood_before: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateStoryResponse {
    pub success: bool,
    pub session_id: String,
    pub story: String,
    pub story_source: ContentSource,
    pub emotional_analysis: Classification,
    pub ambient_sound: Soundscape,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct UpdateMoodRequest {
    #[serde(default)]
    pub session_id: Option<String>,
    #[serde(default)]
    pub mood_after: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuccessResponse {
    pub success: bool,
}

impl SuccessResponse {
    pub fn ok() -> Self {
        Self { success: true }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[test]
    fn test_check_mood_bounds() {
        assert_eq!(check_mood("mood_before", 1).unwrap(), 1);
        assert_eq!(check_mood("mood_before", 10).unwrap(), 10);

        let err = check_mood("mood_after", 11).unwrap_err();
        assert_eq!(err.status_code, StatusCode::BAD_REQUEST);
        assert_eq!(err.message, "mood_after must be between 1 and 10, got 11");
        assert!(check_mood("mood_before", 0).is_err());
        assert!(check_mood("mood_before", i64::MIN).is_err());
    }
}
