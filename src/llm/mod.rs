// src/llm/mod.rs
//! Text-completion collaborator used for emotion analysis and story writing.

pub mod gemini;
pub mod mock;

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

pub use gemini::GeminiClient;
pub use mock::{ScriptedCompletion, UnavailableCompletion};

/// Any failure talking to the completion API. Callers treat every variant
/// the same way.
#[derive(Debug, Error)]
pub enum LlmError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("API error: {status} - {body}")]
    Api { status: u16, body: String },

    #[error("response blocked: {0}")]
    Blocked(String),

    #[error("response contained no text")]
    Empty,

    #[error("completion unavailable: {0}")]
    Unavailable(String),
}

/// Per-category content filter sent with every request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SafetySetting {
    pub category: String,
    pub threshold: String,
}

/// Sampling and safety configuration for one completion.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationSettings {
    pub max_output_tokens: u32,
    pub temperature: f32,
    pub top_p: f32,
    pub safety_settings: Vec<SafetySetting>,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        let block = |category: &str| SafetySetting {
            category: category.to_string(),
            threshold: "BLOCK_MEDIUM_AND_ABOVE".to_string(),
        };
        Self {
            max_output_tokens: 1000,
            temperature: 0.7,
            top_p: 0.9,
            safety_settings: vec![
                block("HARM_CATEGORY_HARASSMENT"),
                block("HARM_CATEGORY_HATE_SPEECH"),
                block("HARM_CATEGORY_SEXUALLY_EXPLICIT"),
                block("HARM_CATEGORY_DANGEROUS_CONTENT"),
            ],
        }
    }
}

/// Prompt in, generated text out.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    async fn complete(&self, prompt: &str, settings: &GenerationSettings) -> Result<String, LlmError>;

    /// Name for logging
    fn name(&self) -> &'static str;

    /// False when every call is known to fail (e.g. no credential).
    fn is_available(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_generation_settings() {
        let settings = GenerationSettings::default();
        assert_eq!(settings.max_output_tokens, 1000);
        assert!((settings.temperature - 0.7).abs() < f32::EPSILON);
        assert!((settings.top_p - 0.9).abs() < f32::EPSILON);
        assert_eq!(settings.safety_settings.len(), 4);
        assert!(
            settings
                .safety_settings
                .iter()
                .all(|s| s.threshold == "BLOCK_MEDIUM_AND_ABOVE")
        );
    }

    #[test]
    fn test_error_display() {
        let err = LlmError::Api { status: 429, body: "quota".into() };
        assert_eq!(err.to_string(), "API error: 429 - quota");
    }
}
