//! Gemini provider
//!
//! Uses the non-streaming generateContent API with a single user turn.

use async_trait::async_trait;
use reqwest::Client as HttpClient;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

use super::{CompletionClient, GenerationSettings, LlmError, SafetySetting};

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_MODEL: &str = "gemini-pro";
const DEFAULT_TIMEOUT_SECS: u64 = 120;
const API_KEY_HEADER: &str = "x-goog-api-key";

pub struct GeminiClient {
    client: HttpClient,
    api_key: String,
    base_url: String,
    model: String,
    timeout: Duration,
}

impl GeminiClient {
    pub fn new(api_key: String) -> Self {
        Self {
            client: HttpClient::new(),
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn endpoint(&self) -> String {
        format!("{}/v1beta/models/{}:generateContent", self.base_url, self.model)
    }

    fn build_request<'a>(prompt: &'a str, settings: &'a GenerationSettings) -> GeminiRequest<'a> {
        GeminiRequest {
            contents: vec![GeminiContent {
                role: "user",
                parts: vec![GeminiTextPart { text: prompt }],
            }],
            generation_config: GeminiGenerationConfig {
                max_output_tokens: settings.max_output_tokens,
                temperature: settings.temperature,
                top_p: settings.top_p,
            },
            safety_settings: &settings.safety_settings,
        }
    }

    /// Concatenated candidate text, or why there is none.
    fn extract_text(response: GeminiResponse) -> Result<String, LlmError> {
        if let Some(error) = response.error {
            return Err(LlmError::Unavailable(error.message));
        }
        if let Some(reason) = response.prompt_feedback.and_then(|f| f.block_reason) {
            return Err(LlmError::Blocked(reason));
        }

        let candidate = response
            .candidates
            .and_then(|c| c.into_iter().next())
            .ok_or(LlmError::Empty)?;

        let text: String = candidate
            .content
            .map(|content| {
                content
                    .parts
                    .into_iter()
                    .filter_map(|part| part.text)
                    .collect()
            })
            .unwrap_or_default();

        if text.trim().is_empty() {
            return match candidate.finish_reason.as_deref() {
                Some("SAFETY") => Err(LlmError::Blocked("SAFETY".to_string())),
                _ => Err(LlmError::Empty),
            };
        }
        Ok(text)
    }
}

#[async_trait]
impl CompletionClient for GeminiClient {
    async fn complete(&self, prompt: &str, settings: &GenerationSettings) -> Result<String, LlmError> {
        let request = Self::build_request(prompt, settings);

        debug!("Gemini request: model={}, prompt_chars={}", self.model, prompt.len());

        // Transport errors carry the URL; keep it out of logged messages.
        let response = self
            .client
            .post(self.endpoint())
            .header(API_KEY_HEADER, &self.api_key)
            .json(&request)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| LlmError::Transport(e.without_url()))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(LlmError::Api { status, body });
        }

        let api_response: GeminiResponse = response
            .json()
            .await
            .map_err(|e| LlmError::Transport(e.without_url()))?;
        Self::extract_text(api_response)
    }

    fn name(&self) -> &'static str {
        "Gemini"
    }
}

// ============================================================================
// API Types
// ============================================================================

#[derive(Serialize)]
struct GeminiRequest<'a> {
    contents: Vec<GeminiContent<'a>>,
    #[serde(rename = "generationConfig")]
    generation_config: GeminiGenerationConfig,
    #[serde(rename = "safetySettings")]
    safety_settings: &'a [SafetySetting],
}

#[derive(Serialize)]
struct GeminiContent<'a> {
    role: &'a str,
    parts: Vec<GeminiTextPart<'a>>,
}

#[derive(Serialize)]
struct GeminiTextPart<'a> {
    text: &'a str,
}

#[derive(Serialize)]
struct GeminiGenerationConfig {
    #[serde(rename = "maxOutputTokens")]
    max_output_tokens: u32,
    temperature: f32,
    #[serde(rename = "topP")]
    top_p: f32,
}

#[derive(Deserialize)]
struct GeminiResponse {
    candidates: Option<Vec<GeminiCandidate>>,
    #[serde(rename = "promptFeedback")]
    prompt_feedback: Option<GeminiPromptFeedback>,
    error: Option<GeminiError>,
}

#[derive(Deserialize)]
struct GeminiCandidate {
    content: Option<GeminiContentResponse>,
    #[serde(rename = "finishReason")]
    finish_reason: Option<String>,
}

#[derive(Deserialize)]
struct GeminiContentResponse {
    #[serde(default)]
    parts: Vec<GeminiPartResponse>,
}

#[derive(Deserialize)]
struct GeminiPartResponse {
    text: Option<String>,
}

#[derive(Deserialize)]
struct GeminiPromptFeedback {
    #[serde(rename = "blockReason")]
    block_reason: Option<String>,
}

#[derive(Deserialize)]
struct GeminiError {
    message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> Result<String, LlmError> {
        let response: GeminiResponse = serde_json::from_str(json).unwrap();
        GeminiClient::extract_text(response)
    }

    #[test]
    fn test_request_shape() {
        let settings = GenerationSettings::default();
        let request = GeminiClient::build_request("Hello", &settings);
        let value = serde_json::to_value(&request).unwrap();

        assert_eq!(value["contents"][0]["role"], "user");
        assert_eq!(value["contents"][0]["parts"][0]["text"], "Hello");
        assert_eq!(value["generationConfig"]["maxOutputTokens"], 1000);
        assert!(value["generationConfig"]["topP"].is_number());
        assert_eq!(value["safetySettings"].as_array().unwrap().len(), 4);
        assert_eq!(value["safetySettings"][0]["category"], "HARM_CATEGORY_HARASSMENT");
    }

    #[test]
    fn test_endpoint() {
        let client = GeminiClient::new("k".into())
            .with_base_url("http://localhost:9999/")
            .with_model("gemini-1.5-flash");
        assert_eq!(
            client.endpoint(),
            "http://localhost:9999/v1beta/models/gemini-1.5-flash:generateContent"
        );
    }

    #[tokio::test]
    async fn test_transport_error_hides_api_key() {
        // Nothing listens on the discard port.
        let client = GeminiClient::new("SECRET-API-KEY-123".into())
            .with_base_url("http://127.0.0.1:9")
            .with_timeout(Duration::from_secs(5));

        let err = client
            .complete("Hello", &GenerationSettings::default())
            .await
            .unwrap_err();
        assert!(matches!(err, LlmError::Transport(_)));
        assert!(!err.to_string().contains("SECRET-API-KEY-123"));
        assert!(!format!("{err:?}").contains("SECRET-API-KEY-123"));
    }

    #[test]
    fn test_extract_joins_parts() {
        let text = parse(
            r#"{"candidates":[{"content":{"parts":[{"text":"Once "},{"text":"upon"}]},"finishReason":"STOP"}]}"#,
        )
        .unwrap();
        assert_eq!(text, "Once upon");
    }

    #[test]
    fn test_extract_blocked_prompt() {
        let err = parse(r#"{"promptFeedback":{"blockReason":"SAFETY"}}"#).unwrap_err();
        assert!(matches!(err, LlmError::Blocked(reason) if reason == "SAFETY"));
    }

    #[test]
    fn test_extract_safety_finish_without_text() {
        let err = parse(r#"{"candidates":[{"finishReason":"SAFETY"}]}"#).unwrap_err();
        assert!(matches!(err, LlmError::Blocked(_)));
    }

    #[test]
    fn test_extract_empty() {
        assert!(matches!(parse(r#"{"candidates":[]}"#).unwrap_err(), LlmError::Empty));
        assert!(matches!(parse(r#"{}"#).unwrap_err(), LlmError::Empty));
    }

    #[test]
    fn test_extract_error_body() {
        let err = parse(r#"{"error":{"message":"API key not valid"}}"#).unwrap_err();
        assert!(err.to_string().contains("API key not valid"));
    }
}
