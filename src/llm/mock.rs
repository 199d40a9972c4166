//! Offline completion clients: deterministic responses without an API key.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;

use super::{CompletionClient, GenerationSettings, LlmError};

/// Always fails. The server runs with this when no credential is configured,
/// so every story is served from fallback content.
#[derive(Debug, Clone)]
pub struct UnavailableCompletion {
    reason: String,
}

impl UnavailableCompletion {
    pub fn new(reason: impl Into<String>) -> Self {
        Self { reason: reason.into() }
    }
}

#[async_trait]
impl CompletionClient for UnavailableCompletion {
    async fn complete(&self, _prompt: &str, _settings: &GenerationSettings) -> Result<String, LlmError> {
        Err(LlmError::Unavailable(self.reason.clone()))
    }

    fn name(&self) -> &'static str {
        "unavailable"
    }

    fn is_available(&self) -> bool {
        false
    }
}

/// Replays queued responses in order and records every prompt it receives.
/// Once the queue is empty each call fails.
#[derive(Debug, Default)]
pub struct ScriptedCompletion {
    responses: Mutex<VecDeque<Result<String, String>>>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedCompletion {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reply(self, text: impl Into<String>) -> Self {
        self.lock_responses().push_back(Ok(text.into()));
        self
    }

    pub fn fail(self, message: impl Into<String>) -> Self {
        self.lock_responses().push_back(Err(message.into()));
        self
    }

    /// Prompts received so far, oldest first.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    fn lock_responses(&self) -> std::sync::MutexGuard<'_, VecDeque<Result<String, String>>> {
        self.responses
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl CompletionClient for ScriptedCompletion {
    async fn complete(&self, prompt: &str, _settings: &GenerationSettings) -> Result<String, LlmError> {
        self.prompts
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(prompt.to_string());

        match self.lock_responses().pop_front() {
            Some(Ok(text)) => Ok(text),
            Some(Err(message)) => Err(LlmError::Unavailable(message)),
            None => Err(LlmError::Unavailable("script exhausted".to_string())),
        }
    }

    fn name(&self) -> &'static str {
        "scripted"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_unavailable_always_fails() {
        let client = UnavailableCompletion::new("no key");
        let err = client
            .complete("anything", &GenerationSettings::default())
            .await
            .unwrap_err();
        assert!(err.to_string().contains("no key"));
        assert!(!client.is_available());
    }

    #[tokio::test]
    async fn test_scripted_replays_in_order() {
        let client = ScriptedCompletion::new().reply("first").fail("boom").reply("third");
        let settings = GenerationSettings::default();

        assert_eq!(client.complete("a", &settings).await.unwrap(), "first");
        assert!(client.complete("b", &settings).await.is_err());
        assert_eq!(client.complete("c", &settings).await.unwrap(), "third");
        assert!(client.complete("d", &settings).await.is_err());
        assert_eq!(client.prompts(), vec!["a", "b", "c", "d"]);
    }
}
