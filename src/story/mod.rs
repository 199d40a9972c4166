// src/story/mod.rs
//! Emotion analysis and therapeutic story generation.
//!
//! Both operations make one completion call. Any collaborator failure is
//! recovered locally with static content; results carry a [`ContentSource`]
//! so callers can tell generated output from fallback output.

pub mod prompts;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::catalog::Catalog;
use crate::llm::{CompletionClient, GenerationSettings};
use crate::random::{RandomSource, pick_one};

pub use prompts::StoryBlueprint;

const MAX_THEMES: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrimaryEmotion {
    Anxiety,
    Depression,
    Trauma,
    Stress,
    Grief,
    SelfEsteem,
    Neutral,
}

impl PrimaryEmotion {
    pub const ALL: [PrimaryEmotion; 7] = [
        PrimaryEmotion::Anxiety,
        PrimaryEmotion::Depression,
        PrimaryEmotion::Trauma,
        PrimaryEmotion::Stress,
        PrimaryEmotion::Grief,
        PrimaryEmotion::SelfEsteem,
        PrimaryEmotion::Neutral,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PrimaryEmotion::Anxiety => "anxiety",
            PrimaryEmotion::Depression => "depression",
            PrimaryEmotion::Trauma => "trauma",
            PrimaryEmotion::Stress => "stress",
            PrimaryEmotion::Grief => "grief",
            PrimaryEmotion::SelfEsteem => "self_esteem",
            PrimaryEmotion::Neutral => "neutral",
        }
    }

    /// Lenient label parsing; anything unrecognised is `Neutral`.
    pub fn from_label(label: &str) -> Self {
        let normalized = label.trim().to_lowercase().replace(['-', ' '], "_");
        Self::ALL
            .into_iter()
            .find(|emotion| emotion.as_str() == normalized)
            .unwrap_or(PrimaryEmotion::Neutral)
    }
}

/// Where a piece of content came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentSource {
    Model,
    Fallback,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    pub primary_emotion: PrimaryEmotion,
    /// Always within 1..=10
    pub intensity: u8,
    pub key_themes: Vec<String>,
    pub therapeutic_focus: String,
    pub story_tone: String,
    pub source: ContentSource,
}

impl Classification {
    pub fn fallback() -> Self {
        Self {
            primary_emotion: PrimaryEmotion::Neutral,
            intensity: 5,
            key_themes: vec![
                "self-reflection".to_string(),
                "growth".to_string(),
                "healing".to_string(),
            ],
            therapeutic_focus: "general wellness".to_string(),
            story_tone: "gentle".to_string(),
            source: ContentSource::Fallback,
        }
    }

    pub fn is_fallback(&self) -> bool {
        self.source == ContentSource::Fallback
    }
}

#[derive(Debug, Error)]
pub enum ClassificationError {
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid intensity: {0}")]
    Intensity(Value),
}

/// Shape the model is asked to produce.
#[derive(Deserialize)]
struct RawClassification {
    primary_emotion: String,
    intensity: Value,
    #[serde(default)]
    key_themes: Vec<String>,
    therapeutic_focus: String,
    story_tone: String,
}

/// Parse and normalise a model response into a [`Classification`].
///
/// Markdown code fences and text around the JSON object are ignored.
/// Unknown emotions become `neutral`, intensity is clamped to 1..=10 and
/// themes are capped at five (an empty list falls back to the default themes).
pub fn parse_classification(text: &str) -> Result<Classification, ClassificationError> {
    let raw: RawClassification = serde_json::from_str(json_object_slice(text))?;

    let intensity = match &raw.intensity {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
    .filter(|v| v.is_finite())
    .ok_or_else(|| ClassificationError::Intensity(raw.intensity.clone()))?;

    let mut key_themes: Vec<String> = raw
        .key_themes
        .into_iter()
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .take(MAX_THEMES)
        .collect();
    if key_themes.is_empty() {
        key_themes = Classification::fallback().key_themes;
    }

    Ok(Classification {
        primary_emotion: PrimaryEmotion::from_label(&raw.primary_emotion),
        intensity: intensity.round().clamp(1.0, 10.0) as u8,
        key_themes,
        therapeutic_focus: raw.therapeutic_focus,
        story_tone: raw.story_tone.trim().to_string(),
        source: ContentSource::Model,
    })
}

fn json_object_slice(text: &str) -> &str {
    match (text.find('{'), text.rfind('}')) {
        (Some(start), Some(end)) if start < end => &text[start..=end],
        _ => text.trim(),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Story {
    pub text: String,
    pub source: ContentSource,
}

#[derive(Clone)]
pub struct StoryGenerator {
    client: Arc<dyn CompletionClient>,
    catalog: Arc<Catalog>,
    rng: Arc<dyn RandomSource>,
    settings: GenerationSettings,
}

impl StoryGenerator {
    pub fn new(
        client: Arc<dyn CompletionClient>,
        catalog: Arc<Catalog>,
        rng: Arc<dyn RandomSource>,
        settings: GenerationSettings,
    ) -> Self {
        Self {
            client,
            catalog,
            rng,
            settings,
        }
    }

    pub fn client_name(&self) -> &'static str {
        self.client.name()
    }

    pub fn is_available(&self) -> bool {
        self.client.is_available()
    }

    /// Classify the user's emotional state. Never fails.
    pub async fn classify(&self, user_input: &str) -> Classification {
        let prompt = prompts::classification_prompt(user_input);

        let text = match self.client.complete(&prompt, &self.settings).await {
            Ok(text) => text,
            Err(e) => {
                warn!("Emotion analysis via {} failed, using fallback: {}", self.client.name(), e);
                return Classification::fallback();
            }
        };

        match parse_classification(&text) {
            Ok(classification) => {
                info!(
                    "Classified input as {} (intensity {})",
                    classification.primary_emotion.as_str(),
                    classification.intensity
                );
                classification
            }
            Err(e) => {
                warn!("Unparseable emotion analysis, using fallback: {}", e);
                debug!("Raw analysis response: {}", text);
                Classification::fallback()
            }
        }
    }

    /// Write a story for the classification. Never fails and never returns
    /// empty text.
    pub async fn compose_story(&self, classification: &Classification, user_name: &str) -> Story {
        let blueprint = StoryBlueprint::draw(&self.catalog, self.rng.as_ref());
        let technique = self.catalog.technique_for(classification.primary_emotion);
        let prompt = prompts::story_prompt(&blueprint, classification, technique, user_name);

        debug!("Story blueprint: {:?}", blueprint);

        match self.client.complete(&prompt, &self.settings).await {
            Ok(text) if !text.trim().is_empty() => {
                info!("Generated story ({} chars)", text.len());
                Story {
                    text,
                    source: ContentSource::Model,
                }
            }
            Ok(_) => {
                warn!("Story generation returned empty text, using fallback");
                self.fallback_story(&classification.story_tone, blueprint.setting, blueprint.metaphor)
            }
            Err(e) => {
                warn!("Story generation via {} failed, using fallback: {}", self.client.name(), e);
                self.fallback_story(&classification.story_tone, blueprint.setting, blueprint.metaphor)
            }
        }
    }

    /// One of the fallback templates, chosen uniformly, with substitutions.
    pub fn fallback_story(&self, tone: &str, setting: &str, metaphor: &str) -> Story {
        let template = *pick_one(self.rng.as_ref(), &self.catalog.fallback_stories);
        let tone = if tone.trim().is_empty() { "gentle" } else { tone };

        Story {
            text: prompts::render_fallback(template, setting, metaphor, tone),
            source: ContentSource::Fallback,
        }
    }
}
