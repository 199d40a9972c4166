// src/story/prompts.rs
// Prompt templates for emotion analysis and story generation

use crate::catalog::Catalog;
use crate::random::{RandomSource, pick_one};

use super::Classification;

/// Randomly drawn narrative ingredients for one story.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoryBlueprint {
    pub archetype: &'static str,
    pub setting: &'static str,
    pub metaphor: &'static str,
    pub time_of_day: &'static str,
    pub weather: &'static str,
    pub companion: &'static str,
    pub discovery: &'static str,
}

impl StoryBlueprint {
    /// Each ingredient is drawn independently and uniformly.
    pub fn draw(catalog: &Catalog, rng: &dyn RandomSource) -> Self {
        let pick = |items: &[&'static str]| -> &'static str { *pick_one(rng, items) };
        Self {
            archetype: pick(&catalog.archetypes),
            setting: pick(&catalog.settings),
            metaphor: pick(&catalog.metaphors),
            time_of_day: pick(&catalog.times_of_day),
            weather: pick(&catalog.weather),
            companion: pick(&catalog.companions),
            discovery: pick(&catalog.discoveries),
        }
    }
}

pub fn classification_prompt(user_input: &str) -> String {
    format!(
        r#"As a compassionate AI therapist, analyze the following user input and provide insights:

User Input: "{user_input}"

Please provide a JSON response with:
1. primary_emotion: The main emotion detected (anxiety, depression, trauma, stress, grief, self_esteem, or neutral)
2. intensity: Scale of 1-10 for emotional intensity
3. key_themes: List of 3-5 key emotional themes or concerns
4. therapeutic_focus: Recommended therapeutic approach
5. story_tone: Suggested tone for the healing story (gentle, empowering, hopeful, calming, etc.)

Respond only with valid JSON."#
    )
}

pub fn story_prompt(
    blueprint: &StoryBlueprint,
    classification: &Classification,
    technique: &str,
    user_name: &str,
) -> String {
    format!(
        r#"Create a unique therapeutic healing story with these specifications:

Story Archetype: {archetype}
Setting: {setting}
Central Metaphor: {metaphor}
Time of Day: {time_of_day}
Weather/Atmosphere: {weather}
Companion/Guide: {companion}
Key Discovery: {discovery}

Emotional Context:
- Primary Emotion: {emotion}
- Intensity: {intensity}/10
- Key Themes: {themes}
- Therapeutic Approach: {technique}
- Story Tone: {tone}
- User Name: {user_name}

Guidelines:
- Create a 800-1200 word therapeutic story
- Weave the central metaphor throughout the narrative
- Include rich sensory details specific to the setting
- Incorporate the companion/guide naturally
- Build toward the key discovery as a moment of insight
- Use practical coping strategies within the story context
- End with hope, empowerment, and actionable wisdom
- Use second person ("you") for personal connection
- Make each story feel completely unique and fresh

The story should transport the reader to this specific world while addressing their emotional needs."#,
        archetype = blueprint.archetype,
        setting = blueprint.setting,
        metaphor = blueprint.metaphor,
        time_of_day = blueprint.time_of_day,
        weather = blueprint.weather,
        companion = blueprint.companion,
        discovery = blueprint.discovery,
        emotion = classification.primary_emotion.as_str(),
        intensity = classification.intensity,
        themes = classification.key_themes.join(", "),
        tone = classification.story_tone,
    )
}

/// Fill `{setting}`, `{metaphor}` and `{tone}` in a fallback template.
pub fn render_fallback(template: &str, setting: &str, metaphor: &str, tone: &str) -> String {
    template
        .replace("{setting}", setting)
        .replace("{metaphor}", metaphor)
        .replace("{tone}", tone)
}
