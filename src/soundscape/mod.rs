// src/soundscape/mod.rs
//! Ambient soundscape recommendation from story keywords and tone.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

use crate::catalog::Catalog;
use crate::random::{RandomSource, choose};

/// Static descriptor paired with a story.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Soundscape {
    #[serde(rename = "type")]
    pub kind: String,
    pub description: String,
    /// Reference tones in Hz.
    pub frequencies: Vec<f64>,
    pub patterns: Vec<String>,
}

#[derive(Clone)]
pub struct SoundscapeSelector {
    catalog: Arc<Catalog>,
    rng: Arc<dyn RandomSource>,
}

impl SoundscapeSelector {
    pub fn new(catalog: Arc<Catalog>, rng: Arc<dyn RandomSource>) -> Self {
        Self { catalog, rng }
    }

    /// Descriptor for a story. Always resolves.
    pub fn recommend(&self, story: &str, story_tone: &str) -> Soundscape {
        let id = self.recommend_id(story, story_tone);
        self.catalog.soundscape_or_default(id).clone()
    }

    /// Catalog id chosen for a story.
    pub fn recommend_id(&self, story: &str, story_tone: &str) -> &'static str {
        let matches = self.keyword_matches(story);
        if let Some(id) = choose(self.rng.as_ref(), &matches) {
            debug!("Soundscape {} chosen from {} keyword matches", id, matches.len());
            return id;
        }

        let tone = story_tone.trim().to_lowercase();
        let id = self
            .catalog
            .tone_fallback(&tone)
            .unwrap_or(self.catalog.default_soundscape);
        debug!("No keyword match, tone '{}' maps to {}", tone, id);
        id
    }

    /// All ids associated with keywords found in the story, duplicates kept.
    pub fn keyword_matches(&self, story: &str) -> Vec<&'static str> {
        let lowered = story.to_lowercase();
        self.catalog
            .keyword_map
            .iter()
            .filter(|(keyword, _)| lowered.contains(keyword))
            .flat_map(|(_, ids)| ids.iter().copied())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::{FixedRandom, SeededRandom, ThreadRandom};

    fn selector(rng: Arc<dyn RandomSource>) -> SoundscapeSelector {
        SoundscapeSelector::new(Arc::new(Catalog::standard()), rng)
    }

    #[test]
    fn test_calming_tone_without_keywords_is_ocean() {
        let selector = selector(Arc::new(ThreadRandom));
        let story = "I feel overwhelmed and anxious about everything";
        assert!(selector.keyword_matches(story).is_empty());
        assert_eq!(selector.recommend_id(story, "calming"), "ocean_waves");

        let soundscape = selector.recommend(story, "calming");
        assert_eq!(soundscape.kind, "calming");
        assert_eq!(soundscape.frequencies, vec![110.0, 220.0, 330.0]);
    }

    #[test]
    fn test_unknown_tone_uses_default() {
        let selector = selector(Arc::new(ThreadRandom));
        assert_eq!(selector.recommend_id("plain words", "whimsical"), "forest_dawn");
        assert_eq!(selector.recommend_id("plain words", ""), "forest_dawn");
    }

    #[test]
    fn test_tone_path_is_deterministic() {
        let selector = selector(Arc::new(SeededRandom::new(3)));
        for tone in ["anxiety", "grief", "energizing", "unknown"] {
            let first = selector.recommend("nothing here", tone);
            for _ in 0..10 {
                assert_eq!(selector.recommend("nothing here", tone), first);
            }
        }
    }

    #[test]
    fn test_keyword_matches_keep_duplicates_in_table_order() {
        let selector = selector(Arc::new(ThreadRandom));
        let matches = selector.keyword_matches("The FOREST floor after rain, near the water.");
        assert_eq!(
            matches,
            vec![
                "forest_dawn",
                "rain_meditation",
                "rain_meditation",
                "ocean_waves",
                "rain_meditation",
            ]
        );
    }

    #[test]
    fn test_keyword_choice_uses_random_source() {
        let story = "a mountain garden";
        assert_eq!(selector(Arc::new(FixedRandom(0))).recommend_id(story, "gentle"), "mountain_wind");
        assert_eq!(selector(Arc::new(FixedRandom(1))).recommend_id(story, "gentle"), "garden_bloom");
    }

    #[test]
    fn test_substring_matching() {
        // "starlight" contains "star", "campfire" contains "fire"
        let selector = selector(Arc::new(FixedRandom(0)));
        assert_eq!(selector.keyword_matches("starlight"), vec!["starlight_journey"]);
        assert_eq!(selector.keyword_matches("campfire"), vec!["fireplace_warmth"]);
    }

    #[test]
    fn test_recommend_is_total() {
        let catalog = Catalog::standard();
        let selector = selector(Arc::new(SeededRandom::new(11)));
        let stories = ["", "forest", "ocean water wind", "crystal cave under the stars", "nothing"];
        let tones = ["", "calming", "healing", "???"];
        for story in stories {
            for tone in tones {
                let chosen = selector.recommend(story, tone);
                assert!(catalog.soundscape_ids().any(|id| catalog.soundscape(id) == Some(&chosen)));
            }
        }
    }

    #[test]
    fn test_serializes_type_tag() {
        let selector = selector(Arc::new(ThreadRandom));
        let value = serde_json::to_value(selector.recommend("", "grief")).unwrap();
        assert_eq!(value["type"], "healing");
        assert_eq!(value["patterns"][0], "nurturing");
    }
}
