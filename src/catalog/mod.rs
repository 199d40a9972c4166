// src/catalog/mod.rs
//! Static configuration tables, built once at start-up and shared read-only.

use serde::Serialize;
use std::collections::HashMap;

use crate::soundscape::Soundscape;
use crate::story::PrimaryEmotion;

/// Application metadata shown on the index page and `/health`.
#[derive(Debug, Clone, Serialize)]
pub struct AppInfo {
    pub name: &'static str,
    pub version: &'static str,
    pub description: &'static str,
    pub license: &'static str,
}

/// Every table the generator, selector and views read from.
#[derive(Debug, Clone)]
pub struct Catalog {
    techniques: HashMap<PrimaryEmotion, &'static str>,
    pub default_technique: &'static str,

    pub archetypes: Vec<&'static str>,
    pub settings: Vec<&'static str>,
    pub metaphors: Vec<&'static str>,
    pub times_of_day: Vec<&'static str>,
    pub weather: Vec<&'static str>,
    pub companions: Vec<&'static str>,
    pub discoveries: Vec<&'static str>,

    /// Placeholders: `{setting}`, `{metaphor}`, `{tone}`.
    pub fallback_stories: Vec<&'static str>,

    soundscapes: Vec<(&'static str, Soundscape)>,
    /// Ordered keyword table; matching walks it front to back.
    pub keyword_map: Vec<(&'static str, Vec<&'static str>)>,
    tone_fallbacks: HashMap<&'static str, &'static str>,
    pub default_soundscape: &'static str,

    mood_scale: [&'static str; 10],
    pub app_info: AppInfo,
}

impl Catalog {
    /// The tables the service ships with.
    pub fn standard() -> Self {
        let techniques = HashMap::from([
            (PrimaryEmotion::Anxiety, "grounding and mindfulness techniques"),
            (PrimaryEmotion::Depression, "cognitive behavioral therapy and hope-building"),
            (PrimaryEmotion::Trauma, "narrative therapy and empowerment themes"),
            (PrimaryEmotion::Stress, "relaxation and coping strategies"),
            (PrimaryEmotion::Grief, "acceptance and healing journey themes"),
            (PrimaryEmotion::SelfEsteem, "self-compassion and strength recognition"),
        ]);

        let tone_fallbacks = HashMap::from([
            ("anxiety", "rain_meditation"),
            ("depression", "mountain_wind"),
            ("stress", "ocean_waves"),
            ("grief", "garden_bloom"),
            ("gentle", "forest_dawn"),
            ("calming", "ocean_waves"),
            ("energizing", "mountain_wind"),
            ("healing", "garden_bloom"),
        ]);

        Self {
            techniques,
            default_technique: "mindfulness and self-compassion",
            archetypes: vec![
                "The Hero's Journey of Healing",
                "The Wise Guide Within",
                "The Garden of Growth",
                "The Bridge to Tomorrow",
                "The Light in the Forest",
                "The Ocean of Calm",
                "The Phoenix Rising",
                "The Sacred Mountain Path",
                "The Healing Waters",
                "The Butterfly Transformation",
                "The Ancient Tree of Wisdom",
                "The Starlit Journey Home",
                "The Desert Oasis Discovery",
                "The Crystal Cave of Clarity",
                "The Rainbow After the Storm",
                "The Gentle River of Time",
            ],
            settings: vec![
                "enchanted forest with glowing fireflies",
                "peaceful mountain meadow at sunrise",
                "serene lakeside with gentle waves",
                "mystical garden with blooming flowers",
                "quiet beach with soft sand dunes",
                "ancient library filled with wisdom",
                "cozy cabin by a crackling fireplace",
                "floating island in the clouds",
                "underground crystal cavern",
                "bamboo grove with singing birds",
                "lighthouse on a cliff overlooking the sea",
                "secret waterfall hidden in the jungle",
            ],
            metaphors: vec![
                "flowing water that cleanses and renews",
                "growing plants that reach toward the light",
                "gentle winds that carry away worries",
                "warm sunlight that heals and energizes",
                "solid earth that grounds and supports",
                "dancing flames that transform and purify",
                "twinkling stars that guide the way",
                "soft rain that nourishes growth",
                "ocean waves that ebb and flow naturally",
                "mountain peaks that offer perspective",
            ],
            times_of_day: vec!["dawn", "morning", "afternoon", "sunset", "twilight", "night"],
            weather: vec![
                "gentle breeze",
                "warm sunshine",
                "soft rain",
                "clear skies",
                "misty air",
            ],
            companions: vec![
                "wise owl",
                "gentle deer",
                "flowing stream",
                "ancient tree",
                "guiding star",
                "inner voice",
            ],
            discoveries: vec![
                "hidden path",
                "secret garden",
                "magical spring",
                "glowing crystal",
                "ancient wisdom",
                "inner strength",
            ],
            fallback_stories: vec![
                FALLBACK_ARRIVAL,
                FALLBACK_RENEWAL,
                FALLBACK_SANCTUARY,
            ],
            soundscapes: standard_soundscapes(),
            keyword_map: vec![
                ("forest", vec!["forest_dawn", "rain_meditation"]),
                ("ocean", vec!["ocean_waves"]),
                ("mountain", vec!["mountain_wind"]),
                ("garden", vec!["garden_bloom"]),
                ("crystal", vec!["crystal_cave"]),
                ("rain", vec!["rain_meditation"]),
                ("fire", vec!["fireplace_warmth"]),
                ("star", vec!["starlight_journey"]),
                ("cave", vec!["crystal_cave"]),
                ("water", vec!["ocean_waves", "rain_meditation"]),
                ("wind", vec!["mountain_wind"]),
                ("tree", vec!["forest_dawn"]),
                ("flower", vec!["garden_bloom"]),
            ],
            tone_fallbacks,
            default_soundscape: "forest_dawn",
            mood_scale: [
                "Very Low",
                "Low",
                "Somewhat Low",
                "Below Average",
                "Neutral",
                "Above Average",
                "Somewhat High",
                "High",
                "Very High",
                "Excellent",
            ],
            app_info: AppInfo {
                name: "Echo-Muse",
                version: env!("CARGO_PKG_VERSION"),
                description: "AI-Powered Therapeutic Storytelling Companion",
                license: "MIT",
            },
        }
    }

    /// Therapeutic approach woven into the story prompt.
    pub fn technique_for(&self, emotion: PrimaryEmotion) -> &'static str {
        self.techniques
            .get(&emotion)
            .copied()
            .unwrap_or(self.default_technique)
    }

    pub fn soundscape(&self, id: &str) -> Option<&Soundscape> {
        self.soundscapes
            .iter()
            .find(|(key, _)| *key == id)
            .map(|(_, soundscape)| soundscape)
    }

    pub fn soundscape_ids(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.soundscapes.iter().map(|(id, _)| *id)
    }

    /// Descriptor for `id`; unknown ids resolve to the first entry, which is
    /// the default soundscape.
    pub fn soundscape_or_default(&self, id: &str) -> &Soundscape {
        self.soundscape(id).unwrap_or(&self.soundscapes[0].1)
    }

    /// Soundscape id for a story tone, `None` if the tone is not in the table.
    pub fn tone_fallback(&self, tone: &str) -> Option<&'static str> {
        self.tone_fallbacks.get(tone).copied()
    }

    /// Label for a 1..=10 mood value.
    pub fn mood_label(&self, mood: i64) -> Option<&'static str> {
        if !(1..=10).contains(&mood) {
            return None;
        }
        self.mood_scale.get((mood - 1) as usize).copied()
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::standard()
    }
}

fn soundscape(
    kind: &str,
    description: &str,
    frequencies: [f64; 3],
    patterns: [&str; 3],
) -> Soundscape {
    Soundscape {
        kind: kind.to_string(),
        description: description.to_string(),
        frequencies: frequencies.to_vec(),
        patterns: patterns.iter().map(|p| p.to_string()).collect(),
    }
}

fn standard_soundscapes() -> Vec<(&'static str, Soundscape)> {
    vec![
        (
            "forest_dawn",
            // A3, E4, A4
            soundscape(
                "grounding",
                "Forest awakening with bird songs",
                [220.0, 330.0, 440.0],
                ["gentle", "natural", "organic"],
            ),
        ),
        (
            "ocean_waves",
            soundscape(
                "calming",
                "Rhythmic ocean waves",
                [110.0, 220.0, 330.0],
                ["flowing", "rhythmic", "deep"],
            ),
        ),
        (
            "mountain_wind",
            // C major triad
            soundscape(
                "energizing",
                "Mountain winds and distant echoes",
                [261.63, 329.63, 392.0],
                ["airy", "expansive", "uplifting"],
            ),
        ),
        (
            "garden_bloom",
            soundscape(
                "healing",
                "Gentle garden with soft breezes",
                [256.0, 320.0, 384.0],
                ["nurturing", "soft", "harmonious"],
            ),
        ),
        (
            "crystal_cave",
            // 432 Hz tuning
            soundscape(
                "mystical",
                "Resonant crystal harmonics",
                [432.0, 540.0, 648.0],
                ["crystalline", "pure", "ethereal"],
            ),
        ),
        (
            "rain_meditation",
            soundscape(
                "peaceful",
                "Gentle rain on leaves",
                [174.0, 285.0, 396.0],
                ["soothing", "consistent", "meditative"],
            ),
        ),
        (
            "fireplace_warmth",
            // D3, A3, D4
            soundscape(
                "comforting",
                "Crackling fireplace warmth",
                [146.83, 220.0, 293.66],
                ["warm", "crackling", "cozy"],
            ),
        ),
        (
            "starlight_journey",
            soundscape(
                "transcendent",
                "Cosmic harmonies and stellar winds",
                [528.0, 639.0, 741.0],
                ["cosmic", "expansive", "infinite"],
            ),
        ),
    ]
}

const FALLBACK_ARRIVAL: &str = "\
You find yourself in a {setting}, where the atmosphere feels {tone} and welcoming. The world around you seems to pulse with the rhythm of {metaphor}, reminding you of your own inner strength.

As you explore this sacred space, you notice how everything here exists in perfect harmony. The elements around you whisper ancient wisdom about resilience, growth, and the power of transformation that lives within you.

You pause to truly feel this moment, understanding that like {metaphor}, you have the ability to adapt, flow, and find your way through any challenge. This realization fills you with a profound sense of peace and confidence.

Take a deep breath and carry this wisdom with you. You are stronger than you know, more resilient than you imagine, and worthy of all the healing and joy that life has to offer.";

const FALLBACK_RENEWAL: &str = "\
In this {setting}, you discover a place where time moves differently, where healing happens naturally, and where the essence of {metaphor} teaches you about your own capacity for renewal.

The {tone} energy of this space invites you to release what no longer serves you. You feel lighter with each breath, more connected to your authentic self, and increasingly aware of the infinite possibilities that await you.

Like {metaphor}, you are constantly evolving, constantly growing, constantly becoming more of who you're meant to be. This journey of transformation is not just possible; it is already happening within you.

Trust in your process, honor your journey, and know that every step forward is a victory worth celebrating.";

const FALLBACK_SANCTUARY: &str = "\
You arrive at a {setting} that feels like a sanctuary created just for you. Here, surrounded by the {tone} presence of {metaphor}, you find the space to simply be, without judgment, without pressure, without the need to be anything other than exactly who you are.

In this moment of pure acceptance, you begin to see yourself through eyes of compassion. You recognize the courage it takes to face each day, the strength you've shown in difficult times, and the beautiful heart that continues to hope and love despite everything.

The wisdom of {metaphor} reminds you that healing is not about becoming perfect; it is about becoming whole. And you are already on that path, already worthy of love and belonging, already enough.

Carry this truth with you always: you are a miracle in motion, a story still being written, a light that cannot be dimmed.";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_table_sizes() {
        let catalog = Catalog::standard();
        assert_eq!(catalog.archetypes.len(), 16);
        assert_eq!(catalog.settings.len(), 12);
        assert_eq!(catalog.metaphors.len(), 10);
        assert_eq!(catalog.fallback_stories.len(), 3);
        assert_eq!(catalog.soundscape_ids().count(), 8);
        assert_eq!(catalog.keyword_map.len(), 13);
    }

    #[test]
    fn test_every_referenced_soundscape_exists() {
        let catalog = Catalog::standard();
        for (_, ids) in &catalog.keyword_map {
            for id in ids {
                assert!(catalog.soundscape(id).is_some(), "missing {id}");
            }
        }
        for tone in ["anxiety", "depression", "stress", "grief", "gentle", "calming", "energizing", "healing"] {
            let id = catalog.tone_fallback(tone).unwrap();
            assert!(catalog.soundscape(id).is_some());
        }
        assert!(catalog.soundscape(catalog.default_soundscape).is_some());
    }

    #[test]
    fn test_random_tables_are_non_empty() {
        let catalog = Catalog::standard();
        for table in [
            &catalog.archetypes,
            &catalog.settings,
            &catalog.metaphors,
            &catalog.times_of_day,
            &catalog.weather,
            &catalog.companions,
            &catalog.discoveries,
            &catalog.fallback_stories,
        ] {
            assert!(!table.is_empty());
        }
    }

    #[test]
    fn test_unknown_soundscape_resolves_to_default() {
        let catalog = Catalog::standard();
        assert_eq!(catalog.soundscapes[0].0, catalog.default_soundscape);
        assert_eq!(
            catalog.soundscape_or_default("no_such_place"),
            catalog.soundscape(catalog.default_soundscape).unwrap()
        );
        assert_eq!(
            catalog.soundscape_or_default("ocean_waves").description,
            "Rhythmic ocean waves"
        );
    }

    #[test]
    fn test_technique_lookup() {
        let catalog = Catalog::standard();
        assert_eq!(
            catalog.technique_for(PrimaryEmotion::Anxiety),
            "grounding and mindfulness techniques"
        );
        assert_eq!(
            catalog.technique_for(PrimaryEmotion::Neutral),
            "mindfulness and self-compassion"
        );
    }

    #[test]
    fn test_mood_labels() {
        let catalog = Catalog::standard();
        assert_eq!(catalog.mood_label(1), Some("Very Low"));
        assert_eq!(catalog.mood_label(5), Some("Neutral"));
        assert_eq!(catalog.mood_label(10), Some("Excellent"));
        assert_eq!(catalog.mood_label(0), None);
        assert_eq!(catalog.mood_label(11), None);
    }

    #[test]
    fn test_fallback_templates_have_placeholders() {
        let catalog = Catalog::standard();
        for template in &catalog.fallback_stories {
            assert!(template.contains("{setting}"));
            assert!(template.contains("{metaphor}"));
            assert!(template.contains("{tone}"));
        }
    }
}
