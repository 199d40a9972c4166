// src/progress.rs
//! Mood progress view assembled from completed sessions.

use serde::Serialize;
use serde_json::Value;

use crate::catalog::Catalog;
use crate::store::ProgressEntry;

/// Records shown on the progress page.
pub const PROGRESS_LIMIT: i64 = 10;

#[derive(Debug, Clone, Serialize)]
pub struct ProgressRow {
    pub timestamp: String,
    pub mood_before: i64,
    pub mood_after: i64,
    pub mood_before_label: &'static str,
    pub mood_after_label: &'static str,
    pub change: i64,
    pub primary_emotion: Option<String>,
    pub emotional_state: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProgressView {
    pub rows: Vec<ProgressRow>,
    pub total: usize,
    /// Mean of `mood_after - mood_before`, formatted with a sign ("+1.5").
    pub average_improvement: Option<String>,
}

impl ProgressView {
    pub fn build(entries: &[ProgressEntry], catalog: &Catalog) -> Self {
        let rows: Vec<ProgressRow> = entries
            .iter()
            .map(|entry| ProgressRow {
                timestamp: entry.timestamp.format("%Y-%m-%d %H:%M").to_string(),
                mood_before: entry.mood_before,
                mood_after: entry.mood_after,
                mood_before_label: catalog.mood_label(entry.mood_before).unwrap_or("Unknown"),
                mood_after_label: catalog.mood_label(entry.mood_after).unwrap_or("Unknown"),
                change: entry.mood_after.saturating_sub(entry.mood_before),
                primary_emotion: primary_emotion(&entry.emotional_state),
                emotional_state: entry.emotional_state.clone(),
            })
            .collect();

        let average_improvement = average_change(&rows).map(format_change);

        Self {
            total: rows.len(),
            rows,
            average_improvement,
        }
    }
}

fn average_change(rows: &[ProgressRow]) -> Option<f64> {
    if rows.is_empty() {
        return None;
    }
    let sum: f64 = rows.iter().map(|r| r.change as f64).sum();
    Some(sum / rows.len() as f64)
}

fn format_change(value: f64) -> String {
    if value > 0.0 {
        format!("+{value:.1}")
    } else {
        format!("{value:.1}")
    }
}

/// Emotion label from a stored blob; `None` if the blob is not an object
/// with a string `primary_emotion`.
fn primary_emotion(blob: &str) -> Option<String> {
    serde_json::from_str::<Value>(blob)
        .ok()?
        .get("primary_emotion")?
        .as_str()
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn entry(before: i64, after: i64, blob: &str) -> ProgressEntry {
        ProgressEntry {
            timestamp: Utc.with_ymd_and_hms(2026, 3, 14, 9, 30, 0).unwrap(),
            mood_before: before,
            mood_after: after,
            emotional_state: blob.to_string(),
        }
    }

    #[test]
    fn test_empty_view() {
        let view = ProgressView::build(&[], &Catalog::standard());
        assert_eq!(view.total, 0);
        assert!(view.average_improvement.is_none());
    }

    #[test]
    fn test_rows_and_average() {
        let entries = vec![
            entry(3, 7, r#"{"primary_emotion":"anxiety","intensity":7}"#),
            entry(5, 6, r#"{"primary_emotion":"stress"}"#),
        ];
        let view = ProgressView::build(&entries, &Catalog::standard());

        assert_eq!(view.total, 2);
        assert_eq!(view.rows[0].timestamp, "2026-03-14 09:30");
        assert_eq!(view.rows[0].mood_before_label, "Somewhat Low");
        assert_eq!(view.rows[0].mood_after_label, "Somewhat High");
        assert_eq!(view.rows[0].change, 4);
        assert_eq!(view.rows[0].primary_emotion.as_deref(), Some("anxiety"));
        assert_eq!(view.average_improvement.as_deref(), Some("+2.5"));
    }

    #[test]
    fn test_negative_average_and_opaque_blob() {
        let entries = vec![entry(8, 4, "not json"), entry(12, 0, "[]")];
        let view = ProgressView::build(&entries, &Catalog::standard());
        assert_eq!(view.average_improvement.as_deref(), Some("-8.0"));
        assert!(view.rows[0].primary_emotion.is_none());
        assert_eq!(view.rows[0].emotional_state, "not json");
        assert_eq!(view.rows[1].mood_before_label, "Unknown");
    }

    #[test]
    fn test_extreme_stored_moods_do_not_overflow() {
        let entries = vec![entry(i64::MIN, i64::MAX, "{}"), entry(i64::MAX, i64::MIN, "{}"), entry(1, 10, "{}")];
        let view = ProgressView::build(&entries, &Catalog::standard());

        assert_eq!(view.rows[0].change, i64::MAX);
        assert_eq!(view.rows[1].change, i64::MIN);
        assert_eq!(view.rows[2].change, 9);
        assert_eq!(view.rows[0].mood_after_label, "Unknown");
        assert!(view.average_improvement.is_some());
    }
}
