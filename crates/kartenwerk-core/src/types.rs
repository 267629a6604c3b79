// SPDX-License-Identifier: MIT
//
// Core domain types for the Kartenwerk card generator.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Maximum number of visible characters in an event name.
///
/// Enforced at the intake boundary and re-clamped defensively by the face
/// renderer before any text is sized or drawn.
pub const EVENT_NAME_MAX_CHARS: usize = 20;

/// Unique identifier for a timeline card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CardId(pub Uuid);

impl CardId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for CardId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for CardId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One timeline card: a photo plus the event it depicts and when it happened.
///
/// The record is consumed by the export pipeline, never mutated by it.
/// `year` is validated at the intake boundary (1000–2100); the pipeline
/// renders whatever it is handed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimelineCard {
    pub id: CardId,
    /// Encoded source image bytes (JPEG, PNG, ...), decoded per export.
    pub image: Vec<u8>,
    /// Original filename, used for placeholder diagnostics and cache keys.
    pub filename: String,
    /// Short event label shown on the event face.
    pub event_name: String,
    /// Event year, shown on the date face.
    pub year: i32,
    /// Full capture timestamp when known. May carry only year precision;
    /// when present the date face shows "<Mon> <year>".
    pub full_date: Option<DateTime<Utc>>,
    /// Free-text provenance of the date (display only, e.g. "EXIF DateTimeOriginal").
    pub date_source: String,
}

impl TimelineCard {
    /// Event name truncated to the visible-character cap.
    pub fn clamped_event_name(&self) -> &str {
        let trimmed = self.event_name.trim();
        match trimmed.char_indices().nth(EVENT_NAME_MAX_CHARS) {
            Some((idx, _)) => &trimmed[..idx],
            None => trimmed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn card_with_name(name: &str) -> TimelineCard {
        TimelineCard {
            id: CardId::new(),
            image: Vec::new(),
            filename: "photo.jpg".into(),
            event_name: name.into(),
            year: 1999,
            full_date: None,
            date_source: "test".into(),
        }
    }

    #[test]
    fn short_event_name_unchanged() {
        let card = card_with_name("Moon landing");
        assert_eq!(card.clamped_event_name(), "Moon landing");
    }

    #[test]
    fn long_event_name_clamped_to_twenty_chars() {
        let card = card_with_name("A very long event name that keeps going and going");
        assert_eq!(card.clamped_event_name().chars().count(), 20);
    }

    #[test]
    fn event_name_trimmed_before_clamping() {
        let card = card_with_name("   padded   ");
        assert_eq!(card.clamped_event_name(), "padded");
    }
}
