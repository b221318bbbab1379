//! Mood entry model.
//!
//! # Invariants
//! - `id` is non-blank and unique across entries.
//! - `timestamp` is an RFC 3339 (ISO-8601) instant.

use chrono::{DateTime, FixedOffset, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier of a mood entry.
pub type MoodEntryId = String;

/// Moods offered by the check-in screen, with their stored scale values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MoodKind {
    Happy,
    Sad,
    Angry,
    Upset,
    Calm,
}

impl MoodKind {
    /// Integer written to `MoodEntry::mood`.
    pub fn scale_value(self) -> i64 {
        match self {
            Self::Happy => 1,
            Self::Sad => 2,
            Self::Angry => 3,
            Self::Upset => 4,
            Self::Calm => 5,
        }
    }

    pub fn from_scale_value(value: i64) -> Option<Self> {
        match value {
            1 => Some(Self::Happy),
            2 => Some(Self::Sad),
            3 => Some(Self::Angry),
            4 => Some(Self::Upset),
            5 => Some(Self::Calm),
            _ => None,
        }
    }
}

/// Self-reported emotional state at one point in time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoodEntry {
    pub id: MoodEntryId,
    /// Scale value; see `MoodKind` for the values the app writes.
    pub mood: i64,
    /// RFC 3339 instant the entry was recorded.
    pub timestamp: String,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoodValidationError {
    EmptyId,
    InvalidTimestamp(String),
}

impl Display for MoodValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyId => write!(f, "mood entry id must not be blank"),
            Self::InvalidTimestamp(value) => {
                write!(f, "mood entry timestamp `{value}` is not RFC 3339")
            }
        }
    }
}

impl Error for MoodValidationError {}

impl MoodEntry {
    /// Records a mood now, with a generated id.
    pub fn new(mood: i64, notes: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            mood,
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            notes,
        }
    }

    /// Records one of the check-in moods now.
    pub fn from_kind(kind: MoodKind) -> Self {
        Self::new(kind.scale_value(), None)
    }

    pub fn validate(&self) -> Result<(), MoodValidationError> {
        if self.id.trim().is_empty() {
            return Err(MoodValidationError::EmptyId);
        }
        self.recorded_at()?;
        Ok(())
    }

    /// Parsed `timestamp`.
    pub fn recorded_at(&self) -> Result<DateTime<FixedOffset>, MoodValidationError> {
        DateTime::parse_from_rfc3339(&self.timestamp)
            .map_err(|_| MoodValidationError::InvalidTimestamp(self.timestamp.clone()))
    }

    /// Check-in mood for this entry when the scale value is a known one.
    pub fn kind(&self) -> Option<MoodKind> {
        MoodKind::from_scale_value(self.mood)
    }
}
