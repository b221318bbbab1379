//! Schedule item model and time-of-day parsing.
//!
//! # Invariants
//! - `id` is non-blank and never reused for another item.
//! - `time` is `H:MM` or `HH:MM` with hour `0..=23` and minute `0..=59`.
//! - `activity` is non-blank.

use chrono::{NaiveTime, Timelike};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

static TIME_OF_DAY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([01]?[0-9]|2[0-3]):([0-5][0-9])$").expect("valid time-of-day regex")
});

/// Stable identifier of a schedule item.
pub type ScheduleItemId = String;

/// One time-stamped activity in the daily schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleItem {
    pub id: ScheduleItemId,
    /// Start time as `HH:MM`, local wall clock.
    pub time: String,
    pub activity: String,
    /// Symbolic icon name resolved by the presentation layer.
    pub icon: Option<String>,
    /// Display color, usually a `#rrggbb` string.
    pub color: Option<String>,
    pub is_completed: bool,
}

/// Validation failures for schedule item writes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScheduleValidationError {
    EmptyId,
    EmptyActivity,
    InvalidTime(String),
}

impl Display for ScheduleValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyId => write!(f, "schedule item id must not be blank"),
            Self::EmptyActivity => write!(f, "schedule item activity must not be blank"),
            Self::InvalidTime(value) => {
                write!(f, "schedule item time `{value}` is not a valid HH:MM value")
            }
        }
    }
}

impl Error for ScheduleValidationError {}

impl ScheduleItem {
    /// Creates an incomplete item with a generated id.
    pub fn new(time: impl Into<String>, activity: impl Into<String>) -> Self {
        Self::with_id(Uuid::new_v4().to_string(), time, activity)
    }

    /// Creates an incomplete item with a caller-provided id.
    pub fn with_id(
        id: impl Into<ScheduleItemId>,
        time: impl Into<String>,
        activity: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            time: time.into(),
            activity: activity.into(),
            icon: None,
            color: None,
            is_completed: false,
        }
    }

    /// Checks record invariants. Repositories call this before every write
    /// and after every read.
    pub fn validate(&self) -> Result<(), ScheduleValidationError> {
        if self.id.trim().is_empty() {
            return Err(ScheduleValidationError::EmptyId);
        }
        if self.activity.trim().is_empty() {
            return Err(ScheduleValidationError::EmptyActivity);
        }
        parse_time_of_day(&self.time)?;
        Ok(())
    }

    /// Parsed start time of this item.
    pub fn start_time(&self) -> Result<NaiveTime, ScheduleValidationError> {
        parse_time_of_day(&self.time)
    }

    /// Minutes since local midnight, or `None` for an unparsable time.
    pub fn minutes_since_midnight(&self) -> Option<u32> {
        self.start_time()
            .ok()
            .map(|time| time.hour() * 60 + time.minute())
    }

    /// Returns a copy with the completion flag flipped.
    pub fn toggled(&self) -> Self {
        Self {
            is_completed: !self.is_completed,
            ..self.clone()
        }
    }
}

/// Parses an `HH:MM` (or `H:MM`) string into a wall-clock time.
pub fn parse_time_of_day(value: &str) -> Result<NaiveTime, ScheduleValidationError> {
    let invalid = || ScheduleValidationError::InvalidTime(value.to_string());
    let captures = TIME_OF_DAY_RE.captures(value).ok_or_else(invalid)?;
    let hour = captures[1].parse::<u32>().map_err(|_| invalid())?;
    let minute = captures[2].parse::<u32>().map_err(|_| invalid())?;
    NaiveTime::from_hms_opt(hour, minute, 0).ok_or_else(invalid)
}
