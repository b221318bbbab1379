//! Daily schedule view: ordering, time-of-day sections, current activity and
//! elapsed-day progress.
//!
//! # Invariants
//! - Sorting is stable: items sharing a start time keep snapshot order.
//! - Sections are emitted Morning, Afternoon, Evening and never empty.
//! - Progress is always within `0.0..=100.0`.
//! - Items with an unparsable time are left out of every projection.

use crate::model::schedule::ScheduleItem;
use chrono::{NaiveTime, Timelike};
use log::warn;
use serde::Serialize;

const MORNING_START_HOUR: u32 = 6;
const AFTERNOON_START_HOUR: u32 = 12;
const EVENING_START_HOUR: u32 = 18;

/// Named time-of-day bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum DaySection {
    /// 06:00 until 11:59.
    Morning,
    /// 12:00 until 17:59.
    Afternoon,
    /// 18:00 until 05:59.
    Evening,
}

impl DaySection {
    pub fn for_hour(hour: u32) -> Self {
        if (MORNING_START_HOUR..AFTERNOON_START_HOUR).contains(&hour) {
            Self::Morning
        } else if (AFTERNOON_START_HOUR..EVENING_START_HOUR).contains(&hour) {
            Self::Afternoon
        } else {
            Self::Evening
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Self::Morning => "Morning",
            Self::Afternoon => "Afternoon",
            Self::Evening => "Evening",
        }
    }
}

/// Items of one section, in start-time order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SectionGroup {
    pub section: DaySection,
    pub items: Vec<ScheduleItem>,
}

/// Everything the day screen renders for one point in time.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DayView {
    pub sections: Vec<SectionGroup>,
    /// Id of the activity whose window contains `now`.
    pub current_item_id: Option<String>,
    /// Elapsed share of the span between first and last start time.
    pub progress_percent: f64,
    /// Ids left out because their time did not parse.
    pub skipped_ids: Vec<String>,
}

impl DayView {
    pub fn compute(items: &[ScheduleItem], now: NaiveTime) -> Self {
        let skipped_ids: Vec<String> = items
            .iter()
            .filter(|item| item.start_time().is_err())
            .map(|item| item.id.clone())
            .collect();
        if !skipped_ids.is_empty() {
            warn!(
                "event=day_view module=view status=partial skipped_count={}",
                skipped_ids.len()
            );
        }

        let sorted = sort_by_time(items);
        Self {
            current_item_id: current_item(&sorted, now).map(|item| item.id.clone()),
            progress_percent: progress_percent(&sorted, now),
            sections: group_into_sections(&sorted),
            skipped_ids,
        }
    }

    pub fn current_item(&self) -> Option<&ScheduleItem> {
        let id = self.current_item_id.as_deref()?;
        self.sections
            .iter()
            .flat_map(|group| group.items.iter())
            .find(|item| item.id == id)
    }

    /// Progress rounded to a whole percent for display.
    pub fn rounded_progress(&self) -> u8 {
        self.progress_percent.round() as u8
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }
}

/// Returns the parsable items ordered by start time, keeping snapshot order
/// for equal times.
pub fn sort_by_time(items: &[ScheduleItem]) -> Vec<ScheduleItem> {
    let mut timed = timed_items(items);
    timed.sort_by_key(|(start, _)| *start);
    timed.into_iter().map(|(_, item)| item.clone()).collect()
}

/// Buckets start-time-ordered items into non-empty sections.
pub fn group_into_sections(sorted: &[ScheduleItem]) -> Vec<SectionGroup> {
    let mut morning = Vec::new();
    let mut afternoon = Vec::new();
    let mut evening = Vec::new();

    for (start, item) in timed_items(sorted) {
        let bucket = match DaySection::for_hour(start / 3600) {
            DaySection::Morning => &mut morning,
            DaySection::Afternoon => &mut afternoon,
            DaySection::Evening => &mut evening,
        };
        bucket.push(item.clone());
    }

    [
        (DaySection::Morning, morning),
        (DaySection::Afternoon, afternoon),
        (DaySection::Evening, evening),
    ]
    .into_iter()
    .filter(|(_, items)| !items.is_empty())
    .map(|(section, items)| SectionGroup { section, items })
    .collect()
}

/// Finds the activity running at `now`.
///
/// An item is current when it has started and the next item has not; the
/// last item stays current until midnight. Among start-time ties the later
/// one wins.
pub fn current_item(sorted: &[ScheduleItem], now: NaiveTime) -> Option<&ScheduleItem> {
    let now = now.num_seconds_from_midnight();
    let timed = timed_items(sorted);

    timed
        .iter()
        .enumerate()
        .filter(|(index, (start, _))| {
            let next_start = timed.get(index + 1).map(|(next, _)| *next);
            *start <= now && next_start.map_or(true, |next| next > now)
        })
        .map(|(_, (_, item))| *item)
        .last()
}

/// Percent of the span from first to last start time that has elapsed.
///
/// Returns `0.0` with fewer than two items or a zero-length span.
pub fn progress_percent(sorted: &[ScheduleItem], now: NaiveTime) -> f64 {
    let timed = timed_items(sorted);
    if timed.len() < 2 {
        return 0.0;
    }

    let first = timed.iter().map(|(start, _)| *start).min().unwrap_or(0);
    let last = timed.iter().map(|(start, _)| *start).max().unwrap_or(0);
    if last <= first {
        return 0.0;
    }

    let elapsed = f64::from(now.num_seconds_from_midnight()) - f64::from(first);
    let duration = f64::from(last - first);
    (elapsed / duration * 100.0).clamp(0.0, 100.0)
}

/// Pairs each parsable item with its start in seconds since midnight.
fn timed_items(items: &[ScheduleItem]) -> Vec<(u32, &ScheduleItem)> {
    items
        .iter()
        .filter_map(|item| {
            item.start_time()
                .ok()
                .map(|start| (start.num_seconds_from_midnight(), item))
        })
        .collect()
}
