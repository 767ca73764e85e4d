//! Time blocks: recurring or one-off slots on the daily agenda.
//!
//! A block is either recurring (a weekday set) or one-off (a concrete
//! date). `expand_day` materializes the occurrences for a calendar day;
//! conflict detection works on the materialized occurrences.

use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ValidationError;
use crate::habit::Weekday;

/// A time block definition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimeBlock {
    pub id: String,
    pub title: String,
    /// Start of the block, HH:mm
    pub start_time: String,
    pub duration_minutes: u32,
    /// Weekdays a recurring block occurs on; empty for one-off blocks
    #[serde(default)]
    pub weekdays: Vec<Weekday>,
    /// Concrete date for one-off blocks
    pub date: Option<NaiveDate>,
    /// Task this block is reserved for, if any
    pub task_id: Option<String>,
    pub enabled: bool,
}

impl TimeBlock {
    /// Create a recurring block on the given weekdays.
    pub fn recurring(
        title: impl Into<String>,
        start_time: impl Into<String>,
        duration_minutes: u32,
        weekdays: Vec<Weekday>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            title: title.into(),
            start_time: start_time.into(),
            duration_minutes,
            weekdays,
            date: None,
            task_id: None,
            enabled: true,
        }
    }

    /// Create a one-off block on a concrete date.
    pub fn one_off(
        title: impl Into<String>,
        start_time: impl Into<String>,
        duration_minutes: u32,
        date: NaiveDate,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            title: title.into(),
            start_time: start_time.into(),
            duration_minutes,
            weekdays: Vec::new(),
            date: Some(date),
            task_id: None,
            enabled: true,
        }
    }

    /// Parsed start time, if `start_time` is well-formed HH:mm.
    pub fn start(&self) -> Option<NaiveTime> {
        NaiveTime::parse_from_str(&self.start_time, "%H:%M").ok()
    }

    /// Whether this block occurs on `day`.
    pub fn occurs_on(&self, day: NaiveDate) -> bool {
        if !self.enabled {
            return false;
        }
        match self.date {
            Some(date) => date == day,
            None => self
                .weekdays
                .iter()
                .any(|w| w.to_chrono() == day.weekday()),
        }
    }

    /// # Errors
    /// Rejects an unparseable start time, a zero duration, or a block
    /// that is neither recurring nor dated.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.title.trim().is_empty() {
            return Err(ValidationError::InvalidValue {
                field: "title".to_string(),
                message: "must not be empty".to_string(),
            });
        }
        if self.start().is_none() {
            return Err(ValidationError::InvalidValue {
                field: "start_time".to_string(),
                message: format!("'{}' is not HH:mm", self.start_time),
            });
        }
        if self.duration_minutes == 0 {
            return Err(ValidationError::InvalidValue {
                field: "duration_minutes".to_string(),
                message: "must be positive".to_string(),
            });
        }
        if self.date.is_none() && self.weekdays.is_empty() {
            return Err(ValidationError::InvalidValue {
                field: "weekdays".to_string(),
                message: "a block needs weekdays or a date".to_string(),
            });
        }
        Ok(())
    }
}

/// A block materialized onto a concrete day.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BlockOccurrence {
    pub block_id: String,
    pub title: String,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub task_id: Option<String>,
}

impl BlockOccurrence {
    pub fn overlaps(&self, other: &BlockOccurrence) -> bool {
        self.start < other.end && self.end > other.start
    }
}

/// Materialize the occurrences of `blocks` on `day`, sorted by start.
///
/// Blocks with an unparseable start time are skipped; they fail
/// validation at creation, so hitting one here means the row predates
/// the check or was edited out-of-band.
pub fn expand_day(blocks: &[TimeBlock], day: NaiveDate) -> Vec<BlockOccurrence> {
    let mut occurrences: Vec<BlockOccurrence> = blocks
        .iter()
        .filter(|b| b.occurs_on(day))
        .filter_map(|b| {
            let Some(start_time) = b.start() else {
                log::warn!("skipping block {} with bad start_time '{}'", b.id, b.start_time);
                return None;
            };
            let start = day.and_time(start_time);
            let end = start + chrono::Duration::minutes(i64::from(b.duration_minutes));
            Some(BlockOccurrence {
                block_id: b.id.clone(),
                title: b.title.clone(),
                start,
                end,
                task_id: b.task_id.clone(),
            })
        })
        .collect();
    occurrences.sort_by_key(|o| o.start);
    occurrences
}

/// Pairs of overlapping occurrences, by block id. Assumes `occurrences`
/// is sorted by start, as `expand_day` returns them.
pub fn conflicts(occurrences: &[BlockOccurrence]) -> Vec<(String, String)> {
    let mut pairs = Vec::new();
    for (i, a) in occurrences.iter().enumerate() {
        for b in &occurrences[i + 1..] {
            if b.start >= a.end {
                break;
            }
            if a.overlaps(b) {
                pairs.push((a.block_id.clone(), b.block_id.clone()));
            }
        }
    }
    pairs
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn recurring_block_occurs_on_weekday() {
        let block = TimeBlock::recurring("Deep work", "09:00", 90, vec![Weekday::Monday]);
        // 2026-01-05 is a Monday
        assert!(block.occurs_on(date(2026, 1, 5)));
        assert!(!block.occurs_on(date(2026, 1, 6)));
    }

    #[test]
    fn one_off_block_occurs_only_on_its_date() {
        let block = TimeBlock::one_off("Dentist", "14:30", 60, date(2026, 1, 7));
        assert!(block.occurs_on(date(2026, 1, 7)));
        assert!(!block.occurs_on(date(2026, 1, 14)));
    }

    #[test]
    fn disabled_block_never_occurs() {
        let mut block = TimeBlock::recurring("Deep work", "09:00", 90, vec![Weekday::Monday]);
        block.enabled = false;
        assert!(!block.occurs_on(date(2026, 1, 5)));
    }

    #[test]
    fn expand_day_sorts_by_start() {
        let blocks = vec![
            TimeBlock::one_off("Afternoon", "14:00", 60, date(2026, 1, 7)),
            TimeBlock::one_off("Morning", "08:00", 60, date(2026, 1, 7)),
        ];
        let occurrences = expand_day(&blocks, date(2026, 1, 7));
        assert_eq!(occurrences.len(), 2);
        assert_eq!(occurrences[0].title, "Morning");
        assert_eq!(occurrences[1].title, "Afternoon");
    }

    #[test]
    fn overlap_detection() {
        let blocks = vec![
            TimeBlock::one_off("A", "09:00", 60, date(2026, 1, 7)),
            TimeBlock::one_off("B", "09:30", 60, date(2026, 1, 7)),
            TimeBlock::one_off("C", "11:00", 30, date(2026, 1, 7)),
        ];
        let occurrences = expand_day(&blocks, date(2026, 1, 7));
        let pairs = conflicts(&occurrences);
        assert_eq!(pairs.len(), 1);
        assert_eq!(pairs[0].0, blocks[0].id);
        assert_eq!(pairs[0].1, blocks[1].id);
    }

    #[test]
    fn adjacent_blocks_do_not_conflict() {
        let blocks = vec![
            TimeBlock::one_off("A", "09:00", 60, date(2026, 1, 7)),
            TimeBlock::one_off("B", "10:00", 60, date(2026, 1, 7)),
        ];
        let occurrences = expand_day(&blocks, date(2026, 1, 7));
        assert!(conflicts(&occurrences).is_empty());
    }

    #[test]
    fn validate_requires_weekdays_or_date() {
        let block = TimeBlock::recurring("Empty", "09:00", 30, Vec::new());
        assert!(block.validate().is_err());
    }

    #[test]
    fn validate_rejects_bad_time() {
        let block = TimeBlock::one_off("Bad", "9am", 30, date(2026, 1, 7));
        assert!(block.validate().is_err());
    }
}
