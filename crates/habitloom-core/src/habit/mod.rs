//! Habit types and the habit consistency engine.
//!
//! A habit declares a recurrence rule (daily, weekly on chosen weekdays,
//! or monthly on chosen days of the month) over an active date window.
//! Completion facts are day-granular: one logical fact per habit per day.
//! Everything in this module is pure computation over in-memory snapshots;
//! persistence lives in `storage`.

pub mod completion;
pub mod recurrence;
pub mod stats;
pub mod streak;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::error::ValidationError;

/// How often a habit recurs.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    /// Every day within the active window
    Daily,
    /// On selected weekdays
    Weekly,
    /// On selected days of the month
    Monthly,
}

impl Default for Frequency {
    fn default() -> Self {
        Frequency::Daily
    }
}

impl FromStr for Frequency {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "daily" => Ok(Frequency::Daily),
            "weekly" => Ok(Frequency::Weekly),
            "monthly" => Ok(Frequency::Monthly),
            other => Err(ValidationError::InvalidValue {
                field: "frequency".to_string(),
                message: format!("expected daily, weekly or monthly, got '{other}'"),
            }),
        }
    }
}

/// Day of the week, stored by name.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Weekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl Weekday {
    /// Convert to the chrono equivalent for calendar math.
    pub fn to_chrono(self) -> chrono::Weekday {
        match self {
            Weekday::Monday => chrono::Weekday::Mon,
            Weekday::Tuesday => chrono::Weekday::Tue,
            Weekday::Wednesday => chrono::Weekday::Wed,
            Weekday::Thursday => chrono::Weekday::Thu,
            Weekday::Friday => chrono::Weekday::Fri,
            Weekday::Saturday => chrono::Weekday::Sat,
            Weekday::Sunday => chrono::Weekday::Sun,
        }
    }

    pub fn from_chrono(day: chrono::Weekday) -> Self {
        match day {
            chrono::Weekday::Mon => Weekday::Monday,
            chrono::Weekday::Tue => Weekday::Tuesday,
            chrono::Weekday::Wed => Weekday::Wednesday,
            chrono::Weekday::Thu => Weekday::Thursday,
            chrono::Weekday::Fri => Weekday::Friday,
            chrono::Weekday::Sat => Weekday::Saturday,
            chrono::Weekday::Sun => Weekday::Sunday,
        }
    }
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Weekday::Monday => "monday",
            Weekday::Tuesday => "tuesday",
            Weekday::Wednesday => "wednesday",
            Weekday::Thursday => "thursday",
            Weekday::Friday => "friday",
            Weekday::Saturday => "saturday",
            Weekday::Sunday => "sunday",
        };
        f.write_str(name)
    }
}

impl FromStr for Weekday {
    type Err = ValidationError;

    /// Accepts full names and the usual three-letter abbreviations.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "monday" | "mon" => Ok(Weekday::Monday),
            "tuesday" | "tue" => Ok(Weekday::Tuesday),
            "wednesday" | "wed" => Ok(Weekday::Wednesday),
            "thursday" | "thu" => Ok(Weekday::Thursday),
            "friday" | "fri" => Ok(Weekday::Friday),
            "saturday" | "sat" => Ok(Weekday::Saturday),
            "sunday" | "sun" => Ok(Weekday::Sunday),
            other => Err(ValidationError::InvalidValue {
                field: "weekday".to_string(),
                message: format!("unknown weekday '{other}'"),
            }),
        }
    }
}

/// A tracked habit with its recurrence rule and active window.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Habit {
    /// Unique identifier
    pub id: String,
    /// Display name
    pub name: String,
    /// Recurrence frequency
    pub frequency: Frequency,
    /// Weekdays the habit is due on (weekly only). Empty means every day.
    #[serde(default)]
    pub weekdays: Vec<Weekday>,
    /// Days of month the habit is due on (monthly only, 1-31).
    /// Empty means the 1st only.
    #[serde(default)]
    pub month_days: Vec<u8>,
    /// First day the habit is active
    pub start_date: NaiveDate,
    /// Last day the habit is active, if bounded
    pub end_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Habit {
    /// Create a new daily habit starting on `start_date`.
    pub fn new(name: impl Into<String>, start_date: NaiveDate) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            frequency: Frequency::Daily,
            weekdays: Vec::new(),
            month_days: Vec::new(),
            start_date,
            end_date: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Check well-formedness before the habit reaches storage or the engine.
    ///
    /// # Errors
    /// Returns the first violated constraint: empty name, inverted date
    /// window, or out-of-range month days.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::InvalidValue {
                field: "name".to_string(),
                message: "must not be empty".to_string(),
            });
        }
        if let Some(end) = self.end_date {
            if end < self.start_date {
                return Err(ValidationError::InvalidDateRange {
                    start: self.start_date,
                    end,
                });
            }
        }
        for &day in &self.month_days {
            if !(1..=31).contains(&day) {
                return Err(ValidationError::InvalidValue {
                    field: "month_days".to_string(),
                    message: format!("day {day} is outside 1-31"),
                });
            }
        }
        Ok(())
    }
}

/// A fact recording that a habit was performed on a specific day.
///
/// Presence of an entry for `(habit_id, date)` means completed; absence
/// means not completed. Storage enforces uniqueness, and
/// [`completion::CompletionIndex`] coalesces any duplicates on read.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CompletionLogEntry {
    pub habit_id: String,
    pub date: NaiveDate,
    /// When the fact was recorded (metadata only; day granularity rules)
    pub logged_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn habit_serialization_round_trip() {
        let mut habit = Habit::new("Stretch", date(2026, 1, 1));
        habit.frequency = Frequency::Weekly;
        habit.weekdays = vec![Weekday::Monday, Weekday::Thursday];

        let json = serde_json::to_string(&habit).unwrap();
        assert!(json.contains("\"weekly\""));
        assert!(json.contains("\"monday\""));
        let decoded: Habit = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded.weekdays, habit.weekdays);
    }

    #[test]
    fn validate_rejects_empty_name() {
        let habit = Habit::new("   ", date(2026, 1, 1));
        assert!(habit.validate().is_err());
    }

    #[test]
    fn validate_rejects_inverted_window() {
        let mut habit = Habit::new("Read", date(2026, 3, 10));
        habit.end_date = Some(date(2026, 3, 1));
        assert!(matches!(
            habit.validate(),
            Err(ValidationError::InvalidDateRange { .. })
        ));
    }

    #[test]
    fn validate_rejects_month_day_out_of_range() {
        let mut habit = Habit::new("Invoice", date(2026, 1, 1));
        habit.frequency = Frequency::Monthly;
        habit.month_days = vec![1, 32];
        assert!(habit.validate().is_err());
    }

    #[test]
    fn weekday_parses_names_and_abbreviations() {
        assert_eq!("monday".parse::<Weekday>().unwrap(), Weekday::Monday);
        assert_eq!("Thu".parse::<Weekday>().unwrap(), Weekday::Thursday);
        assert!("noday".parse::<Weekday>().is_err());
    }
}
