//! Streak computation over a habit's eligible-day sequence.
//!
//! "Consecutive" always means consecutive *eligible occurrences*, never
//! calendar adjacency: a Monday-only habit's streak counts Mondays, and
//! the six days in between neither extend nor break it.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::completion::CompletionIndex;
use super::Habit;

/// Current and longest streak for a habit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreakSummary {
    /// Consecutive completed eligible days ending at the most recent
    /// eligible day on or before the as-of date
    pub current: u32,
    /// Longest run of completed eligible days in the habit's history
    pub longest: u32,
}

/// Compute current and longest streaks as of `as_of`.
///
/// The eligible-day sequence runs from the habit's start date through
/// `min(as_of, end_date)`. `longest` is a single forward scan; `current`
/// walks backward from the most recent eligible day until the first
/// incomplete one. When the most recent eligible day is itself incomplete
/// (typically an in-progress "today"), `current` is 0 until it is
/// completed; completing it restores the full run.
///
/// An empty eligible sequence, including `as_of` before the start date,
/// yields `{current: 0, longest: 0}`.
pub fn compute_streaks(habit: &Habit, index: &CompletionIndex, as_of: NaiveDate) -> StreakSummary {
    let days = habit.eligible_days(as_of);

    let mut longest = 0u32;
    let mut run = 0u32;
    for day in &days {
        if index.is_completed(&habit.id, *day) {
            run += 1;
            longest = longest.max(run);
        } else {
            run = 0;
        }
    }

    let mut current = 0u32;
    for day in days.iter().rev() {
        if index.is_completed(&habit.id, *day) {
            current += 1;
        } else {
            break;
        }
    }

    StreakSummary { current, longest }
}
