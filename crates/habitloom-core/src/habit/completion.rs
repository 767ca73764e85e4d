//! Completion lookup index.
//!
//! Log entries arrive as a flat slice from storage; streak and rate
//! computations need O(1) membership checks keyed by habit and day.

use chrono::NaiveDate;
use std::collections::HashSet;

use super::CompletionLogEntry;

/// Day-keyed completion lookup built from a snapshot of log entries.
///
/// Duplicate rows for the same `(habit_id, date)` collapse into a single
/// fact, so aggregate counts never double-count a data-integrity anomaly.
#[derive(Debug, Clone, Default)]
pub struct CompletionIndex {
    completed: HashSet<(String, NaiveDate)>,
}

impl CompletionIndex {
    /// Build the index from log entries.
    pub fn from_entries(entries: &[CompletionLogEntry]) -> Self {
        let completed = entries
            .iter()
            .map(|e| (e.habit_id.clone(), e.date))
            .collect();
        Self { completed }
    }

    /// Whether `habit_id` was completed on `day`.
    pub fn is_completed(&self, habit_id: &str, day: NaiveDate) -> bool {
        // Keyed lookup; the tuple borrow dance isn't worth it at this size.
        self.completed.contains(&(habit_id.to_string(), day))
    }

    /// Number of distinct completion facts in the index.
    pub fn len(&self) -> usize {
        self.completed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.completed.is_empty()
    }
}
