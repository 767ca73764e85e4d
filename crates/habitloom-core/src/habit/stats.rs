//! Completion-rate aggregation over calendar periods.

use chrono::{Months, NaiveDate};
use serde::{Deserialize, Serialize};

use super::completion::CompletionIndex;
use super::Habit;
use crate::error::ValidationError;

/// Completion statistics for a habit over a period.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodStats {
    /// Eligible days in the period that were completed
    pub completed_days: u32,
    /// Eligible days in the period
    pub total_eligible_days: u32,
    /// `completed / total` as a whole percentage; 0 when nothing was eligible
    pub completion_rate: u32,
}

/// Aggregate completion stats for an arbitrary inclusive date range.
///
/// Days outside the habit's active window are not eligible and fall out
/// of both counts. An empty or fully ineligible range yields all zeroes
/// rather than a division error.
pub fn compute_range_stats(
    habit: &Habit,
    index: &CompletionIndex,
    from: NaiveDate,
    to: NaiveDate,
) -> PeriodStats {
    if to < from {
        return PeriodStats::default();
    }

    let mut completed_days = 0u32;
    let mut total_eligible_days = 0u32;
    for day in from.iter_days().take_while(|d| *d <= to) {
        if !habit.is_eligible(day) {
            continue;
        }
        total_eligible_days += 1;
        if index.is_completed(&habit.id, day) {
            completed_days += 1;
        }
    }

    let completion_rate = if total_eligible_days > 0 {
        (f64::from(completed_days) / f64::from(total_eligible_days) * 100.0).round() as u32
    } else {
        0
    };

    PeriodStats {
        completed_days,
        total_eligible_days,
        completion_rate,
    }
}

/// Aggregate completion stats for one calendar month.
///
/// # Errors
/// Rejects a month outside 1-12.
pub fn compute_month_stats(
    habit: &Habit,
    index: &CompletionIndex,
    year: i32,
    month: u32,
) -> Result<PeriodStats, ValidationError> {
    let first = NaiveDate::from_ymd_opt(year, month, 1).ok_or(ValidationError::InvalidValue {
        field: "month".to_string(),
        message: format!("{year}-{month:02} is not a valid calendar month"),
    })?;
    let last = first
        .checked_add_months(Months::new(1))
        .and_then(|d| d.pred_opt())
        .ok_or(ValidationError::InvalidValue {
            field: "month".to_string(),
            message: format!("{year}-{month:02} is out of the supported date range"),
        })?;

    Ok(compute_range_stats(habit, index, first, last))
}
