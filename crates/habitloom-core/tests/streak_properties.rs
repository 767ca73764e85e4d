//! Property tests for the habit consistency engine.

use chrono::{Datelike, Days, NaiveDate, Utc};
use habitloom_core::{
    compute_range_stats, compute_streaks, CompletionIndex, CompletionLogEntry, Frequency, Habit,
    Weekday,
};
use proptest::prelude::*;

fn base() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 1, 1).unwrap()
}

fn day(offset: u64) -> NaiveDate {
    base().checked_add_days(Days::new(offset)).unwrap()
}

fn entries_for(habit_id: &str, offsets: &[u64]) -> Vec<CompletionLogEntry> {
    offsets
        .iter()
        .map(|&o| CompletionLogEntry {
            habit_id: habit_id.to_string(),
            date: day(o),
            logged_at: Utc::now(),
        })
        .collect()
}

proptest! {
    #[test]
    fn compute_streaks_is_idempotent(
        offsets in proptest::collection::vec(0u64..120, 0..40),
        as_of in 0u64..120,
    ) {
        let habit = Habit::new("h", base());
        let entries = entries_for(&habit.id, &offsets);
        let index = CompletionIndex::from_entries(&entries);

        let first = compute_streaks(&habit, &index, day(as_of));
        let second = compute_streaks(&habit, &index, day(as_of));
        prop_assert_eq!(first, second);
    }

    #[test]
    fn duplicate_entries_never_change_results(
        offsets in proptest::collection::vec(0u64..120, 0..40),
        as_of in 0u64..120,
    ) {
        let habit = Habit::new("h", base());
        let entries = entries_for(&habit.id, &offsets);
        let mut doubled = entries.clone();
        doubled.extend(entries.iter().cloned());

        let index = CompletionIndex::from_entries(&entries);
        let doubled_index = CompletionIndex::from_entries(&doubled);

        prop_assert_eq!(
            compute_streaks(&habit, &index, day(as_of)),
            compute_streaks(&habit, &doubled_index, day(as_of))
        );
        prop_assert_eq!(
            compute_range_stats(&habit, &index, base(), day(as_of)),
            compute_range_stats(&habit, &doubled_index, base(), day(as_of))
        );
    }

    #[test]
    fn current_never_exceeds_longest(
        offsets in proptest::collection::vec(0u64..120, 0..40),
        as_of in 0u64..120,
    ) {
        let habit = Habit::new("h", base());
        let entries = entries_for(&habit.id, &offsets);
        let index = CompletionIndex::from_entries(&entries);

        let summary = compute_streaks(&habit, &index, day(as_of));
        prop_assert!(summary.current <= summary.longest);
    }

    #[test]
    fn daily_habit_is_eligible_on_every_day_after_start(offset in 0u64..4000) {
        let habit = Habit::new("h", base());
        prop_assert!(habit.is_eligible(day(offset)));
    }

    #[test]
    fn weekly_eligible_days_match_configured_weekdays(
        through in 0u64..200,
    ) {
        let mut habit = Habit::new("h", base());
        habit.frequency = Frequency::Weekly;
        habit.weekdays = vec![Weekday::Monday, Weekday::Thursday];

        for eligible in habit.eligible_days(day(through)) {
            prop_assert!(matches!(
                eligible.weekday(),
                chrono::Weekday::Mon | chrono::Weekday::Thu
            ));
        }
    }

    #[test]
    fn completion_rate_is_a_percentage(
        offsets in proptest::collection::vec(0u64..120, 0..60),
        span in 0u64..120,
    ) {
        let habit = Habit::new("h", base());
        let entries = entries_for(&habit.id, &offsets);
        let index = CompletionIndex::from_entries(&entries);

        let stats = compute_range_stats(&habit, &index, base(), day(span));
        prop_assert!(stats.completion_rate <= 100);
        prop_assert!(stats.completed_days <= stats.total_eligible_days);
    }
}
