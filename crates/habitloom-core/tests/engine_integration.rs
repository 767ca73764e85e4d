//! End-to-end: persist habits and completions, then run the engine over
//! a loaded snapshot, the way the CLI does.

use chrono::NaiveDate;
use habitloom_core::{
    compute_month_stats, compute_streaks, CompletionIndex, Frequency, Habit, HabitDb, Weekday,
};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn streaks_from_persisted_log() {
    let db = HabitDb::open_memory().unwrap();
    let mut habit = Habit::new("Gym", date(2026, 1, 5));
    habit.frequency = Frequency::Weekly;
    habit.weekdays = vec![Weekday::Monday];
    habit.validate().unwrap();
    db.create_habit(&habit).unwrap();

    // Three consecutive Mondays.
    for day in [date(2026, 1, 5), date(2026, 1, 12), date(2026, 1, 19)] {
        assert!(db.toggle_completion(&habit.id, day).unwrap());
    }

    let entries = db.completions_for(&habit.id).unwrap();
    let index = CompletionIndex::from_entries(&entries);
    let summary = compute_streaks(&habit, &index, date(2026, 1, 19));
    assert_eq!(summary.current, 3);
    assert_eq!(summary.longest, 3);
}

#[test]
fn toggling_off_removes_the_fact_everywhere() {
    let db = HabitDb::open_memory().unwrap();
    let habit = Habit::new("Walk", date(2026, 3, 1));
    db.create_habit(&habit).unwrap();

    db.toggle_completion(&habit.id, date(2026, 3, 1)).unwrap();
    db.toggle_completion(&habit.id, date(2026, 3, 2)).unwrap();
    // Un-complete the first day.
    db.toggle_completion(&habit.id, date(2026, 3, 1)).unwrap();

    let entries = db.completions_for(&habit.id).unwrap();
    let index = CompletionIndex::from_entries(&entries);

    let summary = compute_streaks(&habit, &index, date(2026, 3, 2));
    assert_eq!(summary.current, 1);
    assert_eq!(summary.longest, 1);

    let stats = compute_month_stats(&habit, &index, 2026, 3).unwrap();
    assert_eq!(stats.completed_days, 1);
}

#[test]
fn ics_file_import_to_one_off_blocks() {
    use habitloom_core::services::ics::parse_ics;
    use habitloom_core::TimeBlock;
    use std::io::Write;

    let ics = "BEGIN:VCALENDAR\r\nBEGIN:VEVENT\r\nSUMMARY:Dentist\r\nDTSTART:20260107T143000\r\nDTEND:20260107T153000\r\nEND:VEVENT\r\nEND:VCALENDAR\r\n";
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(ics.as_bytes()).unwrap();

    let text = std::fs::read_to_string(file.path()).unwrap();
    let events = parse_ics(&text).unwrap();
    assert_eq!(events.len(), 1);

    let event = &events[0];
    let block = TimeBlock::one_off(
        event.summary.clone(),
        event.start.format("%H:%M").to_string(),
        event.duration_minutes().unwrap(),
        event.start.date(),
    );
    block.validate().unwrap();
    assert_eq!(block.start_time, "14:30");
    assert_eq!(block.duration_minutes, 60);
    assert!(block.occurs_on(date(2026, 1, 7)));
}

#[test]
fn month_stats_over_mixed_habits() {
    let db = HabitDb::open_memory().unwrap();
    let mut invoice = Habit::new("Invoice", date(2026, 1, 1));
    invoice.frequency = Frequency::Monthly;
    invoice.month_days = vec![1, 15];
    db.create_habit(&invoice).unwrap();

    db.toggle_completion(&invoice.id, date(2026, 2, 1)).unwrap();

    let entries = db.all_completions().unwrap();
    let index = CompletionIndex::from_entries(&entries);
    let stats = compute_month_stats(&invoice, &index, 2026, 2).unwrap();
    assert_eq!(stats.total_eligible_days, 2);
    assert_eq!(stats.completed_days, 1);
    assert_eq!(stats.completion_rate, 50);
}
