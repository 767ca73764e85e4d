//! Recurrence evaluation: which calendar days a habit is due on.

use chrono::{Datelike, NaiveDate};

use super::{Frequency, Habit};

impl Habit {
    /// Whether `day` is an eligible day for this habit.
    ///
    /// Days outside the `[start_date, end_date]` window are never eligible.
    /// A weekly habit with no weekdays configured is due every day; a
    /// monthly habit with no days configured is due on the 1st only. Both
    /// fallbacks match what the product shipped, so a habit with an empty
    /// rule set stays visible instead of silently disappearing.
    pub fn is_eligible(&self, day: NaiveDate) -> bool {
        if day < self.start_date {
            return false;
        }
        if let Some(end) = self.end_date {
            if day > end {
                return false;
            }
        }
        match self.frequency {
            Frequency::Daily => true,
            Frequency::Weekly => {
                self.weekdays.is_empty()
                    || self.weekdays.iter().any(|w| w.to_chrono() == day.weekday())
            }
            Frequency::Monthly => {
                if self.month_days.is_empty() {
                    day.day() == 1
                } else {
                    self.month_days.iter().any(|&d| u32::from(d) == day.day())
                }
            }
        }
    }

    /// All eligible days from `start_date` through `min(through, end_date)`,
    /// ascending. Empty when `through` precedes the start date.
    pub fn eligible_days(&self, through: NaiveDate) -> Vec<NaiveDate> {
        let last = match self.end_date {
            Some(end) if end < through => end,
            _ => through,
        };
        if last < self.start_date {
            return Vec::new();
        }
        self.start_date
            .iter_days()
            .take_while(|d| *d <= last)
            .filter(|d| self.is_eligible(*d))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use crate::habit::{Frequency, Habit, Weekday};
    use chrono::{Datelike, NaiveDate};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn daily_eligible_every_day_in_window() {
        let mut habit = Habit::new("Walk", date(2026, 1, 10));
        habit.end_date = Some(date(2026, 1, 20));

        assert!(!habit.is_eligible(date(2026, 1, 9)));
        assert!(habit.is_eligible(date(2026, 1, 10)));
        assert!(habit.is_eligible(date(2026, 1, 15)));
        assert!(habit.is_eligible(date(2026, 1, 20)));
        assert!(!habit.is_eligible(date(2026, 1, 21)));
    }

    #[test]
    fn weekly_matches_only_configured_weekdays() {
        let mut habit = Habit::new("Gym", date(2026, 1, 1));
        habit.frequency = Frequency::Weekly;
        habit.weekdays = vec![Weekday::Monday, Weekday::Thursday];

        // 2026-01-05 is a Monday
        assert!(habit.is_eligible(date(2026, 1, 5)));
        assert!(habit.is_eligible(date(2026, 1, 8)));
        assert!(!habit.is_eligible(date(2026, 1, 6)));
        assert!(!habit.is_eligible(date(2026, 1, 10)));
    }

    #[test]
    fn weekly_four_week_window_has_exactly_eight_days() {
        let mut habit = Habit::new("Gym", date(2026, 1, 5));
        habit.frequency = Frequency::Weekly;
        habit.weekdays = vec![Weekday::Monday, Weekday::Thursday];

        // Four full weeks starting Monday 2026-01-05.
        let days = habit.eligible_days(date(2026, 2, 1));
        assert_eq!(days.len(), 8);
        for day in days {
            assert!(matches!(
                day.weekday(),
                chrono::Weekday::Mon | chrono::Weekday::Thu
            ));
        }
    }

    #[test]
    fn weekly_empty_set_falls_back_to_every_day() {
        let mut habit = Habit::new("Journal", date(2026, 1, 1));
        habit.frequency = Frequency::Weekly;

        assert!(habit.is_eligible(date(2026, 1, 6)));
        assert!(habit.is_eligible(date(2026, 1, 7)));
    }

    #[test]
    fn monthly_matches_configured_days() {
        let mut habit = Habit::new("Invoice", date(2026, 1, 1));
        habit.frequency = Frequency::Monthly;
        habit.month_days = vec![1, 15];

        assert!(habit.is_eligible(date(2026, 3, 1)));
        assert!(habit.is_eligible(date(2026, 3, 15)));
        assert!(!habit.is_eligible(date(2026, 3, 2)));
    }

    #[test]
    fn monthly_empty_set_defaults_to_first_of_month() {
        let mut habit = Habit::new("Review", date(2026, 1, 1));
        habit.frequency = Frequency::Monthly;

        assert!(habit.is_eligible(date(2026, 4, 1)));
        assert!(!habit.is_eligible(date(2026, 4, 2)));
    }

    #[test]
    fn eligible_days_empty_before_start() {
        let habit = Habit::new("Walk", date(2026, 5, 1));
        assert!(habit.eligible_days(date(2026, 4, 30)).is_empty());
    }

    #[test]
    fn eligible_days_clamped_to_end_date() {
        let mut habit = Habit::new("Walk", date(2026, 1, 1));
        habit.end_date = Some(date(2026, 1, 3));

        let days = habit.eligible_days(date(2026, 1, 31));
        assert_eq!(
            days,
            vec![date(2026, 1, 1), date(2026, 1, 2), date(2026, 1, 3)]
        );
    }
}
