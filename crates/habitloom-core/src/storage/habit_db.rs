//! SQLite-based storage for habits and their completion log.
//!
//! The completion log carries the one-fact-per-day invariant in the
//! schema: `(habit_id, date)` is the primary key, and toggling a day off
//! deletes the row instead of writing a "false" record.

use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::{params, Connection, OptionalExtension};

use super::data_dir;
use crate::error::{CoreError, DatabaseError};
use crate::habit::{CompletionLogEntry, Frequency, Habit, Weekday};

/// Parse frequency from its database string.
fn parse_frequency(s: &str) -> Frequency {
    match s {
        "weekly" => Frequency::Weekly,
        "monthly" => Frequency::Monthly,
        _ => Frequency::Daily,
    }
}

/// Format frequency for database storage.
fn format_frequency(frequency: Frequency) -> &'static str {
    match frequency {
        Frequency::Daily => "daily",
        Frequency::Weekly => "weekly",
        Frequency::Monthly => "monthly",
    }
}

fn parse_weekdays(json: &str) -> Vec<Weekday> {
    serde_json::from_str(json).unwrap_or_default()
}

fn parse_month_days(json: &str) -> Vec<u8> {
    serde_json::from_str(json).unwrap_or_default()
}

fn parse_date(table: &str, s: &str) -> Result<NaiveDate, DatabaseError> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|_| DatabaseError::CorruptRow {
        table: table.to_string(),
        message: format!("'{s}' is not a calendar date"),
    })
}

/// Parse datetime from RFC3339 with fallback to the current time.
fn parse_datetime_fallback(dt_str: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(dt_str)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|_| Utc::now())
}

fn row_to_habit(row: &rusqlite::Row) -> Result<Habit, rusqlite::Error> {
    let frequency_str: String = row.get(2)?;
    let weekdays_json: String = row.get(3)?;
    let month_days_json: String = row.get(4)?;
    let start_date_str: String = row.get(5)?;
    let end_date_str: Option<String> = row.get(6)?;
    let created_at_str: String = row.get(7)?;
    let updated_at_str: String = row.get(8)?;

    let bad_date = |s: &str| {
        rusqlite::Error::FromSqlConversionFailure(
            0,
            rusqlite::types::Type::Text,
            format!("'{s}' is not a calendar date").into(),
        )
    };
    let start_date =
        NaiveDate::parse_from_str(&start_date_str, "%Y-%m-%d").map_err(|_| bad_date(&start_date_str))?;
    let end_date = match end_date_str {
        Some(s) => Some(NaiveDate::parse_from_str(&s, "%Y-%m-%d").map_err(|_| bad_date(&s))?),
        None => None,
    };

    Ok(Habit {
        id: row.get(0)?,
        name: row.get(1)?,
        frequency: parse_frequency(&frequency_str),
        weekdays: parse_weekdays(&weekdays_json),
        month_days: parse_month_days(&month_days_json),
        start_date,
        end_date,
        created_at: parse_datetime_fallback(&created_at_str),
        updated_at: parse_datetime_fallback(&updated_at_str),
    })
}

/// SQLite database for habit storage.
///
/// Stores habit definitions and the completion log. The engine never
/// sees this type; callers load snapshots and hand plain values over.
pub struct HabitDb {
    conn: Connection,
}

impl HabitDb {
    /// Open the database at `~/.config/habitloom/habitloom.db`.
    ///
    /// Creates the database file and schema if they don't exist.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open() -> Result<Self, CoreError> {
        let path = data_dir()?.join("habitloom.db");
        let conn =
            Connection::open(&path).map_err(|source| DatabaseError::OpenFailed { path, source })?;
        // Another process (a second CLI invocation) may hold the write lock.
        conn.busy_timeout(std::time::Duration::from_secs(5))
            .map_err(DatabaseError::from)?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    /// Open an in-memory database (for tests).
    pub fn open_memory() -> Result<Self, CoreError> {
        let conn = Connection::open_in_memory().map_err(DatabaseError::from)?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    fn migrate(&self) -> Result<(), DatabaseError> {
        self.conn
            .execute_batch(
                "CREATE TABLE IF NOT EXISTS habits (
                    id          TEXT PRIMARY KEY,
                    name        TEXT NOT NULL,
                    frequency   TEXT NOT NULL DEFAULT 'daily',
                    weekdays    TEXT NOT NULL DEFAULT '[]',
                    month_days  TEXT NOT NULL DEFAULT '[]',
                    start_date  TEXT NOT NULL,
                    end_date    TEXT,
                    created_at  TEXT NOT NULL,
                    updated_at  TEXT NOT NULL
                );

                CREATE TABLE IF NOT EXISTS completion_log (
                    habit_id  TEXT NOT NULL,
                    date      TEXT NOT NULL,
                    logged_at TEXT NOT NULL,
                    PRIMARY KEY (habit_id, date)
                );

                CREATE INDEX IF NOT EXISTS idx_completion_log_habit
                    ON completion_log(habit_id);",
            )
            .map_err(|e| DatabaseError::MigrationFailed(e.to_string()))
    }

    /// # Errors
    /// Returns an error if the insert fails.
    pub fn create_habit(&self, habit: &Habit) -> Result<(), DatabaseError> {
        self.conn.execute(
            "INSERT INTO habits (id, name, frequency, weekdays, month_days,
                                 start_date, end_date, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            params![
                habit.id,
                habit.name,
                format_frequency(habit.frequency),
                serde_json::to_string(&habit.weekdays).unwrap_or_else(|_| "[]".to_string()),
                serde_json::to_string(&habit.month_days).unwrap_or_else(|_| "[]".to_string()),
                habit.start_date.to_string(),
                habit.end_date.map(|d| d.to_string()),
                habit.created_at.to_rfc3339(),
                habit.updated_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    pub fn get_habit(&self, id: &str) -> Result<Option<Habit>, DatabaseError> {
        let habit = self
            .conn
            .query_row(
                "SELECT id, name, frequency, weekdays, month_days,
                        start_date, end_date, created_at, updated_at
                 FROM habits WHERE id = ?1",
                params![id],
                row_to_habit,
            )
            .optional()?;
        Ok(habit)
    }

    pub fn list_habits(&self) -> Result<Vec<Habit>, DatabaseError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, name, frequency, weekdays, month_days,
                    start_date, end_date, created_at, updated_at
             FROM habits ORDER BY created_at",
        )?;
        let habits = stmt
            .query_map([], row_to_habit)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(habits)
    }

    /// # Errors
    /// Returns an error if the update fails.
    pub fn update_habit(&self, habit: &Habit) -> Result<(), DatabaseError> {
        self.conn.execute(
            "UPDATE habits SET name = ?2, frequency = ?3, weekdays = ?4,
                    month_days = ?5, start_date = ?6, end_date = ?7, updated_at = ?8
             WHERE id = ?1",
            params![
                habit.id,
                habit.name,
                format_frequency(habit.frequency),
                serde_json::to_string(&habit.weekdays).unwrap_or_else(|_| "[]".to_string()),
                serde_json::to_string(&habit.month_days).unwrap_or_else(|_| "[]".to_string()),
                habit.start_date.to_string(),
                habit.end_date.map(|d| d.to_string()),
                habit.updated_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    /// Delete a habit and its completion log.
    pub fn delete_habit(&self, id: &str) -> Result<bool, DatabaseError> {
        self.conn
            .execute("DELETE FROM completion_log WHERE habit_id = ?1", params![id])?;
        let deleted = self
            .conn
            .execute("DELETE FROM habits WHERE id = ?1", params![id])?;
        Ok(deleted > 0)
    }

    /// Toggle the completion fact for `(habit_id, date)`.
    ///
    /// Returns `true` when the day is now completed, `false` when the
    /// existing fact was removed.
    pub fn toggle_completion(&self, habit_id: &str, date: NaiveDate) -> Result<bool, DatabaseError> {
        let deleted = self.conn.execute(
            "DELETE FROM completion_log WHERE habit_id = ?1 AND date = ?2",
            params![habit_id, date.to_string()],
        )?;
        if deleted > 0 {
            return Ok(false);
        }
        // INSERT OR IGNORE: a concurrent writer may have raced the delete.
        self.conn.execute(
            "INSERT OR IGNORE INTO completion_log (habit_id, date, logged_at)
             VALUES (?1, ?2, ?3)",
            params![habit_id, date.to_string(), Utc::now().to_rfc3339()],
        )?;
        Ok(true)
    }

    /// All completion facts for one habit, ascending by date.
    pub fn completions_for(&self, habit_id: &str) -> Result<Vec<CompletionLogEntry>, DatabaseError> {
        let mut stmt = self.conn.prepare(
            "SELECT habit_id, date, logged_at FROM completion_log
             WHERE habit_id = ?1 ORDER BY date",
        )?;
        let rows = stmt.query_map(params![habit_id], |row| {
            let habit_id: String = row.get(0)?;
            let date_str: String = row.get(1)?;
            let logged_at_str: String = row.get(2)?;
            Ok((habit_id, date_str, logged_at_str))
        })?;

        let mut entries = Vec::new();
        for row in rows {
            let (habit_id, date_str, logged_at_str) = row?;
            entries.push(CompletionLogEntry {
                habit_id,
                date: parse_date("completion_log", &date_str)?,
                logged_at: parse_datetime_fallback(&logged_at_str),
            });
        }
        Ok(entries)
    }

    /// All completion facts across habits, ascending by date.
    pub fn all_completions(&self) -> Result<Vec<CompletionLogEntry>, DatabaseError> {
        let mut stmt = self.conn.prepare(
            "SELECT habit_id, date, logged_at FROM completion_log ORDER BY date",
        )?;
        let rows = stmt.query_map([], |row| {
            let habit_id: String = row.get(0)?;
            let date_str: String = row.get(1)?;
            let logged_at_str: String = row.get(2)?;
            Ok((habit_id, date_str, logged_at_str))
        })?;

        let mut entries = Vec::new();
        for row in rows {
            let (habit_id, date_str, logged_at_str) = row?;
            entries.push(CompletionLogEntry {
                habit_id,
                date: parse_date("completion_log", &date_str)?,
                logged_at: parse_datetime_fallback(&logged_at_str),
            });
        }
        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn habit_round_trip() {
        let db = HabitDb::open_memory().unwrap();
        let mut habit = Habit::new("Gym", date(2026, 1, 5));
        habit.frequency = Frequency::Weekly;
        habit.weekdays = vec![Weekday::Monday, Weekday::Thursday];
        habit.end_date = Some(date(2026, 6, 30));

        db.create_habit(&habit).unwrap();
        let loaded = db.get_habit(&habit.id).unwrap().unwrap();
        assert_eq!(loaded.name, "Gym");
        assert_eq!(loaded.frequency, Frequency::Weekly);
        assert_eq!(loaded.weekdays, habit.weekdays);
        assert_eq!(loaded.start_date, habit.start_date);
        assert_eq!(loaded.end_date, habit.end_date);
    }

    #[test]
    fn update_and_delete() {
        let db = HabitDb::open_memory().unwrap();
        let mut habit = Habit::new("Read", date(2026, 1, 1));
        db.create_habit(&habit).unwrap();

        habit.name = "Read fiction".to_string();
        db.update_habit(&habit).unwrap();
        assert_eq!(db.get_habit(&habit.id).unwrap().unwrap().name, "Read fiction");

        assert!(db.delete_habit(&habit.id).unwrap());
        assert!(db.get_habit(&habit.id).unwrap().is_none());
        assert!(!db.delete_habit(&habit.id).unwrap());
    }

    #[test]
    fn toggle_inserts_then_removes() {
        let db = HabitDb::open_memory().unwrap();
        let habit = Habit::new("Walk", date(2026, 1, 1));
        db.create_habit(&habit).unwrap();
        let day = date(2026, 1, 2);

        assert!(db.toggle_completion(&habit.id, day).unwrap());
        assert_eq!(db.completions_for(&habit.id).unwrap().len(), 1);

        assert!(!db.toggle_completion(&habit.id, day).unwrap());
        assert!(db.completions_for(&habit.id).unwrap().is_empty());
    }

    #[test]
    fn schema_rejects_duplicate_facts() {
        let db = HabitDb::open_memory().unwrap();
        let day = date(2026, 1, 2).to_string();
        let now = Utc::now().to_rfc3339();
        db.conn
            .execute(
                "INSERT INTO completion_log (habit_id, date, logged_at) VALUES ('h1', ?1, ?2)",
                params![day, now],
            )
            .unwrap();
        let dup = db.conn.execute(
            "INSERT INTO completion_log (habit_id, date, logged_at) VALUES ('h1', ?1, ?2)",
            params![day, now],
        );
        assert!(dup.is_err());
    }

    #[test]
    fn delete_habit_drops_its_log() {
        let db = HabitDb::open_memory().unwrap();
        let habit = Habit::new("Walk", date(2026, 1, 1));
        db.create_habit(&habit).unwrap();
        db.toggle_completion(&habit.id, date(2026, 1, 2)).unwrap();

        db.delete_habit(&habit.id).unwrap();
        assert!(db.all_completions().unwrap().is_empty());
    }
}
