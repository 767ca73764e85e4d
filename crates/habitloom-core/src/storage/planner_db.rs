//! SQLite-based storage for tasks, projects, and time blocks.

use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::{params, Connection, OptionalExtension};

use super::data_dir;
use crate::block::TimeBlock;
use crate::error::{CoreError, DatabaseError};
use crate::habit::Weekday;
use crate::task::{Column, Project, Quadrant, Task};

// === Helper Functions ===

/// Parse quadrant from database string
fn parse_quadrant(s: &str) -> Quadrant {
    match s {
        "urgent_important" => Quadrant::UrgentImportant,
        "urgent_not_important" => Quadrant::UrgentNotImportant,
        "not_urgent_not_important" => Quadrant::NotUrgentNotImportant,
        _ => Quadrant::NotUrgentImportant,
    }
}

/// Format quadrant for database storage
fn format_quadrant(quadrant: Quadrant) -> &'static str {
    match quadrant {
        Quadrant::UrgentImportant => "urgent_important",
        Quadrant::NotUrgentImportant => "not_urgent_important",
        Quadrant::UrgentNotImportant => "urgent_not_important",
        Quadrant::NotUrgentNotImportant => "not_urgent_not_important",
    }
}

/// Parse column from database string
fn parse_column(s: &str) -> Column {
    match s {
        "todo" => Column::Todo,
        "doing" => Column::Doing,
        "done" => Column::Done,
        _ => Column::Backlog,
    }
}

/// Format column for database storage
fn format_column(column: Column) -> &'static str {
    match column {
        Column::Backlog => "backlog",
        Column::Todo => "todo",
        Column::Doing => "doing",
        Column::Done => "done",
    }
}

fn parse_weekdays(json: &str) -> Vec<Weekday> {
    serde_json::from_str(json).unwrap_or_default()
}

fn parse_date_opt(s: Option<String>) -> Option<NaiveDate> {
    s.and_then(|s| NaiveDate::parse_from_str(&s, "%Y-%m-%d").ok())
}

/// Parse datetime from RFC3339 with fallback to the current time.
fn parse_datetime_fallback(dt_str: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(dt_str)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|_| Utc::now())
}

fn row_to_task(row: &rusqlite::Row) -> Result<Task, rusqlite::Error> {
    let quadrant_str: String = row.get(3)?;
    let column_str: String = row.get(4)?;
    let due_date_str: Option<String> = row.get(7)?;
    let created_at_str: String = row.get(8)?;
    let updated_at_str: String = row.get(9)?;
    let completed_at_str: Option<String> = row.get(10)?;

    Ok(Task {
        id: row.get(0)?,
        title: row.get(1)?,
        notes: row.get(2)?,
        quadrant: parse_quadrant(&quadrant_str),
        column: parse_column(&column_str),
        position: row.get(5)?,
        project_id: row.get(6)?,
        due_date: parse_date_opt(due_date_str),
        created_at: parse_datetime_fallback(&created_at_str),
        updated_at: parse_datetime_fallback(&updated_at_str),
        completed_at: completed_at_str.map(|s| parse_datetime_fallback(&s)),
    })
}

fn row_to_block(row: &rusqlite::Row) -> Result<TimeBlock, rusqlite::Error> {
    let weekdays_json: String = row.get(4)?;
    let date_str: Option<String> = row.get(5)?;

    Ok(TimeBlock {
        id: row.get(0)?,
        title: row.get(1)?,
        start_time: row.get(2)?,
        duration_minutes: row.get(3)?,
        weekdays: parse_weekdays(&weekdays_json),
        date: parse_date_opt(date_str),
        task_id: row.get(6)?,
        enabled: row.get(7)?,
    })
}

const TASK_COLUMNS: &str = "id, title, notes, quadrant, column_name, position,
                            project_id, due_date, created_at, updated_at, completed_at";

/// SQLite database for planner storage.
///
/// Stores tasks, projects, and time blocks.
pub struct PlannerDb {
    conn: Connection,
}

impl PlannerDb {
    /// Open the planner database at `~/.config/habitloom/habitloom.db`.
    ///
    /// Creates tables if they don't exist.
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
        // column is a keyword-adjacent name; stored as column_name.
        self.conn
            .execute_batch(
                "CREATE TABLE IF NOT EXISTS tasks (
                    id           TEXT PRIMARY KEY,
                    title        TEXT NOT NULL,
                    notes        TEXT,
                    quadrant     TEXT NOT NULL DEFAULT 'not_urgent_important',
                    column_name  TEXT NOT NULL DEFAULT 'backlog',
                    position     INTEGER NOT NULL DEFAULT 0,
                    project_id   TEXT,
                    due_date     TEXT,
                    created_at   TEXT NOT NULL,
                    updated_at   TEXT NOT NULL,
                    completed_at TEXT
                );

                CREATE TABLE IF NOT EXISTS projects (
                    id         TEXT PRIMARY KEY,
                    name       TEXT NOT NULL,
                    deadline   TEXT,
                    created_at TEXT NOT NULL
                );

                CREATE TABLE IF NOT EXISTS time_blocks (
                    id               TEXT PRIMARY KEY,
                    title            TEXT NOT NULL,
                    start_time       TEXT NOT NULL,
                    duration_minutes INTEGER NOT NULL,
                    weekdays         TEXT NOT NULL DEFAULT '[]',
                    date             TEXT,
                    task_id          TEXT,
                    enabled          INTEGER NOT NULL DEFAULT 1
                );

                CREATE INDEX IF NOT EXISTS idx_tasks_column
                    ON tasks(column_name, position);",
            )
            .map_err(|e| DatabaseError::MigrationFailed(e.to_string()))
    }

    // === Tasks ===

    pub fn create_task(&self, task: &Task) -> Result<(), DatabaseError> {
        self.conn.execute(
            &format!(
                "INSERT INTO tasks ({TASK_COLUMNS})
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)"
            ),
            params![
                task.id,
                task.title,
                task.notes,
                format_quadrant(task.quadrant),
                format_column(task.column),
                task.position,
                task.project_id,
                task.due_date.map(|d| d.to_string()),
                task.created_at.to_rfc3339(),
                task.updated_at.to_rfc3339(),
                task.completed_at.map(|t| t.to_rfc3339()),
            ],
        )?;
        Ok(())
    }

    pub fn get_task(&self, id: &str) -> Result<Option<Task>, DatabaseError> {
        let task = self
            .conn
            .query_row(
                &format!("SELECT {TASK_COLUMNS} FROM tasks WHERE id = ?1"),
                params![id],
                row_to_task,
            )
            .optional()?;
        Ok(task)
    }

    /// All tasks, ordered by column then position.
    pub fn list_tasks(&self) -> Result<Vec<Task>, DatabaseError> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {TASK_COLUMNS} FROM tasks ORDER BY column_name, position, created_at"
        ))?;
        let tasks = stmt
            .query_map([], row_to_task)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(tasks)
    }

    pub fn update_task(&self, task: &Task) -> Result<(), DatabaseError> {
        self.conn.execute(
            "UPDATE tasks SET title = ?2, notes = ?3, quadrant = ?4, column_name = ?5,
                    position = ?6, project_id = ?7, due_date = ?8, updated_at = ?9,
                    completed_at = ?10
             WHERE id = ?1",
            params![
                task.id,
                task.title,
                task.notes,
                format_quadrant(task.quadrant),
                format_column(task.column),
                task.position,
                task.project_id,
                task.due_date.map(|d| d.to_string()),
                task.updated_at.to_rfc3339(),
                task.completed_at.map(|t| t.to_rfc3339()),
            ],
        )?;
        Ok(())
    }

    /// Persist a batch of `(task_id, column, position)` assignments in one
    /// transaction, as produced by the reorder routines.
    pub fn apply_positions(
        &mut self,
        assignments: &[(String, Column, i64)],
    ) -> Result<(), DatabaseError> {
        let tx = self.conn.transaction()?;
        for (id, column, position) in assignments {
            tx.execute(
                "UPDATE tasks SET column_name = ?2, position = ?3, updated_at = ?4
                 WHERE id = ?1",
                params![
                    id,
                    format_column(*column),
                    position,
                    Utc::now().to_rfc3339()
                ],
            )?;
        }
        tx.commit()?;
        Ok(())
    }

    pub fn delete_task(&self, id: &str) -> Result<bool, DatabaseError> {
        let deleted = self
            .conn
            .execute("DELETE FROM tasks WHERE id = ?1", params![id])?;
        Ok(deleted > 0)
    }

    // === Projects ===

    pub fn create_project(&self, project: &Project) -> Result<(), DatabaseError> {
        self.conn.execute(
            "INSERT INTO projects (id, name, deadline, created_at) VALUES (?1, ?2, ?3, ?4)",
            params![
                project.id,
                project.name,
                project.deadline.map(|d| d.to_string()),
                project.created_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    pub fn list_projects(&self) -> Result<Vec<Project>, DatabaseError> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, name, deadline, created_at FROM projects ORDER BY created_at")?;
        let projects = stmt
            .query_map([], |row| {
                let deadline_str: Option<String> = row.get(2)?;
                let created_at_str: String = row.get(3)?;
                Ok(Project {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    deadline: parse_date_opt(deadline_str),
                    created_at: parse_datetime_fallback(&created_at_str),
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(projects)
    }

    /// Delete a project, detaching its tasks.
    pub fn delete_project(&self, id: &str) -> Result<bool, DatabaseError> {
        self.conn.execute(
            "UPDATE tasks SET project_id = NULL WHERE project_id = ?1",
            params![id],
        )?;
        let deleted = self
            .conn
            .execute("DELETE FROM projects WHERE id = ?1", params![id])?;
        Ok(deleted > 0)
    }

    // === Time blocks ===

    pub fn create_block(&self, block: &TimeBlock) -> Result<(), DatabaseError> {
        self.conn.execute(
            "INSERT INTO time_blocks (id, title, start_time, duration_minutes,
                                      weekdays, date, task_id, enabled)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                block.id,
                block.title,
                block.start_time,
                block.duration_minutes,
                serde_json::to_string(&block.weekdays).unwrap_or_else(|_| "[]".to_string()),
                block.date.map(|d| d.to_string()),
                block.task_id,
                block.enabled,
            ],
        )?;
        Ok(())
    }

    pub fn get_block(&self, id: &str) -> Result<Option<TimeBlock>, DatabaseError> {
        let block = self
            .conn
            .query_row(
                "SELECT id, title, start_time, duration_minutes, weekdays, date, task_id, enabled
                 FROM time_blocks WHERE id = ?1",
                params![id],
                row_to_block,
            )
            .optional()?;
        Ok(block)
    }

    pub fn list_blocks(&self) -> Result<Vec<TimeBlock>, DatabaseError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, title, start_time, duration_minutes, weekdays, date, task_id, enabled
             FROM time_blocks ORDER BY start_time",
        )?;
        let blocks = stmt
            .query_map([], row_to_block)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(blocks)
    }

    pub fn delete_block(&self, id: &str) -> Result<bool, DatabaseError> {
        let deleted = self
            .conn
            .execute("DELETE FROM time_blocks WHERE id = ?1", params![id])?;
        Ok(deleted > 0)
    }
}
