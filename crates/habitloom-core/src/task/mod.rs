//! Task and project types for the Eisenhower/Kanban planner.

pub mod reorder;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;

use crate::error::ValidationError;

/// Eisenhower quadrant a task is filed under.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Quadrant {
    /// Urgent and important: do first
    UrgentImportant,
    /// Important but not urgent: schedule
    NotUrgentImportant,
    /// Urgent but not important: delegate
    UrgentNotImportant,
    /// Neither: drop or backlog
    NotUrgentNotImportant,
}

impl Default for Quadrant {
    fn default() -> Self {
        Quadrant::NotUrgentImportant
    }
}

impl FromStr for Quadrant {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "urgent-important" | "do" => Ok(Quadrant::UrgentImportant),
            "not-urgent-important" | "schedule" => Ok(Quadrant::NotUrgentImportant),
            "urgent-not-important" | "delegate" => Ok(Quadrant::UrgentNotImportant),
            "not-urgent-not-important" | "drop" => Ok(Quadrant::NotUrgentNotImportant),
            other => Err(ValidationError::InvalidValue {
                field: "quadrant".to_string(),
                message: format!("unknown quadrant '{other}'"),
            }),
        }
    }
}

/// Kanban column a task sits in.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Column {
    Backlog,
    Todo,
    Doing,
    Done,
}

impl Default for Column {
    fn default() -> Self {
        Column::Backlog
    }
}

impl Column {
    pub fn is_done(self) -> bool {
        self == Column::Done
    }
}

impl FromStr for Column {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "backlog" => Ok(Column::Backlog),
            "todo" => Ok(Column::Todo),
            "doing" => Ok(Column::Doing),
            "done" => Ok(Column::Done),
            other => Err(ValidationError::InvalidValue {
                field: "column".to_string(),
                message: format!("unknown column '{other}'"),
            }),
        }
    }
}

/// A planner task.
///
/// `position` orders tasks within their column; the reorder routine in
/// [`reorder`] recomputes positions when a task moves.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub title: String,
    pub notes: Option<String>,
    pub quadrant: Quadrant,
    pub column: Column,
    pub position: i64,
    pub project_id: Option<String>,
    pub due_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl Task {
    /// Create a new backlog task.
    pub fn new(title: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            title: title.into(),
            notes: None,
            quadrant: Quadrant::default(),
            column: Column::default(),
            position: 0,
            project_id: None,
            due_date: None,
            created_at: now,
            updated_at: now,
            completed_at: None,
        }
    }

    /// Move to `column`, maintaining the completion timestamp: entering
    /// `done` stamps it, leaving `done` clears it.
    pub fn move_to(&mut self, column: Column, now: DateTime<Utc>) {
        if column.is_done() && !self.column.is_done() {
            self.completed_at = Some(now);
        } else if !column.is_done() {
            self.completed_at = None;
        }
        self.column = column;
        self.updated_at = now;
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.title.trim().is_empty() {
            return Err(ValidationError::InvalidValue {
                field: "title".to_string(),
                message: "must not be empty".to_string(),
            });
        }
        Ok(())
    }
}

/// A project that groups related tasks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    pub id: String,
    pub name: String,
    pub deadline: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
}

impl Project {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            deadline: None,
            created_at: Utc::now(),
        }
    }
}
