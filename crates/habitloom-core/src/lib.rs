//! # Habitloom Core Library
//!
//! Core business logic for Habitloom, a CLI-first personal-productivity
//! tool. All operations are available via the standalone CLI binary; any
//! GUI is expected to be a thin layer over this same library.
//!
//! ## Architecture
//!
//! - **Habit engine**: pure computation of eligibility, streaks, and
//!   completion rates from in-memory snapshots. No I/O, no hidden state;
//!   calling anything twice with the same inputs gives the same answer.
//! - **Planner**: Eisenhower/Kanban tasks with pure repositioning, plus
//!   recurring/one-off time blocks with conflict detection.
//! - **Storage**: SQLite habit/planner databases and TOML configuration.
//!   Callers load snapshots here and pass plain values into the engine.
//! - **Services**: narrow adapters for external suggestion APIs and
//!   iCalendar import.
//!
//! ## Key Components
//!
//! - [`Habit`]: recurrence rule over an active date window
//! - [`CompletionIndex`]: day-keyed completion lookup
//! - [`compute_streaks`]: current/longest streak calculation
//! - [`HabitDb`] / [`PlannerDb`]: persistence
//! - [`SuggestionProvider`]: trait for suggestion sources

pub mod block;
pub mod error;
pub mod habit;
pub mod services;
pub mod storage;
pub mod task;

pub use block::{conflicts, expand_day, BlockOccurrence, TimeBlock};
pub use error::{ConfigError, CoreError, DatabaseError, ServiceError, ValidationError};
pub use habit::completion::CompletionIndex;
pub use habit::stats::{compute_month_stats, compute_range_stats, PeriodStats};
pub use habit::streak::{compute_streaks, StreakSummary};
pub use habit::{CompletionLogEntry, Frequency, Habit, Weekday};
pub use services::suggestion::SuggestionProvider;
pub use storage::{Config, HabitDb, PlannerDb};
pub use task::{Column, Project, Quadrant, Task};
