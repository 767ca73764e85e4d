//! Pluggable external-service adapters.
//!
//! These carry no algorithmic weight: the suggestion adapter is a thin
//! HTTP wrapper with a deterministic local fallback, and the calendar
//! importer is a small iCalendar reader. Both sit behind narrow seams so
//! the rest of the system never depends on a vendor.

pub mod ics;
pub mod suggestion;

pub use ics::{parse_ics, ImportedEvent};
pub use suggestion::{
    generate_with_fallback, CannedSuggestionProvider, HttpSuggestionProvider, SuggestionProvider,
};
