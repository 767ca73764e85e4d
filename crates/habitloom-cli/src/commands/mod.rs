pub mod block;
pub mod config;
pub mod habit;
pub mod import;
pub mod project;
pub mod suggest;
pub mod task;

use chrono::NaiveDate;

/// Parse a YYYY-MM-DD argument.
pub fn parse_date(s: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|_| format!("'{s}' is not YYYY-MM-DD"))
}

/// Today as a local calendar day.
pub fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}
