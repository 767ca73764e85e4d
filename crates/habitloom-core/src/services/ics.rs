//! Minimal iCalendar (RFC 5545) event reader.
//!
//! Reads just enough of a .ics export to turn VEVENTs into agenda
//! entries: SUMMARY, DTSTART, DTEND, both DATE and DATE-TIME forms.
//! Unknown properties are ignored; events without a start are skipped.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

use crate::error::ServiceError;

/// An event lifted out of an iCalendar file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportedEvent {
    pub summary: String,
    pub start: NaiveDateTime,
    pub end: Option<NaiveDateTime>,
    /// True when DTSTART used the all-day DATE form
    pub all_day: bool,
}

impl ImportedEvent {
    /// Event duration in minutes, when an end is present and sane.
    pub fn duration_minutes(&self) -> Option<u32> {
        let end = self.end?;
        let minutes = (end - self.start).num_minutes();
        u32::try_from(minutes).ok().filter(|m| *m > 0)
    }
}

/// Unfold RFC 5545 folded lines: a line starting with space or tab
/// continues the previous one.
fn unfold(text: &str) -> Vec<String> {
    let mut lines: Vec<String> = Vec::new();
    for raw in text.lines() {
        let line = raw.strip_suffix('\r').unwrap_or(raw);
        if let Some(rest) = line.strip_prefix(' ').or_else(|| line.strip_prefix('\t')) {
            if let Some(last) = lines.last_mut() {
                last.push_str(rest);
                continue;
            }
        }
        lines.push(line.to_string());
    }
    lines
}

/// Split a content line into (name, params, value).
fn split_property(line: &str) -> Option<(&str, &str, &str)> {
    let (head, value) = line.split_once(':')?;
    match head.split_once(';') {
        Some((name, params)) => Some((name, params, value)),
        None => Some((head, "", value)),
    }
}

/// Parse a DTSTART/DTEND value. Returns the timestamp and whether it was
/// the all-day DATE form. Trailing Z is dropped; these are wall-clock
/// times for agenda purposes, not instants.
fn parse_ics_datetime(params: &str, value: &str) -> Option<(NaiveDateTime, bool)> {
    let value = value.trim().trim_end_matches('Z');
    if params.contains("VALUE=DATE") || value.len() == 8 {
        let date = NaiveDate::parse_from_str(value, "%Y%m%d").ok()?;
        return Some((date.and_time(NaiveTime::MIN), true));
    }
    NaiveDateTime::parse_from_str(value, "%Y%m%dT%H%M%S")
        .ok()
        .map(|dt| (dt, false))
}

/// Parse the VEVENTs out of iCalendar text.
///
/// Events missing SUMMARY get an "(untitled)" placeholder; events
/// missing DTSTART are dropped with a warning. Anything outside
/// BEGIN:VEVENT/END:VEVENT is ignored.
///
/// # Errors
/// Returns an error when the text contains no VCALENDAR wrapper at all,
/// which usually means the caller fed it something other than an .ics.
pub fn parse_ics(text: &str) -> Result<Vec<ImportedEvent>, ServiceError> {
    let lines = unfold(text);
    if !lines.iter().any(|l| l.trim() == "BEGIN:VCALENDAR") {
        return Err(ServiceError::CalendarParse(
            "missing BEGIN:VCALENDAR".to_string(),
        ));
    }

    let mut events = Vec::new();
    let mut in_event = false;
    let mut summary: Option<String> = None;
    let mut start: Option<(NaiveDateTime, bool)> = None;
    let mut end: Option<NaiveDateTime> = None;

    for line in &lines {
        let trimmed = line.trim();
        if trimmed == "BEGIN:VEVENT" {
            in_event = true;
            summary = None;
            start = None;
            end = None;
            continue;
        }
        if trimmed == "END:VEVENT" {
            if in_event {
                match start {
                    Some((start, all_day)) => events.push(ImportedEvent {
                        summary: summary.take().unwrap_or_else(|| "(untitled)".to_string()),
                        start,
                        end,
                        all_day,
                    }),
                    None => log::warn!("skipping VEVENT without DTSTART"),
                }
            }
            in_event = false;
            continue;
        }
        if !in_event {
            continue;
        }
        let Some((name, params, value)) = split_property(trimmed) else {
            continue;
        };
        match name {
            "SUMMARY" => summary = Some(value.trim().to_string()),
            "DTSTART" => start = parse_ics_datetime(params, value),
            "DTEND" => end = parse_ics_datetime(params, value).map(|(dt, _)| dt),
            _ => {}
        }
    }

    Ok(events)
}
