//! Clock-of-day windows and timestamp parsing.
//!
//! Windows are plain minute offsets from midnight (`hour * 60 + minute`);
//! they carry no date.

use chrono::{DateTime, FixedOffset, NaiveDateTime, Timelike};

use crate::error::ScheduleError;

pub const MINUTES_PER_DAY: u32 = 24 * 60;

/// Minutes since local midnight of `ts`, in the timestamp's own offset.
pub fn minute_of_day(ts: &DateTime<FixedOffset>) -> u32 {
    ts.hour() * 60 + ts.minute()
}

/// Parses `HH:MM`. `24:00` is accepted as end-of-day (1440).
fn parse_clock(s: &str) -> Option<u32> {
    let (h, m) = s.trim().split_once(':')?;
    let digits = |part: &str, max_len: usize| -> Option<u32> {
        if part.is_empty() || part.len() > max_len || !part.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        part.parse().ok()
    };
    let (hour, minute) = (digits(h, 2)?, digits(m, 2)?);
    if m.len() != 2 {
        return None;
    }
    match (hour, minute) {
        (24, 0) => Some(MINUTES_PER_DAY),
        (0..=23, 0..=59) => Some(hour * 60 + minute),
        _ => None,
    }
}

/// Formats minutes-of-day back into `HH:MM`.
pub fn format_clock(minute: u32) -> String {
    format!("{:02}:{:02}", minute / 60, minute % 60)
}

/// The single allowed daily interval; both ends inclusive.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WorkHours {
    pub start: u32,
    pub end: u32,
}

impl WorkHours {
    pub fn parse(value: &str) -> Result<Self, ScheduleError> {
        let invalid = || ScheduleError::InvalidWindow {
            field: "workHours",
            value: value.to_string(),
        };
        let (start, end) = value.split_once('-').ok_or_else(invalid)?;
        Ok(Self {
            start: parse_clock(start).ok_or_else(invalid)?,
            end: parse_clock(end).ok_or_else(invalid)?,
        })
    }

    /// `end_minute` is not wrapped: a task running past midnight reports a
    /// value of 1440 or more and is therefore outside the window.
    pub fn admits(&self, start_minute: u32, end_minute: u32) -> bool {
        start_minute >= self.start && end_minute <= self.end
    }
}

impl std::fmt::Display for WorkHours {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}", format_clock(self.start), format_clock(self.end))
    }
}

/// A disallowed daily window. Either bound may be missing and the window may
/// wrap past midnight (`start > end`).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Curfew {
    pub start: Option<u32>,
    pub end: Option<u32>,
}

impl Curfew {
    /// Parses `HH:MM-HH:MM`, `HH:MM-` or `-HH:MM`. A blank value is no curfew.
    pub fn parse(value: &str) -> Result<Self, ScheduleError> {
        if value.trim().is_empty() {
            return Ok(Self::default());
        }
        let invalid = || ScheduleError::InvalidWindow {
            field: "curfew",
            value: value.to_string(),
        };
        let (start, end) = value.split_once('-').ok_or_else(invalid)?;
        let bound = |part: &str| -> Result<Option<u32>, ScheduleError> {
            if part.trim().is_empty() {
                Ok(None)
            } else {
                parse_clock(part).map(Some).ok_or_else(invalid)
            }
        };
        Ok(Self {
            start: bound(start)?,
            end: bound(end)?,
        })
    }

    pub fn contains(&self, minute: u32) -> bool {
        match (self.start, self.end) {
            (None, None) => false,
            (Some(s), Some(e)) if s <= e => s <= minute && minute < e,
            (Some(s), Some(e)) => minute >= s || minute < e,
            (Some(s), None) => minute >= s,
            (None, Some(e)) => minute < e,
        }
    }
}

/// Parses a task start. Accepts RFC 3339, offsets without seconds
/// (`2024-05-01T10:00+08:00`), and offset-less timestamps read as UTC.
pub fn parse_timestamp(value: &str) -> Option<DateTime<FixedOffset>> {
    let value = value.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(value) {
        return Some(ts);
    }
    let normalized = match value.strip_suffix('Z').or_else(|| value.strip_suffix('z')) {
        Some(head) => format!("{head}+00:00"),
        None => value.to_string(),
    };
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f%:z", "%Y-%m-%dT%H:%M%:z", "%Y-%m-%d %H:%M:%S%.f%:z", "%Y-%m-%d %H:%M%:z"] {
        if let Ok(ts) = DateTime::parse_from_str(&normalized, fmt) {
            return Some(ts);
        }
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%d %H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(value, fmt) {
            return Some(naive.and_utc().fixed_offset());
        }
    }
    None
}
