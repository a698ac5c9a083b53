use thiserror::Error;

/// Input that cannot be validated at all. Raised before any pass runs.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ScheduleError {
    #[error("invalid {field} window {value:?}: expected HH:MM-HH:MM")]
    InvalidWindow { field: &'static str, value: String },
    #[error("task {task}: invalid start timestamp {value:?}")]
    InvalidTimestamp { task: String, value: String },
    #[error("task {task}: invalid duration {minutes} minutes")]
    InvalidDuration { task: String, minutes: String },
    #[error("invalid holiday date {0:?}: expected YYYY-MM-DD")]
    InvalidHoliday(String),
}
