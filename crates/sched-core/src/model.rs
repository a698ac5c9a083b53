use serde::{Deserialize, Serialize};

use crate::ids::{RowId, TaskId};

/// Work hours used when a policy document does not name any.
pub const DEFAULT_WORK_HOURS: &str = "00:00-23:59";

/// One bar on the scheduler board.
///
/// Extra fields written by the Gantt view (labels, colors, progress) are
/// ignored on load.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: TaskId,
    pub row_id: RowId,
    /// ISO-8601 timestamp; `Z` or an explicit offset is expected.
    pub start: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_hr: Option<f64>,
    #[serde(default)]
    pub depends_on: Vec<TaskId>,
}

impl Task {
    /// Length in minutes. `durationMin` wins over `durationHr`; neither means zero.
    pub fn duration_minutes(&self) -> f64 {
        match (self.duration_min, self.duration_hr) {
            (Some(min), _) => min,
            (None, Some(hr)) => hr * 60.0,
            (None, None) => 0.0,
        }
    }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct ScheduleDocument {
    #[serde(default)]
    pub tasks: Vec<Task>,
}

/// Global constraints read from `policies.json`.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Policy {
    /// `HH:MM-HH:MM`; [`DEFAULT_WORK_HOURS`] when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub work_hours: Option<String>,
    /// `HH:MM-HH:MM`, either side may be left empty. May wrap past midnight.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub curfew: Option<String>,
    #[serde(default)]
    pub holiday: Vec<String>,
}

impl Policy {
    pub fn work_hours(&self) -> &str {
        self.work_hours.as_deref().unwrap_or(DEFAULT_WORK_HOURS)
    }
}
