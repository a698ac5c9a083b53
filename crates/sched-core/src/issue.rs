use std::fmt;

use chrono::NaiveDate;
use serde::Serialize;

use crate::ids::{RowId, TaskId};

/// One conflict found in a schedule. Issues are accumulated, never raised.
#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Issue {
    DuplicateTaskId { task: TaskId, count: usize },
    /// `path` starts and ends on the same task.
    DependencyCycle { root: TaskId, path: Vec<TaskId> },
    Holiday { task: TaskId, date: NaiveDate },
    WorkHours { task: TaskId, window: String },
    Curfew { task: TaskId },
    ResourceConflict { row: RowId, first: TaskId, second: TaskId },
}

impl Issue {
    pub fn kind(&self) -> IssueKind {
        match self {
            Issue::DuplicateTaskId { .. } => IssueKind::DuplicateTaskId,
            Issue::DependencyCycle { .. } => IssueKind::DependencyCycle,
            Issue::Holiday { .. } => IssueKind::Holiday,
            Issue::WorkHours { .. } => IssueKind::WorkHours,
            Issue::Curfew { .. } => IssueKind::Curfew,
            Issue::ResourceConflict { .. } => IssueKind::ResourceConflict,
        }
    }
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Issue::DuplicateTaskId { task, count } => {
                write!(f, "duplicate task id: {task} appears {count} times")
            }
            Issue::DependencyCycle { root, path } => {
                let chain = path.iter().map(TaskId::as_str).collect::<Vec<_>>().join(" -> ");
                write!(f, "dependency cycle: {root} ({chain})")
            }
            Issue::Holiday { task, date } => write!(f, "holiday conflict: {task} starts on {date}"),
            Issue::WorkHours { task, window } => {
                write!(f, "work hours conflict: {task} falls outside {window}")
            }
            Issue::Curfew { task } => write!(f, "curfew conflict: {task}"),
            Issue::ResourceConflict { row, first, second } => {
                write!(f, "resource conflict: {row} -> {first} overlaps {second}")
            }
        }
    }
}

#[derive(Clone, Copy, Debug, Serialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum IssueKind {
    DuplicateTaskId,
    DependencyCycle,
    Holiday,
    WorkHours,
    Curfew,
    ResourceConflict,
}

/// Result of one validation run.
#[derive(Clone, Debug, Default, Serialize, PartialEq, Eq)]
pub struct Report {
    pub issues: Vec<Issue>,
}

impl Report {
    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }

    pub fn exit_code(&self) -> i32 {
        if self.is_clean() {
            0
        } else {
            1
        }
    }

    pub fn count(&self, kind: IssueKind) -> usize {
        self.issues.iter().filter(|i| i.kind() == kind).count()
    }

    /// Human-readable lines: a success line, or a header plus `- issue` lines.
    pub fn render_text(&self) -> String {
        if self.is_clean() {
            return "schedule validation passed\n".to_string();
        }
        let mut out = String::from("schedule validation failed:\n");
        for issue in &self.issues {
            out.push_str(&format!("- {issue}\n"));
        }
        out
    }
}
