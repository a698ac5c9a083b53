//! Conflict checks for a scheduler document.
//!
//! Three independent passes run over every document:
//! - dependency cycles (DFS over `dependsOn` edges, first cycle only)
//! - time policy (holiday, work hours, curfew) per task
//! - lane double-booking (adjacent-interval sweep per `rowId`)
//!
//! Malformed input (bad timestamps, windows, dates) aborts with a
//! [`ScheduleError`] before any pass runs. Everything else becomes an
//! [`Issue`] in the returned [`Report`].

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, FixedOffset, NaiveDate, TimeDelta};

use crate::error::ScheduleError;
use crate::ids::{RowId, TaskId};
use crate::issue::{Issue, Report};
use crate::model::{Policy, ScheduleDocument, Task};
use crate::time::{minute_of_day, parse_timestamp, Curfew, WorkHours, MINUTES_PER_DAY};

/// A [`Policy`] with its strings parsed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PolicyRules {
    pub work_hours: WorkHours,
    pub curfew: Curfew,
    pub holidays: HashSet<NaiveDate>,
}

impl PolicyRules {
    pub fn compile(policy: &Policy) -> Result<Self, ScheduleError> {
        let work_hours = WorkHours::parse(policy.work_hours())?;
        let curfew = match policy.curfew.as_deref() {
            Some(c) => Curfew::parse(c)?,
            None => Curfew::default(),
        };
        let holidays = policy
            .holiday
            .iter()
            .map(|d| {
                NaiveDate::parse_from_str(d.trim(), "%Y-%m-%d")
                    .map_err(|_| ScheduleError::InvalidHoliday(d.clone()))
            })
            .collect::<Result<HashSet<_>, _>>()?;
        Ok(Self {
            work_hours,
            curfew,
            holidays,
        })
    }
}

/// A task with its interval resolved.
#[derive(Clone, Debug, PartialEq)]
pub struct PlannedTask<'a> {
    pub id: &'a TaskId,
    pub row: &'a RowId,
    pub start: DateTime<FixedOffset>,
    pub end: DateTime<FixedOffset>,
}

impl<'a> PlannedTask<'a> {
    pub fn plan(task: &'a Task) -> Result<Self, ScheduleError> {
        let start = parse_timestamp(&task.start).ok_or_else(|| ScheduleError::InvalidTimestamp {
            task: task.id.to_string(),
            value: task.start.clone(),
        })?;
        let minutes = task.duration_minutes();
        let invalid = || ScheduleError::InvalidDuration {
            task: task.id.to_string(),
            minutes: minutes.to_string(),
        };
        if !minutes.is_finite() || minutes < 0.0 {
            return Err(invalid());
        }
        let end = TimeDelta::try_milliseconds((minutes * 60_000.0).round() as i64)
            .and_then(|delta| start.checked_add_signed(delta))
            .ok_or_else(invalid)?;
        Ok(Self {
            id: &task.id,
            row: &task.row_id,
            start,
            end,
        })
    }

    pub fn start_minute(&self) -> u32 {
        minute_of_day(&self.start)
    }

    /// Minutes from midnight of the start date to `end`. Not wrapped.
    pub fn end_minute(&self) -> u32 {
        let days = (self.end.date_naive() - self.start.date_naive()).num_days();
        let total = days * i64::from(MINUTES_PER_DAY) + i64::from(minute_of_day(&self.end));
        u32::try_from(total).unwrap_or(u32::MAX)
    }
}

/// Runs every pass and accumulates the issues.
pub fn validate(schedule: &ScheduleDocument, policy: &Policy) -> Result<Report, ScheduleError> {
    let rules = PolicyRules::compile(policy)?;
    let planned = schedule
        .tasks
        .iter()
        .map(PlannedTask::plan)
        .collect::<Result<Vec<_>, _>>()?;

    let mut issues = find_duplicate_ids(&schedule.tasks);
    issues.extend(detect_cycle(&schedule.tasks));
    issues.extend(check_time_policy(&planned, &rules));
    issues.extend(detect_resource_conflicts(&planned));

    tracing::debug!(tasks = planned.len(), issues = issues.len(), "schedule validated");
    Ok(Report { issues })
}

pub fn find_duplicate_ids(tasks: &[Task]) -> Vec<Issue> {
    let mut counts: HashMap<&TaskId, usize> = HashMap::new();
    let mut order = Vec::new();
    for task in tasks {
        let n = counts.entry(&task.id).or_insert(0);
        if *n == 0 {
            order.push(&task.id);
        }
        *n += 1;
    }
    order
        .into_iter()
        .filter_map(|id| {
            let count = counts[id];
            (count > 1).then(|| Issue::DuplicateTaskId {
                task: id.clone(),
                count,
            })
        })
        .collect()
}

/// Reports the first dependency cycle reachable from any task, if any.
///
/// Roots are tried in document order and edges in `dependsOn` order, so the
/// result is stable for a given document. Ids that no task defines are
/// leaves.
pub fn detect_cycle(tasks: &[Task]) -> Option<Issue> {
    let mut graph: HashMap<&str, &[TaskId]> = HashMap::new();
    let mut roots = Vec::new();
    for task in tasks {
        if graph.insert(task.id.as_str(), &task.depends_on).is_none() {
            roots.push(task.id.as_str());
        }
    }
    for task in tasks {
        for dep in &task.depends_on {
            if !graph.contains_key(dep.as_str()) {
                tracing::warn!(task = %task.id, dependency = %dep, "dependency references unknown task");
            }
        }
    }

    let mut visiting = HashSet::new();
    let mut visited = HashSet::new();
    for root in roots {
        if let Some(cycle) = visit(root, &graph, &mut visiting, &mut visited) {
            return Some(Issue::DependencyCycle {
                root: TaskId::from_str(root),
                path: cycle.into_iter().map(TaskId::from_str).collect(),
            });
        }
    }
    None
}

/// Depth-first walk from `root` on an explicit work stack, so chain length
/// is bounded by heap rather than thread stack. Each frame holds a node and
/// the index of the next dependency to follow; the frames form the current
/// path.
fn visit<'a>(
    root: &'a str,
    graph: &HashMap<&'a str, &'a [TaskId]>,
    visiting: &mut HashSet<&'a str>,
    visited: &mut HashSet<&'a str>,
) -> Option<Vec<&'a str>> {
    if visited.contains(root) {
        return None;
    }
    visiting.insert(root);
    let mut work: Vec<(&'a str, usize)> = vec![(root, 0)];
    while let Some(frame) = work.last_mut() {
        let (node, next) = *frame;
        let deps: &'a [TaskId] = graph.get(node).copied().unwrap_or(&[]);
        match deps.get(next) {
            Some(dep) => {
                frame.1 += 1;
                let dep = dep.as_str();
                if visiting.contains(dep) {
                    // every visiting node has a frame, so `dep` is on the path
                    let mut cycle: Vec<&'a str> = work.iter().map(|(n, _)| *n).skip_while(|n| *n != dep).collect();
                    cycle.push(dep);
                    return Some(cycle);
                }
                if !visited.contains(dep) {
                    visiting.insert(dep);
                    work.push((dep, 0));
                }
            }
            None => {
                work.pop();
                visiting.remove(node);
                visited.insert(node);
            }
        }
    }
    None
}

/// Holiday, work-hours and curfew checks. A holiday start skips the other
/// two checks for that task.
pub fn check_time_policy(planned: &[PlannedTask<'_>], rules: &PolicyRules) -> Vec<Issue> {
    let mut issues = Vec::new();
    for task in planned {
        let date = task.start.date_naive();
        if rules.holidays.contains(&date) {
            issues.push(Issue::Holiday {
                task: task.id.clone(),
                date,
            });
            continue;
        }

        let start_minute = task.start_minute();
        let end_minute = task.end_minute();
        if !rules.work_hours.admits(start_minute, end_minute) {
            issues.push(Issue::WorkHours {
                task: task.id.clone(),
                window: rules.work_hours.to_string(),
            });
        }
        if rules.curfew.contains(start_minute) || rules.curfew.contains(end_minute % MINUTES_PER_DAY) {
            issues.push(Issue::Curfew { task: task.id.clone() });
        }
    }
    issues
}

/// Sweeps each lane in start order and reports adjacent overlapping pairs.
///
/// Only neighbours are compared. When a row overlaps at all, some adjacent
/// pair overlaps too, though not necessarily the pair a reader would pick.
pub fn detect_resource_conflicts(planned: &[PlannedTask<'_>]) -> Vec<Issue> {
    let mut slots: HashMap<&RowId, usize> = HashMap::new();
    let mut rows: Vec<(&RowId, Vec<&PlannedTask<'_>>)> = Vec::new();
    for task in planned {
        let slot = *slots.entry(task.row).or_insert_with(|| {
            rows.push((task.row, Vec::new()));
            rows.len() - 1
        });
        rows[slot].1.push(task);
    }

    let mut issues = Vec::new();
    for (row, mut lane) in rows {
        lane.sort_by_key(|t| t.start);
        for pair in lane.windows(2) {
            let (prev, next) = (pair[0], pair[1]);
            if next.start < prev.end {
                issues.push(Issue::ResourceConflict {
                    row: row.clone(),
                    first: prev.id.clone(),
                    second: next.id.clone(),
                });
            }
        }
    }
    issues
}
