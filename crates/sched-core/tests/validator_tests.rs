use sched_core::{
    detect_cycle, validate, Issue, IssueKind, Policy, Report, RowId, ScheduleDocument, ScheduleError, Task, TaskId,
};
use serde_json::json;

fn schedule(tasks: serde_json::Value) -> ScheduleDocument {
    serde_json::from_value(json!({ "tasks": tasks })).unwrap()
}

fn policy(value: serde_json::Value) -> Policy {
    serde_json::from_value(value).unwrap()
}

fn run(tasks: serde_json::Value, pol: serde_json::Value) -> Report {
    validate(&schedule(tasks), &policy(pol)).unwrap()
}

#[test]
fn mutual_dependency_is_reported_as_cycle() {
    let report = run(
        json!([
            { "id": "A", "rowId": "r1", "start": "2024-05-02T09:00:00Z", "durationMin": 30, "dependsOn": ["B"] },
            { "id": "B", "rowId": "r2", "start": "2024-05-02T09:00:00Z", "durationMin": 30, "dependsOn": ["A"] }
        ]),
        json!({}),
    );
    assert_eq!(report.count(IssueKind::DependencyCycle), 1);
    assert_eq!(report.exit_code(), 1);
}

#[test]
fn only_first_cycle_is_reported() {
    let report = run(
        json!([
            { "id": "a", "rowId": "r1", "start": "2024-05-02T09:00:00Z", "dependsOn": ["b"] },
            { "id": "b", "rowId": "r2", "start": "2024-05-02T09:00:00Z", "dependsOn": ["a"] },
            { "id": "c", "rowId": "r3", "start": "2024-05-02T09:00:00Z", "dependsOn": ["d"] },
            { "id": "d", "rowId": "r4", "start": "2024-05-02T09:00:00Z", "dependsOn": ["c"] }
        ]),
        json!({}),
    );
    assert_eq!(report.count(IssueKind::DependencyCycle), 1);
}

#[test]
fn diamond_and_disconnected_graphs_have_no_cycle() {
    let report = run(
        json!([
            { "id": "top", "rowId": "r1", "start": "2024-05-02T09:00:00Z", "dependsOn": ["left", "right"] },
            { "id": "left", "rowId": "r2", "start": "2024-05-02T09:00:00Z", "dependsOn": ["bottom"] },
            { "id": "right", "rowId": "r3", "start": "2024-05-02T09:00:00Z", "dependsOn": ["bottom"] },
            { "id": "bottom", "rowId": "r4", "start": "2024-05-02T09:00:00Z" },
            { "id": "island", "rowId": "r5", "start": "2024-05-02T09:00:00Z", "dependsOn": ["missing"] }
        ]),
        json!({}),
    );
    assert_eq!(report.count(IssueKind::DependencyCycle), 0);
    assert!(report.is_clean());
}

#[test]
fn work_hours_boundaries_are_inclusive() {
    let pol = json!({ "workHours": "08:00-18:00" });
    let early = run(
        json!([{ "id": "early", "rowId": "r", "start": "2024-05-02T07:59:00Z", "durationMin": 30 }]),
        pol.clone(),
    );
    assert_eq!(
        early.issues,
        vec![Issue::WorkHours {
            task: TaskId::from_str("early"),
            window: "08:00-18:00".into()
        }]
    );

    let exact = run(
        json!([{ "id": "full-day", "rowId": "r", "start": "2024-05-02T08:00:00Z", "durationHr": 10 }]),
        pol.clone(),
    );
    assert!(exact.is_clean());

    let late = run(
        json!([{ "id": "late", "rowId": "r", "start": "2024-05-02T17:30:00Z", "durationMin": 31 }]),
        pol,
    );
    assert_eq!(late.count(IssueKind::WorkHours), 1);
}

#[test]
fn task_running_past_midnight_breaks_work_hours() {
    let report = run(
        json!([{ "id": "overnight", "rowId": "r", "start": "2024-05-02T17:00:00Z", "durationHr": 9 }]),
        json!({ "workHours": "08:00-18:00" }),
    );
    assert_eq!(report.count(IssueKind::WorkHours), 1);
}

#[test]
fn curfew_wraps_around_midnight() {
    let pol = json!({ "curfew": "22:00-06:00" });
    let report = run(
        json!([
            { "id": "night", "rowId": "a", "start": "2024-05-02T23:00:00Z", "durationMin": 30 },
            { "id": "day", "rowId": "b", "start": "2024-05-02T10:00:00Z", "durationMin": 30 },
            { "id": "dawn", "rowId": "c", "start": "2024-05-02T20:00:00Z", "durationMin": 540 }
        ]),
        pol,
    );
    let curfew: Vec<_> = report
        .issues
        .iter()
        .filter_map(|i| match i {
            Issue::Curfew { task } => Some(task.as_str()),
            _ => None,
        })
        .collect();
    assert_eq!(curfew, vec!["night", "dawn"]);
}

#[test]
fn curfew_uses_the_timestamps_own_offset() {
    // 15:00Z is 23:00 at +08:00.
    let report = run(
        json!([{ "id": "shanghai", "rowId": "r", "start": "2024-05-02T23:00:00+08:00", "durationMin": 10 }]),
        json!({ "curfew": "22:00-06:00" }),
    );
    assert_eq!(report.count(IssueKind::Curfew), 1);
}

#[test]
fn holiday_skips_other_time_checks() {
    let report = run(
        json!([{ "id": "festival", "rowId": "r", "start": "2024-05-01T23:00:00Z", "durationMin": 120 }]),
        json!({ "workHours": "08:00-18:00", "curfew": "22:00-06:00", "holiday": ["2024-05-01"] }),
    );
    assert_eq!(report.issues.len(), 1);
    assert!(matches!(&report.issues[0], Issue::Holiday { task, .. } if task.as_str() == "festival"));
}

#[test]
fn overlapping_tasks_on_same_row_conflict() {
    let report = run(
        json!([
            { "id": "smelt", "rowId": "forge", "start": "2024-05-02T10:00:00Z", "durationMin": 60 },
            { "id": "temper", "rowId": "forge", "start": "2024-05-02T10:30:00Z", "durationMin": 30 }
        ]),
        json!({}),
    );
    assert_eq!(report.issues.len(), 1);
    let line = report.issues[0].to_string();
    assert!(line.contains("forge"));
    assert!(line.contains("smelt"));
    assert!(line.contains("temper"));
}

#[test]
fn touching_intervals_do_not_conflict() {
    let report = run(
        json!([
            { "id": "second", "rowId": "forge", "start": "2024-05-02T11:00:00Z", "durationMin": 30 },
            { "id": "first", "rowId": "forge", "start": "2024-05-02T10:00:00Z", "durationMin": 60 },
            { "id": "other-row", "rowId": "kiln", "start": "2024-05-02T10:15:00Z", "durationMin": 60 }
        ]),
        json!({}),
    );
    assert!(report.is_clean());
}

#[test]
fn passes_accumulate_independently() {
    let report = run(
        json!([
            { "id": "a", "rowId": "r", "start": "2024-05-02T07:00:00Z", "durationMin": 120, "dependsOn": ["b"] },
            { "id": "b", "rowId": "r", "start": "2024-05-02T08:00:00Z", "durationMin": 30, "dependsOn": ["a"] }
        ]),
        json!({ "workHours": "08:00-18:00" }),
    );
    assert_eq!(report.count(IssueKind::DependencyCycle), 1);
    assert_eq!(report.count(IssueKind::WorkHours), 1);
    assert_eq!(report.count(IssueKind::ResourceConflict), 1);
}

#[test]
fn validation_is_repeatable() {
    let doc = schedule(json!([
        { "id": "a", "rowId": "r", "start": "2024-05-02T07:00:00Z", "durationMin": 120, "dependsOn": ["b"] },
        { "id": "b", "rowId": "r", "start": "2024-05-02T08:00:00Z", "durationMin": 30, "dependsOn": ["c"] },
        { "id": "c", "rowId": "r", "start": "2024-05-02T23:00:00Z", "durationMin": 30, "dependsOn": ["a"] }
    ]));
    let pol = policy(json!({ "workHours": "08:00-18:00", "curfew": "22:00-06:00" }));
    let first = validate(&doc, &pol).unwrap();
    let second = validate(&doc, &pol).unwrap();
    assert_eq!(first, second);
    assert_eq!(first.render_text(), second.render_text());
}

#[test]
fn empty_schedule_is_clean() {
    let report = validate(&ScheduleDocument::default(), &Policy::default()).unwrap();
    assert!(report.is_clean());
    assert_eq!(report.exit_code(), 0);
    assert_eq!(report.render_text(), "schedule validation passed\n");
}

#[test]
fn malformed_start_aborts_before_checks() {
    let err = validate(
        &schedule(json!([{ "id": "oops", "rowId": "r", "start": "tomorrow" }])),
        &Policy::default(),
    )
    .unwrap_err();
    assert_eq!(
        err,
        ScheduleError::InvalidTimestamp {
            task: "oops".into(),
            value: "tomorrow".into()
        }
    );
}

#[test]
fn malformed_work_hours_aborts() {
    let err = validate(&ScheduleDocument::default(), &policy(json!({ "workHours": "nine-to-five" }))).unwrap_err();
    assert!(matches!(err, ScheduleError::InvalidWindow { field: "workHours", .. }));
}

fn chain(len: usize) -> Vec<Task> {
    (0..len)
        .map(|i| Task {
            id: TaskId::from_str(format!("t{i}")),
            row_id: RowId::from_str(format!("lane-{i}")),
            start: "2024-05-02T09:00:00Z".to_string(),
            duration_min: Some(30.0),
            duration_hr: None,
            depends_on: if i + 1 < len {
                vec![TaskId::from_str(format!("t{}", i + 1))]
            } else {
                vec![]
            },
        })
        .collect()
}

#[test]
fn very_long_dependency_chain_validates() {
    let doc = ScheduleDocument { tasks: chain(200_000) };
    let report = validate(&doc, &Policy::default()).unwrap();
    assert!(report.is_clean());
}

#[test]
fn cycle_closing_a_very_long_chain_is_found() {
    let mut tasks = chain(100_000);
    let last = tasks.len() - 1;
    tasks[last].depends_on.push(TaskId::from_str("t0"));
    match detect_cycle(&tasks) {
        Some(Issue::DependencyCycle { root, path }) => {
            assert_eq!(root.as_str(), "t0");
            assert_eq!(path.len(), 100_001);
            assert_eq!(path.first(), path.last());
        }
        other => panic!("expected cycle, got {other:?}"),
    }
}

#[test]
fn blank_curfew_and_midnight_work_end_are_accepted() {
    let report = run(
        json!([{ "id": "late-shift", "rowId": "r", "start": "2024-05-02T23:00:00Z", "durationMin": 60 }]),
        json!({ "workHours": "08:00-24:00", "curfew": "" }),
    );
    assert!(report.is_clean(), "{}", report.render_text());
}
