use std::path::{Path, PathBuf};

use anyhow::Result;
use chrono::{DateTime, Utc};
use sched_core::{validate, Policy, Report, ScheduleDocument};

use crate::documents::{ensure_whitelisted, write_schedule};
use crate::snapshot::SnapshotStore;

#[derive(Debug)]
pub enum SaveOutcome {
    /// Written and snapshotted.
    Saved { snapshot: PathBuf },
    /// Nothing was written.
    Rejected(Report),
}

/// Validates `candidate`, writes it to `target` and snapshots the result.
///
/// `target` must be a `.json` file under `base`.
pub fn save_schedule(
    candidate: &ScheduleDocument,
    policy: &Policy,
    base: &Path,
    target: &Path,
    store: &dyn SnapshotStore,
    now: DateTime<Utc>,
) -> Result<SaveOutcome> {
    ensure_whitelisted(base, target)?;
    let report = validate(candidate, policy)?;
    if !report.is_clean() {
        tracing::warn!(issues = report.issues.len(), "candidate schedule rejected");
        return Ok(SaveOutcome::Rejected(report));
    }
    write_schedule(target, candidate)?;
    let snapshot = store.snapshot(target, now)?;
    Ok(SaveOutcome::Saved { snapshot })
}
