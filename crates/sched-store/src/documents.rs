use std::path::{Component, Path};

use anyhow::{Context, Result};
use sched_core::{Policy, ScheduleDocument};

use crate::error::StoreError;

/// Reads the scheduler document. A missing file is [`StoreError::MissingSchedule`].
pub fn load_schedule(path: &Path) -> Result<ScheduleDocument> {
    if !path.exists() {
        return Err(StoreError::MissingSchedule(path.to_path_buf()).into());
    }
    let s = std::fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let doc: ScheduleDocument =
        serde_json::from_str(&s).with_context(|| format!("parse schedule {}", path.display()))?;
    tracing::debug!(path = %path.display(), tasks = doc.tasks.len(), "loaded schedule");
    Ok(doc)
}

/// Reads the policy document. A missing file is an empty policy.
pub fn load_policy(path: &Path) -> Result<Policy> {
    if !path.exists() {
        tracing::debug!(path = %path.display(), "no policy file; using defaults");
        return Ok(Policy::default());
    }
    let s = std::fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let policy = serde_json::from_str(&s).with_context(|| format!("parse policy {}", path.display()))?;
    Ok(policy)
}

/// Pretty JSON with a trailing newline.
pub fn write_schedule(path: &Path, doc: &ScheduleDocument) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).with_context(|| format!("create {}", parent.display()))?;
    }
    let mut text = serde_json::to_string_pretty(doc)?;
    text.push('\n');
    std::fs::write(path, text).with_context(|| format!("write {}", path.display()))?;
    Ok(())
}

/// Documents written by this tool must be `.json` files under `base`.
pub fn ensure_whitelisted(base: &Path, target: &Path) -> Result<(), StoreError> {
    let escapes = target.components().any(|c| matches!(c, Component::ParentDir));
    if escapes || !target.starts_with(base) {
        return Err(StoreError::PathNotAllowed(target.to_path_buf()));
    }
    if target.extension().and_then(|e| e.to_str()) != Some("json") {
        return Err(StoreError::NotJson(target.to_path_buf()));
    }
    Ok(())
}
