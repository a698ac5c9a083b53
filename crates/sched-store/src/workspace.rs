use std::path::{Path, PathBuf};

use anyhow::Result;
use chrono::{DateTime, Utc};
use sched_core::{validate, Report};

use crate::config::Config;
use crate::documents::{load_policy, load_schedule};
use crate::save::{save_schedule, SaveOutcome};
use crate::snapshot::{FsSnapshotStore, SnapshotSelector, SnapshotStore};

/// A project checkout with its scheduler documents.
pub struct Workspace {
    pub repo_root: PathBuf,
    pub cfg: Config,
    pub snapshots: FsSnapshotStore,
}

impl Workspace {
    pub fn open(repo_root: PathBuf) -> Result<Self> {
        let cfg = Config::load_or_default(&repo_root)?;
        let snapshots = FsSnapshotStore::new(cfg.snapshot_dir(&repo_root));
        Ok(Self {
            repo_root,
            cfg,
            snapshots,
        })
    }

    /// Writes a default `.sched/sched.toml` unless one exists.
    pub fn init(repo_root: &Path) -> Result<PathBuf> {
        let path = Config::config_path(repo_root);
        if !path.exists() {
            Config::default().save_to(&path)?;
        }
        Ok(path)
    }

    pub fn schedule_path(&self) -> PathBuf {
        self.cfg.schedule_path(&self.repo_root)
    }

    pub fn policy_path(&self) -> PathBuf {
        self.cfg.policy_path(&self.repo_root)
    }

    /// Directory that writable scheduler documents must live under.
    pub fn scheduler_dir(&self) -> PathBuf {
        let schedule = self.schedule_path();
        schedule.parent().map(Path::to_path_buf).unwrap_or_else(|| self.repo_root.clone())
    }

    /// Loads both documents (overrides win over configured paths) and validates.
    pub fn validate(&self, schedule: Option<&Path>, policy: Option<&Path>) -> Result<Report> {
        let schedule_path = schedule.map(Path::to_path_buf).unwrap_or_else(|| self.schedule_path());
        let policy_path = policy.map(Path::to_path_buf).unwrap_or_else(|| self.policy_path());
        let doc = load_schedule(&schedule_path)?;
        let policy = load_policy(&policy_path)?;
        Ok(validate(&doc, &policy)?)
    }

    pub fn snapshot(&self, now: DateTime<Utc>) -> Result<PathBuf> {
        self.snapshots.snapshot(&self.schedule_path(), now)
    }

    pub fn list_snapshots(&self) -> Result<Vec<PathBuf>> {
        self.snapshots.list()
    }

    pub fn rollback(&self, selector: &SnapshotSelector) -> Result<PathBuf> {
        self.snapshots.rollback(selector, &self.schedule_path())
    }

    /// Replaces the scheduler document with `candidate` if it validates.
    pub fn save_from(&self, candidate: &Path, now: DateTime<Utc>) -> Result<SaveOutcome> {
        let doc = load_schedule(candidate)?;
        let policy = load_policy(&self.policy_path())?;
        save_schedule(
            &doc,
            &policy,
            &self.scheduler_dir(),
            &self.schedule_path(),
            &self.snapshots,
            now,
        )
    }
}
