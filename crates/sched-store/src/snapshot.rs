use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, Utc};

use crate::error::StoreError;

pub const SNAPSHOT_SUFFIX: &str = "_scheduler.json";
pub const STAMP_FORMAT: &str = "%Y-%m-%dT%H-%M-%SZ";

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SnapshotSelector {
    Latest,
    /// Exact stamp prefix, e.g. `2024-05-02T09-30-00Z`.
    Stamp(String),
}

impl SnapshotSelector {
    /// Builds a selector from `--latest` / `--stamp`; exactly one must be set.
    pub fn from_flags(latest: bool, stamp: Option<String>) -> Result<Self> {
        match (latest, stamp) {
            (true, None) => Ok(Self::Latest),
            (false, Some(s)) => Ok(Self::Stamp(s)),
            (true, Some(_)) => Err(anyhow!("--latest and --stamp are mutually exclusive")),
            (false, None) => Err(anyhow!("either --latest or --stamp is required")),
        }
    }
}

pub trait SnapshotStore {
    /// Copies `source` into the store under a stamp derived from `now`.
    fn snapshot(&self, source: &Path, now: DateTime<Utc>) -> Result<PathBuf>;
    /// Snapshot files, oldest first.
    fn list(&self) -> Result<Vec<PathBuf>>;
    fn select(&self, selector: &SnapshotSelector) -> Result<PathBuf>;
    /// Copies the selected snapshot over `target` and returns the snapshot used.
    fn rollback(&self, selector: &SnapshotSelector, target: &Path) -> Result<PathBuf>;
}

pub fn stamp_for(now: DateTime<Utc>) -> String {
    now.format(STAMP_FORMAT).to_string()
}

/// The stamp part of a snapshot file name.
pub fn stamp_of(path: &Path) -> Option<&str> {
    path.file_name()?.to_str()?.strip_suffix(SNAPSHOT_SUFFIX)
}

#[derive(Clone, Debug)]
pub struct FsSnapshotStore {
    pub dir: PathBuf,
}

impl FsSnapshotStore {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }
}

impl SnapshotStore for FsSnapshotStore {
    fn snapshot(&self, source: &Path, now: DateTime<Utc>) -> Result<PathBuf> {
        if !source.exists() {
            return Err(StoreError::MissingSnapshotSource(source.to_path_buf()).into());
        }
        std::fs::create_dir_all(&self.dir).with_context(|| format!("create snapshot dir {}", self.dir.display()))?;
        let target = self.dir.join(format!("{}{}", stamp_for(now), SNAPSHOT_SUFFIX));
        std::fs::copy(source, &target)
            .with_context(|| format!("copy {} -> {}", source.display(), target.display()))?;
        tracing::info!(snapshot = %target.display(), "snapshot written");
        Ok(target)
    }

    fn list(&self) -> Result<Vec<PathBuf>> {
        if !self.dir.exists() {
            return Ok(vec![]);
        }
        let mut out = Vec::new();
        for entry in std::fs::read_dir(&self.dir).with_context(|| format!("read {}", self.dir.display()))? {
            let path = entry?.path();
            if path.is_file() && stamp_of(&path).is_some() {
                out.push(path);
            }
        }
        // stamps sort lexicographically in time order
        out.sort();
        Ok(out)
    }

    fn select(&self, selector: &SnapshotSelector) -> Result<PathBuf> {
        if !self.dir.exists() {
            return Err(StoreError::NoSnapshotDir(self.dir.clone()).into());
        }
        let candidates = self.list()?;
        if candidates.is_empty() {
            return Err(StoreError::EmptySnapshotDir(self.dir.clone()).into());
        }
        let selected = match selector {
            SnapshotSelector::Latest => candidates.last().cloned(),
            SnapshotSelector::Stamp(stamp) => candidates.into_iter().find(|p| stamp_of(p) == Some(stamp.as_str())),
        };
        selected.ok_or_else(|| {
            let wanted = match selector {
                SnapshotSelector::Latest => "latest".to_string(),
                SnapshotSelector::Stamp(s) => s.clone(),
            };
            StoreError::NoMatchingSnapshot(wanted).into()
        })
    }

    fn rollback(&self, selector: &SnapshotSelector, target: &Path) -> Result<PathBuf> {
        let selected = self.select(selector)?;
        std::fs::copy(&selected, target)
            .with_context(|| format!("copy {} -> {}", selected.display(), target.display()))?;
        tracing::info!(snapshot = %selected.display(), target = %target.display(), "rolled back");
        Ok(selected)
    }
}
