use std::path::PathBuf;

use thiserror::Error;

/// Failures callers may want to tell apart. Everything else is plain
/// `anyhow` context.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("scheduler document not found: {}", .0.display())]
    MissingSchedule(PathBuf),
    #[error("{} does not exist, cannot snapshot", .0.display())]
    MissingSnapshotSource(PathBuf),
    #[error("no snapshots available: {} does not exist", .0.display())]
    NoSnapshotDir(PathBuf),
    #[error("snapshot directory is empty: {}", .0.display())]
    EmptySnapshotDir(PathBuf),
    #[error("no snapshot matches stamp {0}")]
    NoMatchingSnapshot(String),
    #[error("path not allowed: {}", .0.display())]
    PathNotAllowed(PathBuf),
    #[error("only json files allowed: {}", .0.display())]
    NotJson(PathBuf),
}
