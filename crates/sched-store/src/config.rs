use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Config {
    #[serde(default)]
    pub paths: PathsConfig,
}

/// Document locations. Relative paths resolve against the repo root; `~` is
/// expanded.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct PathsConfig {
    #[serde(default = "default_schedule")]
    pub schedule: String,
    #[serde(default = "default_policy")]
    pub policy: String,
    #[serde(default = "default_snapshots")]
    pub snapshots: String,
}

fn default_schedule() -> String {
    "assets/scheduler/scheduler.json".to_string()
}

fn default_policy() -> String {
    "assets/agents/policies.json".to_string()
}

fn default_snapshots() -> String {
    "assets/scheduler/snapshots".to_string()
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            schedule: default_schedule(),
            policy: default_policy(),
            snapshots: default_snapshots(),
        }
    }
}

impl Config {
    pub fn load_from(path: &Path) -> Result<Self> {
        let s = std::fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
        let cfg: Config = toml::from_str(&s).with_context(|| "parse sched.toml")?;
        Ok(cfg)
    }

    /// Reads `.sched/sched.toml` when present, defaults otherwise.
    pub fn load_or_default(repo_root: &Path) -> Result<Self> {
        let path = Self::config_path(repo_root);
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).with_context(|| format!("create {}", parent.display()))?;
        }
        let s = toml::to_string_pretty(self).with_context(|| "serialize toml")?;
        std::fs::write(path, s).with_context(|| format!("write {}", path.display()))?;
        Ok(())
    }

    pub fn config_path(repo_root: &Path) -> PathBuf {
        repo_root.join(".sched").join("sched.toml")
    }

    pub fn schedule_path(&self, repo_root: &Path) -> PathBuf {
        resolve(repo_root, &self.paths.schedule)
    }

    pub fn policy_path(&self, repo_root: &Path) -> PathBuf {
        resolve(repo_root, &self.paths.policy)
    }

    pub fn snapshot_dir(&self, repo_root: &Path) -> PathBuf {
        resolve(repo_root, &self.paths.snapshots)
    }
}

pub fn resolve(repo_root: &Path, raw: &str) -> PathBuf {
    let expanded = PathBuf::from(shellexpand::tilde(raw).to_string());
    if expanded.is_absolute() {
        expanded
    } else {
        repo_root.join(expanded)
    }
}
