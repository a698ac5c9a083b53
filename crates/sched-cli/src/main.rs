use std::path::PathBuf;

use clap::{ArgGroup, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use sched_store::{stamp_of, SaveOutcome, SnapshotSelector, Workspace};

#[derive(Parser)]
#[command(name = "sched", version, about = "Check and snapshot scheduler.json")]
struct Cli {
    /// Project root (defaults to the current directory)
    #[arg(long, global = true)]
    root: Option<PathBuf>,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Write a default .sched/sched.toml
    Init,

    /// Check the schedule for dependency cycles, time-policy and lane conflicts
    Validate {
        #[arg(long)]
        schedule: Option<PathBuf>,
        #[arg(long)]
        policy: Option<PathBuf>,
        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Copy scheduler.json into the snapshot directory
    Snapshot,

    /// List snapshots, oldest first
    Snapshots,

    /// Restore scheduler.json from a snapshot
    #[command(group(ArgGroup::new("which").required(true).args(["latest", "stamp"])))]
    Rollback {
        #[arg(long)]
        latest: bool,
        #[arg(long)]
        stamp: Option<String>,
    },

    /// Validate a candidate document, then write it as scheduler.json and snapshot it
    Save {
        #[arg(long)]
        from: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let repo_root = match cli.root {
        Some(root) => root,
        None => std::env::current_dir()?,
    };
    tracing::debug!(root = %repo_root.display(), "workspace root");

    match cli.cmd {
        Command::Init => {
            let path = Workspace::init(&repo_root)?;
            println!("Config at {}", path.display());
        }
        Command::Validate { schedule, policy, json } => {
            let ws = Workspace::open(repo_root)?;
            let report = ws.validate(schedule.as_deref(), policy.as_deref())?;
            if json {
                let out = serde_json::json!({ "ok": report.is_clean(), "issues": &report.issues });
                println!("{}", serde_json::to_string_pretty(&out)?);
            } else {
                print!("{}", report.render_text());
            }
            if !report.is_clean() {
                std::process::exit(report.exit_code());
            }
        }
        Command::Snapshot => {
            let ws = Workspace::open(repo_root)?;
            let path = ws.snapshot(chrono::Utc::now())?;
            println!("Snapshot written: {}", path.display());
        }
        Command::Snapshots => {
            let ws = Workspace::open(repo_root)?;
            for path in ws.list_snapshots()? {
                println!("{}", stamp_of(&path).unwrap_or_default());
            }
        }
        Command::Rollback { latest, stamp } => {
            let ws = Workspace::open(repo_root)?;
            let selector = SnapshotSelector::from_flags(latest, stamp)?;
            let used = ws.rollback(&selector)?;
            println!("Rolled back to: {}", used.display());
        }
        Command::Save { from } => {
            let ws = Workspace::open(repo_root)?;
            match ws.save_from(&from, chrono::Utc::now())? {
                SaveOutcome::Saved { snapshot } => {
                    println!("Saved {} (snapshot {})", ws.schedule_path().display(), snapshot.display());
                }
                SaveOutcome::Rejected(report) => {
                    print!("{}", report.render_text());
                    std::process::exit(report.exit_code());
                }
            }
        }
    }

    Ok(())
}
