pub mod add;
pub mod clear;
pub mod config;
pub mod list;
pub mod show;

use std::path::Path;

use anyhow::{Context, Result};
use recurrence_core::Snapshot;
use recurrence_core::storage;

/// Load the data file, failing with a hint if it does not exist yet.
pub fn require_snapshot(data_path: &Path) -> Result<Snapshot> {
    if !data_path.exists() {
        anyhow::bail!(
            "No reminders found at {}.\n\n\
            Add your first reminder with:\n  \
            recurrence add <description> --start <date>\n\n\
            Example:\n  \
            recurrence add \"Pay rent\" --start 2024-01-01 --every monthly",
            data_path.display()
        );
    }
    load_snapshot(data_path)
}

/// Load the data file, starting from an empty snapshot if it does not exist yet.
pub fn load_or_default(data_path: &Path) -> Result<Snapshot> {
    if data_path.exists() {
        load_snapshot(data_path)
    } else {
        Ok(Snapshot::default())
    }
}

fn load_snapshot(data_path: &Path) -> Result<Snapshot> {
    storage::load(data_path)
        .with_context(|| format!("Error reading data file '{}'", data_path.display()))
}

pub fn save_snapshot(data_path: &Path, snapshot: &Snapshot) -> Result<()> {
    if let Some(parent) = data_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Could not create directory '{}'", parent.display()))?;
    }
    storage::save_snapshot(data_path, snapshot)
        .with_context(|| format!("Error writing data file '{}'", data_path.display()))
}
