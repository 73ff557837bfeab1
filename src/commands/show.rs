use std::path::Path;

use anyhow::Result;
use owo_colors::OwoColorize;

use crate::render::Render;

pub fn run(data_path: &Path) -> Result<()> {
    let snapshot = super::require_snapshot(data_path)?;

    if snapshot.definitions.is_empty() {
        println!("{}", "No reminders defined".dimmed());
        return Ok(());
    }

    for definition in &snapshot.definitions {
        println!("{}", definition.render());
    }

    let cleared = snapshot.occurrences.iter().filter(|o| o.cleared).count();
    println!();
    println!(
        "{}",
        format!(
            "{} reminders, {} tracked occurrences ({} cleared)",
            snapshot.definitions.len(),
            snapshot.occurrences.len(),
            cleared
        )
        .dimmed()
    );

    Ok(())
}
