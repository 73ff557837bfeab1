use std::path::Path;

use anyhow::Result;
use chrono::NaiveDate;
use owo_colors::OwoColorize;
use recurrence_core::Snapshot;
use recurrence_core::config::RecurrenceConfig;
use recurrence_core::recurrence::sort_for_display;
use serde::Serialize;

use crate::render::{Render, Row, render_listing, status_line};

/// Past-due and upcoming rows, each sorted by date and then description.
#[derive(Debug, Serialize)]
pub struct Listing {
    pub past_due: Vec<Row>,
    pub upcoming: Vec<Row>,
}

pub fn run(
    data_path: &Path,
    config: &RecurrenceConfig,
    today: NaiveDate,
    days: u32,
    json: bool,
) -> Result<()> {
    let snapshot = super::require_snapshot(data_path)?;
    let listing = build_listing(&snapshot, config, today, days);

    if json {
        println!("{}", serde_json::to_string_pretty(&listing)?);
        return Ok(());
    }

    if listing.past_due.is_empty() && listing.upcoming.is_empty() {
        println!("{}", "No reminders due".dimmed());
    } else {
        for line in render_listing(&listing.past_due, &listing.upcoming) {
            println!("{}", line);
        }
        println!();
    }
    println!(
        "{}",
        status_line(listing.past_due.len(), listing.upcoming.len()).dimmed()
    );

    Ok(())
}

pub fn build_listing(
    snapshot: &Snapshot,
    config: &RecurrenceConfig,
    today: NaiveDate,
    days: u32,
) -> Listing {
    let mut past = snapshot.past_due(today);
    sort_for_display(&mut past);

    let upcoming = snapshot.upcoming(today, days, config.day_overflow);
    for error in &upcoming.skipped {
        eprintln!("{}", error.render());
    }
    let mut future = upcoming.occurrences;
    sort_for_display(&mut future);

    Listing {
        past_due: past.iter().map(Row::from).collect(),
        upcoming: future.iter().map(Row::from).collect(),
    }
}
