//! Terminal rendering of reminder listings.
//!
//! Extension traits that add colored output to recurrence-core types
//! using owo_colors.

use owo_colors::OwoColorize;
use recurrence_core::date::format_date;
use recurrence_core::{EventDefinition, EventOccurrence, RecurrenceError};
use serde::Serialize;

/// Extension trait for TUI rendering with colors.
pub trait Render {
    fn render(&self) -> String;
}

impl Render for EventDefinition {
    fn render(&self) -> String {
        let until = self
            .recurrence
            .as_ref()
            .and_then(|r| r.until)
            .map(|u| format!(" until {}", format_date(u)))
            .unwrap_or_default();

        format!(
            "{}  {} {}",
            self.id.dimmed(),
            single_line(&self.description),
            format!("({} from {}{})", self.occurs_label(), format_date(self.start_date), until)
                .dimmed()
        )
    }
}

impl Render for RecurrenceError {
    fn render(&self) -> String {
        format!("warning: {}", self).yellow().to_string()
    }
}

/// One row of a listing, before coloring.
#[derive(Debug, PartialEq, Serialize)]
pub struct Row {
    pub id: String,
    pub date: String,
    pub description: String,
    pub occurs: &'static str,
}

impl From<&EventOccurrence> for Row {
    fn from(occ: &EventOccurrence) -> Self {
        Row {
            id: occ.definition.id.clone(),
            date: format_date(occ.date),
            description: single_line(&occ.definition.description),
            occurs: occ.definition.occurs_label(),
        }
    }
}

/// Render past-due rows (red) followed by upcoming rows in aligned
/// Date / Description / Occurs columns.
pub fn render_listing(past: &[Row], future: &[Row]) -> Vec<String> {
    let date_width = column_width("Date", past, future, |r| r.date.chars().count());
    let desc_width = column_width("Description", past, future, |r| {
        r.description.chars().count()
    });

    let mut lines = vec![
        format!(
            "{:<date_width$}  {:<desc_width$}  {}",
            "Date", "Description", "Occurs"
        )
        .bold()
        .to_string(),
    ];

    for row in past {
        let line = format!(
            "{:<date_width$}  {:<desc_width$}  {}",
            row.date, row.description, row.occurs
        );
        lines.push(line.red().to_string());
    }
    for row in future {
        lines.push(format!(
            "{:<date_width$}  {:<desc_width$}  {}",
            row.date,
            row.description,
            row.occurs.dimmed()
        ));
    }

    lines
}

/// Summary line, e.g. "2 past, 5 future".
pub fn status_line(past: usize, future: usize) -> String {
    format!("{} past, {} future", past, future)
}

fn column_width(header: &str, past: &[Row], future: &[Row], width: impl Fn(&Row) -> usize) -> usize {
    past.iter()
        .chain(future)
        .map(width)
        .max()
        .unwrap_or(0)
        .max(header.len())
}

/// Collapse line breaks and tabs so a description fits on one row.
fn single_line(text: &str) -> String {
    text.split(['\n', '\r', '\t'])
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}
