//! Error types for recurrence operations.

use chrono::NaiveDate;
use thiserror::Error;

/// Errors that can occur while building, expanding, loading or saving reminders.
#[derive(Error, Debug)]
pub enum RecurrenceError {
    #[error(
        "Invalid recurrence period '{period}'{} (expected weekly, monthly or yearly)",
        on_line(.line)
    )]
    InvalidPeriod { period: String, line: Option<usize> },

    #[error("Unsupported data file version: {0}")]
    UnsupportedVersion(String),

    #[error("Malformed record on line {line}: {reason}")]
    MalformedRecord { line: usize, reason: String },

    #[error("Line {line} references unknown event definition '{id}'")]
    DanglingReference { line: usize, id: String },

    #[error("Unrecognized record type '{kind}' on line {line}")]
    UnrecognizedRecordType { line: usize, kind: String },

    #[error("No event definition with id '{0}'")]
    UnknownDefinition(String),

    #[error("Duplicate event definition id '{id}'{}", on_line(.line))]
    DuplicateDefinition { id: String, line: Option<usize> },

    #[error("Event '{id}' has no occurrence on {year}-{month:02}-{day:02}")]
    InvalidRecurrenceDate {
        id: String,
        year: i32,
        month: u32,
        day: u32,
    },

    #[error("{date} is not an occurrence of event '{id}'")]
    OffSequence { id: String, date: NaiveDate },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl RecurrenceError {
    pub(crate) fn malformed(line: usize, reason: impl Into<String>) -> Self {
        RecurrenceError::MalformedRecord {
            line,
            reason: reason.into(),
        }
    }

    /// Attach the data file line an error was found on, where the variant has room for one.
    pub(crate) fn at_line(self, line_no: usize) -> Self {
        match self {
            RecurrenceError::InvalidPeriod { period, .. } => RecurrenceError::InvalidPeriod {
                period,
                line: Some(line_no),
            },
            RecurrenceError::DuplicateDefinition { id, .. } => {
                RecurrenceError::DuplicateDefinition {
                    id,
                    line: Some(line_no),
                }
            }
            other => other,
        }
    }
}

fn on_line(line: &Option<usize>) -> String {
    line.map(|n| format!(" on line {}", n)).unwrap_or_default()
}

/// Result type alias for recurrence operations.
pub type RecurrenceResult<T> = Result<T, RecurrenceError>;
