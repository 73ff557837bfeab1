//! Core types for recurring reminders.
//!
//! This crate provides everything below the user interface:
//! - `event` value types for definitions, recurrence rules and occurrences
//! - `recurrence` expansion of definitions into past-due and upcoming lists
//! - `storage` reading and writing the versioned data file
//! - `config` for the global settings file

pub mod config;
pub mod date;
pub mod error;
pub mod event;
pub mod recurrence;
pub mod snapshot;
pub mod storage;

pub use date::DayOverflow;
pub use error::{RecurrenceError, RecurrenceResult};
pub use event::*;
pub use recurrence::{UpcomingOccurrences, advance_occurrence, past_due, upcoming};
pub use snapshot::Snapshot;
