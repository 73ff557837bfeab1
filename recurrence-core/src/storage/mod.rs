//! Data file storage.
//!
//! The file starts with a `#version = N` header line followed by one record per
//! line. Records are tab-separated fields, each escaped on its own:
//!
//! ```text
//! EventDefinition <id> <description> <start_date> [<period> <until_date>]
//! EventOccurrence <definition_id> <date> <true|false>
//! ```
//!
//! Dates are written as `YYYY-MM-DD`; an empty field means "no date".

mod escape;
mod generate;
mod parse;

use std::fs::File;
use std::io::{BufReader, Read, Write};
use std::path::Path;
use std::sync::Arc;

use tracing::debug;

use crate::error::{RecurrenceError, RecurrenceResult};
use crate::event::{EventDefinition, EventOccurrence};
use crate::snapshot::Snapshot;

pub use escape::{escape_field, unescape_field};
pub use generate::generate_v1;
pub use parse::parse_snapshot;

/// Newest data file format version, and the only one currently understood.
pub const LATEST_VERSION: u32 = 1;

const HEADER_PREFIX: &str = "#version = ";
const DEFINITION_RECORD: &str = "EventDefinition";
const OCCURRENCE_RECORD: &str = "EventOccurrence";

/// Decode a data file from a reader.
pub fn decode<R: Read>(reader: R) -> RecurrenceResult<Snapshot> {
    parse_snapshot(BufReader::new(reader))
}

/// Encode definitions and occurrences in the latest format.
pub fn encode<W: Write>(
    writer: &mut W,
    definitions: &[Arc<EventDefinition>],
    occurrences: &[EventOccurrence],
) -> RecurrenceResult<()> {
    let content = generate_v1(definitions, occurrences)?;
    writer.write_all(content.as_bytes())?;
    writer.flush()?;
    Ok(())
}

/// Load a data file. Any error discards everything read so far.
pub fn load(path: &Path) -> RecurrenceResult<Snapshot> {
    let file = File::open(path)?;
    let snapshot = decode(file)?;
    debug!(
        path = %path.display(),
        definitions = snapshot.definitions.len(),
        occurrences = snapshot.occurrences.len(),
        "Loaded data file"
    );
    Ok(snapshot)
}

/// Save in the latest format, replacing `path`.
pub fn save(
    path: &Path,
    definitions: &[Arc<EventDefinition>],
    occurrences: &[EventOccurrence],
) -> RecurrenceResult<()> {
    save_version(path, definitions, occurrences, LATEST_VERSION)
}

/// Save in a specific format version.
///
/// The content is generated before the file is opened, so validation errors
/// leave an existing file untouched. A failure while writing can still leave
/// a truncated file behind.
pub fn save_version(
    path: &Path,
    definitions: &[Arc<EventDefinition>],
    occurrences: &[EventOccurrence],
    version: u32,
) -> RecurrenceResult<()> {
    if version != LATEST_VERSION {
        return Err(RecurrenceError::UnsupportedVersion(version.to_string()));
    }

    let content = generate_v1(definitions, occurrences)?;
    let mut file = File::create(path)?;
    file.write_all(content.as_bytes())?;
    file.flush()?;

    debug!(
        path = %path.display(),
        definitions = definitions.len(),
        occurrences = occurrences.len(),
        "Saved data file"
    );
    Ok(())
}

/// Save a snapshot in the latest format.
pub fn save_snapshot(path: &Path, snapshot: &Snapshot) -> RecurrenceResult<()> {
    save(path, &snapshot.definitions, &snapshot.occurrences)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{Period, Recurrence};
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn make_snapshot() -> Snapshot {
        let recurring = Arc::new(EventDefinition::new(
            "1",
            "This is a\nrecurring event.\n",
            date(2024, 3, 10),
            Some(Recurrence::new(Period::Weekly, None)),
        ));
        let tricky = Arc::new(EventDefinition::new(
            "tab\tid",
            "back\\slash \\n not a newline\r\n",
            date(2024, 1, 31),
            Some(Recurrence::new(Period::Monthly, Some(date(2025, 1, 31)))),
        ));
        let once = Arc::new(EventDefinition::new("once", "", date(2024, 7, 4), None));

        let occurrences = vec![
            EventOccurrence::new(Arc::clone(&recurring), date(2024, 3, 17), true),
            EventOccurrence::new(Arc::clone(&recurring), date(2024, 3, 3), false),
            EventOccurrence::new(Arc::clone(&tricky), date(2024, 2, 29), true),
            EventOccurrence::new(Arc::clone(&once), date(2024, 7, 4), false),
        ];

        Snapshot::new(vec![recurring, tricky, once], occurrences)
    }

    #[test]
    fn test_encode_decode_roundtrip() {
        let snapshot = make_snapshot();

        let mut buf = Vec::new();
        encode(&mut buf, &snapshot.definitions, &snapshot.occurrences).unwrap();
        let decoded = decode(buf.as_slice()).expect("Should decode encoded snapshot");

        assert_eq!(decoded, snapshot);
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("reminders");
        let snapshot = make_snapshot();

        save_snapshot(&path, &snapshot).unwrap();
        let loaded = load(&path).unwrap();

        assert_eq!(loaded, snapshot);
        // Occurrences share the loaded definition rather than holding copies
        assert!(Arc::ptr_eq(
            &loaded.occurrences[0].definition,
            &loaded.definitions[0]
        ));
    }

    #[test]
    fn test_save_rejects_other_versions() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("reminders");

        let result = save_version(&path, &[], &[], 2);
        assert!(matches!(result, Err(RecurrenceError::UnsupportedVersion(_))));
        assert!(!path.exists());
    }

    #[test]
    fn test_failed_save_leaves_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("reminders");
        let snapshot = make_snapshot();
        save_snapshot(&path, &snapshot).unwrap();

        let orphan = vec![snapshot.occurrences[0].clone()];
        assert!(save(&path, &[], &orphan).is_err());

        assert_eq!(load(&path).unwrap(), snapshot);
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = load(&dir.path().join("does-not-exist"));
        assert!(matches!(result, Err(RecurrenceError::Io(_))));
    }
}
