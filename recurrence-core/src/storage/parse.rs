//! Data file parsing.

use std::collections::HashMap;
use std::io::BufRead;
use std::sync::Arc;

use crate::date::parse_date;
use crate::error::{RecurrenceError, RecurrenceResult};
use crate::event::{EventDefinition, EventOccurrence, Recurrence};
use crate::snapshot::Snapshot;

use super::escape::unescape_field;
use super::{DEFINITION_RECORD, HEADER_PREFIX, LATEST_VERSION, OCCURRENCE_RECORD};

/// Parse a whole data file: the version header, then the records of that version.
pub fn parse_snapshot<R: BufRead>(reader: R) -> RecurrenceResult<Snapshot> {
    // Line 1 is the header
    let mut lines = reader
        .split(b'\n')
        .enumerate()
        .map(|(idx, bytes)| decode_line(idx + 1, bytes?));

    let header = match lines.next() {
        Some(Ok(line)) => line,
        Some(Err(RecurrenceError::MalformedRecord { .. })) => {
            return Err(RecurrenceError::UnsupportedVersion(
                "header is not valid UTF-8".to_string(),
            ));
        }
        Some(Err(e)) => return Err(e),
        None => {
            return Err(RecurrenceError::UnsupportedVersion(
                "missing version header".to_string(),
            ));
        }
    };
    let version = parse_header(strip_line_ending(&header))?;
    if version != LATEST_VERSION {
        return Err(RecurrenceError::UnsupportedVersion(version.to_string()));
    }

    let mut parser = ParserV1::default();
    for (idx, line) in lines.enumerate() {
        parser.parse_line(idx + 2, strip_line_ending(&line?))?;
    }

    Ok(parser.snapshot)
}

fn decode_line(line_no: usize, bytes: Vec<u8>) -> RecurrenceResult<String> {
    String::from_utf8(bytes).map_err(|_| RecurrenceError::malformed(line_no, "invalid UTF-8"))
}

fn parse_header(line: &str) -> RecurrenceResult<u32> {
    let version = line.strip_prefix(HEADER_PREFIX).ok_or_else(|| {
        RecurrenceError::UnsupportedVersion(format!("malformed header '{}'", line))
    })?;

    if version.is_empty() || !version.bytes().all(|b| b.is_ascii_digit()) {
        return Err(RecurrenceError::UnsupportedVersion(format!(
            "malformed header '{}'",
            line
        )));
    }

    version
        .parse()
        .map_err(|_| RecurrenceError::UnsupportedVersion(version.to_string()))
}

fn strip_line_ending(line: &str) -> &str {
    line.trim_end_matches(['\r', '\n'])
}

/// Record parser for format version 1.
///
/// Definitions are indexed as they are read so that occurrence records can
/// only refer to definitions declared earlier in the stream.
#[derive(Default)]
struct ParserV1 {
    by_id: HashMap<String, Arc<EventDefinition>>,
    snapshot: Snapshot,
}

impl ParserV1 {
    fn parse_line(&mut self, line_no: usize, line: &str) -> RecurrenceResult<()> {
        let fields = line
            .split('\t')
            .map(unescape_field)
            .collect::<Result<Vec<String>, String>>()
            .map_err(|seq| {
                RecurrenceError::malformed(line_no, format!("invalid escape sequence '{}'", seq))
            })?;

        match fields[0].as_str() {
            DEFINITION_RECORD => self.parse_definition(line_no, fields),
            OCCURRENCE_RECORD => self.parse_occurrence(line_no, fields),
            other => Err(RecurrenceError::UnrecognizedRecordType {
                line: line_no,
                kind: other.to_string(),
            }),
        }
    }

    fn parse_definition(&mut self, line_no: usize, fields: Vec<String>) -> RecurrenceResult<()> {
        let mut fields = fields.into_iter().skip(1);
        let (id, description, start, recurrence) = match fields.len() {
            3 => (fields.next(), fields.next(), fields.next(), None),
            5 => (
                fields.next(),
                fields.next(),
                fields.next(),
                Some((fields.next(), fields.next())),
            ),
            n => {
                return Err(RecurrenceError::malformed(
                    line_no,
                    format!("{} expects 4 or 6 fields, found {}", DEFINITION_RECORD, n + 1),
                ));
            }
        };
        let (Some(id), Some(description), Some(start)) = (id, description, start) else {
            return Err(RecurrenceError::malformed(line_no, "missing definition fields"));
        };

        let start_date = required_date(line_no, &start, "start date")?;

        let recurrence = match recurrence {
            Some((Some(period), Some(until))) => {
                let until = optional_date(line_no, &until, "until date")?;
                Some(Recurrence::parse(&period, until).map_err(|e| e.at_line(line_no))?)
            }
            Some(_) => {
                return Err(RecurrenceError::malformed(line_no, "missing recurrence fields"));
            }
            None => None,
        };

        if self.by_id.contains_key(&id) {
            return Err(RecurrenceError::DuplicateDefinition {
                id,
                line: Some(line_no),
            });
        }

        let definition = Arc::new(EventDefinition::new(
            id.clone(),
            description,
            start_date,
            recurrence,
        ));
        self.by_id.insert(id, Arc::clone(&definition));
        self.snapshot.definitions.push(definition);
        Ok(())
    }

    fn parse_occurrence(&mut self, line_no: usize, fields: Vec<String>) -> RecurrenceResult<()> {
        let [_, id, date, cleared]: [String; 4] = fields.try_into().map_err(|f: Vec<String>| {
            RecurrenceError::malformed(
                line_no,
                format!("{} expects 4 fields, found {}", OCCURRENCE_RECORD, f.len()),
            )
        })?;

        let definition = self
            .by_id
            .get(&id)
            .cloned()
            .ok_or(RecurrenceError::DanglingReference { line: line_no, id })?;

        let date = required_date(line_no, &date, "occurrence date")?;

        let cleared = match cleared.as_str() {
            "true" => true,
            "false" => false,
            other => {
                return Err(RecurrenceError::malformed(
                    line_no,
                    format!("cleared flag must be 'true' or 'false', found '{}'", other),
                ));
            }
        };

        self.snapshot
            .occurrences
            .push(EventOccurrence::new(definition, date, cleared));
        Ok(())
    }
}

fn required_date(line_no: usize, value: &str, what: &str) -> RecurrenceResult<chrono::NaiveDate> {
    optional_date(line_no, value, what)?
        .ok_or_else(|| RecurrenceError::malformed(line_no, format!("missing {}", what)))
}

fn optional_date(
    line_no: usize,
    value: &str,
    what: &str,
) -> RecurrenceResult<Option<chrono::NaiveDate>> {
    if value.is_empty() {
        return Ok(None);
    }
    parse_date(value)
        .map(Some)
        .ok_or_else(|| RecurrenceError::malformed(line_no, format!("invalid {} '{}'", what, value)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::Period;
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn parse(content: &str) -> RecurrenceResult<Snapshot> {
        parse_snapshot(content.as_bytes())
    }

    #[test]
    fn test_parse_definitions_and_occurrences() {
        let content = "#version = 1\n\
EventDefinition\tid-1\tTake out\\tthe bins\\n\t2024-1-05\tweekly\t\n\
EventDefinition\tid-2\tDentist\t2024-06-12\n\
EventDefinition\tid-3\tLease\t2024-01-31\tmonthly\t2024-12-31\n\
EventOccurrence\tid-1\t2024-01-12\ttrue\n\
EventOccurrence\tid-2\t2024-06-12\tfalse\n";

        let snapshot = parse(content).expect("Should parse");

        assert_eq!(snapshot.definitions.len(), 3);
        let bins = &snapshot.definitions[0];
        assert_eq!(bins.id, "id-1");
        assert_eq!(bins.description, "Take out\tthe bins\n");
        assert_eq!(bins.start_date, date(2024, 1, 5));
        assert_eq!(bins.recurrence, Some(Recurrence::new(Period::Weekly, None)));

        assert_eq!(snapshot.definitions[1].recurrence, None);
        assert_eq!(
            snapshot.definitions[2].recurrence,
            Some(Recurrence::new(Period::Monthly, Some(date(2024, 12, 31))))
        );

        assert_eq!(snapshot.occurrences.len(), 2);
        assert!(Arc::ptr_eq(&snapshot.occurrences[0].definition, bins));
        assert!(snapshot.occurrences[0].cleared);
        assert!(!snapshot.occurrences[1].cleared);
    }

    #[test]
    fn test_parse_accepts_crlf_line_endings() {
        let content = "#version = 1\r\nEventDefinition\ta\tA\t2024-01-01\r\n";
        let snapshot = parse(content).expect("Should parse");
        assert_eq!(snapshot.definitions[0].start_date, date(2024, 1, 1));
    }

    #[test]
    fn test_header_only_file_is_empty() {
        assert!(parse("#version = 1\n").unwrap().is_empty());
    }

    #[test]
    fn test_unsupported_versions() {
        for content in ["", "#version = 9\n", "#version = 2", "version = 1\n", "#version = one\n"] {
            assert!(
                matches!(parse(content), Err(RecurrenceError::UnsupportedVersion(_))),
                "Expected UnsupportedVersion for {:?}",
                content
            );
        }
    }

    #[test]
    fn test_dangling_reference() {
        let content = "#version = 1\n\
EventOccurrence\tid-1\t2024-01-12\ttrue\n\
EventDefinition\tid-1\tLate\t2024-01-05\n";

        match parse(content) {
            Err(RecurrenceError::DanglingReference { line, id }) => {
                assert_eq!(line, 2);
                assert_eq!(id, "id-1");
            }
            other => panic!("Expected DanglingReference, got {:?}", other),
        }
    }

    #[test]
    fn test_unrecognized_record_type() {
        let content = "#version = 1\nEventDefinition\ta\tA\t2024-01-01\nEventAlarm\ta\n";
        match parse(content) {
            Err(RecurrenceError::UnrecognizedRecordType { line, kind }) => {
                assert_eq!(line, 3);
                assert_eq!(kind, "EventAlarm");
            }
            other => panic!("Expected UnrecognizedRecordType, got {:?}", other),
        }
    }

    #[test]
    fn test_malformed_records() {
        let cases = [
            "EventDefinition\ta\tA\n",
            "EventDefinition\ta\tA\t2024-01-01\tweekly\n",
            "EventDefinition\ta\tA\t\n",
            "EventDefinition\ta\tA\t2024-02-30\n",
            "EventDefinition\ta\tA\t2024-01-01\tweekly\t2024-13-01\n",
            "EventDefinition\ta\tBad \\x escape\t2024-01-01\n",
            "EventDefinition\ta\tA\t2024-01-01\nEventOccurrence\ta\t2024-01-01\n",
            "EventDefinition\ta\tA\t2024-01-01\nEventOccurrence\ta\t2024-01-01\tyes\n",
        ];
        for body in cases {
            let content = format!("#version = 1\n{}", body);
            assert!(
                matches!(parse(&content), Err(RecurrenceError::MalformedRecord { .. })),
                "Expected MalformedRecord for {:?}",
                body
            );
        }
    }

    #[test]
    fn test_invalid_utf8_is_malformed_record() {
        let mut content = b"#version = 1\nEventDefinition\ta\tA\t2024-01-01\n".to_vec();
        content.extend_from_slice(b"EventDefinition\tb\t\xFF\xFE\t2024-01-01\n");

        match parse_snapshot(content.as_slice()) {
            Err(RecurrenceError::MalformedRecord { line, reason }) => {
                assert_eq!(line, 3);
                assert_eq!(reason, "invalid UTF-8");
            }
            other => panic!("Expected MalformedRecord, got {:?}", other),
        }
    }

    #[test]
    fn test_invalid_utf8_header_is_unsupported_version() {
        let content = b"#version = \xFF\n";
        assert!(matches!(
            parse_snapshot(&content[..]),
            Err(RecurrenceError::UnsupportedVersion(_))
        ));
    }

    #[test]
    fn test_unknown_period() {
        let content = "#version = 1\nEventDefinition\ta\tA\t2024-01-01\tdaily\t\n";
        assert!(matches!(
            parse(content),
            Err(RecurrenceError::InvalidPeriod { period, line: Some(2) }) if period == "daily"
        ));
    }

    #[test]
    fn test_duplicate_definition() {
        let content = "#version = 1\n\
EventDefinition\ta\tA\t2024-01-01\n\
EventDefinition\ta\tB\t2024-01-02\n";
        assert!(matches!(
            parse(content),
            Err(RecurrenceError::DuplicateDefinition { id, line: Some(3) }) if id == "a"
        ));
    }
}
