//! Data file generation.

use std::collections::HashSet;
use std::sync::Arc;

use crate::date::format_date;
use crate::error::{RecurrenceError, RecurrenceResult};
use crate::event::{EventDefinition, EventOccurrence};

use super::escape::escape_field;
use super::{DEFINITION_RECORD, HEADER_PREFIX, OCCURRENCE_RECORD};

/// Generate version 1 data file content.
///
/// Records are written in the order given. Fails without producing anything
/// if an occurrence refers to a definition that is not part of `definitions`,
/// since such a file could not be read back.
pub fn generate_v1(
    definitions: &[Arc<EventDefinition>],
    occurrences: &[EventOccurrence],
) -> RecurrenceResult<String> {
    let mut ids = HashSet::new();
    for (idx, definition) in definitions.iter().enumerate() {
        if !ids.insert(definition.id.as_str()) {
            return Err(RecurrenceError::DuplicateDefinition {
                id: definition.id.clone(),
                line: Some(idx + 2),
            });
        }
    }

    let mut content = format!("{}1\n", HEADER_PREFIX);

    for definition in definitions {
        push_record(&mut content, &definition_fields(definition));
    }

    for (idx, occurrence) in occurrences.iter().enumerate() {
        if !ids.contains(occurrence.definition_id()) {
            return Err(RecurrenceError::DanglingReference {
                line: definitions.len() + idx + 2,
                id: occurrence.definition_id().to_string(),
            });
        }
        push_record(&mut content, &occurrence_fields(occurrence));
    }

    Ok(content)
}

fn definition_fields(definition: &EventDefinition) -> Vec<String> {
    let mut fields = vec![
        DEFINITION_RECORD.to_string(),
        definition.id.clone(),
        definition.description.clone(),
        format_date(definition.start_date),
    ];
    if let Some(recurrence) = &definition.recurrence {
        fields.push(recurrence.period.to_string());
        fields.push(recurrence.until.map(format_date).unwrap_or_default());
    }
    fields
}

fn occurrence_fields(occurrence: &EventOccurrence) -> Vec<String> {
    vec![
        OCCURRENCE_RECORD.to_string(),
        occurrence.definition_id().to_string(),
        format_date(occurrence.date),
        occurrence.cleared.to_string(),
    ]
}

fn push_record(content: &mut String, fields: &[String]) {
    let escaped: Vec<String> = fields.iter().map(|f| escape_field(f)).collect();
    content.push_str(&escaped.join("\t"));
    content.push('\n');
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{Period, Recurrence};
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_generate_v1_layout() {
        let weekly = Arc::new(EventDefinition::new(
            "w",
            "Line one\nLine\ttwo",
            date(2024, 1, 1),
            Some(Recurrence::new(Period::Weekly, None)),
        ));
        let once = Arc::new(EventDefinition::new("o", "C:\\taxes", date(2024, 4, 15), None));
        let until = Arc::new(EventDefinition::new(
            "u",
            "Course",
            date(2024, 2, 23),
            Some(Recurrence::new(Period::Yearly, Some(date(2030, 2, 23)))),
        ));
        let occurrences = vec![EventOccurrence::new(Arc::clone(&once), date(2024, 4, 15), true)];

        let content = generate_v1(&[weekly, once, until], &occurrences).unwrap();

        assert_eq!(
            content,
            "#version = 1\n\
EventDefinition\tw\tLine one\\nLine\\ttwo\t2024-01-01\tweekly\t\n\
EventDefinition\to\tC:\\\\taxes\t2024-04-15\n\
EventDefinition\tu\tCourse\t2024-02-23\tyearly\t2030-02-23\n\
EventOccurrence\to\t2024-04-15\ttrue\n"
        );
    }

    #[test]
    fn test_generate_rejects_occurrence_of_missing_definition() {
        let kept = Arc::new(EventDefinition::new("kept", "Kept", date(2024, 1, 1), None));
        let dropped = Arc::new(EventDefinition::new("gone", "Gone", date(2024, 1, 1), None));
        let occurrences = vec![
            EventOccurrence::new(Arc::clone(&kept), date(2024, 1, 1), true),
            EventOccurrence::new(dropped, date(2024, 1, 1), true),
        ];

        match generate_v1(&[kept], &occurrences) {
            Err(RecurrenceError::DanglingReference { line, id }) => {
                assert_eq!(line, 4);
                assert_eq!(id, "gone");
            }
            other => panic!("Expected DanglingReference, got {:?}", other),
        }
    }

    #[test]
    fn test_generate_rejects_duplicate_ids() {
        let a = Arc::new(EventDefinition::new("dup", "A", date(2024, 1, 1), None));
        let b = Arc::new(EventDefinition::new("dup", "B", date(2024, 1, 2), None));
        assert!(matches!(
            generate_v1(&[a, b], &[]),
            Err(RecurrenceError::DuplicateDefinition { line: Some(3), .. })
        ));
    }
}
