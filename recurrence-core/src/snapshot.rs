//! A loaded set of definitions and persisted occurrences.

use std::sync::Arc;

use chrono::NaiveDate;
use tracing::debug;

use crate::date::DayOverflow;
use crate::error::{RecurrenceError, RecurrenceResult};
use crate::event::{EventDefinition, EventOccurrence};
use crate::recurrence::{self, UpcomingOccurrences};

/// Everything read from (or about to be written to) a data file.
///
/// Definitions keep insertion order, which is also the order they are written
/// back out in.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Snapshot {
    pub definitions: Vec<Arc<EventDefinition>>,
    pub occurrences: Vec<EventOccurrence>,
}

impl Snapshot {
    pub fn new(definitions: Vec<Arc<EventDefinition>>, occurrences: Vec<EventOccurrence>) -> Self {
        Snapshot {
            definitions,
            occurrences,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty() && self.occurrences.is_empty()
    }

    pub fn definition(&self, id: &str) -> Option<&Arc<EventDefinition>> {
        self.definitions.iter().find(|d| d.id == id)
    }

    /// Add a new definition. Ids must be unique within a snapshot.
    pub fn add_definition(
        &mut self,
        definition: EventDefinition,
    ) -> RecurrenceResult<Arc<EventDefinition>> {
        if self.definition(&definition.id).is_some() {
            return Err(RecurrenceError::DuplicateDefinition {
                id: definition.id,
                line: None,
            });
        }
        let definition = Arc::new(definition);
        self.definitions.push(Arc::clone(&definition));
        Ok(definition)
    }

    /// Record whether the occurrence of `id` on `date` has been handled.
    ///
    /// Updates the persisted occurrence if one exists, otherwise appends one.
    /// `date` must be on the definition's occurrence sequence.
    pub fn set_cleared(
        &mut self,
        id: &str,
        date: NaiveDate,
        cleared: bool,
        overflow: DayOverflow,
    ) -> RecurrenceResult<()> {
        let definition = self
            .definition(id)
            .cloned()
            .ok_or_else(|| RecurrenceError::UnknownDefinition(id.to_string()))?;

        if !recurrence::occurs_on(&definition, date, overflow)? {
            return Err(RecurrenceError::OffSequence {
                id: id.to_string(),
                date,
            });
        }

        match self.occurrences.iter_mut().find(|o| o.matches(id, date)) {
            Some(existing) => existing.cleared = cleared,
            None => self
                .occurrences
                .push(EventOccurrence::new(definition, date, cleared)),
        }

        debug!(id, %date, cleared, "Updated occurrence");
        Ok(())
    }

    pub fn past_due(&self, now: NaiveDate) -> Vec<EventOccurrence> {
        recurrence::past_due(&self.definitions, &self.occurrences, now)
    }

    pub fn upcoming(
        &self,
        now: NaiveDate,
        horizon_days: u32,
        overflow: DayOverflow,
    ) -> UpcomingOccurrences {
        recurrence::upcoming(
            &self.definitions,
            &self.occurrences,
            now,
            horizon_days,
            overflow,
        )
    }
}
