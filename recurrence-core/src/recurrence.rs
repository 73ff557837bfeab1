//! Recurrence expansion.
//!
//! Walks a definition's occurrence sequence (`start_date`, then one period step
//! at a time) and splits reminders into past-due and upcoming lists, using
//! persisted occurrences as the override layer.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::{Datelike, NaiveDate};
use tracing::warn;

use crate::date::{self, DayOverflow, MissingDay};
use crate::error::{RecurrenceError, RecurrenceResult};
use crate::event::{EventDefinition, EventOccurrence, Period};

/// Compute the occurrence following `occ` in its definition's sequence.
///
/// Returns `Ok(None)` for one-off events and once the next date would fall
/// after the rule's `until` date. Monthly and yearly steps keep the day of
/// month of the definition's `start_date`; `overflow` decides what happens
/// when the target month is too short for it.
pub fn advance_occurrence(
    occ: &EventOccurrence,
    overflow: DayOverflow,
) -> RecurrenceResult<Option<EventOccurrence>> {
    let definition = &occ.definition;
    let Some(recurrence) = &definition.recurrence else {
        return Ok(None);
    };

    let anchor_day = definition.start_date.day();
    let stepped = match recurrence.period {
        Period::Weekly => date::add_days(occ.date, 7).ok_or(MissingDay {
            year: occ.date.year(),
            month: occ.date.month(),
            day: occ.date.day() + 7,
        }),
        Period::Monthly => date::next_month(occ.date, anchor_day, overflow),
        Period::Yearly => date::next_year(occ.date, anchor_day, overflow),
    };

    let next = stepped.map_err(|missing| RecurrenceError::InvalidRecurrenceDate {
        id: definition.id.clone(),
        year: missing.year,
        month: missing.month,
        day: missing.day,
    })?;

    if recurrence.until.is_some_and(|until| next > until) {
        return Ok(None);
    }

    Ok(Some(EventOccurrence::new(Arc::clone(definition), next, false)))
}

/// Persisted occurrences that are still uncleared and dated strictly before `now`.
///
/// Generated occurrences are never reported here: only explicitly tracked
/// occurrences can be overdue. Output keeps the order of `occurrences`.
pub fn past_due(
    _definitions: &[Arc<EventDefinition>],
    occurrences: &[EventOccurrence],
    now: NaiveDate,
) -> Vec<EventOccurrence> {
    occurrences
        .iter()
        .filter(|occ| !occ.cleared && occ.date < now)
        .cloned()
        .collect()
}

/// Longest look-ahead `upcoming` will scan, in days (about a century).
pub const MAX_HORIZON_DAYS: u32 = 36_500;

/// Result of `upcoming`: the occurrences found, plus the errors of definitions
/// whose sequence could not be walked to the end of the window.
#[derive(Debug, Default)]
pub struct UpcomingOccurrences {
    pub occurrences: Vec<EventOccurrence>,
    pub skipped: Vec<RecurrenceError>,
}

/// Generated occurrences dated within `[now, now + horizon_days]`, minus those
/// with a cleared persisted occurrence for the same definition and date.
///
/// A definition whose sequence fails to step contributes the occurrences found
/// before the failure and its error lands in `skipped`; the other definitions
/// are unaffected. `horizon_days` is capped at `MAX_HORIZON_DAYS`.
pub fn upcoming(
    definitions: &[Arc<EventDefinition>],
    occurrences: &[EventOccurrence],
    now: NaiveDate,
    horizon_days: u32,
    overflow: DayOverflow,
) -> UpcomingOccurrences {
    let horizon_days = horizon_days.min(MAX_HORIZON_DAYS);
    let window_end = date::add_days(now, u64::from(horizon_days)).unwrap_or(NaiveDate::MAX);

    let cleared: HashSet<(&str, NaiveDate)> = occurrences
        .iter()
        .filter(|occ| occ.cleared)
        .map(|occ| (occ.definition_id(), occ.date))
        .collect();

    let mut result = UpcomingOccurrences::default();

    for definition in definitions {
        let mut current = Some(definition.first_occurrence());

        while let Some(occ) = current.take() {
            if occ.date > window_end {
                break;
            }

            // Nothing past the window is needed, so don't step beyond its last day
            if occ.date < window_end {
                match advance_occurrence(&occ, overflow) {
                    Ok(next) => current = next,
                    Err(e) => {
                        warn!(id = %definition.id, error = %e, "Stopped expanding event");
                        result.skipped.push(e);
                    }
                }
            }

            if occ.date >= now && !cleared.contains(&(definition.id.as_str(), occ.date)) {
                result.occurrences.push(occ);
            }
        }
    }

    result
}

/// Whether `date` is one of `definition`'s generated occurrence dates.
pub fn occurs_on(
    definition: &Arc<EventDefinition>,
    date: NaiveDate,
    overflow: DayOverflow,
) -> RecurrenceResult<bool> {
    let mut current = Some(definition.first_occurrence());
    while let Some(occ) = current {
        if occ.date >= date {
            return Ok(occ.date == date);
        }
        current = advance_occurrence(&occ, overflow)?;
    }
    Ok(false)
}

/// Sort by date, then description. Stable, so equal keys keep their input order.
pub fn sort_for_display(occurrences: &mut [EventOccurrence]) {
    occurrences.sort_by(|a, b| {
        a.date
            .cmp(&b.date)
            .then_with(|| a.definition.description.cmp(&b.definition.description))
    });
}
