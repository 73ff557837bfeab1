//! Reminder value types.
//!
//! An `EventDefinition` is the template a reminder is generated from; an
//! `EventOccurrence` is one dated instance of it. Occurrences hold their
//! definition through an `Arc`, so a loaded snapshot can hand out as many
//! occurrences as it likes without copying definitions around.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{RecurrenceError, RecurrenceResult};

/// How far apart consecutive occurrences of a recurring event are.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Period {
    Weekly,
    Monthly,
    Yearly,
}

impl Period {
    /// The token used in data files and listings.
    pub fn as_str(&self) -> &'static str {
        match self {
            Period::Weekly => "weekly",
            Period::Monthly => "monthly",
            Period::Yearly => "yearly",
        }
    }
}

impl FromStr for Period {
    type Err = RecurrenceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "weekly" => Ok(Period::Weekly),
            "monthly" => Ok(Period::Monthly),
            "yearly" => Ok(Period::Yearly),
            other => Err(RecurrenceError::InvalidPeriod {
                period: other.to_string(),
                line: None,
            }),
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Label for a recurrence period, e.g. in a listing's "Occurs" column.
pub fn period_to_display_string(period: Period) -> &'static str {
    period.as_str()
}

/// Recurrence rule of an event definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recurrence {
    pub period: Period,
    /// Last day an occurrence may fall on (inclusive).
    pub until: Option<NaiveDate>,
}

impl Recurrence {
    pub fn new(period: Period, until: Option<NaiveDate>) -> Self {
        Recurrence { period, until }
    }

    /// Build a rule from a period token such as `"monthly"`.
    pub fn parse(period: &str, until: Option<NaiveDate>) -> RecurrenceResult<Self> {
        Ok(Recurrence::new(period.parse()?, until))
    }
}

/// Template from which occurrences of a reminder are created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventDefinition {
    pub id: String,
    pub description: String,
    pub start_date: NaiveDate,
    /// `None` for one-off events.
    pub recurrence: Option<Recurrence>,
}

impl EventDefinition {
    pub fn new(
        id: impl Into<String>,
        description: impl Into<String>,
        start_date: NaiveDate,
        recurrence: Option<Recurrence>,
    ) -> Self {
        EventDefinition {
            id: id.into(),
            description: description.into(),
            start_date,
            recurrence,
        }
    }

    /// "weekly", "monthly", "yearly", or "once" for one-off events.
    pub fn occurs_label(&self) -> &'static str {
        self.recurrence
            .as_ref()
            .map(|r| period_to_display_string(r.period))
            .unwrap_or("once")
    }

    /// The uncleared occurrence at `start_date`, seed of the generated sequence.
    pub fn first_occurrence(self: &Arc<Self>) -> EventOccurrence {
        EventOccurrence::new(Arc::clone(self), self.start_date, false)
    }
}

impl fmt::Display for EventDefinition {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.description)
    }
}

/// A single dated occurrence of an event definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventOccurrence {
    pub definition: Arc<EventDefinition>,
    pub date: NaiveDate,
    pub cleared: bool,
}

impl EventOccurrence {
    pub fn new(definition: Arc<EventDefinition>, date: NaiveDate, cleared: bool) -> Self {
        EventOccurrence {
            definition,
            date,
            cleared,
        }
    }

    pub fn definition_id(&self) -> &str {
        &self.definition.id
    }

    /// Whether this occurrence belongs to `id` on `date`.
    pub fn matches(&self, id: &str, date: NaiveDate) -> bool {
        self.date == date && self.definition.id == id
    }
}
