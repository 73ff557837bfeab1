//! Calendar arithmetic on naive dates.

use chrono::{Datelike, Days, NaiveDate};
use serde::{Deserialize, Serialize};

/// What to do when a monthly or yearly step lands on a day the target month lacks
/// (Jan 31 + 1 month, Feb 29 + 1 year).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DayOverflow {
    /// Use the last day of the target month.
    #[default]
    Clamp,
    /// Treat the step as an invalid date.
    Reject,
}

/// Outcome of a month/year step that could not produce a date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MissingDay {
    pub year: i32,
    pub month: u32,
    pub day: u32,
}

pub fn add_days(date: NaiveDate, days: u64) -> Option<NaiveDate> {
    date.checked_add_days(Days::new(days))
}

/// Number of days in `month` of `year`.
pub fn days_in_month(year: i32, month: u32) -> u32 {
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .and_then(|first| first.pred_opt())
        .map(|last| last.day())
        .unwrap_or(28)
}

/// Move `date` to the following month (rolling 12 -> 1 of the next year) on `anchor_day`.
pub fn next_month(
    date: NaiveDate,
    anchor_day: u32,
    overflow: DayOverflow,
) -> Result<NaiveDate, MissingDay> {
    let (year, month) = if date.month() == 12 {
        (date.year() + 1, 1)
    } else {
        (date.year(), date.month() + 1)
    };
    on_day(year, month, anchor_day, overflow)
}

/// Move `date` to the same month of the following year on `anchor_day`.
pub fn next_year(
    date: NaiveDate,
    anchor_day: u32,
    overflow: DayOverflow,
) -> Result<NaiveDate, MissingDay> {
    on_day(date.year() + 1, date.month(), anchor_day, overflow)
}

fn on_day(year: i32, month: u32, day: u32, overflow: DayOverflow) -> Result<NaiveDate, MissingDay> {
    let missing = MissingDay { year, month, day };
    let day = match overflow {
        DayOverflow::Clamp => day.min(days_in_month(year, month)),
        DayOverflow::Reject => day,
    };
    NaiveDate::from_ymd_opt(year, month, day).ok_or(missing)
}

/// `YYYY-M-DD` with month and day zero-padded to two digits.
pub fn format_date(date: NaiveDate) -> String {
    format!("{}-{:02}-{:02}", date.year(), date.month(), date.day())
}

/// Parse the `format_date` layout. Components are plain unsigned integers,
/// except that the year may carry a leading `-` (years before 1 BCE).
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    let (negative, s) = match s.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, s),
    };
    let mut parts = s.split('-');
    let year = i32::try_from(parse_component(parts.next()?)?).ok()?;
    let month = parse_component(parts.next()?)?;
    let day = parse_component(parts.next()?)?;
    if parts.next().is_some() {
        return None;
    }
    NaiveDate::from_ymd_opt(if negative { -year } else { year }, month, day)
}

fn parse_component(s: &str) -> Option<u32> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}
