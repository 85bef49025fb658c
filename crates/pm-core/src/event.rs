//! Events and the validated event log.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{MalformedInput, MalformedReason};
use crate::types::{Activity, CaseId};

/// Naive layouts accepted for timestamps without an offset (read as UTC).
const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
    "%Y/%m/%d %H:%M:%S%.f",
    "%Y/%m/%d %H:%M",
];

/// Offset-carrying layouts accepted besides RFC 3339.
const OFFSET_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S%.f%:z", "%Y-%m-%d %H:%M:%S%.f%z"];

/// One row of the event log: a case performed an activity at an instant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    /// The process instance this event belongs to.
    pub case_id: CaseId,
    /// What happened.
    pub activity: Activity,
    /// When it happened.
    pub timestamp: DateTime<Utc>,
}

/// Returns true if `timestamp` falls within the inclusive bounds.
pub(crate) fn within_bounds(
    timestamp: DateTime<Utc>,
    start: Option<DateTime<Utc>>,
    end: Option<DateTime<Utc>>,
) -> bool {
    start.is_none_or(|s| timestamp >= s) && end.is_none_or(|e| timestamp <= e)
}

impl Event {
    /// Returns true if the event falls within the inclusive bounds.
    pub fn is_within(&self, start: Option<DateTime<Utc>>, end: Option<DateTime<Utc>>) -> bool {
        within_bounds(self.timestamp, start, end)
    }
}

/// An unvalidated row as handed over by a loader.
///
/// Columns are order-mapped by the loader; a `None` means the column was
/// absent for this row.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawEvent {
    pub case_id: Option<String>,
    pub activity: Option<String>,
    pub timestamp: Option<String>,
}

impl RawEvent {
    /// Creates a row with all three columns present.
    pub fn new(
        case_id: impl Into<String>,
        activity: impl Into<String>,
        timestamp: impl Into<String>,
    ) -> Self {
        Self {
            case_id: Some(case_id.into()),
            activity: Some(activity.into()),
            timestamp: Some(timestamp.into()),
        }
    }

    fn validate(self) -> Result<Event, MalformedReason> {
        let case_id = self
            .case_id
            .ok_or(MalformedReason::MissingColumn { column: "case ID" })?;
        let activity = self
            .activity
            .ok_or(MalformedReason::MissingColumn { column: "activity" })?;
        let timestamp = self
            .timestamp
            .ok_or(MalformedReason::MissingColumn { column: "timestamp" })?;

        let timestamp =
            parse_timestamp(&timestamp).ok_or(MalformedReason::UnparseableTimestamp { value: timestamp })?;

        Ok(Event {
            case_id: CaseId::new(case_id)?,
            activity: Activity::new(activity)?,
            timestamp,
        })
    }
}

/// A validated, fully materialized event log.
///
/// Row order is preserved; it breaks timestamp ties within a case.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventLog {
    events: Vec<Event>,
}

impl EventLog {
    /// Validates loader rows, failing on the first malformed one.
    pub fn from_raw(rows: impl IntoIterator<Item = RawEvent>) -> Result<Self, MalformedInput> {
        let events = rows
            .into_iter()
            .enumerate()
            .map(|(row, raw)| raw.validate().map_err(|reason| MalformedInput { row, reason }))
            .collect::<Result<Vec<_>, _>>()?;
        tracing::debug!(events = events.len(), "validated event log");
        Ok(Self { events })
    }

    /// Returns the events in input order.
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Returns a new log holding only events within the inclusive bounds.
    #[must_use]
    pub fn within(&self, start: Option<DateTime<Utc>>, end: Option<DateTime<Utc>>) -> Self {
        if start.is_none() && end.is_none() {
            return self.clone();
        }
        let events = self
            .events
            .iter()
            .filter(|e| e.is_within(start, end))
            .cloned()
            .collect();
        Self { events }
    }
}

/// Parses a timestamp in any of the accepted layouts.
///
/// Accepts RFC 3339, common `YYYY-MM-DD HH:MM[:SS[.fff]]` variants (with or
/// without an offset) and bare dates. Values without an offset are UTC.
pub fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    for format in OFFSET_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(s, format) {
            return Some(dt.with_timezone(&Utc));
        }
    }
    for format in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, format) {
            return Some(naive.and_utc());
        }
    }
    ["%Y-%m-%d", "%Y/%m/%d"]
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(s, format).ok())
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}
