//! Per-case ordering and ranking.
//!
//! Sorts the log by (case, timestamp) and annotates each event with its
//! 1-based rank within the case, the case's event count, and the seconds
//! elapsed since the case's first event.

use chrono::{DateTime, TimeDelta, Utc};

use crate::event::{EventLog, within_bounds};
use crate::types::{Activity, CaseId};

/// An event annotated with its position inside its case.
#[derive(Debug, Clone, PartialEq)]
pub struct IndexedEvent {
    pub case_id: CaseId,
    pub activity: Activity,
    pub timestamp: DateTime<Utc>,
    /// 1-based position within the case, by timestamp then input order.
    pub event_rank: usize,
    /// Number of events in the case.
    pub max_rank: usize,
    /// Seconds since the case's earliest event.
    pub seconds_from_start: f64,
}

/// Seconds between two instants, keeping sub-second precision.
#[allow(clippy::cast_precision_loss)]
pub(crate) fn seconds_between(from: DateTime<Utc>, to: DateTime<Utc>) -> f64 {
    let delta: TimeDelta = to - from;
    delta.num_microseconds().map_or_else(
        || delta.num_milliseconds() as f64 / 1_000.0,
        |us| us as f64 / 1_000_000.0,
    )
}

/// Sorts and ranks every event of the log.
///
/// The output has the same number of rows as the log, grouped by case and
/// time-ordered within each case. Equal timestamps keep input order.
pub fn index_cases(log: &EventLog) -> Vec<IndexedEvent> {
    let mut events: Vec<_> = log.events().iter().collect();
    // sort_by is stable: ties keep row order
    events.sort_by(|a, b| {
        a.case_id
            .cmp(&b.case_id)
            .then_with(|| a.timestamp.cmp(&b.timestamp))
    });

    let mut indexed = Vec::with_capacity(events.len());
    for case in events.chunk_by(|a, b| a.case_id == b.case_id) {
        let case_start = case[0].timestamp;
        let max_rank = case.len();
        indexed.extend(case.iter().enumerate().map(|(i, event)| IndexedEvent {
            case_id: event.case_id.clone(),
            activity: event.activity.clone(),
            timestamp: event.timestamp,
            event_rank: i + 1,
            max_rank,
            seconds_from_start: seconds_between(case_start, event.timestamp),
        }));
    }

    tracing::debug!(events = indexed.len(), "indexed cases");
    indexed
}

/// Keeps only indexed events within the inclusive bounds.
///
/// Ranks and elapsed times are left as computed over the full case.
pub fn retain_window(
    mut events: Vec<IndexedEvent>,
    start: Option<DateTime<Utc>>,
    end: Option<DateTime<Utc>>,
) -> Vec<IndexedEvent> {
    events.retain(|e| within_bounds(e.timestamp, start, end));
    events
}

/// Splits a case-grouped table into one slice per case.
pub fn cases(events: &[IndexedEvent]) -> impl Iterator<Item = &[IndexedEvent]> {
    events.chunk_by(|a, b| a.case_id == b.case_id)
}
