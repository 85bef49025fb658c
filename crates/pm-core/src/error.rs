//! Error types for the process map pipeline.

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::types::ValidationError;

/// Why an input row could not be turned into an event.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum MalformedReason {
    /// A required column was absent from the row.
    #[error("missing {column} column")]
    MissingColumn { column: &'static str },

    /// A required value was present but empty.
    #[error(transparent)]
    Invalid(#[from] ValidationError),

    /// The timestamp could not be parsed as an instant.
    #[error("unparseable timestamp {value:?}")]
    UnparseableTimestamp { value: String },
}

/// An input row that violates the event contract.
///
/// Fatal: the whole computation is aborted and no partial result exists.
#[derive(Debug, Error, Clone, PartialEq)]
#[error("malformed input at row {row}: {reason}")]
pub struct MalformedInput {
    /// 0-based index of the offending row in the input.
    pub row: usize,
    /// What was wrong with it.
    pub reason: MalformedReason,
}

/// Options that are contradictory or out of their domain.
///
/// Detected before any computation runs.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigurationError {
    /// `min_cases` is greater than `max_cases`.
    #[error("min cases ({min}) is greater than max cases ({max})")]
    CaseBoundsInverted { min: u64, max: u64 },

    /// `min_mean_time_seconds` is greater than `max_mean_time_seconds`.
    #[error("min mean time ({min}s) is greater than max mean time ({max}s)")]
    MeanTimeBoundsInverted { min: f64, max: f64 },

    /// A mean-time bound is negative or not a number.
    #[error("{field} must be a non-negative number of seconds, got {value}")]
    InvalidMeanTime { field: &'static str, value: f64 },

    /// `start_date` is after `end_date`.
    #[error("start date {start} is after end date {end}")]
    DateBoundsInverted {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },

    /// A variant frequency floor of zero filters nothing and is rejected.
    #[error("minimum variant frequency must be at least 1")]
    ZeroVariantFrequency,

    /// Weight metric string not recognized.
    #[error("unknown weight metric: {0} (expected cases or mean_time)")]
    UnknownWeightMetric(String),

    /// Time unit string not recognized.
    #[error("unknown time unit: {0} (expected second, minute, hour, day or week)")]
    UnknownTimeUnit(String),

    /// Date scope string not recognized.
    #[error("unknown date scope: {0} (expected reindex or window)")]
    UnknownDateScope(String),
}

/// Any failure of [`build_process_map`](crate::build_process_map).
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ProcessMapError {
    #[error(transparent)]
    MalformedInput(#[from] MalformedInput),

    #[error("invalid options: {0}")]
    Configuration(#[from] ConfigurationError),
}
