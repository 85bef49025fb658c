//! Pipeline options and their validation.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ConfigurationError;

/// Which edge statistic drives the edge weight and label.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeightMetric {
    /// Number of transitions between the two activities.
    #[default]
    Cases,
    /// Mean transition duration, scaled to a [`TimeUnit`].
    MeanTime,
}

impl WeightMetric {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Cases => "cases",
            Self::MeanTime => "mean_time",
        }
    }
}

impl fmt::Display for WeightMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for WeightMetric {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "cases" => Ok(Self::Cases),
            "mean_time" | "mean-time" => Ok(Self::MeanTime),
            _ => Err(ConfigurationError::UnknownWeightMetric(s.to_string())),
        }
    }
}

/// Unit a mean duration is expressed in when used as edge weight.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum TimeUnit {
    Second,
    Minute,
    Hour,
    #[default]
    Day,
    Week,
}

impl TimeUnit {
    /// Number of seconds in one unit.
    pub const fn seconds(self) -> f64 {
        match self {
            Self::Second => 1.0,
            Self::Minute => 60.0,
            Self::Hour => 3_600.0,
            Self::Day => 86_400.0,
            Self::Week => 604_800.0,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Second => "second",
            Self::Minute => "minute",
            Self::Hour => "hour",
            Self::Day => "day",
            Self::Week => "week",
        }
    }
}

impl fmt::Display for TimeUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for TimeUnit {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "second" | "seconds" | "s" => Ok(Self::Second),
            "minute" | "minutes" | "m" => Ok(Self::Minute),
            "hour" | "hours" | "h" => Ok(Self::Hour),
            "day" | "days" | "d" => Ok(Self::Day),
            "week" | "weeks" | "w" => Ok(Self::Week),
            _ => Err(ConfigurationError::UnknownTimeUnit(s.to_string())),
        }
    }
}

impl Serialize for TimeUnit {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for TimeUnit {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Edge weight selection: the metric, and the unit used for `mean_time`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WeightSpec {
    pub metric: WeightMetric,
    /// Only consulted when `metric` is [`WeightMetric::MeanTime`].
    pub unit: TimeUnit,
}

/// When the date bounds are applied relative to case indexing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DateScope {
    /// Drop out-of-range events first, then index the remaining log.
    /// Every retained case starts at rank 1.
    #[default]
    Reindex,
    /// Index the full log, then keep only in-range events. Ranks and
    /// elapsed times refer to the full case, so a clipped case loses its
    /// true start or true end.
    Window,
}

impl FromStr for DateScope {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "reindex" => Ok(Self::Reindex),
            "window" => Ok(Self::Window),
            _ => Err(ConfigurationError::UnknownDateScope(s.to_string())),
        }
    }
}

/// Inclusive numeric bounds applied to aggregated edges.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct EdgeFilter {
    pub min_cases: Option<u64>,
    pub max_cases: Option<u64>,
    pub min_mean_time_seconds: Option<f64>,
    pub max_mean_time_seconds: Option<f64>,
}

impl EdgeFilter {
    /// Returns true if a (case count, mean duration) pair passes every bound.
    pub fn accepts(&self, case_count: u64, mean_duration_seconds: f64) -> bool {
        self.min_cases.is_none_or(|min| case_count >= min)
            && self.max_cases.is_none_or(|max| case_count <= max)
            && self
                .min_mean_time_seconds
                .is_none_or(|min| mean_duration_seconds >= min)
            && self
                .max_mean_time_seconds
                .is_none_or(|max| mean_duration_seconds <= max)
    }
}

/// The single options value consumed by the pipeline.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProcessMapOptions {
    /// Inclusive lower bound on event timestamps.
    pub start_date: Option<DateTime<Utc>>,
    /// Inclusive upper bound on event timestamps.
    pub end_date: Option<DateTime<Utc>>,
    /// Bounds on edge statistics. Never applied to variants.
    pub edge_filter: EdgeFilter,
    pub weight: WeightSpec,
    pub date_scope: DateScope,
    /// Drop variants shared by fewer cases than this.
    pub min_variant_frequency: Option<u64>,
}

impl ProcessMapOptions {
    /// Checks the options for contradictions before any computation runs.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if let (Some(start), Some(end)) = (self.start_date, self.end_date) {
            if start > end {
                return Err(ConfigurationError::DateBoundsInverted { start, end });
            }
        }

        let filter = &self.edge_filter;
        if let (Some(min), Some(max)) = (filter.min_cases, filter.max_cases) {
            if min > max {
                return Err(ConfigurationError::CaseBoundsInverted { min, max });
            }
        }

        for (field, value) in [
            ("min mean time", filter.min_mean_time_seconds),
            ("max mean time", filter.max_mean_time_seconds),
        ] {
            if let Some(value) = value {
                if value.is_nan() || value < 0.0 {
                    return Err(ConfigurationError::InvalidMeanTime { field, value });
                }
            }
        }
        if let (Some(min), Some(max)) = (filter.min_mean_time_seconds, filter.max_mean_time_seconds) {
            if min > max {
                return Err(ConfigurationError::MeanTimeBoundsInverted { min, max });
            }
        }

        if self.min_variant_frequency == Some(0) {
            return Err(ConfigurationError::ZeroVariantFrequency);
        }

        Ok(())
    }
}
