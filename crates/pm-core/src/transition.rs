//! Directly-follows edges.
//!
//! # Algorithm Summary
//!
//! 1. Pair every event with its immediate successor in the same case
//! 2. Group the pairs by (source, target) activity and aggregate count,
//!    total and mean duration
//! 3. Drop edges outside the inclusive numeric bounds
//! 4. Attach tooltips and the weight/label for the selected metric

use std::collections::BTreeMap;

use serde::Serialize;

use crate::duration::DurationFormatter;
use crate::index::{IndexedEvent, cases, seconds_between};
use crate::options::{EdgeFilter, WeightMetric, WeightSpec};
use crate::types::Activity;

/// Two temporally adjacent events of one case.
#[derive(Debug, Clone, PartialEq)]
pub struct Transition<'a> {
    pub source: &'a Activity,
    pub target: &'a Activity,
    pub duration_seconds: f64,
}

/// Aggregate over all transitions sharing a (source, target) pair.
#[derive(Debug, Clone, PartialEq)]
pub struct EdgeStats {
    pub source: Activity,
    pub target: Activity,
    pub case_count: u64,
    pub total_duration_seconds: f64,
    pub mean_duration_seconds: f64,
}

/// Numeric weight of an edge; integral for case counts.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum WeightValue {
    Count(u64),
    Duration(f64),
}

impl WeightValue {
    #[allow(clippy::cast_precision_loss)]
    pub fn as_f64(self) -> f64 {
        match self {
            Self::Count(n) => n as f64,
            Self::Duration(d) => d,
        }
    }
}

/// A filtered, labelled edge of the process map.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Edge {
    #[serde(rename = "Source_Activity")]
    pub source: Activity,
    #[serde(rename = "Target_Activity")]
    pub target: Activity,
    #[serde(skip)]
    pub case_count: u64,
    #[serde(skip)]
    pub total_duration_seconds: f64,
    #[serde(rename = "Mean_Duration_Seconds")]
    pub mean_duration_seconds: f64,
    #[serde(rename = "Tooltip_Total_Time")]
    pub tooltip_total_time: String,
    #[serde(rename = "Tooltip_Mean_Time")]
    pub tooltip_mean_time: String,
    #[serde(rename = "Weight_Value")]
    pub weight_value: WeightValue,
    #[serde(rename = "Edge_Label")]
    pub edge_label: String,
}

/// Pairs each event with its successor within the same case.
///
/// A case of N events yields N-1 transitions.
pub fn derive_transitions(events: &[IndexedEvent]) -> Vec<Transition<'_>> {
    cases(events)
        .flat_map(|case| {
            case.windows(2).map(|pair| Transition {
                source: &pair[0].activity,
                target: &pair[1].activity,
                duration_seconds: seconds_between(pair[0].timestamp, pair[1].timestamp),
            })
        })
        .collect()
}

/// Groups transitions by (source, target), ordered by key.
#[allow(clippy::cast_precision_loss)]
pub fn aggregate_transitions(transitions: &[Transition<'_>]) -> Vec<EdgeStats> {
    let mut groups: BTreeMap<(&Activity, &Activity), (u64, f64)> = BTreeMap::new();
    for transition in transitions {
        let (count, total) = groups
            .entry((transition.source, transition.target))
            .or_insert((0, 0.0));
        *count += 1;
        *total += transition.duration_seconds;
    }

    groups
        .into_iter()
        .map(|((source, target), (case_count, total))| EdgeStats {
            source: source.clone(),
            target: target.clone(),
            case_count,
            total_duration_seconds: total,
            mean_duration_seconds: total / case_count as f64,
        })
        .collect()
}

/// Rounds to two decimals and renders like a float (`15.0`, `0.17`).
pub(crate) fn format_rounded(value: f64) -> String {
    let rounded = round2(value);
    if rounded.fract() == 0.0 {
        format!("{rounded:.1}")
    } else {
        format!("{rounded}")
    }
}

/// Rounds to two decimal places, ties to even (`0.125` becomes `0.12`).
pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round_ties_even() / 100.0
}

impl Edge {
    /// Attaches tooltips and weight/label to aggregated statistics.
    pub fn from_stats(stats: EdgeStats, weight: WeightSpec, formatter: &dyn DurationFormatter) -> Self {
        let (weight_value, edge_label) = match weight.metric {
            WeightMetric::Cases => (WeightValue::Count(stats.case_count), stats.case_count.to_string()),
            WeightMetric::MeanTime => {
                let value = stats.mean_duration_seconds / weight.unit.seconds();
                let label = format!("{} {}", format_rounded(value), formatter.unit_label(weight.unit));
                (WeightValue::Duration(value), label)
            }
        };

        Self {
            tooltip_total_time: formatter.format(Some(stats.total_duration_seconds)),
            tooltip_mean_time: formatter.format(Some(stats.mean_duration_seconds)),
            source: stats.source,
            target: stats.target,
            case_count: stats.case_count,
            total_duration_seconds: stats.total_duration_seconds,
            mean_duration_seconds: stats.mean_duration_seconds,
            weight_value,
            edge_label,
        }
    }
}

/// Derives, aggregates, filters and labels the directly-follows edges.
///
/// An empty result is valid output.
pub fn build_edges(
    events: &[IndexedEvent],
    filter: &EdgeFilter,
    weight: WeightSpec,
    formatter: &dyn DurationFormatter,
) -> Vec<Edge> {
    let transitions = derive_transitions(events);
    let stats = aggregate_transitions(&transitions);
    let aggregated = stats.len();

    let edges: Vec<Edge> = stats
        .into_iter()
        .filter(|s| filter.accepts(s.case_count, s.mean_duration_seconds))
        .map(|s| Edge::from_stats(s, weight, formatter))
        .collect();

    tracing::debug!(
        transitions = transitions.len(),
        aggregated,
        kept = edges.len(),
        "built directly-follows edges"
    );
    if edges.is_empty() {
        tracing::warn!("no edges left after filtering");
    }
    edges
}
