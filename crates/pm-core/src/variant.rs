//! Case variants: distinct ordered activity sequences.

use std::collections::BTreeMap;

use rayon::prelude::*;
use serde::Serialize;

use crate::index::{IndexedEvent, cases};
use crate::transition::round2;
use crate::types::Activity;

/// The ordered activities and elapsed times of one case.
#[derive(Debug, Clone, PartialEq)]
pub struct CasePath {
    pub path: Vec<Activity>,
    /// Seconds from case start, one per activity.
    pub times: Vec<f64>,
    /// 1 if the first visible event is the case's true first event.
    pub is_true_start: u64,
    /// 1 if the last visible event is the case's true last event.
    pub is_true_end: u64,
}

impl CasePath {
    /// Builds the path of one non-empty, rank-ordered case slice.
    fn from_case(case: &[IndexedEvent]) -> Self {
        let first = &case[0];
        let last = &case[case.len() - 1];
        Self {
            path: case.iter().map(|e| e.activity.clone()).collect(),
            times: case.iter().map(|e| e.seconds_from_start).collect(),
            is_true_start: u64::from(first.event_rank == 1),
            is_true_end: u64::from(last.event_rank == last.max_rank),
        }
    }
}

/// Aggregate over all cases sharing one exact activity sequence.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Variant {
    #[serde(rename = "Variant_Path")]
    pub path: Vec<Activity>,
    #[serde(rename = "Frequency")]
    pub frequency: u64,
    /// Elementwise mean of elapsed seconds; same length as `path`.
    #[serde(rename = "Avg_Timings")]
    pub avg_timings: Vec<f64>,
    /// Elementwise sum of elapsed seconds; same length as `path`.
    #[serde(rename = "Total_Timings")]
    pub total_timings: Vec<f64>,
    #[serde(rename = "True_Start_Count")]
    pub true_start_count: u64,
    #[serde(rename = "True_End_Count")]
    pub true_end_count: u64,
    /// Share of all cases, in percent.
    #[serde(rename = "Percentage")]
    pub percentage: f64,
}

impl Variant {
    /// Rounds every timing element to two decimals.
    #[must_use]
    pub fn rounded(mut self) -> Self {
        self.avg_timings.iter_mut().for_each(|t| *t = round2(*t));
        self.total_timings.iter_mut().for_each(|t| *t = round2(*t));
        self
    }
}

/// Builds one [`CasePath`] per case of a case-grouped table.
pub fn case_paths(events: &[IndexedEvent]) -> Vec<CasePath> {
    let slices: Vec<&[IndexedEvent]> = cases(events).collect();
    slices.par_iter().map(|case| CasePath::from_case(case)).collect()
}

/// Elementwise sum of equal-length vectors.
fn sum_vectors(paths: &[&CasePath], len: usize) -> Vec<f64> {
    paths.iter().fold(vec![0.0; len], |mut acc, p| {
        for (slot, t) in acc.iter_mut().zip(&p.times) {
            *slot += t;
        }
        acc
    })
}

/// Groups cases by exact path and aggregates each group.
///
/// Variants come out in path order with unrounded timings; `percentage` is
/// relative to the variants left after the optional frequency floor.
#[allow(clippy::cast_precision_loss)]
pub fn extract_variants(events: &[IndexedEvent], min_frequency: Option<u64>) -> Vec<Variant> {
    let paths = case_paths(events);

    let mut groups: BTreeMap<&[Activity], Vec<&CasePath>> = BTreeMap::new();
    for case in &paths {
        groups.entry(case.path.as_slice()).or_default().push(case);
    }
    let groups: Vec<_> = groups.into_iter().collect();

    let mut variants: Vec<Variant> = groups
        .par_iter()
        .map(|(path, members)| {
            let frequency = members.len() as u64;
            let total_timings = sum_vectors(members, path.len());
            let avg_timings = total_timings.iter().map(|t| t / frequency as f64).collect();
            Variant {
                path: path.to_vec(),
                frequency,
                avg_timings,
                total_timings,
                true_start_count: members.iter().map(|m| m.is_true_start).sum(),
                true_end_count: members.iter().map(|m| m.is_true_end).sum(),
                percentage: 0.0,
            }
        })
        .collect();

    if let Some(min) = min_frequency {
        variants.retain(|v| v.frequency >= min);
    }

    let total: u64 = variants.iter().map(|v| v.frequency).sum();
    for variant in &mut variants {
        variant.percentage = variant.frequency as f64 / total as f64 * 100.0;
    }

    tracing::debug!(cases = paths.len(), variants = variants.len(), "extracted variants");
    if variants.is_empty() {
        tracing::warn!("no variants left");
    }
    variants
}
