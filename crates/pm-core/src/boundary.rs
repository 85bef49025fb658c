//! Start and end activity selection.

use std::collections::HashMap;

use serde::Serialize;

use crate::types::{Activity, Coverage};
use crate::variant::Variant;

/// Activities that jointly cover most true starts and true ends.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BoundaryNodes {
    /// Start activities, highest count first.
    pub start: Vec<Activity>,
    /// End activities, highest count first.
    pub end: Vec<Activity>,
}

/// Occurrence counts per activity, in first-seen order.
#[derive(Debug, Default)]
struct Tally<'a> {
    order: Vec<(&'a Activity, u64)>,
    position: HashMap<&'a Activity, usize>,
}

impl<'a> Tally<'a> {
    fn add(&mut self, activity: &'a Activity, count: u64) {
        if let Some(&i) = self.position.get(activity) {
            self.order[i].1 += count;
        } else {
            self.position.insert(activity, self.order.len());
            self.order.push((activity, count));
        }
    }

    /// Shortest descending-count prefix whose share reaches `target`.
    #[allow(clippy::cast_precision_loss)]
    fn covering(mut self, target: Coverage) -> Vec<Activity> {
        let total: u64 = self.order.iter().map(|(_, count)| count).sum();
        if total == 0 {
            return Vec::new();
        }
        self.order.sort_by(|a, b| b.1.cmp(&a.1));

        let mut running = 0;
        let mut selected = Vec::new();
        for (activity, count) in self.order {
            running += count;
            selected.push(activity.clone());
            if running as f64 / total as f64 >= target.value() {
                break;
            }
        }
        selected
    }
}

/// Picks start and end activities from the reduced variant set.
///
/// Each variant contributes its true-start count to its first activity and
/// its true-end count to its last activity.
pub fn select_boundary_nodes(variants: &[Variant], target: Coverage) -> BoundaryNodes {
    let mut starts = Tally::default();
    let mut ends = Tally::default();

    for variant in variants {
        let (Some(first), Some(last)) = (variant.path.first(), variant.path.last()) else {
            continue;
        };
        if variant.true_start_count > 0 {
            starts.add(first, variant.true_start_count);
        }
        if variant.true_end_count > 0 {
            ends.add(last, variant.true_end_count);
        }
    }

    let nodes = BoundaryNodes {
        start: starts.covering(target),
        end: ends.covering(target),
    };
    tracing::debug!(
        start = nodes.start.len(),
        end = nodes.end.len(),
        "selected boundary activities"
    );
    nodes
}

#[cfg(test)]
mod tests {
    use super::*;

    fn variant(path: &[&str], starts: u64, ends: u64) -> Variant {
        Variant {
            path: path.iter().map(|a| Activity::new(*a).unwrap()).collect(),
            frequency: starts.max(ends),
            avg_timings: vec![0.0; path.len()],
            total_timings: vec![0.0; path.len()],
            true_start_count: starts,
            true_end_count: ends,
            percentage: 0.0,
        }
    }

    fn names(activities: &[Activity]) -> Vec<&str> {
        activities.iter().map(Activity::as_str).collect()
    }

    #[test]
    fn test_single_start_and_end() {
        let nodes = select_boundary_nodes(&[variant(&["X", "Y"], 2, 2)], Coverage::BOUNDARY);
        assert_eq!(names(&nodes.start), ["X"]);
        assert_eq!(names(&nodes.end), ["Y"]);
    }

    #[test]
    fn test_counts_merge_across_variants() {
        let variants = [
            variant(&["A", "B", "Z"], 40, 40),
            variant(&["C", "Z"], 35, 35),
            variant(&["A", "Y"], 20, 20),
            variant(&["D", "Y"], 5, 5),
        ];
        let nodes = select_boundary_nodes(&variants, Coverage::BOUNDARY);
        // A=60, C=35 -> 95% reached
        assert_eq!(names(&nodes.start), ["A", "C"]);
        // Z=75, Y=25 -> both needed
        assert_eq!(names(&nodes.end), ["Z", "Y"]);
    }

    #[test]
    fn test_stops_at_crossing_element() {
        let variants = [variant(&["A"], 90, 0), variant(&["B"], 10, 0)];
        let nodes = select_boundary_nodes(&variants, Coverage::BOUNDARY);
        assert_eq!(names(&nodes.start), ["A"]);
        assert!(nodes.end.is_empty());
    }

    #[test]
    fn test_zero_true_counts_contribute_nothing() {
        let variants = [variant(&["A", "B"], 0, 3), variant(&["C", "B"], 3, 0)];
        let nodes = select_boundary_nodes(&variants, Coverage::BOUNDARY);
        assert_eq!(names(&nodes.start), ["C"]);
        assert_eq!(names(&nodes.end), ["B"]);
    }

    #[test]
    fn test_ties_keep_first_seen_order() {
        let variants = [variant(&["B"], 5, 5), variant(&["A"], 5, 5)];
        let nodes = select_boundary_nodes(&variants, Coverage::BOUNDARY);
        assert_eq!(names(&nodes.start), ["B", "A"]);
    }

    #[test]
    fn test_empty_input_yields_empty_sets() {
        let nodes = select_boundary_nodes(&[], Coverage::BOUNDARY);
        assert_eq!(nodes, BoundaryNodes::default());
    }
}
