//! The event-log-to-process-map pipeline.
//!
//! Indexing runs once; edges and variants are then derived independently
//! from the same indexed table, so edge filters never affect variants.

use serde::Serialize;

use crate::boundary::select_boundary_nodes;
use crate::duration::DurationFormatter;
use crate::error::ProcessMapError;
use crate::event::EventLog;
use crate::index::{IndexedEvent, index_cases, retain_window};
use crate::options::{DateScope, ProcessMapOptions};
use crate::pareto::pareto_reduce;
use crate::transition::{Edge, build_edges};
use crate::types::{Activity, Coverage};
use crate::variant::{Variant, extract_variants};

/// Everything needed to render a process map.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessMap {
    /// Filtered, labelled directly-follows edges.
    pub graph_data: Vec<Edge>,
    /// Pareto-reduced variants, most frequent first.
    pub variants: Vec<Variant>,
    pub start_activities: Vec<Activity>,
    pub end_activities: Vec<Activity>,
}

/// Applies the date bounds according to the configured scope.
fn scoped_events(log: &EventLog, options: &ProcessMapOptions) -> Vec<IndexedEvent> {
    let (start, end) = (options.start_date, options.end_date);
    match options.date_scope {
        DateScope::Reindex => index_cases(&log.within(start, end)),
        DateScope::Window => retain_window(index_cases(log), start, end),
    }
}

/// Builds the process map for one event log.
///
/// Options are validated before anything is computed. Empty edge, variant
/// or boundary sets are valid results.
pub fn build_process_map(
    log: &EventLog,
    options: &ProcessMapOptions,
    formatter: &dyn DurationFormatter,
) -> Result<ProcessMap, ProcessMapError> {
    options.validate()?;
    tracing::debug!(events = log.len(), ?options, "building process map");

    let events = scoped_events(log, options);

    let graph_data = build_edges(&events, &options.edge_filter, options.weight, formatter);

    let variants = extract_variants(&events, options.min_variant_frequency);
    let reduced = pareto_reduce(variants, Coverage::VARIANTS);
    let boundary = select_boundary_nodes(&reduced, Coverage::BOUNDARY);

    Ok(ProcessMap {
        graph_data,
        variants: reduced.into_iter().map(Variant::rounded).collect(),
        start_activities: boundary.start,
        end_activities: boundary.end,
    })
}
