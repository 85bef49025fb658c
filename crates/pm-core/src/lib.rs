//! Core process map analytics.
//!
//! This crate turns a timestamped event log into:
//! - Directly-follows edges with count and duration statistics
//! - Case variants reduced to the set covering 95% of cases
//! - Start and end activities covering 90% of case boundaries

mod boundary;
pub mod duration;
mod error;
pub mod event;
pub mod index;
mod options;
mod pareto;
mod pipeline;
pub mod transition;
mod types;
pub mod variant;

pub use boundary::{BoundaryNodes, select_boundary_nodes};
pub use duration::{BreakdownFormatter, DaysFormatter, DurationFormatter, DurationStyle, Locale};
pub use error::{ConfigurationError, MalformedInput, MalformedReason, ProcessMapError};
pub use event::{Event, EventLog, RawEvent, parse_timestamp};
pub use options::{DateScope, EdgeFilter, ProcessMapOptions, TimeUnit, WeightMetric, WeightSpec};
pub use pareto::pareto_reduce;
pub use pipeline::{ProcessMap, build_process_map};
pub use transition::{Edge, WeightValue};
pub use types::{Activity, CaseId, Coverage, ValidationError};
pub use variant::Variant;
