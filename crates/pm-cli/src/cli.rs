//! Command-line argument definitions.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use pm_core::{DateScope, DurationStyle, Locale, TimeUnit, WeightMetric};

use crate::load::InputFormat;

/// Process map builder.
///
/// Reads a (case, activity, timestamp) event log and derives the
/// directly-follows graph, the dominant case variants, and the typical
/// start and end activities.
#[derive(Debug, Parser)]
#[command(name = "pm", version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to config file.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Print the process map as JSON.
    Map {
        #[command(flatten)]
        args: MapArgs,

        /// Pretty-print the JSON output.
        #[arg(long)]
        pretty: bool,
    },

    /// Print a human-readable summary of the process map.
    Report {
        #[command(flatten)]
        args: MapArgs,
    },
}

/// Input and pipeline options shared by all commands.
#[derive(Debug, Clone, Args)]
pub struct MapArgs {
    /// Event log file. The first three columns are case ID, activity and timestamp.
    pub input: PathBuf,

    /// Input format. Inferred from the file extension when omitted.
    #[arg(long, value_enum)]
    pub format: Option<InputFormat>,

    /// Drop events before this instant (ISO 8601 or e.g. "30 days ago").
    #[arg(long)]
    pub start_date: Option<String>,

    /// Drop events after this instant (ISO 8601 or e.g. "1 day ago").
    #[arg(long)]
    pub end_date: Option<String>,

    /// Minimum transition count for an edge to be shown.
    #[arg(long)]
    pub min_cases: Option<u64>,

    /// Maximum transition count for an edge to be shown.
    #[arg(long)]
    pub max_cases: Option<u64>,

    /// Minimum mean edge duration, in seconds.
    #[arg(long)]
    pub min_mean_time: Option<f64>,

    /// Maximum mean edge duration, in seconds.
    #[arg(long)]
    pub max_mean_time: Option<f64>,

    /// Edge weight metric: cases or `mean_time`.
    #[arg(long)]
    pub weight_metric: Option<WeightMetric>,

    /// Unit for `mean_time` weights: second, minute, hour, day, week (or s, m, h, d, w).
    #[arg(long)]
    pub time_unit: Option<TimeUnit>,

    /// Drop variants shared by fewer cases than this.
    #[arg(long)]
    pub min_variant_frequency: Option<u64>,

    /// Apply date bounds before ranking (reindex) or after (window).
    #[arg(long)]
    pub date_scope: Option<DateScope>,

    /// Tooltip duration style: breakdown or days.
    #[arg(long)]
    pub duration_style: Option<DurationStyle>,

    /// Unit label language: en or fa.
    #[arg(long)]
    pub locale: Option<Locale>,
}
