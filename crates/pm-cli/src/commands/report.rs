//! Report command: a human-readable summary of the process map.

use std::collections::HashSet;
use std::fmt::Write as _;
use std::io::Write;

use anyhow::Result;
use pm_core::{Activity, EventLog, ProcessMap};

use super::map::compute;
use crate::Config;
use crate::cli::MapArgs;

/// How many variants are listed before the rest is summarized.
const MAX_VARIANTS_SHOWN: usize = 10;

/// Inputs for the text report.
#[derive(Debug)]
pub struct ReportData {
    pub events: usize,
    pub cases: usize,
    pub map: ProcessMap,
}

impl ReportData {
    pub fn new(log: &EventLog, map: ProcessMap) -> Self {
        let cases: HashSet<_> = log.events().iter().map(|e| &e.case_id).collect();
        Self {
            events: log.len(),
            cases: cases.len(),
            map,
        }
    }
}

// ========== Progress Bar ==========

/// Generates a 10-character progress bar.
/// Values <5% of max get a single block for visibility.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn progress_bar(value: f64, max: f64) -> String {
    if max <= 0.0 {
        return "░░░░░░░░░░".to_string();
    }

    let ratio = value / max;
    let filled = if ratio < 0.05 && value > 0.0 {
        1
    } else {
        (ratio * 10.0).round().clamp(0.0, 10.0) as usize
    };

    let empty = 10 - filled;
    format!("{}{}", "█".repeat(filled), "░".repeat(empty))
}

fn join_path(path: &[Activity]) -> String {
    path.iter().map(Activity::as_str).collect::<Vec<_>>().join(" → ")
}

fn join_or_none(activities: &[Activity]) -> String {
    if activities.is_empty() {
        "(none)".to_string()
    } else {
        activities.iter().map(Activity::as_str).collect::<Vec<_>>().join(", ")
    }
}

// ========== Report Generation ==========

/// Formats the human-readable report output.
pub fn format_report(data: &ReportData) -> String {
    let mut output = String::new();

    writeln!(output, "PROCESS MAP: {} events, {} cases", data.events, data.cases).unwrap();

    if data.events == 0 {
        writeln!(output).unwrap();
        writeln!(output, "No events in range.").unwrap();
        writeln!(output).unwrap();
        writeln!(output, "Hint: check --start-date and --end-date.").unwrap();
        return output;
    }

    // EDGES section, heaviest first
    writeln!(output).unwrap();
    writeln!(output, "EDGES").unwrap();
    writeln!(output, "─────").unwrap();

    let mut edges: Vec<_> = data.map.graph_data.iter().collect();
    edges.sort_by(|a, b| b.weight_value.as_f64().total_cmp(&a.weight_value.as_f64()));
    let max_weight = edges.first().map_or(0.0, |e| e.weight_value.as_f64());

    if edges.is_empty() {
        writeln!(output, "(no edges match the filters)").unwrap();
    }
    for edge in edges {
        let name = format!("{} → {}", edge.source, edge.target);
        let bar = progress_bar(edge.weight_value.as_f64(), max_weight);
        writeln!(
            output,
            "{name:<30} {:>10}  {bar}  mean {}",
            edge.edge_label, edge.tooltip_mean_time
        )
        .unwrap();
    }

    // VARIANTS section
    writeln!(output).unwrap();
    writeln!(output, "VARIANTS").unwrap();
    writeln!(output, "────────").unwrap();

    let variants = &data.map.variants;
    for (i, variant) in variants.iter().take(MAX_VARIANTS_SHOWN).enumerate() {
        writeln!(
            output,
            "{:>3}. {:>5.1}%  {:>4} cases  {}",
            i + 1,
            variant.percentage,
            variant.frequency,
            join_path(&variant.path)
        )
        .unwrap();
    }
    let remaining = variants.len().saturating_sub(MAX_VARIANTS_SHOWN);
    if remaining > 0 {
        writeln!(output, "     ... and {remaining} more").unwrap();
    }

    // BOUNDARIES section
    writeln!(output).unwrap();
    writeln!(output, "BOUNDARIES").unwrap();
    writeln!(output, "──────────").unwrap();
    writeln!(output, "Start: {}", join_or_none(&data.map.start_activities)).unwrap();
    writeln!(output, "End:   {}", join_or_none(&data.map.end_activities)).unwrap();

    output
}

// ========== Public Interface ==========

/// Runs the report command.
pub fn run<W: Write>(writer: &mut W, args: &MapArgs, config: &Config) -> Result<()> {
    let (log, map) = compute(args, config)?;
    let data = ReportData::new(&log, map);
    write!(writer, "{}", format_report(&data))?;
    Ok(())
}
