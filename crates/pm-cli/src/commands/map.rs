//! Map command: event log in, process map JSON out.

use std::io::Write;

use anyhow::{Context, Result};
use pm_core::{
    EdgeFilter, EventLog, ProcessMap, ProcessMapOptions, WeightSpec, build_process_map,
};

use super::util::parse_datetime;
use crate::Config;
use crate::cli::MapArgs;
use crate::load::load_event_log;

/// Merges command-line arguments over configuration defaults.
pub fn build_options(args: &MapArgs, config: &Config) -> Result<ProcessMapOptions> {
    let start_date = args
        .start_date
        .as_deref()
        .map(parse_datetime)
        .transpose()
        .context("invalid --start-date")?;
    let end_date = args
        .end_date
        .as_deref()
        .map(parse_datetime)
        .transpose()
        .context("invalid --end-date")?;

    Ok(ProcessMapOptions {
        start_date,
        end_date,
        edge_filter: EdgeFilter {
            min_cases: args.min_cases,
            max_cases: args.max_cases,
            min_mean_time_seconds: args.min_mean_time,
            max_mean_time_seconds: args.max_mean_time,
        },
        weight: WeightSpec {
            metric: args.weight_metric.unwrap_or(config.weight_metric),
            unit: args.time_unit.unwrap_or(config.time_unit),
        },
        date_scope: args.date_scope.unwrap_or(config.date_scope),
        min_variant_frequency: args.min_variant_frequency,
    })
}

/// Applies per-invocation formatting overrides.
fn effective_config(args: &MapArgs, config: &Config) -> Config {
    Config {
        duration_style: args.duration_style.unwrap_or(config.duration_style),
        locale: args.locale.unwrap_or(config.locale),
        ..config.clone()
    }
}

/// Loads the input and runs the pipeline.
///
/// Returns the events inside the date bounds alongside the map; under
/// either date scope those are exactly the events the map was built from.
pub fn compute(args: &MapArgs, config: &Config) -> Result<(EventLog, ProcessMap)> {
    let options = build_options(args, config)?;
    let log = load_event_log(&args.input, args.format)?;
    let formatter = effective_config(args, config).formatter();
    let map = build_process_map(&log, &options, formatter.as_ref())?;
    Ok((log.within(options.start_date, options.end_date), map))
}

/// Runs the map command.
pub fn run<W: Write>(writer: &mut W, args: &MapArgs, pretty: bool, config: &Config) -> Result<()> {
    let (_, map) = compute(args, config)?;

    let json = if pretty || config.pretty {
        serde_json::to_string_pretty(&map)?
    } else {
        serde_json::to_string(&map)?
    };
    writeln!(writer, "{json}")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    use chrono::{TimeZone, Utc};
    use pm_core::{DateScope, TimeUnit, WeightMetric};

    fn args(input: PathBuf) -> MapArgs {
        MapArgs {
            input,
            format: None,
            start_date: None,
            end_date: None,
            min_cases: None,
            max_cases: None,
            min_mean_time: None,
            max_mean_time: None,
            weight_metric: None,
            time_unit: None,
            min_variant_frequency: None,
            date_scope: None,
            duration_style: None,
            locale: None,
        }
    }

    #[test]
    fn test_options_fall_back_to_config() {
        let config = Config {
            weight_metric: WeightMetric::MeanTime,
            time_unit: TimeUnit::Hour,
            date_scope: DateScope::Window,
            ..Config::default()
        };
        let options = build_options(&args(PathBuf::from("log.csv")), &config).unwrap();
        assert_eq!(options.weight.metric, WeightMetric::MeanTime);
        assert_eq!(options.weight.unit, TimeUnit::Hour);
        assert_eq!(options.date_scope, DateScope::Window);
    }

    #[test]
    fn test_arguments_override_config() {
        let mut args = args(PathBuf::from("log.csv"));
        args.weight_metric = Some(WeightMetric::Cases);
        args.start_date = Some("2024-01-01".to_string());
        args.min_cases = Some(2);

        let config = Config {
            weight_metric: WeightMetric::MeanTime,
            ..Config::default()
        };
        let options = build_options(&args, &config).unwrap();
        assert_eq!(options.weight.metric, WeightMetric::Cases);
        assert_eq!(options.start_date, Some(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()));
        assert_eq!(options.edge_filter.min_cases, Some(2));
    }

    #[test]
    fn test_bad_date_names_the_flag() {
        let mut args = args(PathBuf::from("log.csv"));
        args.end_date = Some("someday".to_string());
        let err = build_options(&args, &Config::default()).unwrap_err();
        assert_eq!(err.to_string(), "invalid --end-date");
    }

    #[test]
    fn test_run_writes_json() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("log.csv");
        std::fs::write(
            &path,
            "case,activity,timestamp\nA,X,2024-01-01 00:00:00\nA,Y,2024-01-01 00:00:10\n\
             B,X,2024-01-01 00:00:00\nB,Y,2024-01-01 00:00:20\n",
        )
        .unwrap();

        let mut output = Vec::new();
        run(&mut output, &args(path), false, &Config::default()).unwrap();
        let json: serde_json::Value = serde_json::from_slice(&output).unwrap();

        assert_eq!(json["graphData"][0]["Mean_Duration_Seconds"], 15.0);
        assert_eq!(json["graphData"][0]["Tooltip_Total_Time"], "30s");
        assert_eq!(json["variants"][0]["Avg_Timings"], serde_json::json!([0.0, 15.0]));
        assert_eq!(json["startActivities"], serde_json::json!(["X"]));
        assert_eq!(json["endActivities"], serde_json::json!(["Y"]));
    }
}
