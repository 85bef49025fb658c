//! End-to-end tests for the `pm` binary.
//!
//! Tests the full pipeline: file → load → map → JSON/report on stdout.

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use serde_json::{Value, json};
use tempfile::TempDir;

fn pm_binary() -> String {
    env!("CARGO_BIN_EXE_pm").to_string()
}

/// Runs `pm` with an isolated home so no user config leaks in.
fn run_pm(home: &Path, args: &[&str]) -> Output {
    Command::new(pm_binary())
        .env("HOME", home)
        .env("XDG_CONFIG_HOME", home.join(".config"))
        .env_remove("PM_WEIGHT_METRIC")
        .env_remove("PM_TIME_UNIT")
        .env_remove("PM_LOCALE")
        .env_remove("PM_DURATION_STYLE")
        .env_remove("PM_DATE_SCOPE")
        .env_remove("PM_PRETTY")
        .env_remove("RUST_LOG")
        .args(args)
        .output()
        .expect("failed to run pm")
}

fn write_fixture(temp: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = temp.path().join(name);
    std::fs::write(&path, content).unwrap();
    path
}

fn parse_stdout(output: &Output) -> Value {
    assert!(
        output.status.success(),
        "pm should succeed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).expect("stdout should be JSON")
}

const TWO_CASES_CSV: &str = "CaseID,Activity,Timestamp
A,X,2024-01-01 00:00:00
A,Y,2024-01-01 00:00:10
B,X,2024-01-01 00:00:00
B,Y,2024-01-01 00:00:20
";

#[test]
fn test_map_two_case_scenario() {
    let temp = TempDir::new().unwrap();
    let input = write_fixture(&temp, "log.csv", TWO_CASES_CSV);

    let output = run_pm(temp.path(), &["map", input.to_str().unwrap()]);
    let json = parse_stdout(&output);

    assert_eq!(
        json,
        json!({
            "graphData": [{
                "Source_Activity": "X",
                "Target_Activity": "Y",
                "Mean_Duration_Seconds": 15.0,
                "Tooltip_Total_Time": "30s",
                "Tooltip_Mean_Time": "15s",
                "Weight_Value": 2,
                "Edge_Label": "2"
            }],
            "variants": [{
                "Variant_Path": ["X", "Y"],
                "Frequency": 2,
                "Avg_Timings": [0.0, 15.0],
                "Total_Timings": [0.0, 30.0],
                "True_Start_Count": 2,
                "True_End_Count": 2,
                "Percentage": 100.0
            }],
            "startActivities": ["X"],
            "endActivities": ["Y"]
        })
    );
}

#[test]
fn test_min_cases_empties_graph_but_keeps_variants() {
    let temp = TempDir::new().unwrap();
    let input = write_fixture(&temp, "log.csv", TWO_CASES_CSV);

    let output = run_pm(temp.path(), &["map", input.to_str().unwrap(), "--min-cases", "5"]);
    let json = parse_stdout(&output);

    assert_eq!(json["graphData"], json!([]));
    assert_eq!(json["variants"].as_array().unwrap().len(), 1);
    assert_eq!(json["startActivities"], json!(["X"]));
}

#[test]
fn test_mean_time_weight_in_minutes() {
    let temp = TempDir::new().unwrap();
    let input = write_fixture(&temp, "log.csv", TWO_CASES_CSV);

    let output = run_pm(
        temp.path(),
        &[
            "map",
            input.to_str().unwrap(),
            "--weight-metric",
            "mean_time",
            "--time-unit",
            "m",
        ],
    );
    let json = parse_stdout(&output);

    assert_eq!(json["graphData"][0]["Weight_Value"], 0.25);
    assert_eq!(json["graphData"][0]["Edge_Label"], "0.25 m");
}

#[test]
fn test_jsonl_input_with_numeric_case_ids() {
    let temp = TempDir::new().unwrap();
    let input = write_fixture(
        &temp,
        "log.jsonl",
        r#"[1, "Start", "2024-01-01T00:00:00Z"]
[1, "End", "2024-01-01T01:00:00Z"]
[2, "Start", "2024-01-01T00:00:00Z"]
"#,
    );

    let output = run_pm(temp.path(), &["map", input.to_str().unwrap()]);
    let json = parse_stdout(&output);

    assert_eq!(json["graphData"][0]["Tooltip_Mean_Time"], "01h");
    assert_eq!(json["variants"].as_array().unwrap().len(), 2);
    assert_eq!(json["startActivities"], json!(["Start"]));
    // End 1 case, Start 1 case: both needed for 90%
    assert_eq!(json["endActivities"].as_array().unwrap().len(), 2);
}

#[test]
fn test_config_file_sets_defaults() {
    let temp = TempDir::new().unwrap();
    let input = write_fixture(&temp, "log.csv", TWO_CASES_CSV);
    let config = write_fixture(
        &temp,
        "pm.toml",
        "weight_metric = \"mean_time\"\ntime_unit = \"second\"\nlocale = \"fa\"\n",
    );

    let output = run_pm(
        temp.path(),
        &["--config", config.to_str().unwrap(), "map", input.to_str().unwrap()],
    );
    let json = parse_stdout(&output);

    assert_eq!(json["graphData"][0]["Edge_Label"], "15.0 ثانیه");
    assert_eq!(json["graphData"][0]["Tooltip_Mean_Time"], "15 ثانیه");
}

#[test]
fn test_malformed_timestamp_fails_with_row() {
    let temp = TempDir::new().unwrap();
    let input = write_fixture(
        &temp,
        "log.csv",
        "case,activity,timestamp\nA,X,2024-01-01\nA,Y,not-a-time\n",
    );

    let output = run_pm(temp.path(), &["map", input.to_str().unwrap()]);

    assert!(!output.status.success());
    assert!(output.stdout.is_empty(), "no partial output on failure");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("malformed input at row 1"),
        "stderr should name the row: {stderr}"
    );
}

#[test]
fn test_contradictory_bounds_are_rejected() {
    let temp = TempDir::new().unwrap();
    let input = write_fixture(&temp, "log.csv", TWO_CASES_CSV);

    let output = run_pm(
        temp.path(),
        &["map", input.to_str().unwrap(), "--min-cases", "4", "--max-cases", "2"],
    );

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("min cases (4) is greater than max cases (2)"));
}

#[test]
fn test_unknown_extension_needs_format() {
    let temp = TempDir::new().unwrap();
    let input = write_fixture(&temp, "log.txt", TWO_CASES_CSV);

    let output = run_pm(temp.path(), &["map", input.to_str().unwrap()]);
    assert!(!output.status.success());

    let output = run_pm(temp.path(), &["map", input.to_str().unwrap(), "--format", "csv"]);
    let json = parse_stdout(&output);
    assert_eq!(json["graphData"].as_array().unwrap().len(), 1);
}

#[test]
fn test_report_prints_sections() {
    let temp = TempDir::new().unwrap();
    let input = write_fixture(&temp, "log.csv", TWO_CASES_CSV);

    let output = run_pm(temp.path(), &["report", input.to_str().unwrap()]);
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.starts_with("PROCESS MAP: 4 events, 2 cases"));
    assert!(stdout.contains("EDGES"));
    assert!(stdout.contains("VARIANTS"));
    assert!(stdout.contains("Start: X"));
}

#[test]
fn test_map_is_deterministic() {
    let temp = TempDir::new().unwrap();
    let input = write_fixture(
        &temp,
        "log.csv",
        "case,activity,timestamp
1,Register,2024-01-01 08:00:00
1,Review,2024-01-01 09:30:00
1,Approve,2024-01-02 10:00:00
2,Register,2024-01-01 08:10:00
2,Reject,2024-01-01 12:00:00
3,Register,2024-01-03 08:00:00
3,Review,2024-01-03 08:45:00
3,Approve,2024-01-03 16:00:00
",
    );

    let first = run_pm(temp.path(), &["map", input.to_str().unwrap()]);
    let second = run_pm(temp.path(), &["map", input.to_str().unwrap()]);
    assert!(first.status.success());
    assert_eq!(first.stdout, second.stdout);
}
