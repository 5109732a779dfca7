//! CLI Integration Tests
//!
//! These tests run the built `vitals` binary against record files written to
//! temporary directories.
//!
//! ```
//! cargo test --package vitals-cli --test cli_integration
//! ```

use std::fs;
use std::path::Path;
use std::process::{Command, Output};

use tempfile::TempDir;

/// Run vitals with an isolated config file and plain styling.
fn run_vitals(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_vitals"))
        .env("VITALS_CONFIG", dir.join("config.toml"))
        .env_remove("VITALS_OFFSET")
        .env_remove("RUST_LOG")
        .args(["--style", "plain"])
        .args(args)
        .output()
        .expect("Failed to run vitals binary")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

/// A temp dir holding `records.json` with a few days of mixed records.
fn fixture() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("records.json"),
        r#"[
            {"date": "2025-01-01", "type": "activity", "sport": "Run", "calories": 100, "average_heartrate": 150},
            {"date": "2025-01-01", "type": "activity", "sport": "Ride", "calories": 50},
            {"date": "2025-01-02", "type": "activity", "sport": "Run", "calories": 80},
            {"date": "2025-01-02T07:30:00Z", "type": "nutrition", "calories": 2100, "protein_g": 140},
            {"date": "2025-01-03", "type": "sleep", "score": 82, "duration_min": 450, "hrv_ms": 61},
            {"date": "2025-01-03", "type": "blood_marker", "marker": "Ferritin", "value": 85},
            {"date": null, "type": "activity", "calories": 999},
            {"date": "yesterday", "type": "sleep", "score": 10}
        ]"#,
    )
    .unwrap();
    dir
}

fn records_arg(dir: &TempDir) -> String {
    dir.path().join("records.json").display().to_string()
}

// =============================================================================
// Help and Version
// =============================================================================

#[test]
fn test_help_command() {
    let dir = tempfile::tempdir().unwrap();
    let output = run_vitals(dir.path(), &["--help"]);

    assert!(output.status.success(), "Help should succeed");
    let text = stdout(&output);
    for cmd in ["chart", "buckets", "labels", "charts", "config"] {
        assert!(text.contains(cmd), "Help should list {} command", cmd);
    }
}

#[test]
fn test_version_command() {
    let dir = tempfile::tempdir().unwrap();
    let output = run_vitals(dir.path(), &["--version"]);

    assert!(output.status.success(), "Version should succeed");
    assert!(stdout(&output).contains("vitals"));
}

// =============================================================================
// Chart
// =============================================================================

#[test]
fn test_chart_json_output() {
    let dir = fixture();
    let records = records_arg(&dir);
    let output = run_vitals(
        dir.path(),
        &["chart", &records, "--chart", "activity", "--format", "json"],
    );

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let json: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();

    assert_eq!(json["chart"], "activity");
    assert_eq!(json["dates"][0], "2025-01-01");
    assert_eq!(json["labels"][0], "Wed");
    assert_eq!(json["datasets"][0]["name"], "active_calories");
    assert_eq!(json["datasets"][0]["values"][0], 150.0);
    assert_eq!(json["datasets"][0]["values"][1], 80.0);
    assert_eq!(json["skipped"]["missing_date"], 1);
    assert_eq!(json["skipped"]["unparseable_date"], 1);
}

#[test]
fn test_chart_reports_skipped_records_on_stderr() {
    let dir = fixture();
    let records = records_arg(&dir);
    let output = run_vitals(
        dir.path(),
        &["chart", &records, "--chart", "sleep", "--format", "json"],
    );

    assert!(output.status.success());
    assert!(stderr(&output).contains("Skipped 2 record(s)"));
}

#[test]
fn test_chart_csv_output() {
    let dir = fixture();
    let records = records_arg(&dir);
    let output = run_vitals(
        dir.path(),
        &["chart", &records, "--chart", "nutrition", "--format", "csv"],
    );

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let text = stdout(&output);
    let mut lines = text.lines();
    assert_eq!(
        lines.next(),
        Some("date,label,tooltip,calories_consumed,protein,carbs,fat")
    );
    // Every dated record opens a day; sums read 0 where nothing matched.
    assert_eq!(
        lines.next(),
        Some("2025-01-01,Wed,\"Wednesday, January 1, 2025\",0,0,0,0")
    );
    assert_eq!(
        lines.next(),
        Some("2025-01-02,Thu,\"Thursday, January 2, 2025\",2100,140,0,0")
    );
}

#[test]
fn test_chart_offset_moves_timestamps() {
    let dir = fixture();
    let records = records_arg(&dir);
    let output = run_vitals(
        dir.path(),
        &[
            "chart", &records, "--chart", "nutrition", "--offset", "-08:00", "--format", "json",
        ],
    );

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let json: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(json["dates"][0], "2025-01-01");
    assert_eq!(json["datasets"][0]["values"][0], 2100.0);
    assert_eq!(json["datasets"][0]["values"][1], 0.0);
}

#[test]
fn test_chart_max_points_and_output_file() {
    let dir = tempfile::tempdir().unwrap();
    let first = time::Date::from_calendar_date(2025, time::Month::January, 1).unwrap();
    let records: Vec<String> = (0..120)
        .map(|day| {
            format!(
                r#"{{"date": "{}", "type": "sleep", "score": {}}}"#,
                first + time::Duration::days(day),
                60 + day % 30
            )
        })
        .collect();
    let input = dir.path().join("sleep.json");
    fs::write(&input, format!("[{}]", records.join(","))).unwrap();
    let out = dir.path().join("chart.json");

    let output = run_vitals(
        dir.path(),
        &[
            "--output",
            &out.display().to_string(),
            "chart",
            &input.display().to_string(),
            "--chart",
            "sleep",
            "--max-points",
            "20",
            "--format",
            "json",
        ],
    );

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(stdout(&output).is_empty());
    let json: serde_json::Value = serde_json::from_str(&fs::read_to_string(out).unwrap()).unwrap();
    let dates = json["dates"].as_array().unwrap();
    assert!(dates.len() <= 20);
    assert_eq!(dates[0], "2025-01-01");
    assert_eq!(dates[dates.len() - 1], "2025-04-30");
    assert_eq!(json["original_len"], 120);
}

#[test]
fn test_chart_text_output() {
    let dir = fixture();
    let records = records_arg(&dir);
    let output = run_vitals(dir.path(), &["chart", &records, "--chart", "activity"]);

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let text = stdout(&output);
    assert!(text.contains("Chart: activity"));
    assert!(text.contains("active_calories"));
    assert!(text.contains("2025-01-01"));
}

#[test]
fn test_blood_markers_chart_uses_input_markers() {
    let dir = fixture();
    let records = records_arg(&dir);
    let output = run_vitals(
        dir.path(),
        &["chart", &records, "--chart", "blood_markers", "--format", "json"],
    );

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let json: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(json["datasets"][0]["name"], "blood:ferritin");
}

#[test]
fn test_unknown_chart_fails() {
    let dir = fixture();
    let records = records_arg(&dir);
    let output = run_vitals(dir.path(), &["chart", &records, "--chart", "steps"]);

    assert!(!output.status.success());
    assert!(stderr(&output).contains("Unknown chart 'steps'"));
}

#[test]
fn test_missing_input_fails() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("missing.json").display().to_string();
    let output = run_vitals(dir.path(), &["chart", &missing, "--chart", "sleep"]);

    assert!(!output.status.success());
    assert!(stderr(&output).contains("Failed to read records"));
}

#[test]
fn test_configured_chart() {
    let dir = fixture();
    fs::write(
        dir.path().join("config.toml"),
        r#"
format = "json"

[charts.fuel]
max_points = 10
metrics = [{ name = "kcal", metric = "calories_consumed" }]
"#,
    )
    .unwrap();
    let records = records_arg(&dir);
    let output = run_vitals(dir.path(), &["chart", &records, "--chart", "fuel"]);

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let json: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(json["chart"], "fuel");
    assert_eq!(json["datasets"][0]["name"], "kcal");
    assert_eq!(json["datasets"][0]["values"][1], 2100.0);
}

// =============================================================================
// Buckets, labels and listings
// =============================================================================

#[test]
fn test_buckets_csv() {
    let dir = fixture();
    let records = records_arg(&dir);
    let output = run_vitals(
        dir.path(),
        &[
            "buckets",
            &records,
            "--metric",
            "calories",
            "--metric",
            "sleep_score",
            "--format",
            "csv",
        ],
    );

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let text = stdout(&output);
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(
        lines[0],
        "date,active_calories,active_calories_count,sleep_score,sleep_score_count"
    );
    assert_eq!(lines[1], "2025-01-01,150,2,,0");
    assert_eq!(lines[3], "2025-01-03,0,0,82,1");
}

#[test]
fn test_labels_json() {
    let dir = tempfile::tempdir().unwrap();
    let output = run_vitals(
        dir.path(),
        &[
            "labels", "--start", "2025-01-01", "--days", "8", "--format", "json", "--compact",
        ],
    );

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let json: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(json["tier"], "daily");
    assert_eq!(json["rows"][0]["label"], "Jan 1");
    assert_eq!(json["rows"][1]["label"], "2");
    assert_eq!(json["rows"][7]["label"], "Jan 8");
}

#[test]
fn test_charts_listing() {
    let dir = tempfile::tempdir().unwrap();
    let output = run_vitals(dir.path(), &["charts"]);

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let text = stdout(&output);
    for name in ["activity", "nutrition", "sleep", "blood_markers"] {
        assert!(text.contains(name), "listing should include {}", name);
    }
}

#[test]
fn test_config_init_and_path() {
    let dir = tempfile::tempdir().unwrap();

    let output = run_vitals(dir.path(), &["config", "path"]);
    assert!(output.status.success());
    assert!(stdout(&output).contains("config.toml"));

    let output = run_vitals(dir.path(), &["config", "init"]);
    assert!(output.status.success());
    assert!(dir.path().join("config.toml").exists());

    let output = run_vitals(dir.path(), &["config", "show"]);
    assert!(output.status.success());
    assert!(stdout(&output).contains("format = \"text\""));
}
