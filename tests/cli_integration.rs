//! CLI integration tests for gantt
//!
//! These tests run the binary against task files in temporary directories,
//! covering every command and input format.

use predicates::prelude::*;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

/// Get a command instance for the gantt binary
fn gantt_cmd() -> assert_cmd::Command {
    let mut cmd = assert_cmd::Command::new(assert_cmd::cargo::cargo_bin!("gantt"));
    cmd.env_remove("RUST_LOG");
    cmd
}

/// Writes `content` to `name` inside `dir`
fn write_file(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).unwrap();
    path
}

/// A project with two members, given out of order
const PROJECT_TASKS: &str = r#"[
  {"id": "T2", "name": "Ship", "start": "2024-01-05T00:00:00Z", "end": "2024-01-09T00:00:00Z", "project": "P1", "dependencies": ["T1"]},
  {"id": "P1", "name": "Launch", "start": "2024-01-02T00:00:00Z", "end": "2024-01-03T00:00:00Z", "type": "project"},
  {"id": "T1", "name": "Build", "start": "2024-01-01T00:00:00Z", "end": "2024-01-04T00:00:00Z", "project": "P1"}
]"#;

fn order_json(dir: &TempDir, file: &PathBuf, extra: &[&str]) -> serde_json::Value {
    let output = gantt_cmd()
        .current_dir(dir.path())
        .args(["--format", "json", "order"])
        .arg(file)
        .args(extra)
        .output()
        .unwrap();
    assert!(output.status.success(), "order failed: {:?}", output);
    serde_json::from_slice(&output.stdout).unwrap()
}

fn ids(report: &serde_json::Value) -> Vec<String> {
    report["tasks"]
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["id"].as_str().unwrap().to_string())
        .collect()
}

// =============================================================================
// Initialization Tests
// =============================================================================

#[test]
fn test_init_creates_config() {
    let dir = TempDir::new().unwrap();

    gantt_cmd()
        .arg("init")
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Initialized gantt project"));

    assert!(dir.path().join(".gantt/config.toml").is_file());
}

#[test]
fn test_init_stores_view_mode() {
    let dir = TempDir::new().unwrap();

    gantt_cmd()
        .arg("init")
        .arg(dir.path())
        .args(["--view", "month"])
        .assert()
        .success();

    let config = fs::read_to_string(dir.path().join(".gantt/config.toml")).unwrap();
    assert!(config.contains("view_mode = \"month\""));
}

#[test]
fn test_init_is_idempotent() {
    let dir = TempDir::new().unwrap();

    gantt_cmd().arg("init").arg(dir.path()).assert().success();
    gantt_cmd().arg("init").arg(dir.path()).assert().success();
}

// =============================================================================
// Order Tests
// =============================================================================

#[test]
fn test_order_places_root_first_and_rolls_up_dates() {
    let dir = TempDir::new().unwrap();
    let file = write_file(&dir, "tasks.json", PROJECT_TASKS);

    let report = order_json(&dir, &file, &[]);
    assert_eq!(ids(&report), vec!["P1", "T1", "T2"]);

    let root = &report["tasks"][0];
    assert_eq!(root["start"], "2024-01-01T00:00:00Z");
    assert_eq!(root["end"], "2024-01-09T00:00:00Z");
    assert!(report.get("fingerprint").is_none());
}

#[test]
fn test_order_text_table() {
    let dir = TempDir::new().unwrap();
    let file = write_file(&dir, "tasks.json", PROJECT_TASKS);

    gantt_cmd()
        .current_dir(dir.path())
        .arg("order")
        .arg(&file)
        .assert()
        .success()
        .stdout(predicate::str::contains("POS"))
        .stdout(predicate::str::contains("Launch"))
        .stdout(predicate::str::contains("2024-01-09"));
}

#[test]
fn test_order_groups_sorted_by_key() {
    let dir = TempDir::new().unwrap();
    let file = write_file(
        &dir,
        "tasks.yaml",
        r#"
- id: zeta
  start: "2024-01-01T00:00:00Z"
  end: "2024-01-02T00:00:00Z"
- id: alpha
  start: "2024-01-05T00:00:00Z"
  end: "2024-01-06T00:00:00Z"
- id: beta
  start: "2024-01-03T00:00:00Z"
  end: "2024-01-08T00:00:00Z"
  dependencies: [alpha]
"#,
    );

    let report = order_json(&dir, &file, &[]);
    assert_eq!(ids(&report), vec!["alpha", "beta", "zeta"]);
}

#[test]
fn test_order_fingerprint_is_stable() {
    let dir = TempDir::new().unwrap();
    let file = write_file(&dir, "tasks.json", PROJECT_TASKS);

    let first = order_json(&dir, &file, &["--fingerprint"]);
    let second = order_json(&dir, &file, &["--fingerprint"]);

    let hash = first["fingerprint"].as_str().unwrap();
    assert_eq!(hash.len(), 16);
    assert_eq!(first["fingerprint"], second["fingerprint"]);
}

#[test]
fn test_order_writes_output_file() {
    let dir = TempDir::new().unwrap();
    let file = write_file(&dir, "tasks.json", PROJECT_TASKS);
    let out = dir.path().join("ordered.jsonl");

    gantt_cmd()
        .current_dir(dir.path())
        .arg("order")
        .arg(&file)
        .arg("--output")
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::contains("Wrote 3 task(s)"));

    let content = fs::read_to_string(&out).unwrap();
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines.len(), 3);
    assert!(lines[0].contains("\"P1\""));
    assert!(lines[2].contains("\"T2\""));
}

#[test]
fn test_order_cycle_fails() {
    let dir = TempDir::new().unwrap();
    let file = write_file(
        &dir,
        "cycle.json",
        r#"[
  {"id": "A", "start": "2024-01-01T00:00:00Z", "end": "2024-01-02T00:00:00Z", "dependencies": ["B"]},
  {"id": "B", "start": "2024-01-01T00:00:00Z", "end": "2024-01-02T00:00:00Z", "dependencies": ["A"]}
]"#,
    );

    gantt_cmd()
        .current_dir(dir.path())
        .arg("order")
        .arg(&file)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Circular dependency"));
}

#[test]
fn test_missing_reference_tolerated_unless_strict() {
    let dir = TempDir::new().unwrap();
    let file = write_file(
        &dir,
        "tasks.json",
        r#"[
  {"id": "A", "start": "2024-01-01T00:00:00Z", "end": "2024-01-02T00:00:00Z", "dependencies": ["gone"]}
]"#,
    );

    let report = order_json(&dir, &file, &[]);
    assert_eq!(ids(&report), vec!["A"]);

    gantt_cmd()
        .current_dir(dir.path())
        .arg("order")
        .arg(&file)
        .arg("--strict")
        .assert()
        .failure()
        .stderr(predicate::str::contains("gone"));
}

#[test]
fn test_strict_mode_from_project_config() {
    let dir = TempDir::new().unwrap();
    gantt_cmd().arg("init").arg(dir.path()).assert().success();
    fs::write(
        dir.path().join(".gantt/config.toml"),
        "[engine]\nreferences = \"strict\"\n",
    )
    .unwrap();

    let file = write_file(
        &dir,
        "tasks.json",
        r#"[
  {"id": "A", "start": "2024-01-01T00:00:00Z", "end": "2024-01-02T00:00:00Z", "project": "gone"}
]"#,
    );

    gantt_cmd()
        .current_dir(dir.path())
        .arg("order")
        .arg(&file)
        .assert()
        .failure();
}

#[test]
fn test_unknown_extension_fails() {
    let dir = TempDir::new().unwrap();
    let file = write_file(&dir, "tasks.csv", "id,start,end\n");

    gantt_cmd()
        .current_dir(dir.path())
        .arg("order")
        .arg(&file)
        .assert()
        .failure();
}

#[test]
fn test_order_records() {
    let dir = TempDir::new().unwrap();
    let file = write_file(
        &dir,
        "rows.jsonl",
        concat!(
            r#"{"id":"r2","title":"Child","startTime":"2024-03-04T00:00:00Z","endTime":"2024-03-08T00:00:00Z","parentRecord":{"id":"r1"}}"#,
            "\n",
            r#"{"id":"r1","title":"Parent","startTime":"2024-03-01T00:00:00Z","endTime":"2024-03-02T00:00:00Z","taskTypeOption":3}"#,
            "\n",
            r#"{"id":"r3","title":"Undated"}"#,
            "\n",
        ),
    );

    let report = order_json(&dir, &file, &["--records"]);
    assert_eq!(ids(&report), vec!["r1", "r2"]);
    assert_eq!(report["tasks"][0]["end"], "2024-03-08T00:00:00Z");
    assert_eq!(report["tasks"][0]["hide_children"], false);
}

// =============================================================================
// Groups and Chart Tests
// =============================================================================

#[test]
fn test_groups_json() {
    let dir = TempDir::new().unwrap();
    let file = write_file(&dir, "tasks.json", PROJECT_TASKS);

    let output = gantt_cmd()
        .current_dir(dir.path())
        .args(["-f", "json", "groups"])
        .arg(&file)
        .output()
        .unwrap();
    assert!(output.status.success());

    let groups: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let group = &groups[0];
    assert_eq!(group["group"], "P1");
    assert_eq!(group["root"], "P1");
    assert_eq!(group["start"], "2024-01-01T00:00:00Z");
    assert_eq!(group["members"].as_array().unwrap().len(), 3);
    assert_eq!(group["members"][0]["dependent"], false);
    assert_eq!(group["members"][2]["dependent"], true);
}

#[test]
fn test_chart_text() {
    let dir = TempDir::new().unwrap();
    let file = write_file(&dir, "tasks.json", PROJECT_TASKS);

    gantt_cmd()
        .current_dir(dir.path())
        .arg("chart")
        .arg(&file)
        .assert()
        .success()
        .stdout(predicate::str::contains("day from 2024-01-01"))
        .stdout(predicate::str::contains("########"))
        .stdout(predicate::str::contains("  Build"));
}

#[test]
fn test_chart_collapse_hides_members() {
    let dir = TempDir::new().unwrap();
    let file = write_file(&dir, "tasks.json", PROJECT_TASKS);

    let output = gantt_cmd()
        .current_dir(dir.path())
        .args(["--format", "json", "chart", "--view", "week", "--collapse", "P1"])
        .arg(&file)
        .output()
        .unwrap();
    assert!(output.status.success());

    let chart: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(chart["view"], "week");
    let rows = chart["rows"].as_array().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["id"], "P1");
    assert_eq!(rows[0]["span"], 2);
}
