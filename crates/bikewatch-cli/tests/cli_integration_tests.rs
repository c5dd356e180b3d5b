//! CLI integration tests
//!
//! Drive the built `bikewatch` binary against a throwaway SQLite file and
//! check both the JSON payloads and the exit status.

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use serde_json::Value;
use tempfile::TempDir;

struct Workspace {
    dir: TempDir,
    db: PathBuf,
}

impl Workspace {
    fn new() -> Self {
        let dir = TempDir::new().unwrap();
        let db = dir.path().join("data").join("bikewatch.db");
        Self { dir, db }
    }

    fn path(&self) -> &Path {
        self.dir.path()
    }

    fn run(&self, args: &[&str]) -> Output {
        Command::new(env!("CARGO_BIN_EXE_bikewatch"))
            .current_dir(self.path())
            .env_remove("BIKEWATCH_DB_PATH")
            .env_remove("BIKEWATCH_MAX_CONFLICT_RETRIES")
            .env_remove("BIKEWATCH_LOG_PROFILE")
            .arg("--db")
            .arg(&self.db)
            .args(args)
            .output()
            .expect("Failed to execute CLI")
    }

    /// Run with `--json`, assert success and parse stdout
    fn json(&self, args: &[&str]) -> Value {
        let mut full = vec!["--json"];
        full.extend_from_slice(args);
        let output = self.run(&full);
        assert!(
            output.status.success(),
            "bikewatch {:?} failed: {}",
            args,
            String::from_utf8_lossy(&output.stderr)
        );
        serde_json::from_slice(&output.stdout).unwrap()
    }
}

#[test]
fn test_report_add_resolve_remove_flow() {
    // GIVEN a fresh database with one citizen
    let ws = Workspace::new();
    let citizen = ws.json(&["citizen", "add", "--name", "Sam", "--email", "sam@mail.test"]);
    let reporter = citizen["id"].as_i64().unwrap().to_string();

    // WHEN two cases are reported with no officers on duty
    let first = ws.json(&["case", "report", "--reporter", &reporter, "Red road bike"]);
    let second = ws.json(&["case", "report", "--reporter", &reporter, "Blue BMX"]);

    // THEN both wait
    assert!(first["assigned_officer"].is_null());
    assert!(second["assigned_officer"].is_null());
    let first_id = first["case"]["id"].as_i64().unwrap();
    let second_id = second["case"]["id"].as_i64().unwrap();

    // WHEN an officer joins
    let added = ws.json(&["officer", "add", "--name", "Ada", "--email", "ada@pd.test"]);
    let officer_id = added["officer"]["id"].as_i64().unwrap();

    // THEN they take the oldest case
    assert_eq!(added["assigned_case"].as_i64(), Some(first_id));

    // WHEN that case is resolved
    let resolved = ws.json(&["case", "resolve", &first_id.to_string()]);

    // THEN the same officer moves to the next case
    assert_eq!(resolved["released_officer"].as_i64(), Some(officer_id));
    assert_eq!(resolved["next_case"].as_i64(), Some(second_id));

    // WHEN the officer is removed
    let removed = ws.json(&["officer", "remove", &officer_id.to_string()]);

    // THEN their case waits again and the roster is empty
    assert_eq!(removed["released_case"].as_i64(), Some(second_id));
    let waiting = ws.json(&["case", "list", "--waiting"]);
    let waiting_ids: Vec<i64> = waiting
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["id"].as_i64().unwrap())
        .collect();
    assert_eq!(waiting_ids, vec![second_id]);
    assert_eq!(ws.json(&["officer", "list"]), Value::Array(vec![]));
}

#[test]
fn test_state_survives_between_invocations() {
    let ws = Workspace::new();
    ws.json(&["officer", "add", "--name", "Ada", "--email", "ada@pd.test"]);

    let output = ws.run(&["officer", "list"]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("ada@pd.test"));
    assert!(stdout.contains("available"));
    assert!(ws.db.exists());
}

#[test]
fn test_resolving_missing_case_fails_with_code() {
    let ws = Workspace::new();

    let output = ws.run(&["case", "resolve", "42"]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("ERR_NOT_FOUND"), "stderr: {}", stderr);
}

#[test]
fn test_resolving_twice_is_rejected() {
    let ws = Workspace::new();
    let citizen = ws.json(&["citizen", "add", "--name", "Sam", "--email", "sam@mail.test"]);
    let reporter = citizen["id"].as_i64().unwrap().to_string();
    let case = ws.json(&["case", "report", "--reporter", &reporter, "Tandem"]);
    let case_id = case["case"]["id"].as_i64().unwrap().to_string();

    ws.json(&["case", "resolve", &case_id]);
    let output = ws.run(&["case", "resolve", &case_id]);

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("ERR_ALREADY_RESOLVED"));
}

#[test]
fn test_duplicate_officer_email_rejected() {
    let ws = Workspace::new();
    ws.json(&["officer", "add", "--name", "Ada", "--email", "ada@pd.test"]);

    let output = ws.run(&["officer", "add", "--name", "Other", "--email", "ada@pd.test"]);

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("ERR_ALREADY_EXISTS"));
}

#[test]
fn test_config_file_supplies_db_path() {
    let ws = Workspace::new();
    std::fs::write(
        ws.path().join("bikewatch.toml"),
        "db_path = \"from-config.db\"\nmax_conflict_retries = 2\n",
    )
    .unwrap();

    // No --db here, so the config file decides
    let output = Command::new(env!("CARGO_BIN_EXE_bikewatch"))
        .current_dir(ws.path())
        .env_remove("BIKEWATCH_DB_PATH")
        .env_remove("BIKEWATCH_MAX_CONFLICT_RETRIES")
        .env_remove("BIKEWATCH_LOG_PROFILE")
        .args(["citizen", "list"])
        .output()
        .unwrap();

    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("No citizens"));
    assert!(ws.path().join("from-config.db").exists());
}

#[test]
fn test_invalid_config_is_reported() {
    let ws = Workspace::new();
    std::fs::write(ws.path().join("bad.toml"), "max_conflict_retries = 0\n").unwrap();

    let output = ws.run(&["--config", "bad.toml", "officer", "list"]);

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("ERR_CONFIG"));
}
