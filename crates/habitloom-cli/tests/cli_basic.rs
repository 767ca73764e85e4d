//! Basic CLI E2E tests.
//!
//! Tests invoke CLI commands via cargo run against the dev data
//! directory and verify exit codes and outputs.

use std::process::Command;

/// Run a CLI command and return (stdout, stderr, exit code).
fn run_cli(args: &[&str]) -> (String, String, i32) {
    let output = Command::new("cargo")
        .args(["run", "-p", "habitloom-cli", "--"])
        .args(args)
        .env("HABITLOOM_ENV", "dev")
        .output()
        .expect("Failed to execute CLI command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);

    (stdout, stderr, code)
}

#[test]
fn test_habit_create_and_streak() {
    let (stdout, _stderr, code) = run_cli(&[
        "habit",
        "create",
        "CLI smoke habit",
        "--start-date",
        "2026-01-01",
    ]);
    assert_eq!(code, 0, "habit create failed");
    assert!(stdout.contains("Habit created:"));

    let habit: serde_json::Value = {
        let json_start = stdout.find('{').expect("no JSON in output");
        serde_json::from_str(&stdout[json_start..]).expect("invalid habit JSON")
    };
    let id = habit["id"].as_str().unwrap();

    let (_stdout, _stderr, code) = run_cli(&["habit", "toggle", id, "--date", "2026-01-02"]);
    assert_eq!(code, 0, "habit toggle failed");

    let (stdout, _stderr, code) = run_cli(&["habit", "streak", id, "--as-of", "2026-01-02"]);
    assert_eq!(code, 0, "habit streak failed");
    let summary: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(summary["current"], 1);

    let (_stdout, _stderr, code) = run_cli(&["habit", "delete", id]);
    assert_eq!(code, 0, "habit delete failed");
}

#[test]
fn test_habit_list() {
    let (stdout, _stderr, code) = run_cli(&["habit", "list"]);
    assert_eq!(code, 0, "habit list failed");
    assert!(serde_json::from_str::<serde_json::Value>(&stdout).is_ok());
}

#[test]
fn test_task_create_move_delete() {
    let (stdout, _stderr, code) = run_cli(&["task", "create", "CLI smoke task"]);
    assert_eq!(code, 0, "task create failed");

    let json_start = stdout.find('{').expect("no JSON in output");
    let task: serde_json::Value = serde_json::from_str(&stdout[json_start..]).unwrap();
    let id = task["id"].as_str().unwrap();

    let (stdout, _stderr, code) = run_cli(&["task", "move", id, "--column", "done"]);
    assert_eq!(code, 0, "task move failed");
    let moved: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(moved["column"], "done");
    assert!(!moved["completed_at"].is_null());

    let (_stdout, _stderr, code) = run_cli(&["task", "delete", id]);
    assert_eq!(code, 0, "task delete failed");
}

#[test]
fn test_block_agenda() {
    let (_stdout, _stderr, code) = run_cli(&["block", "agenda", "--date", "2026-01-05"]);
    assert_eq!(code, 0, "block agenda failed");
}

#[test]
fn test_suggest_falls_back_offline() {
    let (stdout, _stderr, code) = run_cli(&["suggest", "how do I keep a habit going"]);
    assert_eq!(code, 0, "suggest failed");
    assert!(!stdout.trim().is_empty());
}

#[test]
fn test_config_list() {
    let (stdout, _stderr, code) = run_cli(&["config", "list"]);
    assert_eq!(code, 0, "config list failed");
    assert!(stdout.contains("suggestion"));
}

#[test]
fn test_unknown_config_key_fails() {
    let (_stdout, stderr, code) = run_cli(&["config", "get", "nope.nothing"]);
    assert_ne!(code, 0);
    assert!(stderr.contains("unknown key"));
}
