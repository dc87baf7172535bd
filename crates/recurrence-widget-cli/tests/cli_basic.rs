//! Basic CLI E2E tests.
//!
//! Tests invoke the built binary with HOME pointed at a temp dir so config
//! commands never touch the real user config.

use std::path::Path;
use std::process::Command;

/// Run a CLI command under `home` and return (code, stdout, stderr).
fn run_cli_in(home: &Path, args: &[&str]) -> (i32, String, String) {
    let output = Command::new(env!("CARGO_BIN_EXE_recurrence-widget"))
        .args(args)
        .env("HOME", home)
        .env_remove("RECURRENCE_WIDGET_ENV")
        .output()
        .expect("Failed to execute CLI command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);

    (code, stdout, stderr)
}

fn run_cli(args: &[&str]) -> (i32, String, String) {
    let home = tempfile::tempdir().unwrap();
    run_cli_in(home.path(), args)
}

fn json(stdout: &str) -> serde_json::Value {
    serde_json::from_str(stdout).expect("stdout should be JSON")
}

#[test]
fn test_plan_weekly() {
    let (code, stdout, _) = run_cli(&["plan", "2"]);
    assert_eq!(code, 0, "plan failed");
    let plan = json(&stdout);
    assert_eq!(plan["interval_unit"], "weeks");
    let visible = plan["visible"].as_array().unwrap();
    assert!(visible.iter().any(|g| g == "by_weekday"));
}

#[test]
fn test_plan_never_by_name() {
    let (code, stdout, _) = run_cli(&["plan", "never"]);
    assert_eq!(code, 0);
    let plan = json(&stdout);
    assert_eq!(plan["visible"].as_array().unwrap().len(), 1);
    assert!(plan["interval_unit"].is_null());
}

#[test]
fn test_plan_negative_code() {
    let (code, stdout, _) = run_cli(&["plan", "-1"]);
    assert_eq!(code, 0);
    assert!(json(&stdout)["interval_unit"].is_null());
}

#[test]
fn test_render_prefilled_rule() {
    let (code, stdout, _) = run_cli(&["render", "--name", "event", "--rule", "FREQ=MONTHLY;COUNT=4"]);
    assert_eq!(code, 0, "render failed");
    assert!(stdout.contains("recurrence-widget"));
    assert!(stdout.contains("<option value=\"1\" selected>Monthly</option>"));
    assert!(stdout.contains("id_event_count"));
}

#[test]
fn test_render_rejects_bad_rule() {
    let (code, _, stderr) = run_cli(&["render", "--rule", "FREQ=HOURLY"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("error:"));
}

#[test]
fn test_rule_parse_and_check() {
    let (code, stdout, _) = run_cli(&["rule", "parse", "RRULE:FREQ=DAILY;INTERVAL=2"]);
    assert_eq!(code, 0);
    assert_eq!(json(&stdout)["interval"], 2);

    let (code, stdout, _) = run_cli(&["rule", "check", "FREQ=YEARLY;BYMONTH=3"]);
    assert_eq!(code, 0);
    let out = json(&stdout);
    assert_eq!(out["rule"], "FREQ=YEARLY;BYMONTH=3");
    assert_eq!(out["is_recurring"], true);
}

#[test]
fn test_rule_conflicting_ending_fails() {
    let (code, _, _) = run_cli(&["rule", "parse", "FREQ=DAILY;COUNT=2;UNTIL=20300101"]);
    assert_eq!(code, 1);
}

#[test]
fn test_simulate_script() {
    let dir = tempfile::tempdir().unwrap();
    let script = dir.path().join("script.json");
    std::fs::write(
        &script,
        r#"[
            {"action": "select_frequency", "value": "2"},
            {"action": "click_weekday", "weekday": "MO"},
            {"action": "type", "field": "until", "text": "2030-01-01"},
            {"action": "choose_ending", "ending": "count"},
            {"action": "type", "field": "count", "text": "5"}
        ]"#,
    )
    .unwrap();

    let (code, stdout, stderr) =
        run_cli_in(dir.path(), &["simulate", "--script", script.to_str().unwrap()]);
    assert_eq!(code, 0, "simulate failed: {stderr}");
    let out = json(&stdout);
    assert_eq!(out["actions"], 5);
    assert_eq!(out["rule"], "FREQ=WEEKLY;BYDAY=MO;COUNT=5");
    assert_eq!(out["state"]["ending_values"]["recurrence_until"], "");
    assert_eq!(out["state"]["selected_labels"][0], "Monday");
}

#[test]
fn test_simulate_keeps_week_start() {
    let dir = tempfile::tempdir().unwrap();
    let script = dir.path().join("script.json");
    std::fs::write(&script, r#"[{"action": "click_weekday", "weekday": "TU"}]"#).unwrap();

    let (code, stdout, stderr) = run_cli_in(
        dir.path(),
        &["simulate", "--rule", "FREQ=WEEKLY;WKST=SU", "--script", script.to_str().unwrap()],
    );
    assert_eq!(code, 0, "simulate failed: {stderr}");
    assert_eq!(json(&stdout)["rule"], "FREQ=WEEKLY;BYDAY=TU;WKST=SU");
}

#[test]
fn test_config_set_get_reset() {
    let home = tempfile::tempdir().unwrap();

    let (code, stdout, _) = run_cli_in(home.path(), &["config", "get", "markers.selected"]);
    assert_eq!(code, 0);
    assert_eq!(stdout.trim(), "selected");

    let (code, _, _) = run_cli_in(home.path(), &["config", "set", "markers.selected", "is-on"]);
    assert_eq!(code, 0);
    let (_, stdout, _) = run_cli_in(home.path(), &["config", "get", "markers.selected"]);
    assert_eq!(stdout.trim(), "is-on");
    assert!(home.path().join(".config/recurrence-widget/config.toml").exists());

    let (code, _, _) = run_cli_in(home.path(), &["config", "reset"]);
    assert_eq!(code, 0);
    let (_, stdout, _) = run_cli_in(home.path(), &["config", "get", "markers.selected"]);
    assert_eq!(stdout.trim(), "selected");
}

#[test]
fn test_config_unknown_key() {
    let (code, _, stderr) = run_cli(&["config", "set", "markers.nope", "x"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("unknown config key"));
}

#[test]
fn test_config_list() {
    let (code, stdout, _) = run_cli(&["config", "list"]);
    assert_eq!(code, 0);
    assert_eq!(json(&stdout)["dispatch"]["max_events_per_action"], 64);
}
