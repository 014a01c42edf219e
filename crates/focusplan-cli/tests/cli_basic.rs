//! Basic CLI E2E tests.
//!
//! Tests invoke the built binary and verify its outputs.

mod common;

use common::{assert_contains, parse_json, Cli};

const LUNCH_REQUEST: &str = r#"{
    "tasks": [
        {"id": "proposal", "title": "Write proposal", "type": "flexible", "estimatedDuration": 60, "priority": "P1"}
    ],
    "existingEvents": [
        {"title": "Lunch", "startTime": "2025-10-06T12:00:00", "endTime": "2025-10-06T13:00:00"}
    ],
    "searchStart": "2025-10-06T00:00:00"
}"#;

const CONFLICT_REQUEST: &str = r#"{
    "tasks": [
        {"id": "review", "title": "Design review", "type": "fixed", "startTime": "2025-10-06T10:00:00", "endTime": "2025-10-06T11:00:00"},
        {"id": "call", "title": "Vendor call", "type": "fixed", "startTime": "2025-10-06T10:30:00", "endTime": "2025-10-06T11:30:00"}
    ]
}"#;

#[test]
fn test_plan_from_stdin() {
    let cli = Cli::new();
    let stdout = cli.run_success(&["plan", "--days", "1"], Some(LUNCH_REQUEST));
    let plan = parse_json(&stdout);

    let scheduled = plan["scheduledTasks"].as_array().unwrap();
    assert_eq!(scheduled.len(), 1);
    assert_eq!(scheduled[0]["scheduledStart"], "2025-10-06T09:00:00");
    assert_eq!(scheduled[0]["scheduledEnd"], "2025-10-06T10:00:00");
    assert_eq!(scheduled[0]["reason"], "assigned to free slot by eisenhower policy");
}

#[test]
fn test_plan_from_file_with_policy_and_start() {
    let cli = Cli::new();
    let path = cli.home().join("request.json");
    std::fs::write(&path, LUNCH_REQUEST).unwrap();

    let stdout = cli.run_success(
        &[
            "plan",
            path.to_str().unwrap(),
            "--policy",
            "fifo",
            "--start",
            "2025-10-07",
            "--days",
            "2",
        ],
        None,
    );
    let plan = parse_json(&stdout);
    let scheduled = &plan["scheduledTasks"][0];
    assert_eq!(scheduled["scheduledStart"], "2025-10-07T09:00:00");
    assert_eq!(scheduled["reason"], "assigned to free slot by fifo policy");
}

#[test]
fn test_plan_summary_reports_conflicts() {
    let cli = Cli::new();
    let stdout = cli.run_success(
        &["plan", "--summary", "--start", "2025-10-06"],
        Some(CONFLICT_REQUEST),
    );
    assert_contains(&stdout, "1 conflict");
}

#[test]
fn test_plan_rejects_invalid_request() {
    let cli = Cli::new();
    let bad = r#"{"tasks": [{"title": "No length", "type": "flexible"}]}"#;
    let stderr = cli.run_failure(&["plan", "--start", "2025-10-06"], Some(bad));
    assert_contains(&stderr, "error:");
    assert_contains(&stderr, "estimatedDuration");
}

#[test]
fn test_plan_rejects_oversized_horizon() {
    let cli = Cli::new();
    let stderr = cli.run_failure(&["plan", "--days", "200000000"], Some(LUNCH_REQUEST));
    assert_contains(&stderr, "searchDays");

    let stderr = cli.run_failure(&["config", "set", "scheduling.search_days", "200000000"], None);
    assert_contains(&stderr, "search_days");
}

#[test]
fn test_plan_rejects_malformed_json() {
    let cli = Cli::new();
    let stderr = cli.run_failure(&["plan"], Some("not json"));
    assert_contains(&stderr, "invalid request");
}

#[test]
fn test_plan_rejects_unknown_policy() {
    let cli = Cli::new();
    cli.run_failure(&["plan", "--policy", "random"], Some(LUNCH_REQUEST));
}

#[test]
fn test_conflicts_lists_overlap() {
    let cli = Cli::new();
    let stdout = cli.run_success(&["conflicts"], Some(CONFLICT_REQUEST));
    let conflicts = parse_json(&stdout);
    let conflicts = conflicts.as_array().unwrap();
    assert_eq!(conflicts.len(), 1);
    assert_eq!(conflicts[0]["startTime"], "2025-10-06T10:30:00");
    assert_eq!(conflicts[0]["endTime"], "2025-10-06T11:00:00");
}

#[test]
fn test_intake_normalises_fenced_reply() {
    let cli = Cli::new();
    let reply = "Sure!\n```json\n{\"title\": \"Weekly report\", \"estimatedDuration\": 45}\n```";
    let stdout = cli.run_success(&["intake", "--now", "2025-10-06T08:00"], Some(reply));
    let parsed = parse_json(&stdout);
    assert_eq!(parsed["task"]["title"], "Weekly report");
    assert_eq!(parsed["task"]["type"], "flexible");
    assert_eq!(parsed["task"]["estimatedDuration"], 45);
    assert!(parsed["confidence"].as_f64().unwrap() > 0.0);
}

#[test]
fn test_intake_without_json_fails() {
    let cli = Cli::new();
    cli.run_failure(&["intake"], Some("I could not understand that."));
}

#[test]
fn test_intake_preference_mode() {
    let cli = Cli::new();
    let stdout = cli.run_success(&["intake", "--preference"], Some(r#"{"workStart": "10:00"}"#));
    let parsed = parse_json(&stdout);
    assert_eq!(parsed["preference"]["workingHours"][0]["start"], "10:00");
    assert_contains(parsed["summary"].as_str().unwrap(), "10:00-18:00");
}

#[test]
fn test_preference_summary_of_default() {
    let cli = Cli::new();
    let stdout = cli.run_success(&["preference", "summary"], None);
    assert_contains(&stdout, "Working hours:");
    assert_contains(&stdout, "Max focus:");
}

#[test]
fn test_preference_show_is_json() {
    let cli = Cli::new();
    let stdout = cli.run_success(&["preference", "show"], None);
    let pref = parse_json(&stdout);
    assert!(pref.get("maxFocusDuration").is_some());
}

#[test]
fn test_config_set_get_reset() {
    let cli = Cli::new();
    assert_contains(&cli.run_success(&["config", "get", "scheduling.search_days"], None), "7");

    assert_contains(&cli.run_success(&["config", "set", "scheduling.search_days", "3"], None), "ok");
    assert_contains(&cli.run_success(&["config", "get", "scheduling.search_days"], None), "3");

    assert_contains(
        &cli.run_success(&["config", "reset"], None),
        "config reset to defaults",
    );
    assert_contains(&cli.run_success(&["config", "get", "scheduling.search_days"], None), "7");
}

#[test]
fn test_config_rejects_unknown_key_and_bad_value() {
    let cli = Cli::new();
    cli.run_failure(&["config", "get", "nope"], None);
    let stderr = cli.run_failure(&["config", "set", "preference.maxFocusDuration", "900"], None);
    assert_contains(&stderr, "maxFocusDuration");
}

#[test]
fn test_config_list_and_path() {
    let cli = Cli::new();
    let stdout = cli.run_success(&["config", "list"], None);
    assert_contains(&stdout, "scheduling.priority_policy = eisenhower");

    let json = cli.run_success(&["config", "list", "--json"], None);
    assert!(parse_json(&json).get("scheduling").is_some());

    let path = cli.run_success(&["config", "path"], None);
    assert_contains(&path, "focusplan");
}

#[test]
fn test_config_policy_feeds_plan() {
    let cli = Cli::new();
    cli.run_success(&["config", "set", "scheduling.priority_policy", "fifo"], None);
    let stdout = cli.run_success(&["plan", "--days", "1"], Some(LUNCH_REQUEST));
    let plan = parse_json(&stdout);
    assert_eq!(plan["scheduledTasks"][0]["reason"], "assigned to free slot by fifo policy");
}

#[test]
fn test_completions() {
    let cli = Cli::new();
    let stdout = cli.run_success(&["completions", "bash"], None);
    assert_contains(&stdout, "focusplan");
}
