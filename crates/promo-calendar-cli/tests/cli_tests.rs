//! Integration tests for the `promocal` CLI binary.
//!
//! These tests use `assert_cmd` and `predicates` to exercise every subcommand
//! through the actual binary, including stdin input, file output, configuration
//! layering and error reporting.

// `Command::cargo_bin` was deprecated in assert_cmd 2.1.2 in favor of
// `cargo::cargo_bin_cmd!`. Allow it until we migrate.
#![allow(deprecated)]

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;

/// The whole of February 2026.
const FEBRUARY: [&str; 4] = ["--from", "2026-02-01", "--to", "2026-02-28"];

/// Helper: path to the promotions.json fixture.
fn promotions_path() -> &'static str {
    concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/promotions.json")
}

/// Helper: path to the fixture with a reversed date range.
fn invalid_range_path() -> &'static str {
    concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/invalid_range.json")
}

/// Helper: a `promocal` command isolated from the caller's environment.
fn promocal() -> Command {
    let mut cmd = Command::cargo_bin("promocal").unwrap();
    cmd.env_remove("RUST_LOG")
        .env_remove("PROMOCAL__TIMEZONE")
        .env_remove("PROMOCAL__WEEK_START")
        .env_remove("PROMOCAL__LOG_LEVEL")
        .env_remove("PROMOCAL__LOG_JSON");
    cmd
}

/// Helper: `<command> -i promotions.json --team <team>` followed by `extra`.
fn team_args<'a>(command: &'a str, team: &'a str, extra: &[&'a str]) -> Vec<&'a str> {
    let mut args = vec![command, "-i", promotions_path(), "--team", team];
    args.extend_from_slice(extra);
    args
}

/// Helper: run a successful command and parse its stdout as JSON.
fn run_json(args: &[&str]) -> Value {
    let output = promocal()
        .args(args)
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    serde_json::from_slice(&output).expect("stdout must be valid JSON")
}

fn ids(value: &Value) -> Vec<String> {
    value
        .as_array()
        .expect("expected a JSON array")
        .iter()
        .map(|p| p["id"].as_str().unwrap().to_string())
        .collect()
}

fn channel_ids(value: &Value) -> Vec<String> {
    value
        .as_array()
        .expect("expected a JSON array")
        .iter()
        .map(|p| p["channelId"].as_str().unwrap().to_string())
        .collect()
}

// ─────────────────────────────────────────────────────────────────────────────
// query
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn query_returns_team_promotions_sorted_by_start() {
    let result = run_json(&team_args("query", "team-a", &FEBRUARY));

    // oy-spring and cp-rocket share a start date and keep file order.
    assert_eq!(
        ids(&result),
        vec!["nv-cancelled", "oy-spring", "cp-rocket", "oy-flash"]
    );
    assert_eq!(result[1]["startDate"], "2026-02-05");
    assert_eq!(result[1]["discountType"], "percentage");
}

#[test]
fn query_status_filter_drops_cancelled() {
    let mut args = team_args("query", "team-a", &FEBRUARY);
    args.extend(["--status", "planned", "--status", "active"]);

    let result = run_json(&args);

    assert_eq!(ids(&result), vec!["oy-spring", "cp-rocket", "oy-flash"]);
}

#[test]
fn query_channel_filter() {
    let mut args = team_args("query", "team-a", &FEBRUARY);
    args.extend(["--channel", "oliveyoung"]);

    let result = run_json(&args);

    assert_eq!(ids(&result), vec!["oy-spring", "oy-flash"]);
}

#[test]
fn query_reads_stdin() {
    let input = std::fs::read_to_string(promotions_path()).unwrap();

    let output = promocal()
        .args(["query", "--team", "team-b"])
        .args(["--from", "2026-02-10", "--to", "2026-02-10"])
        .write_stdin(input)
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let result: Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(ids(&result), vec!["rival-oy"]);
}

#[test]
fn query_writes_output_file() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("february.json");

    let mut args = team_args("query", "team-a", &["-o", out.to_str().unwrap()]);
    args.extend(["--from", "2026-02-13", "--to", "2026-02-13"]);

    promocal()
        .args(&args)
        .assert()
        .success()
        .stdout(predicate::str::is_empty());

    let written = std::fs::read_to_string(&out).unwrap();
    let written: Value = serde_json::from_str(&written).unwrap();
    assert_eq!(ids(&written), vec!["oy-flash"]);
}

// ─────────────────────────────────────────────────────────────────────────────
// --preset
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn month_to_date_preset_matches_explicit_window() {
    let preset = run_json(&team_args(
        "query",
        "team-a",
        &["--preset", "mtd", "--as-of", "2026-02-13"],
    ));
    let explicit = run_json(&team_args(
        "query",
        "team-a",
        &["--from", "2026-02-01", "--to", "2026-02-13"],
    ));

    assert_eq!(preset, explicit);
    assert_eq!(
        ids(&preset),
        vec!["nv-cancelled", "oy-spring", "cp-rocket", "oy-flash"]
    );
}

#[test]
fn last_days_preset_ends_on_reference_day() {
    let result = run_json(&team_args(
        "buckets",
        "team-a",
        &["--preset", "7d", "--as-of", "2026-02-04"],
    ));

    assert_eq!(result["window"]["start"], "2026-01-28");
    assert_eq!(result["window"]["end"], "2026-02-04");
    let days = result["days"].as_object().unwrap();
    assert_eq!(days.len(), 3, "only nv-cancelled runs 02-01..02-03");
}

#[test]
fn quarter_preset_uses_reference_year() {
    let result = run_json(&team_args(
        "buckets",
        "team-a",
        &["--preset", "Q1", "--as-of", "2026-06-15"],
    ));

    assert_eq!(result["window"]["start"], "2026-01-01");
    assert_eq!(result["window"]["end"], "2026-03-31");
    assert_eq!(result["maxPerDay"], 3);
}

#[test]
fn preset_conflicts_with_explicit_window() {
    let mut args = team_args("query", "team-a", &FEBRUARY);
    args.extend(["--preset", "ytd"]);

    promocal()
        .args(&args)
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot be used with"));
}

#[test]
fn unknown_preset_fails() {
    promocal()
        .args(team_args("query", "team-a", &["--preset", "q5"]))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown period preset: q5"));
}

#[test]
fn window_or_preset_is_required() {
    promocal()
        .args(team_args("query", "team-a", &[]))
        .assert()
        .failure()
        .stderr(predicate::str::contains("required"));
}

// ─────────────────────────────────────────────────────────────────────────────
// buckets / view
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn buckets_group_promotions_by_day() {
    let result = run_json(&team_args(
        "buckets",
        "team-a",
        &["--from", "2026-02-01", "--to", "2026-02-10"],
    ));

    let days = result["days"].as_object().unwrap();
    assert_eq!(days.len(), 9, "02-01..02-03 and 02-05..02-10");
    assert!(!days.contains_key("2026-02-04"), "uncovered day must not appear");
    assert_eq!(
        result["days"]["2026-02-05"],
        serde_json::json!(["oy-spring", "cp-rocket"])
    );
    assert_eq!(
        result["days"]["2026-02-10"],
        serde_json::json!(["oy-spring", "cp-rocket"])
    );
    assert_eq!(result["maxPerDay"], 2);
    assert_eq!(result["window"]["start"], "2026-02-01");
    assert!(result.get("view").is_none());
}

#[test]
fn week_view_starts_on_monday_by_default() {
    // 2026-02-12 is a Thursday.
    let result = run_json(&team_args(
        "view",
        "team-a",
        &["--view", "week", "--date", "2026-02-12"],
    ));

    assert_eq!(result["view"], "week");
    assert_eq!(result["window"]["start"], "2026-02-09");
    assert_eq!(result["window"]["end"], "2026-02-15");
    assert_eq!(
        result["days"]["2026-02-12"],
        serde_json::json!(["oy-spring", "cp-rocket", "oy-flash"])
    );
    assert_eq!(result["maxPerDay"], 3);
}

#[test]
fn week_start_comes_from_environment() {
    let output = promocal()
        .env("PROMOCAL__WEEK_START", "sunday")
        .args(team_args(
            "view",
            "team-a",
            &["--view", "week", "--date", "2026-02-12"],
        ))
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let result: Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(result["window"]["start"], "2026-02-08");
}

#[test]
fn month_view_covers_the_month() {
    let result = run_json(&team_args("view", "team-a", &["--date", "2026-02-20"]));

    assert_eq!(result["view"], "month");
    assert_eq!(result["window"]["start"], "2026-02-01");
    assert_eq!(result["window"]["end"], "2026-02-28");
}

#[test]
fn unknown_view_fails() {
    promocal()
        .args(team_args(
            "view",
            "team-a",
            &["--view", "year", "--date", "2026-02-20"],
        ))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown calendar view: year"));
}

// ─────────────────────────────────────────────────────────────────────────────
// conflicts / audit
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn conflict_on_shared_boundary_day() {
    let mut args = team_args("conflicts", "team-a", &["--channel", "oliveyoung"]);
    args.extend(["--from", "2026-02-14", "--to", "2026-02-20"]);

    let result = run_json(&args);

    assert_eq!(result["hasConflict"], true);
    assert_eq!(ids(&result["conflicts"]), vec!["oy-flash"]);
}

#[test]
fn conflict_check_excludes_edited_promotion() {
    let mut args = team_args("conflicts", "team-a", &["--channel", "oliveyoung"]);
    args.extend(["--from", "2026-02-12", "--to", "2026-02-14"]);
    args.extend(["--exclude", "oy-flash"]);

    let result = run_json(&args);

    assert_eq!(ids(&result["conflicts"]), vec!["oy-spring"]);
}

#[test]
fn no_conflict_on_other_channel_or_cancelled() {
    let mut args = team_args("conflicts", "team-a", &["--channel", "kakao"]);
    args.extend(["--from", "2026-02-05", "--to", "2026-02-12"]);
    let other_channel = run_json(&args);
    assert_eq!(other_channel["hasConflict"], false);

    let mut args = team_args("conflicts", "team-a", &["--channel", "naver"]);
    args.extend(["--from", "2026-02-01", "--to", "2026-02-03"]);
    let cancelled_only = run_json(&args);
    assert_eq!(cancelled_only["hasConflict"], false);
}

#[test]
fn audit_reports_overlapping_pairs() {
    let result = run_json(&team_args("audit", "team-a", &[]));

    let pairs = result.as_array().unwrap();
    assert_eq!(pairs.len(), 1);
    assert_eq!(pairs[0]["first"]["id"], "oy-spring");
    assert_eq!(pairs[0]["second"]["id"], "oy-flash");
    assert_eq!(pairs[0]["overlapDays"], 1);
    assert_eq!(pairs[0]["overlap"]["start"], "2026-02-12");
}

// ─────────────────────────────────────────────────────────────────────────────
// lead-times
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn lead_times_for_known_channels() {
    let result = run_json(&[
        "lead-times",
        "--start",
        "2026-06-01",
        "--channel",
        "oliveyoung",
        "--channel",
        "kakao",
        "--channel",
        "musinsa",
    ]);

    let plans = result.as_array().unwrap();
    assert_eq!(plans.len(), 2, "unknown channel is skipped");
    assert_eq!(plans[0]["channelId"], "oliveyoung");
    assert_eq!(plans[0]["totalLeadDays"], 42);
    assert_eq!(plans[1]["channelId"], "kakao");
    assert_eq!(plans[1]["latestStartDate"], "2026-05-12");
}

#[test]
fn lead_times_use_config_overrides() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("promocal.toml");
    std::fs::write(
        &config,
        "[lead_times.musinsa]\ncreative_days = 5\nsubmission_days = 7\napproval_days = 2\n",
    )
    .unwrap();

    let result = run_json(&[
        "--config",
        config.to_str().unwrap(),
        "lead-times",
        "--start",
        "2026-06-01",
        "--channel",
        "musinsa",
    ]);

    assert_eq!(result[0]["totalLeadDays"], 14);
    assert_eq!(result[0]["submissionDue"], "2026-05-30");
}

#[test]
fn lead_times_skip_out_of_range_profiles() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("promocal.toml");
    std::fs::write(
        &config,
        "[lead_times.slow]\ncreative_days = 4294967295\nsubmission_days = 1\napproval_days = 0\n",
    )
    .unwrap();

    let result = run_json(&[
        "--config",
        config.to_str().unwrap(),
        "lead-times",
        "--start",
        "2026-06-01",
        "--channel",
        "slow",
        "--channel",
        "kakao",
    ]);

    assert_eq!(channel_ids(&result), vec!["kakao"]);
}

#[test]
fn lead_times_require_a_channel() {
    promocal()
        .args(["lead-times", "--start", "2026-06-01"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--channel"));
}

// ─────────────────────────────────────────────────────────────────────────────
// Errors
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn reversed_record_range_is_rejected() {
    promocal()
        .args(["audit", "-i", invalid_range_path(), "--team", "team-a"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to parse promotions JSON"));
}

#[test]
fn reversed_window_is_rejected() {
    promocal()
        .args(team_args(
            "query",
            "team-a",
            &["--from", "2026-02-10", "--to", "2026-02-01"],
        ))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid window"));
}

#[test]
fn unknown_status_filter_is_rejected() {
    let mut args = team_args("query", "team-a", &FEBRUARY);
    args.extend(["--status", "draft"]);

    promocal()
        .args(&args)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid --status filter"));
}

#[test]
fn missing_input_file_is_reported() {
    promocal()
        .args(["audit", "--team", "team-a"])
        .args(["-i", "/nonexistent/promos.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read file"));
}

#[test]
fn no_arguments_prints_help() {
    promocal()
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
}
