use std::fs::write;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::NamedTempFile;

fn epg() -> Command {
    Command::cargo_bin("epg").expect("epg binary builds")
}

const DATED_ENTRIES: &str = r#"[
    {"id": 1, "time": "2024-01-15T08:00", "title": "Morning Bulletin", "type": "live", "duration": 60, "geoZone": "India", "status": "scheduled", "genre": "News"},
    {"id": 2, "time": "2024-01-16T08:00", "title": "Cricket Highlights", "type": "recorded", "duration": 90, "geoZone": "APAC", "status": "scheduled", "genre": "Sports"},
    {"id": 3, "time": "2024-01-15T21:00", "title": "Signal Outage", "type": "live", "duration": 0, "geoZone": "India", "status": "offline", "genre": "Maintenance"}
]"#;

#[test]
fn to_minutes_prints_offset() {
    epg()
        .args(["to-minutes", "09:30"])
        .assert()
        .success()
        .stdout("570\n");
}

#[test]
fn to_minutes_rejects_malformed_clock() {
    epg()
        .args(["to-minutes", "nine-thirty"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid clock time"));
}

#[test]
fn to_clock_does_not_wrap_hours() {
    epg()
        .args(["to-clock", "1500"])
        .assert()
        .success()
        .stdout("25:00\n");
}

#[test]
fn window_outputs_start_and_end() {
    let output = epg().args(["window", "08:00", "90"]).output().unwrap();
    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["start"], "08:00");
    assert_eq!(json["end"], "09:30");
    assert_eq!(json["crossesMidnight"], false);
}

#[test]
fn bucket_daily_from_stdin() {
    let output = epg()
        .args(["bucket", "--input", "-", "--anchor", "2024-01-15"])
        .write_stdin(DATED_ENTRIES)
        .output()
        .unwrap();
    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let day = json["2024-01-15"].as_array().unwrap();
    let ids: Vec<u64> = day.iter().map(|e| e["id"].as_u64().unwrap()).collect();
    assert_eq!(ids, vec![1, 3]);
    assert!(json.get("2024-01-16").is_none());
}

#[test]
fn bucket_weekly_covers_seven_days() {
    let output = epg()
        .args([
            "bucket",
            "--input",
            "-",
            "--anchor",
            "2024-01-17",
            "--view",
            "weekly",
        ])
        .write_stdin(DATED_ENTRIES)
        .output()
        .unwrap();
    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let days = json.as_object().unwrap();
    assert_eq!(days.len(), 7);
    assert_eq!(json["2024-01-16"].as_array().unwrap().len(), 1);
}

#[test]
fn bucket_rejects_bare_clock_entries() {
    epg()
        .args(["bucket", "--input", "-", "--anchor", "2024-01-15"])
        .write_stdin(
            r#"[{"id": 1, "time": "08:00", "title": "Breakfast Show", "type": "live", "duration": 60}]"#,
        )
        .assert()
        .failure()
        .stderr(predicate::str::contains("bare HH:MM"));
}

#[test]
fn bucket_rejects_mixed_entries() {
    epg()
        .args(["bucket", "--input", "-", "--anchor", "2024-01-15"])
        .write_stdin(
            r#"[
                {"id": 1, "time": "2024-01-15T08:00", "title": "A", "type": "live", "duration": 60},
                {"id": 2, "time": "09:00", "title": "B", "type": "live", "duration": 60}
            ]"#,
        )
        .assert()
        .failure()
        .stderr(predicate::str::contains("Mixed time modes"));
}

#[test]
fn ad_durations_marks_invalid_entries_disabled() {
    let output = epg()
        .args(["ad-durations", "--campaign", "Monsoon Magic (1:00m)"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let options = json.as_array().unwrap();
    assert_eq!(options.len(), 20);
    let find = |label: &str| {
        options
            .iter()
            .find(|o| o["label"] == label)
            .map(|o| o["enabled"].as_bool().unwrap())
            .unwrap()
    };
    assert!(find("01:00m"));
    assert!(!find("00:45m"));
    assert!(find("02:00m"));
}

#[test]
fn ad_durations_unknown_label_fails_open() {
    let output = epg()
        .args(["ad-durations", "--campaign", "House Ad"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert!(json
        .as_array()
        .unwrap()
        .iter()
        .all(|o| o["enabled"] == true));
}

#[test]
fn ad_submit_empty_reports_three_errors() {
    epg()
        .arg("ad-submit")
        .assert()
        .failure()
        .stderr(predicate::str::contains("campaign: Please select a campaign"))
        .stderr(predicate::str::contains("duration: Please select ad duration"))
        .stderr(predicate::str::contains("frequency: Please select ad frequency"))
        .stderr(predicate::str::contains("3 error(s)"));
}

#[test]
fn ad_submit_invalid_duration_reports_one_error() {
    epg()
        .args([
            "ad-submit",
            "--campaign",
            "monsoon-magic",
            "--duration",
            "00:45m",
            "--frequency",
            "Every hour",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "duration: Selected duration is not valid for the chosen campaign",
        ))
        .stderr(predicate::str::contains("1 error(s)"));
}

#[test]
fn ad_submit_valid_selection_prints_payload() {
    let output = epg()
        .args([
            "ad-submit",
            "--campaign",
            "monsoon-magic",
            "--duration",
            "02:00m",
            "--frequency",
            "Every hour",
        ])
        .output()
        .unwrap();
    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["campaign"]["label"], "Monsoon Magic (1:00m)");
    assert_eq!(json["duration"]["seconds"], 120);
    assert_eq!(json["frequency"], "Every hour");
}

#[test]
fn ad_submit_unknown_campaign_fails() {
    epg()
        .args(["ad-submit", "--campaign", "does-not-exist"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown campaign"));
}

#[test]
fn campaigns_lists_default_catalog() {
    epg()
        .arg("campaigns")
        .assert()
        .success()
        .stdout(predicate::str::contains("Monsoon Magic (1:00m)"));
}

/// Writes a catalog file for `--config`.
fn catalog_file(json: &str) -> NamedTempFile {
    let file = NamedTempFile::new().expect("create temp catalog");
    write(file.path(), json).expect("write temp catalog");
    file
}

const CUSTOM_CATALOG: &str = r#"{
    "campaigns": [{"id": "diwali-dhamaka", "label": "Diwali Dhamaka (0:30m)"}],
    "ladder": {"stepSecs": 30}
}"#;

#[test]
fn config_catalog_replaces_campaigns_and_keeps_default_frequencies() {
    let config = catalog_file(CUSTOM_CATALOG);
    let output = epg()
        .arg("campaigns")
        .arg("--config")
        .arg(config.path())
        .output()
        .unwrap();
    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let campaigns = json["campaigns"].as_array().unwrap();
    assert_eq!(campaigns.len(), 1);
    assert_eq!(campaigns[0]["id"], "diwali-dhamaka");
    assert!(json["frequencies"]
        .as_array()
        .unwrap()
        .iter()
        .any(|f| f == "Every hour"));
    assert_eq!(json["ladder"]["stepSecs"], 30);
    assert_eq!(json["ladder"]["maxSecs"], 300);
}

#[test]
fn config_ladder_drives_ad_durations() {
    let config = catalog_file(CUSTOM_CATALOG);
    let output = epg()
        .args(["ad-durations", "--campaign", "diwali-dhamaka", "--config"])
        .arg(config.path())
        .output()
        .unwrap();
    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let options = json.as_array().unwrap();
    assert_eq!(options.len(), 10);
    assert_eq!(options[0]["label"], "00:30m");
    assert!(options.iter().all(|o| o["enabled"] == true));
}

#[test]
fn config_campaign_is_used_by_ad_submit() {
    let config = catalog_file(CUSTOM_CATALOG);
    epg()
        .args([
            "ad-submit",
            "--campaign",
            "diwali-dhamaka",
            "--duration",
            "01:00m",
            "--frequency",
            "Every hour",
            "--config",
        ])
        .arg(config.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Diwali Dhamaka (0:30m)"));
}

#[test]
fn config_missing_file_fails_with_context() {
    epg()
        .args(["campaigns", "--config", "/nonexistent/epg-catalog.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read config file"));
}

#[test]
fn config_invalid_catalog_is_rejected() {
    let config = catalog_file(r#"{"ladder": {"stepSecs": 1, "maxSecs": 20000000}}"#);
    epg()
        .arg("campaigns")
        .arg("--config")
        .arg(config.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid catalog"));
}
