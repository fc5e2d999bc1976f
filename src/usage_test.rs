use super::*;
use chrono::{Duration, TimeZone};
use tempfile::TempDir;

fn create_test_log() -> (UsageLog, TempDir) {
    let temp_dir = TempDir::new().unwrap();
    let log = UsageLog::open(temp_dir.path().join("logs").join("usage.log")).unwrap();
    (log, temp_dir)
}

#[test]
fn test_open_creates_parent_directory() {
    let (log, temp_dir) = create_test_log();
    assert!(temp_dir.path().join("logs").is_dir());
    assert!(log.path().exists());
}

#[test]
fn test_log_expansion_writes_trigger_only() {
    let (log, _temp_dir) = create_test_log();

    log.log_expansion(";email");

    let content = std::fs::read_to_string(log.path()).unwrap();
    assert!(content.ends_with("\ttrigger=;email\n"));
    assert_eq!(content.lines().count(), 1);
}

#[test]
fn test_log_error_line() {
    let (log, _temp_dir) = create_test_log();

    log.log_error("config unreadable");

    let content = std::fs::read_to_string(log.path()).unwrap();
    assert!(content.contains("\tERROR: config unreadable"));
}

#[test]
fn test_statistics_track_totals_and_most_used() {
    let (log, _temp_dir) = create_test_log();

    log.log_expansion(";a");
    log.log_expansion(";b");
    log.log_expansion(";b");

    let stats = log.statistics();
    assert_eq!(stats.total_expansions, 3);
    assert_eq!(stats.today_expansions, 3);
    assert_eq!(stats.most_used_trigger.as_deref(), Some(";b"));
    assert!(stats.last_expansion.is_some());
}

#[test]
fn test_today_counter_resets_on_new_day() {
    let (log, _temp_dir) = create_test_log();
    let day_one = Local.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();

    log.record_at(";x", day_one);
    log.record_at(";x", day_one + Duration::hours(1));
    log.record_at(";x", day_one + Duration::days(1));

    let stats = log.statistics();
    assert_eq!(stats.total_expansions, 3);
    assert_eq!(stats.today_expansions, 1);
}

#[test]
fn test_rotation_when_size_exceeded() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("usage.log");
    let log = UsageLog::open_with_max_size(&path, 64).unwrap();

    for _ in 0..10 {
        log.log_expansion(";rotate-me");
    }

    let rotated: Vec<_> = std::fs::read_dir(temp_dir.path())
        .unwrap()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_name().to_string_lossy().starts_with("usage.log."))
        .collect();
    assert!(!rotated.is_empty(), "a rotated file should exist");

    let current = std::fs::metadata(&path).unwrap().len();
    assert!(current < 64 + 64, "current log restarted after rotation");
}
