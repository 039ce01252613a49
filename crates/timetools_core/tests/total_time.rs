use serde_json::json;
use std::fs;
use timetools_core::{load_json, write_json, MetricError, TotalTimeTracker};

#[test]
fn saved_total_is_restored_by_a_fresh_tracker() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("total_time.json");

    let tracker = TotalTimeTracker::with_persist_file(&path);
    tracker.set_total_seconds(3661.5);
    tracker.save().unwrap();

    let restored = TotalTimeTracker::with_persist_file(&path);
    assert_eq!(restored.total_seconds(), 0.0);
    restored.load();
    assert_eq!(restored.total_seconds(), 3661.5);
}

#[test]
fn save_writes_expected_shape() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("total_time.json");
    let tracker = TotalTimeTracker::with_persist_file(&path);
    tracker.add_seconds(90.0);
    tracker.add_seconds(30.25);

    tracker.save().unwrap();

    assert_eq!(load_json(&path), Some(json!({"total_seconds": 120.25})));
}

#[test]
fn save_without_path_is_a_configuration_error() {
    let tracker = TotalTimeTracker::in_memory();
    tracker.set_total_seconds(5.0);

    assert_eq!(tracker.save(), Err(MetricError::PathNotConfigured));
    assert_eq!(tracker.total_seconds(), 5.0);
}

#[test]
fn save_ignores_write_failures() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("total_time.json");
    fs::create_dir(&path).unwrap();
    let tracker = TotalTimeTracker::with_persist_file(&path);
    tracker.set_total_seconds(10.0);

    assert_eq!(tracker.save(), Ok(()));
    assert!(path.is_dir());
    assert_eq!(tracker.total_seconds(), 10.0);
}

#[test]
fn load_from_missing_or_corrupt_file_resets_to_zero() {
    let dir = tempfile::tempdir().unwrap();
    let missing = TotalTimeTracker::with_persist_file(dir.path().join("absent.json"));
    missing.set_total_seconds(42.0);
    missing.load();
    assert_eq!(missing.total_seconds(), 0.0);

    let corrupt_path = dir.path().join("corrupt.json");
    fs::write(&corrupt_path, "{total_seconds: ").unwrap();
    let corrupt = TotalTimeTracker::with_persist_file(&corrupt_path);
    corrupt.load();
    assert_eq!(corrupt.total_seconds(), 0.0);
}

#[test]
fn load_defaults_missing_key_to_zero() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("total_time.json");
    write_json(&path, &json!({"other": 1})).unwrap();
    let tracker = TotalTimeTracker::with_persist_file(&path);
    tracker.set_total_seconds(8.0);

    tracker.load();

    assert_eq!(tracker.total_seconds(), 0.0);
}

#[test]
fn load_coerces_numeric_strings() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("total_time.json");
    write_json(&path, &json!({"total_seconds": "75.5"})).unwrap();
    let tracker = TotalTimeTracker::with_persist_file(&path);

    tracker.load();

    assert_eq!(tracker.total_seconds(), 75.5);
}

#[test]
fn load_keeps_prior_value_when_total_is_malformed() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("total_time.json");
    write_json(&path, &json!({"total_seconds": {"hours": 1}})).unwrap();
    let tracker = TotalTimeTracker::with_persist_file(&path);
    tracker.set_total_seconds(33.0);

    tracker.load();

    assert_eq!(tracker.total_seconds(), 33.0);
}

#[test]
fn non_finite_total_never_reaches_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("total_time.json");
    let tracker = TotalTimeTracker::with_persist_file(&path);
    tracker.set_total_seconds(7.0);

    tracker.set_total_seconds(f64::INFINITY);
    tracker.save().unwrap();

    assert_eq!(load_json(&path), Some(json!({"total_seconds": 7.0})));
    let restored = TotalTimeTracker::with_persist_file(&path);
    restored.load();
    assert_eq!(restored.total_seconds(), 7.0);
}

#[test]
fn load_keeps_prior_value_for_non_finite_or_non_object_documents() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("total_time.json");
    let tracker = TotalTimeTracker::with_persist_file(&path);
    tracker.set_total_seconds(21.0);

    write_json(&path, &json!({"total_seconds": "inf"})).unwrap();
    tracker.load();
    assert_eq!(tracker.total_seconds(), 21.0);

    write_json(&path, &json!([1])).unwrap();
    tracker.load();
    assert_eq!(tracker.total_seconds(), 21.0);
}
