// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::task::{TaskId, WindowSpec};
use chrono::TimeZone;

fn task_with_windows(windows: Vec<WindowSpec>) -> Task {
    Task {
        id: TaskId::from("task-1"),
        title: "Windowed".to_string(),
        description: None,
        duration_minutes: 60,
        earliest_start: Utc.with_ymd_and_hms(2025, 1, 6, 9, 0, 0).unwrap(),
        due: Utc.with_ymd_and_hms(2025, 1, 6, 17, 0, 0).unwrap(),
        priority: 5,
        preferred_windows: Some(windows),
    }
}

fn spec(start: &str, end: &str) -> WindowSpec {
    WindowSpec {
        start: start.to_string(),
        end: end.to_string(),
        weight: None,
    }
}

#[test]
fn parses_rfc3339_windows() {
    let task = task_with_windows(vec![spec(
        "2025-01-06T10:00:00+00:00",
        "2025-01-06T12:00:00+00:00",
    )]);

    let windows = parse_preferred_windows(&task).unwrap();
    assert_eq!(windows.len(), 1);
    assert_eq!(windows[0].0, Utc.with_ymd_and_hms(2025, 1, 6, 10, 0, 0).unwrap());
    assert_eq!(windows[0].1, Utc.with_ymd_and_hms(2025, 1, 6, 12, 0, 0).unwrap());
}

#[test]
fn naive_instants_are_taken_as_utc() {
    let task = task_with_windows(vec![spec("2025-01-06T10:00:00", "2025-01-06T12:00:00")]);

    let windows = parse_preferred_windows(&task).unwrap();
    assert_eq!(windows[0].0, Utc.with_ymd_and_hms(2025, 1, 6, 10, 0, 0).unwrap());
}

#[test]
fn offsets_normalize_to_utc() {
    let task = task_with_windows(vec![spec(
        "2025-01-06T12:00:00+02:00",
        "2025-01-06T14:00:00+02:00",
    )]);

    let windows = parse_preferred_windows(&task).unwrap();
    assert_eq!(windows[0].0, Utc.with_ymd_and_hms(2025, 1, 6, 10, 0, 0).unwrap());
}

#[test]
fn one_malformed_entry_drops_all_windows() {
    let task = task_with_windows(vec![
        spec("2025-01-06T10:00:00+00:00", "2025-01-06T12:00:00+00:00"),
        spec("not-a-timestamp", "2025-01-06T15:00:00+00:00"),
    ]);

    assert!(parse_preferred_windows(&task).is_none());
}

#[test]
fn no_windows_is_none() {
    let mut task = task_with_windows(vec![]);
    task.preferred_windows = None;
    assert!(parse_preferred_windows(&task).is_none());

    let empty = task_with_windows(vec![]);
    assert_eq!(parse_preferred_windows(&empty), Some(vec![]));
}
