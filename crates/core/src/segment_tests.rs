// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::schedule::AssignedTask;
use crate::task::TaskId;
use chrono::TimeZone;
use proptest::prelude::*;
use yare::parameterized;

#[parameterized(
    below_minimum_rounds_up = { 10, &[15] },
    exactly_minimum = { 15, &[15] },
    one_full_block = { 120, &[120] },
    just_over_a_block = { 121, &[106, 15] },
    awkward_remainder = { 130, &[115, 15] },
    clean_split = { 200, &[120, 80] },
    six_hours = { 360, &[120, 120, 120] },
    remainder_after_two_blocks = { 241, &[120, 106, 15] },
)]
fn segment_durations_cases(total: u32, expected: &[u32]) {
    assert_eq!(segment_durations(total), expected);
}

proptest! {
    #[test]
    fn chunks_are_bounded_and_sum(total in 1u32..10_000) {
        let chunks = segment_durations(total);
        prop_assert!(!chunks.is_empty());
        for chunk in &chunks {
            prop_assert!((MIN_BLOCK_MINUTES..=MAX_BLOCK_MINUTES).contains(chunk));
        }
        prop_assert_eq!(
            chunks.iter().sum::<u32>(),
            total.max(MIN_BLOCK_MINUTES)
        );
    }
}

fn ts(hour: u32) -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 1, 6, hour, 0, 0).unwrap()
}

fn make_task(duration_minutes: u32) -> Task {
    Task {
        id: TaskId::from("root"),
        title: "Long task".to_string(),
        description: None,
        duration_minutes,
        earliest_start: ts(9),
        due: ts(21),
        priority: 3,
        preferred_windows: None,
    }
}

#[test]
fn expand_shares_window_and_priority() {
    let task = make_task(360);
    let segments = expand_task(&task, None);

    assert_eq!(segments.len(), 3);
    for (index, segment) in segments.iter().enumerate() {
        assert_eq!(segment.id, SegmentId::new("root", index as u32));
        assert_eq!(segment.duration_minutes, 120);
        assert_eq!(segment.earliest_start, task.earliest_start);
        assert_eq!(segment.due, task.due);
        assert_eq!(segment.priority, task.priority);
        assert!(segment.fixed_start.is_none());
    }
}

#[test]
fn expand_short_task_is_a_single_root_segment() {
    let segments = expand_task(&make_task(45), None);
    assert_eq!(segments.len(), 1);
    assert!(segments[0].id.is_root());
    assert_eq!(segments[0].duration_minutes, 45);
}

fn assigned(id: SegmentId, hour: u32) -> AssignedTask {
    AssignedTask {
        id,
        start: ts(hour),
        end: ts(hour + 1),
        deviation_minutes: 0,
        tardiness_minutes: 0,
    }
}

#[test]
fn remap_folds_segments_to_roots() {
    let result = ScheduleResult {
        assignments: vec![
            assigned(SegmentId::new("a", 1), 9),
            assigned(SegmentId::new("a", 0), 11),
        ],
        unscheduled: vec![
            SegmentId::new("b", 2),
            SegmentId::new("b", 0),
            SegmentId::new("a", 2),
        ],
        objective_value: Some(42),
    };

    let remapped = remap_result(result);

    assert!(remapped.assignments.iter().all(|a| a.id.is_root()));
    assert_eq!(remapped.assignments[0].id, SegmentId::new("a", 0));
    // Unscheduled roots are deduplicated and sorted.
    assert_eq!(
        remapped.unscheduled,
        vec![SegmentId::new("a", 0), SegmentId::new("b", 0)]
    );
    assert_eq!(remapped.objective_value, Some(42));
}

#[test]
fn remap_is_idempotent() {
    let result = ScheduleResult {
        assignments: vec![assigned(SegmentId::new("a", 3), 9)],
        unscheduled: vec![SegmentId::new("b", 1), SegmentId::new("b", 4)],
        objective_value: None,
    };

    let once = remap_result(result);
    let twice = remap_result(once.clone());
    assert_eq!(once, twice);
}
