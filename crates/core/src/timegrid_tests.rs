// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::schedule::SegmentId;
use chrono::TimeZone;
use yare::parameterized;

fn ts(hour: u32, minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 1, 6, hour, minute, 0).unwrap()
}

fn grid5() -> TimeGrid {
    TimeGrid::new(ts(9, 0), 5)
}

#[test]
fn to_slot_floors() {
    let grid = grid5();
    assert_eq!(grid.to_slot(ts(9, 0)), 0);
    assert_eq!(grid.to_slot(ts(9, 4)), 0);
    assert_eq!(grid.to_slot(ts(9, 5)), 1);
    assert_eq!(grid.to_slot(ts(10, 0)), 12);
}

#[test]
fn to_slot_ceiling_rounds_up() {
    let grid = grid5();
    assert_eq!(grid.to_slot_ceiling(ts(9, 0)), 0);
    assert_eq!(grid.to_slot_ceiling(ts(9, 1)), 1);
    assert_eq!(grid.to_slot_ceiling(ts(9, 5)), 1);
    assert_eq!(grid.to_slot_ceiling(ts(9, 6)), 2);
}

#[test]
fn instants_before_base_floor_downward() {
    let grid = grid5();
    assert_eq!(grid.to_slot(ts(8, 58)), -1);
    assert_eq!(grid.to_slot(ts(8, 55)), -1);
    assert_eq!(grid.to_slot(ts(8, 54)), -2);
    assert_eq!(grid.to_slot_ceiling(ts(8, 58)), 0);
    assert_eq!(grid.to_slot_ceiling(ts(8, 55)), -1);
}

#[test]
fn to_datetime_round_trips_slot_boundaries() {
    let grid = grid5();
    for slot in [0, 1, 7, 96, 300] {
        assert_eq!(grid.to_slot(grid.to_datetime(slot)), slot);
        assert_eq!(grid.to_slot_ceiling(grid.to_datetime(slot)), slot);
    }
}

#[parameterized(
    single_minute = { 1, 1 },
    below_one_slot = { 4, 1 },
    exactly_one_slot = { 5, 1 },
    just_over_one_slot = { 6, 2 },
    ninety_minutes = { 90, 18 },
    zero_is_clamped = { 0, 1 },
)]
fn duration_to_slots_rounds_up(minutes: u32, expected: i64) {
    assert_eq!(grid5().duration_to_slots(minutes), expected);
}

#[test]
fn aligned_base_zeroes_seconds_and_rounds_down() {
    let earliest = Utc.with_ymd_and_hms(2025, 1, 6, 9, 7, 42).unwrap();
    let grid = TimeGrid::aligned(earliest, 5);
    assert_eq!(grid.base(), ts(9, 5));

    let grid15 = TimeGrid::aligned(earliest, 15);
    assert_eq!(grid15.base(), ts(9, 0));
}

#[test]
fn aligned_base_on_boundary_is_unchanged() {
    let grid = TimeGrid::aligned(ts(9, 0), 5);
    assert_eq!(grid.base(), ts(9, 0));
}

fn make_task(earliest: DateTime<Utc>, due: DateTime<Utc>) -> ScheduleTask {
    ScheduleTask {
        id: SegmentId::new("t", 0),
        duration_minutes: 60,
        earliest_start: earliest,
        due,
        priority: 5,
        preferred_windows: None,
        fixed_start: None,
    }
}

#[test]
fn base_and_horizon_cover_tasks_and_meetings() {
    let tasks = vec![make_task(ts(9, 0), ts(17, 0))];
    let meetings = vec![ScheduleMeeting {
        id: "m1".to_string(),
        start: ts(8, 30),
        end: ts(18, 0),
    }];

    let (grid, horizon) = base_and_horizon(&tasks, &meetings, 5).unwrap();
    // Meeting starts earlier than any task, so it anchors the grid.
    assert_eq!(grid.base(), ts(8, 30));
    // 18:00 is slot 114 from 08:30 at 5-minute granularity, plus slack.
    assert_eq!(horizon, 114 + 10);
}

#[test]
fn base_and_horizon_empty_request_is_none() {
    assert!(base_and_horizon(&[], &[], 5).is_none());
}

#[test]
fn horizon_has_a_floor() {
    let tasks = vec![make_task(ts(9, 0), ts(9, 1))];
    let (_, horizon) = base_and_horizon(&tasks, &[], 15).unwrap();
    assert_eq!(horizon, 11);
}
