// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn first_segment_renders_as_bare_task_id() {
    let id = SegmentId::new("a1b2", 0);
    assert_eq!(id.to_string(), "a1b2");
}

#[test]
fn later_segments_render_with_suffix() {
    assert_eq!(SegmentId::new("a1b2", 1).to_string(), "a1b2::seg2");
    assert_eq!(SegmentId::new("a1b2", 2).to_string(), "a1b2::seg3");
}

#[test]
fn root_is_idempotent() {
    let id = SegmentId::new("a1b2", 4);
    assert_eq!(id.root(), id.root().root());
    assert!(id.root().is_root());
    assert_eq!(id.root().to_string(), "a1b2");
}

#[test]
fn segments_of_one_task_sort_by_index() {
    let mut ids = vec![
        SegmentId::new("t", 2),
        SegmentId::new("t", 0),
        SegmentId::new("t", 1),
    ];
    ids.sort();
    assert_eq!(ids.iter().map(|i| i.index).collect::<Vec<_>>(), [0, 1, 2]);
}

#[test]
fn empty_result_has_zero_objective() {
    let result = ScheduleResult::empty();
    assert!(result.assignments.is_empty());
    assert!(result.unscheduled.is_empty());
    assert_eq!(result.objective_value, Some(0));
}
