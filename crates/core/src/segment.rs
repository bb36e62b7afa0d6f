// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Task segmentation and result remapping
//!
//! Long tasks are split into bounded segments before solving so no single
//! solver interval exceeds [`MAX_BLOCK_MINUTES`] and none falls below
//! [`MIN_BLOCK_MINUTES`]. After solving, segment identities fold back to
//! their owning task.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};

use crate::schedule::{ScheduleResult, ScheduleTask, SegmentId};
use crate::task::Task;

/// Longest contiguous block a task may occupy.
pub const MAX_BLOCK_MINUTES: u32 = 120;
/// Shortest block worth scheduling.
pub const MIN_BLOCK_MINUTES: u32 = 15;

/// Split a total duration into chunks of `[MIN_BLOCK_MINUTES,
/// MAX_BLOCK_MINUTES]` minutes.
///
/// When taking a full chunk would strand a remainder below the minimum, the
/// chunk shrinks just enough that the next one clears it. The chunks sum to
/// `max(total_minutes, MIN_BLOCK_MINUTES)`.
pub fn segment_durations(total_minutes: u32) -> Vec<u32> {
    let mut remaining = total_minutes.max(MIN_BLOCK_MINUTES);
    let mut chunks = Vec::new();
    while remaining > 0 {
        let mut chunk = MAX_BLOCK_MINUTES.min(remaining);
        let remainder = remaining - chunk;
        if remainder > 0 && remainder < MIN_BLOCK_MINUTES {
            let deficit = MIN_BLOCK_MINUTES - remainder;
            let adjustment = deficit.min(chunk - MIN_BLOCK_MINUTES);
            chunk -= adjustment;
        }
        let chunk = chunk.clamp(MIN_BLOCK_MINUTES, remaining);
        chunks.push(chunk);
        remaining -= chunk;
    }
    chunks
}

/// Fan a task out into solver segments sharing its window, priority, and
/// (already parsed) preferred windows.
pub fn expand_task(
    task: &Task,
    preferred_windows: Option<Vec<(DateTime<Utc>, DateTime<Utc>)>>,
) -> Vec<ScheduleTask> {
    segment_durations(task.duration_minutes)
        .into_iter()
        .enumerate()
        .map(|(index, duration_minutes)| ScheduleTask {
            id: SegmentId::new(task.id.clone(), index as u32),
            duration_minutes,
            earliest_start: task.earliest_start,
            due: task.due,
            priority: task.priority,
            preferred_windows: preferred_windows.clone(),
            fixed_start: None,
        })
        .collect()
}

/// Fold segment identities back to their owning tasks.
///
/// Assignments keep their order and minute fields; the unscheduled set
/// becomes the sorted, deduplicated set of root ids. Idempotent.
pub fn remap_result(result: ScheduleResult) -> ScheduleResult {
    let assignments = result
        .assignments
        .into_iter()
        .map(|mut assignment| {
            assignment.id = assignment.id.root();
            assignment
        })
        .collect();

    let unscheduled: BTreeSet<SegmentId> =
        result.unscheduled.into_iter().map(|id| id.root()).collect();

    ScheduleResult {
        assignments,
        unscheduled: unscheduled.into_iter().collect(),
        objective_value: result.objective_value,
    }
}

#[cfg(test)]
#[path = "segment_tests.rs"]
mod tests;
