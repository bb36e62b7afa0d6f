// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Solver-level request and result types
//!
//! These are the types the schedulers consume and produce. Tasks arrive here
//! already fanned out into segments (see [`crate::segment`]); each segment is
//! addressed by a [`SegmentId`] tag so folding back to the owning task is a
//! pure function over the tag.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::task::TaskId;

/// Tagged identifier for one segment of a task
///
/// Index 0 is the first segment and renders as the bare task id; segment
/// `k >= 1` renders as `"{task}::seg{k+1}"`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SegmentId {
    pub task: TaskId,
    pub index: u32,
}

impl SegmentId {
    pub fn new(task: impl Into<TaskId>, index: u32) -> Self {
        Self {
            task: task.into(),
            index,
        }
    }

    /// The identity of the owning task, as a segment tag.
    ///
    /// Idempotent: `id.root().root() == id.root()`.
    pub fn root(&self) -> SegmentId {
        SegmentId {
            task: self.task.clone(),
            index: 0,
        }
    }

    pub fn is_root(&self) -> bool {
        self.index == 0
    }
}

impl fmt::Display for SegmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.index == 0 {
            write!(f, "{}", self.task)
        } else {
            write!(f, "{}::seg{}", self.task, self.index + 1)
        }
    }
}

/// One solver input interval
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleTask {
    pub id: SegmentId,
    pub duration_minutes: u32,
    pub earliest_start: DateTime<Utc>,
    pub due: DateTime<Utc>,
    pub priority: u8,
    /// Carried through for future objective terms; not consumed yet.
    pub preferred_windows: Option<Vec<(DateTime<Utc>, DateTime<Utc>)>>,
    /// Pins the segment at exactly this start.
    pub fixed_start: Option<DateTime<Utc>>,
}

/// A fixed busy interval the solver must schedule around
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleMeeting {
    pub id: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

/// Prior plan starts, threaded per segment and ordered by the segment tag
pub type PreviousAssignments = BTreeMap<SegmentId, (DateTime<Utc>, DateTime<Utc>)>;

/// Everything one scheduling invocation needs
#[derive(Debug, Clone, Default)]
pub struct ScheduleRequest {
    pub tasks: Vec<ScheduleTask>,
    pub meetings: Vec<ScheduleMeeting>,
    pub previous_assignments: PreviousAssignments,
    pub neighborhood_window: Option<(DateTime<Utc>, DateTime<Utc>)>,
}

/// One placed segment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssignedTask {
    pub id: SegmentId,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub deviation_minutes: i64,
    pub tardiness_minutes: i64,
}

/// Scheduler output: assignments ordered by start, unscheduled ids
/// deduplicated, objective populated when the solver proved optimality
/// (CP) or as the best observed cost (SWO).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScheduleResult {
    pub assignments: Vec<AssignedTask>,
    pub unscheduled: Vec<SegmentId>,
    pub objective_value: Option<i64>,
}

impl ScheduleResult {
    /// The result for an empty request.
    pub fn empty() -> Self {
        Self {
            assignments: Vec::new(),
            unscheduled: Vec::new(),
            objective_value: Some(0),
        }
    }
}

/// The common scheduler contract
///
/// Implementations are stateless and re-entrant; each invocation owns its
/// request.
pub trait Scheduler: Send + Sync {
    fn schedule(&self, request: &ScheduleRequest) -> ScheduleResult;
}

#[cfg(test)]
#[path = "schedule_tests.rs"]
mod tests;
