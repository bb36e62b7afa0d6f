// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Plan snapshots
//!
//! A snapshot records one scheduler run: the module that produced it, its
//! per-task assignments, and run metrics. Snapshots are append-only; the most
//! recent snapshot per module is the "previous plan" the next run reconciles
//! against.

use std::collections::BTreeMap;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::schedule::ScheduleResult;
use crate::task::TaskId;

/// Which scheduling engine produced a plan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SchedulerModule {
    #[serde(rename = "CP_LNS")]
    CpLns,
    #[serde(rename = "SWO")]
    Swo,
}

impl std::fmt::Display for SchedulerModule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SchedulerModule::CpLns => write!(f, "CP_LNS"),
            SchedulerModule::Swo => write!(f, "SWO"),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown scheduler module: {0}")]
pub struct UnknownModule(pub String);

impl FromStr for SchedulerModule {
    type Err = UnknownModule;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "CP_LNS" => Ok(SchedulerModule::CpLns),
            "SWO" => Ok(SchedulerModule::Swo),
            other => Err(UnknownModule(other.to_string())),
        }
    }
}

/// Unique identifier for a plan snapshot
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SnapshotId(pub String);

impl std::fmt::Display for SnapshotId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One persisted assignment, keyed by the owning task row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredAssignment {
    pub task_id: TaskId,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub deviation_minutes: i64,
    pub tardiness_minutes: i64,
}

/// Aggregate metrics of one scheduler run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchedulingMetrics {
    pub scheduled_count: usize,
    pub unscheduled_count: usize,
    pub total_deviation_minutes: i64,
    pub total_tardiness_minutes: i64,
}

impl SchedulingMetrics {
    pub fn from_result(result: &ScheduleResult) -> Self {
        Self {
            scheduled_count: result.assignments.len(),
            unscheduled_count: result.unscheduled.len(),
            total_deviation_minutes: result.assignments.iter().map(|a| a.deviation_minutes).sum(),
            total_tardiness_minutes: result.assignments.iter().map(|a| a.tardiness_minutes).sum(),
        }
    }

    /// Flatten into the key/value shape the HTTP layer and snapshot rows use.
    pub fn to_map(&self) -> BTreeMap<String, i64> {
        BTreeMap::from([
            ("scheduled_count".to_string(), self.scheduled_count as i64),
            ("unscheduled_count".to_string(), self.unscheduled_count as i64),
            (
                "total_deviation_minutes".to_string(),
                self.total_deviation_minutes,
            ),
            (
                "total_tardiness_minutes".to_string(),
                self.total_tardiness_minutes,
            ),
        ])
    }
}

/// An immutable record of one scheduler run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanSnapshot {
    pub id: SnapshotId,
    pub module: SchedulerModule,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    pub assignments: Vec<StoredAssignment>,
    pub metrics: SchedulingMetrics,
    pub created_at: DateTime<Utc>,
}

impl PlanSnapshot {
    /// Group assignments by task, each list ordered by start.
    pub fn assignments_by_task(&self) -> BTreeMap<TaskId, Vec<(DateTime<Utc>, DateTime<Utc>)>> {
        let mut grouped: BTreeMap<TaskId, Vec<(DateTime<Utc>, DateTime<Utc>)>> = BTreeMap::new();
        for assignment in &self.assignments {
            grouped
                .entry(assignment.task_id.clone())
                .or_default()
                .push((assignment.start, assignment.end));
        }
        for spans in grouped.values_mut() {
            spans.sort_by_key(|(start, _)| *start);
        }
        grouped
    }
}
