// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Task entity
//!
//! A task is a duration-bearing work item to be placed on the calendar.
//! Tasks are CRUD-owned by the outer layers; the scheduling core only reads
//! them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Unique identifier for a task
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TaskId(pub String);

impl std::fmt::Display for TaskId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for TaskId {
    fn from(s: String) -> Self {
        TaskId(s)
    }
}

impl From<&str> for TaskId {
    fn from(s: &str) -> Self {
        TaskId(s.to_string())
    }
}

/// A preferred time window as stored: raw instant strings plus an optional
/// weight. Parsed lazily by [`crate::window::parse_preferred_windows`] so a
/// malformed entry degrades one task instead of failing a whole run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindowSpec {
    pub start: String,
    pub end: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
}

/// A flexible work item that needs to be scheduled
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub duration_minutes: u32,
    pub earliest_start: DateTime<Utc>,
    pub due: DateTime<Utc>,
    pub priority: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preferred_windows: Option<Vec<WindowSpec>>,
}

/// Validation failures for task fields
#[derive(Debug, Error, PartialEq, Eq)]
pub enum InvalidTask {
    #[error("title must not be empty")]
    EmptyTitle,
    #[error("duration_minutes must be positive")]
    ZeroDuration,
    #[error("earliest_start must precede due")]
    WindowInverted,
    #[error("priority must be within 1..=10, got {0}")]
    PriorityOutOfRange(u8),
}

impl Task {
    /// Check the field-level invariants the data layer guarantees.
    ///
    /// Note `due - earliest_start >= duration_minutes` is deliberately not
    /// checked: such a task is accepted and surfaces as unscheduled.
    pub fn validate(&self) -> Result<(), InvalidTask> {
        if self.title.trim().is_empty() {
            return Err(InvalidTask::EmptyTitle);
        }
        if self.duration_minutes == 0 {
            return Err(InvalidTask::ZeroDuration);
        }
        if self.earliest_start >= self.due {
            return Err(InvalidTask::WindowInverted);
        }
        if !(1..=10).contains(&self.priority) {
            return Err(InvalidTask::PriorityOutOfRange(self.priority));
        }
        Ok(())
    }
}
