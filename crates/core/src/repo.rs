// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Repository contract
//!
//! The scheduling core reads tasks, meetings, and the previous plan through
//! this trait and writes exactly one snapshot per run. Implementations own
//! ordering: task listings come back by `earliest_start`, meeting listings by
//! `start_time`, and the latest snapshot per module wins by `created_at`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::meeting::{Meeting, MeetingId};
use crate::snapshot::{PlanSnapshot, SchedulerModule, SchedulingMetrics, StoredAssignment};
use crate::task::{Task, TaskId, WindowSpec};

/// Storage failures
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("invalid {entity}: {reason}")]
    Invalid {
        entity: &'static str,
        reason: String,
    },
    #[error("storage io: {0}")]
    Io(#[from] std::io::Error),
    #[error("storage encoding: {0}")]
    Serde(#[from] serde_json::Error),
}

/// Fields for a task to be created; the store mints the id
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewTask {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub duration_minutes: u32,
    pub earliest_start: DateTime<Utc>,
    pub due: DateTime<Utc>,
    pub priority: u8,
    #[serde(default)]
    pub preferred_windows: Option<Vec<WindowSpec>>,
}

/// Fields for a meeting to be created
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewMeeting {
    pub title: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    #[serde(default)]
    pub external_id: Option<String>,
    #[serde(default)]
    pub source: Option<String>,
}

/// Fields for a snapshot to be persisted; the store stamps id and created_at
#[derive(Debug, Clone)]
pub struct NewSnapshot {
    pub module: SchedulerModule,
    pub label: Option<String>,
    pub assignments: Vec<StoredAssignment>,
    pub metrics: SchedulingMetrics,
}

/// The persistence seam the scheduling service runs against
pub trait Repository: Send + Sync {
    /// All tasks, ordered by `earliest_start`.
    fn list_tasks(&self) -> Result<Vec<Task>, StoreError>;
    fn get_task(&self, id: &TaskId) -> Result<Option<Task>, StoreError>;
    fn create_task(&self, new: NewTask) -> Result<Task, StoreError>;
    /// Returns whether a task was actually removed.
    fn delete_task(&self, id: &TaskId) -> Result<bool, StoreError>;

    /// All meetings, ordered by `start_time`.
    fn list_meetings(&self) -> Result<Vec<Meeting>, StoreError>;
    fn get_meeting(&self, id: &MeetingId) -> Result<Option<Meeting>, StoreError>;
    fn create_meeting(&self, new: NewMeeting) -> Result<Meeting, StoreError>;
    fn delete_meeting(&self, id: &MeetingId) -> Result<bool, StoreError>;
    /// Create or update a meeting matched by `external_id` (calendar sync).
    fn upsert_external_meeting(&self, new: NewMeeting) -> Result<Meeting, StoreError>;

    /// The most recent snapshot for a module, by `created_at`.
    fn latest_snapshot(&self, module: SchedulerModule)
        -> Result<Option<PlanSnapshot>, StoreError>;
    fn create_snapshot(&self, new: NewSnapshot) -> Result<PlanSnapshot, StoreError>;
}
