// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! In-memory repository
//!
//! Entities live in insertion-ordered vectors behind one `RwLock`; listings
//! apply the contract's ordering on the way out. Snapshots are append-only
//! and the latest per module wins by `created_at`, breaking ties toward the
//! later insertion so two runs within one clock tick stay deterministic.

use std::sync::{Arc, RwLock};

use tempo_core::clock::{Clock, SystemClock};
use tempo_core::id::{IdGen, UuidIdGen};
use tempo_core::meeting::{Meeting, MeetingId};
use tempo_core::repo::{NewMeeting, NewSnapshot, NewTask, Repository, StoreError};
use tempo_core::snapshot::{PlanSnapshot, SchedulerModule, SnapshotId};
use tempo_core::task::{Task, TaskId};

#[derive(Default)]
struct StoreInner {
    tasks: Vec<Task>,
    meetings: Vec<Meeting>,
    snapshots: Vec<PlanSnapshot>,
}

/// Thread-safe in-memory store
pub struct MemoryStore {
    inner: RwLock<StoreInner>,
    clock: Arc<dyn Clock>,
    idgen: Arc<dyn IdGen>,
}

impl MemoryStore {
    /// Store with the system clock and UUID ids.
    pub fn new() -> Self {
        Self::with_parts(Arc::new(SystemClock), Arc::new(UuidIdGen))
    }

    /// Store with injected clock and id generation (tests).
    pub fn with_parts(clock: Arc<dyn Clock>, idgen: Arc<dyn IdGen>) -> Self {
        Self {
            inner: RwLock::new(StoreInner::default()),
            clock,
            idgen,
        }
    }

    pub(crate) fn export(&self) -> (Vec<Task>, Vec<Meeting>, Vec<PlanSnapshot>) {
        let inner = self.inner.read().unwrap_or_else(|e| e.into_inner());
        (
            inner.tasks.clone(),
            inner.meetings.clone(),
            inner.snapshots.clone(),
        )
    }

    pub(crate) fn import(
        &self,
        tasks: Vec<Task>,
        meetings: Vec<Meeting>,
        snapshots: Vec<PlanSnapshot>,
    ) {
        let mut inner = self.inner.write().unwrap_or_else(|e| e.into_inner());
        inner.tasks = tasks;
        inner.meetings = meetings;
        inner.snapshots = snapshots;
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl Repository for MemoryStore {
    fn list_tasks(&self) -> Result<Vec<Task>, StoreError> {
        let inner = self.inner.read().unwrap_or_else(|e| e.into_inner());
        let mut tasks = inner.tasks.clone();
        tasks.sort_by_key(|task| task.earliest_start);
        Ok(tasks)
    }

    fn get_task(&self, id: &TaskId) -> Result<Option<Task>, StoreError> {
        let inner = self.inner.read().unwrap_or_else(|e| e.into_inner());
        Ok(inner.tasks.iter().find(|task| &task.id == id).cloned())
    }

    fn create_task(&self, new: NewTask) -> Result<Task, StoreError> {
        let task = Task {
            id: TaskId(self.idgen.next("task")),
            title: new.title,
            description: new.description,
            duration_minutes: new.duration_minutes,
            earliest_start: new.earliest_start,
            due: new.due,
            priority: new.priority,
            preferred_windows: new.preferred_windows,
        };
        task.validate().map_err(|reason| StoreError::Invalid {
            entity: "task",
            reason: reason.to_string(),
        })?;

        let mut inner = self.inner.write().unwrap_or_else(|e| e.into_inner());
        inner.tasks.push(task.clone());
        Ok(task)
    }

    fn delete_task(&self, id: &TaskId) -> Result<bool, StoreError> {
        let mut inner = self.inner.write().unwrap_or_else(|e| e.into_inner());
        let before = inner.tasks.len();
        inner.tasks.retain(|task| &task.id != id);
        Ok(inner.tasks.len() < before)
    }

    fn list_meetings(&self) -> Result<Vec<Meeting>, StoreError> {
        let inner = self.inner.read().unwrap_or_else(|e| e.into_inner());
        let mut meetings = inner.meetings.clone();
        meetings.sort_by_key(|meeting| meeting.start_time);
        Ok(meetings)
    }

    fn get_meeting(&self, id: &MeetingId) -> Result<Option<Meeting>, StoreError> {
        let inner = self.inner.read().unwrap_or_else(|e| e.into_inner());
        Ok(inner
            .meetings
            .iter()
            .find(|meeting| &meeting.id == id)
            .cloned())
    }

    fn create_meeting(&self, new: NewMeeting) -> Result<Meeting, StoreError> {
        let meeting = Meeting {
            id: MeetingId(self.idgen.next("meeting")),
            title: new.title,
            start_time: new.start_time,
            end_time: new.end_time,
            external_id: new.external_id,
            source: new.source,
        };
        meeting.validate().map_err(|reason| StoreError::Invalid {
            entity: "meeting",
            reason: reason.to_string(),
        })?;

        let mut inner = self.inner.write().unwrap_or_else(|e| e.into_inner());
        inner.meetings.push(meeting.clone());
        Ok(meeting)
    }

    fn delete_meeting(&self, id: &MeetingId) -> Result<bool, StoreError> {
        let mut inner = self.inner.write().unwrap_or_else(|e| e.into_inner());
        let before = inner.meetings.len();
        inner.meetings.retain(|meeting| &meeting.id != id);
        Ok(inner.meetings.len() < before)
    }

    fn upsert_external_meeting(&self, new: NewMeeting) -> Result<Meeting, StoreError> {
        let Some(external_id) = new.external_id.clone() else {
            return Err(StoreError::Invalid {
                entity: "meeting",
                reason: "external_id is required for upsert".to_string(),
            });
        };

        let mut inner = self.inner.write().unwrap_or_else(|e| e.into_inner());
        if let Some(existing) = inner
            .meetings
            .iter_mut()
            .find(|meeting| meeting.external_id.as_deref() == Some(external_id.as_str()))
        {
            existing.title = new.title;
            existing.start_time = new.start_time;
            existing.end_time = new.end_time;
            existing.source = new.source;
            return Ok(existing.clone());
        }

        let meeting = Meeting {
            id: MeetingId(self.idgen.next("meeting")),
            title: new.title,
            start_time: new.start_time,
            end_time: new.end_time,
            external_id: Some(external_id),
            source: new.source,
        };
        meeting.validate().map_err(|reason| StoreError::Invalid {
            entity: "meeting",
            reason: reason.to_string(),
        })?;
        inner.meetings.push(meeting.clone());
        Ok(meeting)
    }

    fn latest_snapshot(
        &self,
        module: SchedulerModule,
    ) -> Result<Option<PlanSnapshot>, StoreError> {
        let inner = self.inner.read().unwrap_or_else(|e| e.into_inner());
        let mut latest: Option<&PlanSnapshot> = None;
        for snapshot in inner.snapshots.iter().filter(|s| s.module == module) {
            if latest.map_or(true, |best| snapshot.created_at >= best.created_at) {
                latest = Some(snapshot);
            }
        }
        Ok(latest.cloned())
    }

    fn create_snapshot(&self, new: NewSnapshot) -> Result<PlanSnapshot, StoreError> {
        let snapshot = PlanSnapshot {
            id: SnapshotId(self.idgen.next("snapshot")),
            module: new.module,
            label: new.label,
            assignments: new.assignments,
            metrics: new.metrics,
            created_at: self.clock.now(),
        };
        let mut inner = self.inner.write().unwrap_or_else(|e| e.into_inner());
        inner.snapshots.push(snapshot.clone());
        Ok(snapshot)
    }
}

#[cfg(test)]
#[path = "memory_tests.rs"]
mod tests;
