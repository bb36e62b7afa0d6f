// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Scheduling service
//!
//! Orchestrates one scheduling run: load entities, fan tasks out into
//! segments threaded with the previous plan, invoke the configured engine,
//! fold the result back to task identities, and persist a snapshot with run
//! metrics. The repository is passed per call so the caller keeps the
//! transaction boundary; the single `create_snapshot` is the only write.

use chrono::{DateTime, Utc};
use tracing::{info, warn};

use tempo_core::repo::{NewSnapshot, Repository};
use tempo_core::schedule::{ScheduleMeeting, ScheduleRequest, ScheduleResult};
use tempo_core::segment::{expand_task, remap_result};
use tempo_core::snapshot::{SchedulerModule, SchedulingMetrics, StoredAssignment};
use tempo_core::window::parse_preferred_windows;

use crate::error::ServiceError;
use crate::router::SchedulerRouter;

/// Coordinates data retrieval, scheduling runs, and snapshot persistence
pub struct SchedulingService {
    router: SchedulerRouter,
}

impl SchedulingService {
    pub fn new(router: SchedulerRouter) -> Self {
        Self { router }
    }

    /// Run the exact optimizer, optionally restricted to a neighborhood.
    pub fn run_cp(
        &self,
        repo: &dyn Repository,
        label: Option<&str>,
        neighborhood_window: Option<(DateTime<Utc>, DateTime<Utc>)>,
    ) -> Result<(ScheduleResult, SchedulingMetrics), ServiceError> {
        self.run_with(repo, SchedulerModule::CpLns, label, neighborhood_window)
    }

    /// Run the squeaky-wheel heuristic.
    pub fn run_swo(
        &self,
        repo: &dyn Repository,
        label: Option<&str>,
    ) -> Result<(ScheduleResult, SchedulingMetrics), ServiceError> {
        self.run_with(repo, SchedulerModule::Swo, label, None)
    }

    fn run_with(
        &self,
        repo: &dyn Repository,
        module: SchedulerModule,
        label: Option<&str>,
        neighborhood_window: Option<(DateTime<Utc>, DateTime<Utc>)>,
    ) -> Result<(ScheduleResult, SchedulingMetrics), ServiceError> {
        let scheduler = self.router.resolve(module)?;

        let tasks = repo.list_tasks()?;
        let meetings = repo.list_meetings()?;
        let previous_by_task = repo
            .latest_snapshot(module)?
            .map(|snapshot| snapshot.assignments_by_task())
            .unwrap_or_default();

        let mut request = ScheduleRequest {
            meetings: meetings
                .iter()
                .map(|meeting| ScheduleMeeting {
                    id: meeting.id.to_string(),
                    start: meeting.start_time,
                    end: meeting.end_time,
                })
                .collect(),
            neighborhood_window,
            ..ScheduleRequest::default()
        };

        for task in &tasks {
            let windows = parse_preferred_windows(task);
            let segments = expand_task(task, windows);
            let prior_spans = previous_by_task.get(&task.id);
            for (index, segment) in segments.iter().enumerate() {
                if let Some(span) = prior_spans.and_then(|spans| spans.get(index)) {
                    request
                        .previous_assignments
                        .insert(segment.id.clone(), *span);
                }
            }
            request.tasks.extend(segments);
        }

        let result = remap_result(scheduler.schedule(&request));
        let metrics = SchedulingMetrics::from_result(&result);

        if metrics.unscheduled_count > 0 {
            warn!(
                module = %module,
                unscheduled = metrics.unscheduled_count,
                "scheduling run left tasks unscheduled"
            );
        }
        info!(
            module = %module,
            scheduled = metrics.scheduled_count,
            unscheduled = metrics.unscheduled_count,
            objective = ?result.objective_value,
            "scheduling run complete"
        );

        let assignments = result
            .assignments
            .iter()
            .map(|assignment| StoredAssignment {
                task_id: assignment.id.task.clone(),
                start: assignment.start,
                end: assignment.end,
                deviation_minutes: assignment.deviation_minutes,
                tardiness_minutes: assignment.tardiness_minutes,
            })
            .collect();
        repo.create_snapshot(NewSnapshot {
            module,
            label: label.map(str::to_string),
            assignments,
            metrics,
        })?;

        Ok((result, metrics))
    }
}

#[cfg(test)]
#[path = "service_tests.rs"]
mod tests;
