// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! HTTP routes and wire schemas
//!
//! Scheduler runs answer 202 with the full run report; a run against an
//! unavailable module answers 503. Entity CRUD is thin: validation failures
//! map to 422, unknown ids to 404.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{error, warn};

use tempo_core::meeting::{Meeting, MeetingId};
use tempo_core::repo::{NewMeeting, NewTask, Repository, StoreError};
use tempo_core::schedule::ScheduleResult;
use tempo_core::snapshot::{SchedulerModule, SchedulingMetrics};
use tempo_core::task::{Task, TaskId};
use tempo_core::Settings;
use tempo_engine::{SchedulingService, ServiceError};
use tempo_storage::MemoryStore;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<MemoryStore>,
    pub service: Arc<SchedulingService>,
    pub settings: Arc<Settings>,
    pub state_file: Option<Arc<PathBuf>>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/api/v1/tasks", post(create_task).get(list_tasks))
        .route("/api/v1/tasks/:id", get(get_task).delete(delete_task))
        .route("/api/v1/meetings", post(create_meeting).get(list_meetings))
        .route("/api/v1/meetings/:id", get(get_meeting).delete(delete_meeting))
        .route("/api/v1/scheduler/run", post(run_schedule))
        .route("/api/v1/scheduler/run-swo", post(run_swo_schedule))
        .with_state(state)
}

#[derive(Debug, Deserialize)]
pub struct NeighborhoodWindowPayload {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ScheduleRunPayload {
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub neighborhood_window: Option<NeighborhoodWindowPayload>,
}

#[derive(Debug, Serialize)]
pub struct AssignmentBody {
    pub task_id: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub deviation_minutes: i64,
    pub tardiness_minutes: i64,
}

#[derive(Debug, Serialize)]
pub struct ScheduleRunResponse {
    pub scheduler: String,
    pub objective_value: Option<i64>,
    pub assignments: Vec<AssignmentBody>,
    pub unscheduled_tasks: Vec<String>,
    pub metrics: BTreeMap<String, i64>,
    pub runtime_ms: f64,
}

impl ScheduleRunResponse {
    fn new(
        module: SchedulerModule,
        result: ScheduleResult,
        metrics: SchedulingMetrics,
        runtime_ms: f64,
    ) -> Self {
        Self {
            scheduler: module.to_string(),
            objective_value: result.objective_value,
            assignments: result
                .assignments
                .into_iter()
                .map(|a| AssignmentBody {
                    task_id: a.id.to_string(),
                    start: a.start,
                    end: a.end,
                    deviation_minutes: a.deviation_minutes,
                    tardiness_minutes: a.tardiness_minutes,
                })
                .collect(),
            unscheduled_tasks: result.unscheduled.iter().map(|id| id.to_string()).collect(),
            metrics: metrics.to_map(),
            runtime_ms,
        }
    }
}

type ApiError = (StatusCode, String);

async fn run_schedule(
    State(state): State<AppState>,
    payload: Option<Json<ScheduleRunPayload>>,
) -> Result<(StatusCode, Json<ScheduleRunResponse>), ApiError> {
    if state.settings.scheduler_module != SchedulerModule::CpLns {
        return Err((
            StatusCode::SERVICE_UNAVAILABLE,
            "requested scheduler module is not available".to_string(),
        ));
    }

    let Json(payload) = payload.unwrap_or_default();
    let window = payload
        .neighborhood_window
        .map(|window| (window.start, window.end));

    let started = Instant::now();
    let (result, metrics) = state
        .service
        .run_cp(state.store.as_ref(), payload.label.as_deref(), window)
        .map_err(service_error)?;
    let runtime_ms = started.elapsed().as_secs_f64() * 1000.0;
    persist(&state);

    Ok((
        StatusCode::ACCEPTED,
        Json(ScheduleRunResponse::new(
            SchedulerModule::CpLns,
            result,
            metrics,
            runtime_ms,
        )),
    ))
}

async fn run_swo_schedule(
    State(state): State<AppState>,
    payload: Option<Json<ScheduleRunPayload>>,
) -> Result<(StatusCode, Json<ScheduleRunResponse>), ApiError> {
    let Json(payload) = payload.unwrap_or_default();

    let started = Instant::now();
    let (result, metrics) = state
        .service
        .run_swo(state.store.as_ref(), payload.label.as_deref())
        .map_err(service_error)?;
    let runtime_ms = started.elapsed().as_secs_f64() * 1000.0;
    persist(&state);

    Ok((
        StatusCode::ACCEPTED,
        Json(ScheduleRunResponse::new(
            SchedulerModule::Swo,
            result,
            metrics,
            runtime_ms,
        )),
    ))
}

async fn create_task(
    State(state): State<AppState>,
    Json(payload): Json<NewTask>,
) -> Result<(StatusCode, Json<Task>), ApiError> {
    let task = state.store.create_task(payload).map_err(store_error)?;
    persist(&state);
    Ok((StatusCode::CREATED, Json(task)))
}

async fn list_tasks(State(state): State<AppState>) -> Result<Json<Vec<Task>>, ApiError> {
    state.store.list_tasks().map(Json).map_err(store_error)
}

async fn get_task(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Task>, ApiError> {
    state
        .store
        .get_task(&TaskId(id))
        .map_err(store_error)?
        .map(Json)
        .ok_or((StatusCode::NOT_FOUND, "task not found".to_string()))
}

async fn delete_task(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let removed = state
        .store
        .delete_task(&TaskId(id))
        .map_err(store_error)?;
    if !removed {
        return Err((StatusCode::NOT_FOUND, "task not found".to_string()));
    }
    persist(&state);
    Ok(StatusCode::NO_CONTENT)
}

async fn create_meeting(
    State(state): State<AppState>,
    Json(payload): Json<NewMeeting>,
) -> Result<(StatusCode, Json<Meeting>), ApiError> {
    let meeting = state.store.create_meeting(payload).map_err(store_error)?;
    persist(&state);
    Ok((StatusCode::CREATED, Json(meeting)))
}

async fn list_meetings(State(state): State<AppState>) -> Result<Json<Vec<Meeting>>, ApiError> {
    state.store.list_meetings().map(Json).map_err(store_error)
}

async fn get_meeting(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Meeting>, ApiError> {
    state
        .store
        .get_meeting(&MeetingId(id))
        .map_err(store_error)?
        .map(Json)
        .ok_or((StatusCode::NOT_FOUND, "meeting not found".to_string()))
}

async fn delete_meeting(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let removed = state
        .store
        .delete_meeting(&MeetingId(id))
        .map_err(store_error)?;
    if !removed {
        return Err((StatusCode::NOT_FOUND, "meeting not found".to_string()));
    }
    persist(&state);
    Ok(StatusCode::NO_CONTENT)
}

/// Flush the store to disk when a state file is configured.
fn persist(state: &AppState) {
    if let Some(path) = &state.state_file {
        if let Err(err) = tempo_storage::file::save_store(&state.store, path) {
            warn!(path = %path.display(), %err, "failed to persist store");
        }
    }
}

fn service_error(err: ServiceError) -> ApiError {
    match err {
        ServiceError::SwoNotConfigured => (StatusCode::SERVICE_UNAVAILABLE, err.to_string()),
        ServiceError::Store(inner) => {
            error!(%inner, "scheduling run failed on storage");
            (StatusCode::INTERNAL_SERVER_ERROR, inner.to_string())
        }
    }
}

fn store_error(err: StoreError) -> ApiError {
    match err {
        StoreError::Invalid { .. } => (StatusCode::UNPROCESSABLE_ENTITY, err.to_string()),
        other => {
            error!(%other, "storage failure");
            (StatusCode::INTERNAL_SERVER_ERROR, other.to_string())
        }
    }
}

#[cfg(test)]
#[path = "routes_tests.rs"]
mod tests;
