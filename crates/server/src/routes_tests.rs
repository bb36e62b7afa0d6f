// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use chrono::TimeZone;
use tempo_core::clock::FakeClock;
use tempo_core::id::SequentialIdGen;
use tempo_engine::{
    CpConfig, CpLnsScheduler, SchedulerRouter, SwoConfig, SwoScheduler,
};

fn ts(hour: u32, minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 1, 6, hour, minute, 0).unwrap()
}

fn make_state(settings: Settings, with_swo: bool, state_file: Option<PathBuf>) -> AppState {
    let clock = FakeClock::starting_at(ts(8, 0));
    let store = MemoryStore::with_parts(
        Arc::new(clock),
        Arc::new(SequentialIdGen::new()),
    );
    let cp = CpLnsScheduler::new(CpConfig {
        solver_time_limit: std::time::Duration::from_secs(5),
        ..CpConfig::from_settings(&settings)
    })
    .unwrap();
    let swo = with_swo.then(|| SwoScheduler::new(SwoConfig::from_settings(&settings)).unwrap());
    AppState {
        store: Arc::new(store),
        service: Arc::new(SchedulingService::new(SchedulerRouter::new(cp, swo))),
        settings: Arc::new(settings),
        state_file: state_file.map(Arc::new),
    }
}

fn task_payload(title: &str, duration: u32, due_hour: u32, priority: u8) -> NewTask {
    NewTask {
        title: title.to_string(),
        description: None,
        duration_minutes: duration,
        earliest_start: ts(9, 0),
        due: ts(due_hour, 0),
        priority,
        preferred_windows: None,
    }
}

#[tokio::test]
async fn run_endpoint_schedules_seeded_entities() {
    let state = make_state(Settings::default(), true, None);

    create_task(State(state.clone()), Json(task_payload("Deep work", 120, 17, 5)))
        .await
        .unwrap();
    create_task(State(state.clone()), Json(task_payload("Slides", 60, 12, 8)))
        .await
        .unwrap();
    create_meeting(
        State(state.clone()),
        Json(NewMeeting {
            title: "Team sync".to_string(),
            start_time: ts(10, 0),
            end_time: ts(11, 0),
            external_id: None,
            source: None,
        }),
    )
    .await
    .unwrap();

    let (status, Json(body)) = run_schedule(State(state.clone()), None).await.unwrap();

    assert_eq!(status, StatusCode::ACCEPTED);
    assert_eq!(body.scheduler, "CP_LNS");
    assert!(body.unscheduled_tasks.is_empty());
    assert_eq!(body.assignments.len(), 2);
    assert_eq!(body.metrics["scheduled_count"], 2);
    assert!(body.runtime_ms >= 0.0);
    assert!(body.objective_value.is_some());
}

#[tokio::test]
async fn run_endpoint_rejects_non_cp_module() {
    let settings = Settings {
        scheduler_module: SchedulerModule::Swo,
        ..Settings::default()
    };
    let state = make_state(settings, true, None);

    let err = run_schedule(State(state), None).await.unwrap_err();
    assert_eq!(err.0, StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn run_swo_endpoint_without_swo_is_503() {
    let state = make_state(Settings::default(), false, None);

    let err = run_swo_schedule(State(state), None).await.unwrap_err();
    assert_eq!(err.0, StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn run_swo_endpoint_reports_the_swo_module() {
    let state = make_state(Settings::default(), true, None);
    create_task(State(state.clone()), Json(task_payload("Work", 60, 17, 5)))
        .await
        .unwrap();

    let (status, Json(body)) = run_swo_schedule(State(state), None).await.unwrap();
    assert_eq!(status, StatusCode::ACCEPTED);
    assert_eq!(body.scheduler, "SWO");
    assert_eq!(body.assignments.len(), 1);
}

#[tokio::test]
async fn invalid_task_payload_is_unprocessable() {
    let state = make_state(Settings::default(), true, None);

    let err = create_task(
        State(state),
        Json(task_payload("Bad", 0, 17, 5)),
    )
    .await
    .unwrap_err();
    assert_eq!(err.0, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn delete_unknown_task_is_404() {
    let state = make_state(Settings::default(), true, None);

    let err = delete_task(State(state), Path("missing".to_string()))
        .await
        .unwrap_err();
    assert_eq!(err.0, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn task_crud_round_trip() {
    let state = make_state(Settings::default(), true, None);

    let (status, Json(task)) =
        create_task(State(state.clone()), Json(task_payload("Keep", 60, 17, 5)))
            .await
            .unwrap();
    assert_eq!(status, StatusCode::CREATED);

    let Json(tasks) = list_tasks(State(state.clone())).await.unwrap();
    assert_eq!(tasks.len(), 1);

    let Json(fetched) = get_task(State(state.clone()), Path(task.id.to_string()))
        .await
        .unwrap();
    assert_eq!(fetched, task);

    let status = delete_task(State(state.clone()), Path(task.id.to_string()))
        .await
        .unwrap();
    assert_eq!(status, StatusCode::NO_CONTENT);

    let Json(tasks) = list_tasks(State(state)).await.unwrap();
    assert!(tasks.is_empty());
}

#[tokio::test]
async fn runs_persist_state_to_the_configured_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("state.json");
    let state = make_state(Settings::default(), true, Some(path.clone()));

    create_task(State(state.clone()), Json(task_payload("Durable", 60, 17, 5)))
        .await
        .unwrap();
    run_schedule(State(state), None).await.unwrap();

    let reloaded = tempo_storage::file::load_store(
        &path,
        Arc::new(FakeClock::starting_at(ts(8, 0))),
        Arc::new(SequentialIdGen::new()),
    )
    .unwrap();
    assert_eq!(reloaded.list_tasks().unwrap().len(), 1);
    assert!(reloaded
        .latest_snapshot(SchedulerModule::CpLns)
        .unwrap()
        .is_some());
}
