// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use chrono::{Duration, TimeZone, Utc};
use tempo_core::clock::FakeClock;
use tempo_core::id::SequentialIdGen;
use tempo_core::repo::{NewTask, Repository};

fn parts() -> (Arc<dyn Clock>, Arc<dyn IdGen>) {
    let clock = FakeClock::starting_at(Utc.with_ymd_and_hms(2025, 1, 6, 8, 0, 0).unwrap());
    (Arc::new(clock), Arc::new(SequentialIdGen::new()))
}

#[test]
fn missing_file_yields_an_empty_store() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("state.json");
    let (clock, idgen) = parts();

    let store = load_store(&path, clock, idgen).unwrap();
    assert!(store.list_tasks().unwrap().is_empty());
}

#[test]
fn save_and_load_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("state.json");

    let (clock, idgen) = parts();
    let store = MemoryStore::with_parts(clock, idgen);
    let earliest = Utc.with_ymd_and_hms(2025, 1, 6, 9, 0, 0).unwrap();
    let task = store
        .create_task(NewTask {
            title: "persisted".to_string(),
            description: Some("survives restarts".to_string()),
            duration_minutes: 90,
            earliest_start: earliest,
            due: earliest + Duration::hours(8),
            priority: 7,
            preferred_windows: None,
        })
        .unwrap();

    save_store(&store, &path).unwrap();

    let (clock, idgen) = parts();
    let reloaded = load_store(&path, clock, idgen).unwrap();
    let tasks = reloaded.list_tasks().unwrap();
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0], task);
}

#[test]
fn corrupt_file_is_a_serde_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("state.json");
    std::fs::write(&path, b"not json").unwrap();

    let (clock, idgen) = parts();
    assert!(matches!(
        load_store(&path, clock, idgen),
        Err(StoreError::Serde(_))
    ));
}

#[test]
fn save_replaces_rather_than_appends() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("state.json");

    let (clock, idgen) = parts();
    let store = MemoryStore::with_parts(clock, idgen);
    save_store(&store, &path).unwrap();
    save_store(&store, &path).unwrap();

    let (clock, idgen) = parts();
    let reloaded = load_store(&path, clock, idgen).unwrap();
    assert!(reloaded.list_tasks().unwrap().is_empty());
}
