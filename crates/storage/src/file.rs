// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! JSON persistence for the in-memory store
//!
//! The whole store serializes to one document. Saves go through a sibling
//! temp file and an atomic rename so a crash mid-write never truncates the
//! previous state.

use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;

use tempo_core::clock::Clock;
use tempo_core::id::IdGen;
use tempo_core::meeting::Meeting;
use tempo_core::repo::StoreError;
use tempo_core::snapshot::PlanSnapshot;
use tempo_core::task::Task;

use crate::memory::MemoryStore;

#[derive(Debug, Serialize, Deserialize)]
struct StoreDocument {
    tasks: Vec<Task>,
    meetings: Vec<Meeting>,
    snapshots: Vec<PlanSnapshot>,
}

/// Load a store from `path`, or start empty when the file does not exist.
pub fn load_store(
    path: &Path,
    clock: Arc<dyn Clock>,
    idgen: Arc<dyn IdGen>,
) -> Result<MemoryStore, StoreError> {
    let store = MemoryStore::with_parts(clock, idgen);
    if !path.exists() {
        return Ok(store);
    }

    let bytes = std::fs::read(path)?;
    let document: StoreDocument = serde_json::from_slice(&bytes)?;
    info!(
        path = %path.display(),
        tasks = document.tasks.len(),
        meetings = document.meetings.len(),
        snapshots = document.snapshots.len(),
        "loaded store"
    );
    store.import(document.tasks, document.meetings, document.snapshots);
    Ok(store)
}

/// Write the store contents to `path`.
pub fn save_store(store: &MemoryStore, path: &Path) -> Result<(), StoreError> {
    let (tasks, meetings, snapshots) = store.export();
    let document = StoreDocument {
        tasks,
        meetings,
        snapshots,
    };
    let bytes = serde_json::to_vec_pretty(&document)?;

    let tmp = path.with_extension("tmp");
    std::fs::write(&tmp, bytes)?;
    std::fs::rename(&tmp, path)?;
    Ok(())
}

#[cfg(test)]
#[path = "file_tests.rs"]
mod tests;
