// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Identifier minting
//!
//! The store mints ids for three entity kinds (tasks, meetings, snapshots).
//! Production uses opaque UUIDs; tests get readable per-kind sequences like
//! `task-1`, `task-2`, `snapshot-1`. Object safe so stores hold
//! `Arc<dyn IdGen>`.

use std::collections::HashMap;
use std::sync::Mutex;

/// Mints unique identifiers per entity kind
pub trait IdGen: Send + Sync {
    fn next(&self, kind: &str) -> String;
}

/// UUID-based generator for production use; the kind is not encoded
#[derive(Clone, Default)]
pub struct UuidIdGen;

impl IdGen for UuidIdGen {
    fn next(&self, _kind: &str) -> String {
        uuid::Uuid::new_v4().to_string()
    }
}

/// Kind-prefixed sequential generator for tests
#[derive(Default)]
pub struct SequentialIdGen {
    counters: Mutex<HashMap<String, u64>>,
}

impl SequentialIdGen {
    pub fn new() -> Self {
        Self::default()
    }
}

impl IdGen for SequentialIdGen {
    fn next(&self, kind: &str) -> String {
        let mut counters = self.counters.lock().unwrap_or_else(|e| e.into_inner());
        let counter = counters.entry(kind.to_string()).or_insert(0);
        *counter += 1;
        format!("{}-{}", kind, counter)
    }
}
