// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Preferred-window parsing
//!
//! Windows are stored as raw instant strings. A malformed entry drops that
//! task's windows entirely (with a warning) rather than failing the run;
//! scheduling proceeds without them.

use chrono::{DateTime, NaiveDateTime, Utc};
use tracing::warn;

use crate::task::Task;

/// Parse a task's stored preferred windows into UTC instant pairs.
///
/// Returns `None` when the task has no windows or any entry fails to parse.
pub fn parse_preferred_windows(task: &Task) -> Option<Vec<(DateTime<Utc>, DateTime<Utc>)>> {
    let specs = task.preferred_windows.as_ref()?;
    let mut windows = Vec::with_capacity(specs.len());
    for spec in specs {
        match (parse_instant(&spec.start), parse_instant(&spec.end)) {
            (Some(start), Some(end)) => windows.push((start, end)),
            _ => {
                warn!(
                    task_id = %task.id,
                    start = %spec.start,
                    end = %spec.end,
                    "dropping malformed preferred windows"
                );
                return None;
            }
        }
    }
    Some(windows)
}

/// Accepts RFC 3339 instants; naive instants are taken as UTC.
fn parse_instant(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(t) = DateTime::parse_from_rfc3339(raw) {
        return Some(t.with_timezone(&Utc));
    }
    raw.parse::<NaiveDateTime>().ok().map(|t| t.and_utc())
}

#[cfg(test)]
#[path = "window_tests.rs"]
mod tests;
