// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Meeting entity
//!
//! A fixed calendar event blocking time on the resource. Meetings imported
//! from an external calendar carry an `external_id` and a `source` tag so
//! re-syncs update in place instead of duplicating.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Unique identifier for a meeting
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct MeetingId(pub String);

impl std::fmt::Display for MeetingId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for MeetingId {
    fn from(s: String) -> Self {
        MeetingId(s)
    }
}

impl From<&str> for MeetingId {
    fn from(s: &str) -> Self {
        MeetingId(s.to_string())
    }
}

/// A fixed calendar event, immutable from the scheduler's point of view
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Meeting {
    pub id: MeetingId,
    pub title: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum InvalidMeeting {
    #[error("title must not be empty")]
    EmptyTitle,
    #[error("start_time must precede end_time")]
    WindowInverted,
}

impl Meeting {
    pub fn validate(&self) -> Result<(), InvalidMeeting> {
        if self.title.trim().is_empty() {
            return Err(InvalidMeeting::EmptyTitle);
        }
        if self.start_time >= self.end_time {
            return Err(InvalidMeeting::WindowInverted);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn inverted_meeting_rejected() {
        let at = Utc.with_ymd_and_hms(2025, 1, 6, 10, 0, 0).unwrap();
        let meeting = Meeting {
            id: MeetingId::from("meeting-1"),
            title: "Team sync".to_string(),
            start_time: at,
            end_time: at,
            external_id: None,
            source: None,
        };
        assert_eq!(meeting.validate(), Err(InvalidMeeting::WindowInverted));
    }
}
