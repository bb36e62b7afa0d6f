// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Slot-grid time arithmetic
//!
//! Both schedulers discretize wall-clock time into a zero-based grid of
//! fixed-width slots. The grid base is the earliest instant of the request,
//! seconds zeroed and rounded down to the granularity boundary, so slot 0
//! starts at or before every input instant. Conversions use Euclidean
//! division: instants before the base floor toward negative slots instead of
//! rounding toward zero.

use chrono::{DateTime, Duration, Timelike, Utc};

use crate::schedule::{ScheduleMeeting, ScheduleTask};

/// Fixed slack appended past the last deadline, in slots.
const HORIZON_SLACK_SLOTS: i64 = 10;

/// Bijective map between instants and integer slots of fixed granularity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeGrid {
    base: DateTime<Utc>,
    granularity_minutes: i64,
}

impl TimeGrid {
    pub fn new(base: DateTime<Utc>, granularity_minutes: u32) -> Self {
        debug_assert!(granularity_minutes > 0);
        Self {
            base,
            granularity_minutes: i64::from(granularity_minutes.max(1)),
        }
    }

    /// Grid anchored at `earliest` with seconds zeroed and the minute rounded
    /// down to the granularity boundary.
    pub fn aligned(earliest: DateTime<Utc>, granularity_minutes: u32) -> Self {
        let mut base = earliest
            - Duration::seconds(i64::from(earliest.second()))
            - Duration::nanoseconds(i64::from(earliest.nanosecond()));
        let offset = i64::from(base.minute()) % i64::from(granularity_minutes.max(1));
        if offset != 0 {
            base -= Duration::minutes(offset);
        }
        Self::new(base, granularity_minutes)
    }

    pub fn base(&self) -> DateTime<Utc> {
        self.base
    }

    pub fn granularity_minutes(&self) -> i64 {
        self.granularity_minutes
    }

    /// Slot containing `t` (floor).
    pub fn to_slot(&self, t: DateTime<Utc>) -> i64 {
        let seconds = (t - self.base).num_seconds();
        seconds.div_euclid(self.granularity_minutes * 60)
    }

    /// First slot boundary at or after `t` (ceiling).
    pub fn to_slot_ceiling(&self, t: DateTime<Utc>) -> i64 {
        let seconds = (t - self.base).num_seconds();
        let width = self.granularity_minutes * 60;
        let floor = seconds.div_euclid(width);
        if seconds.rem_euclid(width) == 0 {
            floor
        } else {
            floor + 1
        }
    }

    /// Instant at which `slot` begins.
    pub fn to_datetime(&self, slot: i64) -> DateTime<Utc> {
        self.base + Duration::minutes(slot * self.granularity_minutes)
    }

    /// Slots needed to cover `minutes`, at least one.
    pub fn duration_to_slots(&self, minutes: u32) -> i64 {
        let minutes = i64::from(minutes);
        let slots = (minutes + self.granularity_minutes - 1).div_euclid(self.granularity_minutes);
        slots.max(1)
    }
}

/// Build the grid and horizon shared by both schedulers.
///
/// The base is the minimum of all task earliest starts and meeting starts;
/// the horizon covers the latest deadline or meeting end plus a fixed slack,
/// floored at the slack itself. Returns `None` for a request with no tasks
/// and no meetings.
pub fn base_and_horizon(
    tasks: &[ScheduleTask],
    meetings: &[ScheduleMeeting],
    granularity_minutes: u32,
) -> Option<(TimeGrid, i64)> {
    let earliest = tasks
        .iter()
        .map(|t| t.earliest_start)
        .chain(meetings.iter().map(|m| m.start))
        .min()?;
    let grid = TimeGrid::aligned(earliest, granularity_minutes);

    let horizon_end = tasks
        .iter()
        .map(|t| t.due)
        .chain(meetings.iter().map(|m| m.end))
        .max()
        .unwrap_or(grid.base());
    let horizon_slots = (grid.to_slot_ceiling(horizon_end) + HORIZON_SLACK_SLOTS)
        .max(HORIZON_SLACK_SLOTS);

    Some((grid, horizon_slots))
}

#[cfg(test)]
#[path = "timegrid_tests.rs"]
mod tests;
