// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Squeaky-wheel optimization scheduler
//!
//! Iterative greedy repair: place segments in priority order, score each one
//! on how it fared (unplaceable, shoved against its deadline, or moved away
//! from the previous plan), then re-run with the loudest squeakers first.
//! Stops when penalties settle, the order stops changing, or the iteration
//! budget runs out, and keeps the best construction seen.

use chrono::Timelike;
use tracing::debug;

use tempo_core::config::{ConfigError, Settings, SwoWeights};
use tempo_core::schedule::{
    AssignedTask, ScheduleRequest, ScheduleResult, Scheduler, SegmentId,
};
use tempo_core::timegrid::{base_and_horizon, TimeGrid};

/// Penalty changes below this are treated as stable.
const PENALTY_EPSILON: f64 = 1e-6;

/// SWO tuning knobs
#[derive(Debug, Clone)]
pub struct SwoConfig {
    pub granularity_minutes: u32,
    pub max_iterations: u32,
    pub weights: SwoWeights,
    pub working_day_start_hour: u32,
    pub working_day_end_hour: u32,
}

impl Default for SwoConfig {
    fn default() -> Self {
        Self {
            granularity_minutes: 15,
            max_iterations: 6,
            weights: SwoWeights::default(),
            working_day_start_hour: 9,
            working_day_end_hour: 17,
        }
    }
}

impl SwoConfig {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            granularity_minutes: settings.swo_granularity_minutes,
            max_iterations: settings.swo_max_iterations,
            weights: settings.swo_weights,
            working_day_start_hour: settings.working_day_start_hour,
            working_day_end_hour: settings.working_day_end_hour,
        }
    }
}

/// Heuristic scheduler: fast, deterministic, never proves optimality
pub struct SwoScheduler {
    config: SwoConfig,
}

impl SwoScheduler {
    pub fn new(config: SwoConfig) -> Result<Self, ConfigError> {
        let (start, end) = (
            config.working_day_start_hour,
            config.working_day_end_hour,
        );
        if !(start < end && end <= 24) {
            return Err(ConfigError::InvalidWorkingHours { start, end });
        }
        Ok(Self { config })
    }
}

/// Per-segment slot bounds
struct SegmentInfo {
    duration_slots: i64,
    earliest_slot: i64,
    latest_start_slot: i64,
    due_slot: i64,
    previous_start_slot: Option<i64>,
}

impl Scheduler for SwoScheduler {
    fn schedule(&self, request: &ScheduleRequest) -> ScheduleResult {
        if request.tasks.is_empty() {
            return ScheduleResult::empty();
        }

        let Some((grid, horizon)) = base_and_horizon(
            &request.tasks,
            &request.meetings,
            self.config.granularity_minutes,
        ) else {
            return ScheduleResult::empty();
        };

        let infos: Vec<SegmentInfo> = request
            .tasks
            .iter()
            .map(|task| {
                let duration_slots = grid.duration_to_slots(task.duration_minutes);
                let earliest_slot = grid.to_slot_ceiling(task.earliest_start);
                let due_slot = grid.to_slot_ceiling(task.due);
                let latest_start_slot = (due_slot - duration_slots)
                    .min(horizon - duration_slots)
                    .max(earliest_slot);
                let previous_start_slot = request
                    .previous_assignments
                    .get(&task.id)
                    .map(|(start, _)| grid.to_slot(*start));
                SegmentInfo {
                    duration_slots,
                    earliest_slot,
                    latest_start_slot,
                    due_slot,
                    previous_start_slot,
                }
            })
            .collect();

        let base_occupancy = self.build_occupancy(request, &grid, horizon);

        let mut order: Vec<usize> = (0..request.tasks.len()).collect();
        order.sort_by(|&a, &b| {
            let ta = &request.tasks[a];
            let tb = &request.tasks[b];
            tb.priority
                .cmp(&ta.priority)
                .then(ta.earliest_start.cmp(&tb.earliest_start))
        });

        let mut best: Option<ScheduleResult> = None;
        let mut best_unscheduled = usize::MAX;
        let mut best_objective = i64::MAX;

        let mut penalties = vec![0.0f64; request.tasks.len()];

        for iteration in 0..self.config.max_iterations {
            let (placements, unscheduled) =
                construct(&order, &infos, &base_occupancy, horizon);
            let result = build_result(request, &placements, &unscheduled, &infos, &grid);

            let objective =
                unscheduled.len() as i64 * self.config.weights.unscheduled_penalty;
            if best.is_none()
                || unscheduled.len() < best_unscheduled
                || (unscheduled.len() == best_unscheduled && objective < best_objective)
            {
                best_unscheduled = unscheduled.len();
                best_objective = objective;
                best = Some(result);
            }

            let new_penalties = self.evaluate_penalties(&placements, &unscheduled, &infos);
            let changed = penalties
                .iter()
                .zip(&new_penalties)
                .any(|(old, new)| (new - old).abs() > PENALTY_EPSILON);
            penalties = new_penalties;

            let mut new_order = order.clone();
            new_order.sort_by(|&a, &b| {
                let ta = &request.tasks[a];
                let tb = &request.tasks[b];
                penalties[b]
                    .partial_cmp(&penalties[a])
                    .unwrap_or(std::cmp::Ordering::Equal)
                    .then(tb.priority.cmp(&ta.priority))
                    .then(ta.earliest_start.cmp(&tb.earliest_start))
            });

            debug!(iteration, unscheduled = unscheduled.len(), objective, "swo pass");

            if !changed || new_order == order {
                break;
            }
            order = new_order;
        }

        match best {
            Some(mut result) => {
                result.objective_value = Some(best_objective);
                result
            }
            None => ScheduleResult {
                assignments: Vec::new(),
                unscheduled: request.previous_assignments.keys().cloned().collect(),
                objective_value: None,
            },
        }
    }
}

impl SwoScheduler {
    /// Occupancy bitmap seeded with non-working hours and meetings.
    fn build_occupancy(
        &self,
        request: &ScheduleRequest,
        grid: &TimeGrid,
        horizon: i64,
    ) -> Vec<bool> {
        let mut occupancy = vec![false; horizon as usize];

        let (work_start, work_end) = (
            f64::from(self.config.working_day_start_hour),
            f64::from(self.config.working_day_end_hour),
        );
        if self.config.working_day_start_hour > 0 || self.config.working_day_end_hour < 24 {
            for (slot, occupied) in occupancy.iter_mut().enumerate() {
                let at = grid.to_datetime(slot as i64);
                let hour = f64::from(at.hour()) + f64::from(at.minute()) / 60.0;
                if hour < work_start || hour >= work_end {
                    *occupied = true;
                }
            }
        }

        for meeting in &request.meetings {
            let start_slot = grid.to_slot(meeting.start).max(0);
            let end_slot = grid.to_slot_ceiling(meeting.end).min(horizon);
            for slot in start_slot..end_slot {
                occupancy[slot as usize] = true;
            }
        }

        occupancy
    }

    fn evaluate_penalties(
        &self,
        placements: &[Option<i64>],
        unscheduled: &[usize],
        infos: &[SegmentInfo],
    ) -> Vec<f64> {
        let weights = &self.config.weights;
        infos
            .iter()
            .enumerate()
            .map(|(index, info)| {
                if unscheduled.contains(&index) {
                    return weights.unscheduled_penalty as f64;
                }
                let Some(start_slot) = placements[index] else {
                    return weights.unscheduled_penalty as f64;
                };
                let end_slot = start_slot + info.duration_slots;
                let slack = (info.due_slot - end_slot).max(0);
                let deviation_minutes = info.previous_start_slot.map_or(0, |prev| {
                    (start_slot - prev).abs() * i64::from(self.config.granularity_minutes)
                });
                weights.deviation as f64 * deviation_minutes as f64
                    + weights.slack as f64 / (slack as f64 + 1.0)
            })
            .collect()
    }
}

/// One greedy pass: first fit per segment in the current order.
fn construct(
    order: &[usize],
    infos: &[SegmentInfo],
    base_occupancy: &[bool],
    horizon: i64,
) -> (Vec<Option<i64>>, Vec<usize>) {
    let mut occupancy = base_occupancy.to_vec();
    let mut placements = vec![None; infos.len()];
    let mut unscheduled = Vec::new();

    for &index in order {
        let info = &infos[index];
        match find_slot(info, &occupancy, horizon) {
            Some(start_slot) => {
                for slot in start_slot..start_slot + info.duration_slots {
                    occupancy[slot as usize] = true;
                }
                placements[index] = Some(start_slot);
            }
            None => unscheduled.push(index),
        }
    }

    (placements, unscheduled)
}

/// Earliest free run that fits the segment and clears its deadline.
fn find_slot(info: &SegmentInfo, occupancy: &[bool], horizon: i64) -> Option<i64> {
    let latest_start = info.latest_start_slot.min(horizon - info.duration_slots);
    let mut slot = info.earliest_slot.max(0);
    while slot <= latest_start {
        let end_slot = slot + info.duration_slots;
        if end_slot > info.due_slot {
            slot += 1;
            continue;
        }
        if (slot..end_slot).all(|s| !occupancy[s as usize]) {
            return Some(slot);
        }
        slot += 1;
    }
    None
}

fn build_result(
    request: &ScheduleRequest,
    placements: &[Option<i64>],
    unscheduled: &[usize],
    infos: &[SegmentInfo],
    grid: &TimeGrid,
) -> ScheduleResult {
    let granularity = grid.granularity_minutes();
    let mut assignments = Vec::new();

    for (index, placement) in placements.iter().enumerate() {
        let Some(start_slot) = *placement else {
            continue;
        };
        let info = &infos[index];
        let task = &request.tasks[index];
        let end_slot = start_slot + info.duration_slots;
        let start = grid.to_datetime(start_slot);
        let end = grid.to_datetime(end_slot);

        let deviation_minutes = info
            .previous_start_slot
            .map_or(0, |prev| (start_slot - prev).abs() * granularity);
        let tardiness_minutes = if end > task.due {
            (end - task.due).num_minutes()
        } else {
            0
        };

        assignments.push(AssignedTask {
            id: task.id.clone(),
            start,
            end,
            deviation_minutes,
            tardiness_minutes,
        });
    }

    assignments.sort_by_key(|a| a.start);

    let unscheduled: Vec<SegmentId> = unscheduled
        .iter()
        .map(|&index| request.tasks[index].id.clone())
        .collect();

    ScheduleResult {
        assignments,
        unscheduled,
        objective_value: None,
    }
}

#[cfg(test)]
#[path = "swo_tests.rs"]
mod tests;
