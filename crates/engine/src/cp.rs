// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Constraint-programming scheduler with a large-neighborhood-search
//! escape hatch
//!
//! Models a single-machine problem over integer slots: each segment gets a
//! start in its feasible window, a presence decision, and tardiness/deviation
//! auxiliaries; meetings and per-day non-working blocks are fixed occupied
//! intervals under a global no-overlap. Presence is encoded as a Boolean
//! guarding the interval-bound constraints, and the model is solved by a
//! deterministic branch-and-bound under a wall-clock deadline: a completed
//! search proves optimality, an expired one returns the best incumbent, and
//! no incumbent at all means the model is infeasible (every segment comes
//! back unscheduled).
//!
//! The LNS operator: given a neighborhood window, any segment whose previous
//! start falls outside it is frozen at that start and forced present, so the
//! solver only re-plans inside the window.

use std::time::{Duration, Instant};

use chrono::Duration as TimeDelta;
use tracing::debug;

use tempo_core::config::{ConfigError, CpWeights, Settings};
use tempo_core::schedule::{AssignedTask, ScheduleRequest, ScheduleResult, Scheduler, SegmentId};
use tempo_core::timegrid::{base_and_horizon, TimeGrid};

/// Nodes between deadline checks.
const DEADLINE_CHECK_INTERVAL: u64 = 256;

/// CP/LNS tuning knobs
#[derive(Debug, Clone)]
pub struct CpConfig {
    pub granularity_minutes: u32,
    pub solver_time_limit: Duration,
    pub weights: CpWeights,
    pub working_day_start_hour: u32,
    pub working_day_end_hour: u32,
}

impl Default for CpConfig {
    fn default() -> Self {
        Self {
            granularity_minutes: 5,
            solver_time_limit: Duration::from_secs_f64(15.0),
            weights: CpWeights::default(),
            working_day_start_hour: 9,
            working_day_end_hour: 17,
        }
    }
}

impl CpConfig {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            granularity_minutes: settings.cp_granularity_minutes,
            solver_time_limit: Duration::from_secs_f64(settings.solver_time_limit_seconds),
            weights: settings.cp_weights,
            working_day_start_hour: settings.working_day_start_hour,
            working_day_end_hour: settings.working_day_end_hour,
        }
    }
}

/// Exact scheduler: optimal when the search completes within its time limit
pub struct CpLnsScheduler {
    config: CpConfig,
}

impl CpLnsScheduler {
    pub fn new(config: CpConfig) -> Result<Self, ConfigError> {
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

impl Scheduler for CpLnsScheduler {
    fn schedule(&self, request: &ScheduleRequest) -> ScheduleResult {
        if request.tasks.is_empty() {
            return ScheduleResult::empty();
        }

        let Some((grid, horizon)) =
            base_and_horizon(&request.tasks, &request.meetings, self.config.granularity_minutes)
        else {
            return ScheduleResult::empty();
        };

        let vars = build_task_vars(request, &grid, horizon, &self.config.weights);
        let occupied = build_occupancy(request, &grid, horizon, &self.config);

        let mut search = Search::new(&vars, &self.config.weights, occupied, self.config.solver_time_limit);
        search.run();

        debug!(
            tasks = request.tasks.len(),
            horizon,
            nodes = search.nodes,
            timed_out = search.timed_out,
            "cp search finished"
        );

        let Some((best_cost, choices)) = search.best else {
            // Infeasible, or the deadline expired before any incumbent.
            return ScheduleResult {
                assignments: Vec::new(),
                unscheduled: request.tasks.iter().map(|t| t.id.clone()).collect(),
                objective_value: None,
            };
        };

        decode(&vars, &choices, &grid, best_cost, !search.timed_out)
    }
}

/// One segment's slot-domain view of the model
struct TaskVar {
    id: SegmentId,
    priority: i64,
    duration_slots: i64,
    earliest_slot: i64,
    /// Inclusive upper start bound; already capped so the segment ends by
    /// both its deadline slot and the horizon.
    latest_start_slot: i64,
    due_slot: i64,
    previous_start_slot: Option<i64>,
    pinned_start: Option<i64>,
    must_be_present: bool,
    /// Cost of leaving the segment out, `None` when presence is forced.
    absent_cost: Option<i64>,
    /// Occupancy-free cost floor, for pruning.
    lower_bound: i64,
}

fn build_task_vars(
    request: &ScheduleRequest,
    grid: &TimeGrid,
    horizon: i64,
    weights: &CpWeights,
) -> Vec<TaskVar> {
    let window_slots = request
        .neighborhood_window
        .map(|(start, end)| (grid.to_slot(start), grid.to_slot_ceiling(end)));

    request
        .tasks
        .iter()
        .map(|task| {
            let duration_slots = grid.duration_to_slots(task.duration_minutes);
            let earliest_slot = grid.to_slot(task.earliest_start).max(0);
            let due_slot = grid.to_slot_ceiling(task.due);
            let latest_start_slot = (due_slot - duration_slots)
                .min(horizon - duration_slots)
                .max(earliest_slot);

            let previous = request.previous_assignments.get(&task.id);
            let mut previous_start_slot = previous.map(|(start, _)| grid.to_slot(*start));

            let mut pinned_start = None;
            let mut must_be_present = false;
            if let Some(fixed) = task.fixed_start {
                let slot = grid.to_slot(fixed);
                pinned_start = Some(slot);
                must_be_present = true;
                previous_start_slot = Some(slot);
            } else if let (Some((window_lo, window_hi)), Some(prev)) =
                (window_slots, previous_start_slot)
            {
                // LNS freeze: a previous start outside the neighborhood stays
                // exactly where it was.
                if !(window_lo <= prev && prev <= window_hi) {
                    pinned_start = Some(prev);
                    must_be_present = true;
                }
            }
            if previous.is_none() && task.fixed_start.is_none() {
                must_be_present = true;
            }

            let mut var = TaskVar {
                id: task.id.clone(),
                priority: i64::from(task.priority),
                duration_slots,
                earliest_slot,
                latest_start_slot,
                due_slot,
                previous_start_slot,
                pinned_start,
                must_be_present,
                absent_cost: None,
                lower_bound: 0,
            };
            var.absent_cost = absent_cost(&var, weights);
            var.lower_bound = lower_bound(&var, weights);
            var
        })
        .collect()
}

impl TaskVar {
    /// Inclusive upper start bound that also clears the deadline.
    fn feasible_hi(&self) -> i64 {
        self.latest_start_slot.min(self.due_slot - self.duration_slots)
    }

    fn present_cost(&self, slot: i64, weights: &CpWeights) -> i64 {
        let tardiness = (slot + self.duration_slots - self.due_slot).max(0);
        let deviation = self
            .previous_start_slot
            .map_or(0, |prev| (slot - prev).abs());
        weights.tardiness * self.priority * tardiness
            + weights.stability * deviation
            + weights.start_time * self.priority * slot
    }
}

/// Cost charged when a segment stays unscheduled: the unscheduled weight plus
/// whatever the relaxed start/deviation variables settle to at their cheapest
/// feasible point.
fn absent_cost(var: &TaskVar, weights: &CpWeights) -> Option<i64> {
    if var.must_be_present || var.pinned_start.is_some() {
        return None;
    }
    let relaxed = match var.previous_start_slot {
        None => weights.start_time * var.priority * var.earliest_slot,
        Some(prev) => {
            let vertex = prev.clamp(var.earliest_slot, var.latest_start_slot);
            [var.earliest_slot, vertex]
                .into_iter()
                .map(|slot| {
                    weights.stability * (slot - prev).abs()
                        + weights.start_time * var.priority * slot
                })
                .min()
                .unwrap_or(0)
        }
    };
    Some(weights.unscheduled + relaxed)
}

/// Occupancy-free cost floor for one segment.
fn lower_bound(var: &TaskVar, weights: &CpWeights) -> i64 {
    let present_floor = if let Some(pinned) = var.pinned_start {
        (var.earliest_slot <= pinned && pinned <= var.feasible_hi())
            .then(|| var.present_cost(pinned, weights))
    } else if var.earliest_slot <= var.feasible_hi() {
        let vertex = var
            .previous_start_slot
            .map(|prev| prev.clamp(var.earliest_slot, var.feasible_hi()));
        [Some(var.earliest_slot), vertex]
            .into_iter()
            .flatten()
            .map(|slot| var.present_cost(slot, weights))
            .min()
    } else {
        None
    };

    match (present_floor, var.absent_cost) {
        (Some(p), Some(a)) => p.min(a),
        (Some(p), None) => p,
        (None, Some(a)) => a,
        // Presence forced but impossible even without occupancy; the search
        // will prove infeasibility.
        (None, None) => 0,
    }
}

/// Mark meetings and non-working hours as occupied slots.
fn build_occupancy(
    request: &ScheduleRequest,
    grid: &TimeGrid,
    horizon: i64,
    config: &CpConfig,
) -> Vec<bool> {
    let mut occupied = vec![false; horizon as usize];

    let mut block = |start_slot: i64, end_slot: i64| {
        let lo = start_slot.max(0);
        let hi = end_slot.min(horizon);
        for slot in lo..hi {
            occupied[slot as usize] = true;
        }
    };

    for meeting in &request.meetings {
        let start_slot = grid.to_slot(meeting.start);
        let seconds = (meeting.end - meeting.start).num_seconds();
        let minutes = seconds.div_euclid(60) + i64::from(seconds.rem_euclid(60) != 0);
        let duration_slots = grid.duration_to_slots(minutes.max(1) as u32);
        block(start_slot, start_slot + duration_slots);
    }

    let (work_start, work_end) = (config.working_day_start_hour, config.working_day_end_hour);
    if work_start > 0 || work_end < 24 {
        let horizon_end = grid.to_datetime(horizon);
        let mut day_start = grid
            .base()
            .date_naive()
            .and_hms_opt(0, 0, 0)
            .map(|t| t.and_utc())
            .unwrap_or_else(|| grid.base());
        while day_start < horizon_end {
            let work_start_at = day_start + TimeDelta::hours(i64::from(work_start));
            let work_end_at = day_start + TimeDelta::hours(i64::from(work_end));
            let next_day = day_start + TimeDelta::days(1);
            if work_start > 0 {
                block(grid.to_slot(day_start), grid.to_slot_ceiling(work_start_at));
            }
            if work_end < 24 {
                block(grid.to_slot(work_end_at), grid.to_slot_ceiling(next_day));
            }
            day_start = next_day;
        }
    }

    occupied
}

/// Chosen placement per segment, indexed like the input tasks
#[derive(Clone, Copy, PartialEq, Eq)]
enum Choice {
    Present(i64),
    Absent,
}

struct Search<'a> {
    vars: &'a [TaskVar],
    weights: &'a CpWeights,
    /// Decision order: most constrained value first (priority, then deadline).
    order: Vec<usize>,
    /// `suffix_lb[d]` bounds the cost of everything at depth `d` and deeper.
    suffix_lb: Vec<i64>,
    occupied: Vec<bool>,
    choices: Vec<Choice>,
    best: Option<(i64, Vec<Choice>)>,
    deadline: Instant,
    nodes: u64,
    timed_out: bool,
}

impl<'a> Search<'a> {
    fn new(
        vars: &'a [TaskVar],
        weights: &'a CpWeights,
        occupied: Vec<bool>,
        time_limit: Duration,
    ) -> Self {
        let mut order: Vec<usize> = (0..vars.len()).collect();
        order.sort_by(|&a, &b| {
            vars[b]
                .priority
                .cmp(&vars[a].priority)
                .then(vars[a].due_slot.cmp(&vars[b].due_slot))
                .then(vars[a].id.cmp(&vars[b].id))
        });

        let mut suffix_lb = vec![0i64; order.len() + 1];
        for depth in (0..order.len()).rev() {
            suffix_lb[depth] = suffix_lb[depth + 1] + vars[order[depth]].lower_bound;
        }

        Self {
            vars,
            weights,
            order,
            suffix_lb,
            occupied,
            choices: vec![Choice::Absent; vars.len()],
            best: None,
            deadline: Instant::now() + time_limit,
            nodes: 0,
            timed_out: false,
        }
    }

    fn run(&mut self) {
        self.dfs(0, 0);
    }

    fn dfs(&mut self, depth: usize, cost: i64) {
        if self.timed_out {
            return;
        }
        self.nodes += 1;
        if self.nodes % DEADLINE_CHECK_INTERVAL == 0 && Instant::now() >= self.deadline {
            self.timed_out = true;
            return;
        }
        if let Some((best_cost, _)) = &self.best {
            if cost + self.suffix_lb[depth] >= *best_cost {
                return;
            }
        }
        if depth == self.order.len() {
            self.best = Some((cost, self.choices.clone()));
            return;
        }

        let index = self.order[depth];
        let duration = self.vars[index].duration_slots;
        for (choice, branch_cost) in self.branches(index) {
            if let Choice::Present(slot) = choice {
                self.mark(slot, duration, true);
            }
            self.choices[index] = choice;
            self.dfs(depth + 1, cost + branch_cost);
            if let Choice::Present(slot) = choice {
                self.mark(slot, duration, false);
            }
            if self.timed_out {
                return;
            }
        }
    }

    /// Feasible branches for one segment, cheapest first.
    fn branches(&self, index: usize) -> Vec<(Choice, i64)> {
        let var = &self.vars[index];
        let mut branches = Vec::new();

        if let Some(pinned) = var.pinned_start {
            if var.earliest_slot <= pinned
                && pinned <= var.feasible_hi()
                && self.is_free(pinned, var.duration_slots)
            {
                branches.push((Choice::Present(pinned), var.present_cost(pinned, self.weights)));
            }
            return branches;
        }

        let hi = var.feasible_hi();
        let mut slot = var.earliest_slot;
        'scan: while slot <= hi {
            for probe in (slot..slot + var.duration_slots).rev() {
                if self.occupied[probe as usize] {
                    slot = probe + 1;
                    continue 'scan;
                }
            }
            branches.push((Choice::Present(slot), var.present_cost(slot, self.weights)));
            slot += 1;
        }

        if let Some(absent) = var.absent_cost {
            branches.push((Choice::Absent, absent));
        }

        branches.sort_by(|(choice_a, cost_a), (choice_b, cost_b)| {
            cost_a.cmp(cost_b).then_with(|| match (choice_a, choice_b) {
                (Choice::Present(a), Choice::Present(b)) => a.cmp(b),
                (Choice::Present(_), Choice::Absent) => std::cmp::Ordering::Less,
                (Choice::Absent, Choice::Present(_)) => std::cmp::Ordering::Greater,
                (Choice::Absent, Choice::Absent) => std::cmp::Ordering::Equal,
            })
        });
        branches
    }

    fn is_free(&self, slot: i64, duration: i64) -> bool {
        (slot..slot + duration).all(|s| !self.occupied[s as usize])
    }

    fn mark(&mut self, slot: i64, duration: i64, value: bool) {
        for s in slot..slot + duration {
            self.occupied[s as usize] = value;
        }
    }
}

fn decode(
    vars: &[TaskVar],
    choices: &[Choice],
    grid: &TimeGrid,
    best_cost: i64,
    proved_optimal: bool,
) -> ScheduleResult {
    let granularity = grid.granularity_minutes();
    let mut assignments = Vec::new();
    let mut unscheduled = Vec::new();

    for (var, choice) in vars.iter().zip(choices) {
        match *choice {
            Choice::Absent => unscheduled.push(var.id.clone()),
            Choice::Present(slot) => {
                let deviation = var
                    .previous_start_slot
                    .map_or(0, |prev| (slot - prev).abs());
                let tardiness = (slot + var.duration_slots - var.due_slot).max(0);
                assignments.push(AssignedTask {
                    id: var.id.clone(),
                    start: grid.to_datetime(slot),
                    end: grid.to_datetime(slot + var.duration_slots),
                    deviation_minutes: deviation * granularity,
                    tardiness_minutes: tardiness * granularity,
                });
            }
        }
    }

    assignments.sort_by_key(|a| a.start);

    ScheduleResult {
        assignments,
        unscheduled,
        objective_value: proved_optimal.then_some(best_cost),
    }
}

#[cfg(test)]
#[path = "cp_tests.rs"]
mod tests;
