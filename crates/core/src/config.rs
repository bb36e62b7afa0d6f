// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Application configuration loaded from environment variables
//!
//! Every knob has a default; parsing goes through an injectable lookup so
//! tests never touch process-global environment state.

use std::str::FromStr;

use thiserror::Error;

use crate::snapshot::SchedulerModule;

/// Configuration failures, all fatal at startup
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value for {name}: {value}")]
    InvalidValue { name: &'static str, value: String },
    #[error("working day hours must satisfy 0 <= start < end <= 24, got [{start}, {end})")]
    InvalidWorkingHours { start: u32, end: u32 },
}

/// CP/LNS objective weights
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CpWeights {
    pub tardiness: i64,
    pub stability: i64,
    pub start_time: i64,
    pub unscheduled: i64,
}

impl Default for CpWeights {
    fn default() -> Self {
        Self {
            tardiness: 200,
            stability: 30,
            start_time: 1,
            unscheduled: 10_000,
        }
    }
}

/// SWO penalty weights
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SwoWeights {
    pub unscheduled_penalty: i64,
    pub deviation: i64,
    pub slack: i64,
}

impl Default for SwoWeights {
    fn default() -> Self {
        Self {
            unscheduled_penalty: 10_000,
            deviation: 50,
            slack: 5,
        }
    }
}

/// Application-wide settings
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub scheduler_module: SchedulerModule,
    pub working_day_start_hour: u32,
    pub working_day_end_hour: u32,
    pub cp_granularity_minutes: u32,
    pub swo_granularity_minutes: u32,
    pub solver_time_limit_seconds: f64,
    pub swo_max_iterations: u32,
    pub cp_weights: CpWeights,
    pub swo_weights: SwoWeights,
    pub app_port: u16,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            scheduler_module: SchedulerModule::CpLns,
            working_day_start_hour: 9,
            working_day_end_hour: 17,
            cp_granularity_minutes: 5,
            swo_granularity_minutes: 15,
            solver_time_limit_seconds: 15.0,
            swo_max_iterations: 6,
            cp_weights: CpWeights::default(),
            swo_weights: SwoWeights::default(),
            app_port: 8000,
        }
    }
}

impl Settings {
    /// Load settings from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load settings from an arbitrary lookup (used by tests).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Settings::default();
        let settings = Settings {
            scheduler_module: get(&lookup, "SCHEDULER_MODULE", defaults.scheduler_module)?,
            working_day_start_hour: get(
                &lookup,
                "WORKING_DAY_START_HOUR",
                defaults.working_day_start_hour,
            )?,
            working_day_end_hour: get(
                &lookup,
                "WORKING_DAY_END_HOUR",
                defaults.working_day_end_hour,
            )?,
            cp_granularity_minutes: get(
                &lookup,
                "CP_GRANULARITY_MINUTES",
                defaults.cp_granularity_minutes,
            )?,
            swo_granularity_minutes: get(
                &lookup,
                "SWO_GRANULARITY_MINUTES",
                defaults.swo_granularity_minutes,
            )?,
            solver_time_limit_seconds: get(
                &lookup,
                "SOLVER_TIME_LIMIT_SECONDS",
                defaults.solver_time_limit_seconds,
            )?,
            swo_max_iterations: get(&lookup, "SWO_MAX_ITERATIONS", defaults.swo_max_iterations)?,
            cp_weights: CpWeights {
                tardiness: get(&lookup, "CP_TARDINESS_WEIGHT", defaults.cp_weights.tardiness)?,
                stability: get(&lookup, "CP_STABILITY_WEIGHT", defaults.cp_weights.stability)?,
                start_time: get(
                    &lookup,
                    "CP_START_TIME_WEIGHT",
                    defaults.cp_weights.start_time,
                )?,
                unscheduled: get(
                    &lookup,
                    "CP_UNSCHEDULED_WEIGHT",
                    defaults.cp_weights.unscheduled,
                )?,
            },
            swo_weights: SwoWeights {
                unscheduled_penalty: get(
                    &lookup,
                    "SWO_UNSCHEDULED_PENALTY",
                    defaults.swo_weights.unscheduled_penalty,
                )?,
                deviation: get(&lookup, "SWO_DEVIATION_WEIGHT", defaults.swo_weights.deviation)?,
                slack: get(&lookup, "SWO_SLACK_WEIGHT", defaults.swo_weights.slack)?,
            },
            app_port: get(&lookup, "APP_PORT", defaults.app_port)?,
        };
        settings.validate_working_hours()?;
        Ok(settings)
    }

    pub fn validate_working_hours(&self) -> Result<(), ConfigError> {
        let (start, end) = (self.working_day_start_hour, self.working_day_end_hour);
        if start < end && end <= 24 {
            Ok(())
        } else {
            Err(ConfigError::InvalidWorkingHours { start, end })
        }
    }
}

fn get<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match lookup(name) {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue { name, value: raw }),
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
