// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! tempo-engine: scheduling engines and service orchestration
//!
//! Two interchangeable engines solve the single-resource placement problem:
//! an exact optimizer with a large-neighborhood-search escape hatch
//! ([`cp::CpLnsScheduler`]) and a squeaky-wheel heuristic
//! ([`swo::SwoScheduler`]). The [`service::SchedulingService`] wraps either
//! one with entity loading, task segmentation, previous-plan reconciliation,
//! and snapshot persistence.

pub mod cp;
pub mod error;
pub mod router;
pub mod service;
pub mod swo;

pub use cp::{CpConfig, CpLnsScheduler};
pub use error::ServiceError;
pub use router::SchedulerRouter;
pub use service::SchedulingService;
pub use swo::{SwoConfig, SwoScheduler};
