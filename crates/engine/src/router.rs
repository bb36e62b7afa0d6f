// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Scheduler selection
//!
//! Stateless mapping from a configured module to the engine that implements
//! it. The CP scheduler is always wired; SWO is optional and resolving it
//! without wiring is the router's only runtime error.

use tempo_core::schedule::Scheduler;
use tempo_core::snapshot::SchedulerModule;

use crate::cp::CpLnsScheduler;
use crate::error::ServiceError;
use crate::swo::SwoScheduler;

/// Holds the wired engines and resolves by module
pub struct SchedulerRouter {
    cp: CpLnsScheduler,
    swo: Option<SwoScheduler>,
}

impl SchedulerRouter {
    pub fn new(cp: CpLnsScheduler, swo: Option<SwoScheduler>) -> Self {
        Self { cp, swo }
    }

    pub fn resolve(&self, module: SchedulerModule) -> Result<&dyn Scheduler, ServiceError> {
        match module {
            SchedulerModule::CpLns => Ok(&self.cp),
            SchedulerModule::Swo => self
                .swo
                .as_ref()
                .map(|swo| swo as &dyn Scheduler)
                .ok_or(ServiceError::SwoNotConfigured),
        }
    }
}
