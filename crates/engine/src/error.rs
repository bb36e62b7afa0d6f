// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for scheduling runs

use tempo_core::StoreError;
use thiserror::Error;

/// Errors a scheduling run can surface to its caller
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("SWO scheduler is not configured")]
    SwoNotConfigured,
    #[error(transparent)]
    Store(#[from] StoreError),
}
