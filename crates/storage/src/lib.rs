// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! tempo-storage: repository implementation
//!
//! An in-memory store behind the [`tempo_core::Repository`] contract, with a
//! JSON document round-trip so a server process can keep its tasks, meetings,
//! and plan history across restarts.

pub mod file;
pub mod memory;

pub use memory::MemoryStore;
