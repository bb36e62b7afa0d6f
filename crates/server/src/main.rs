// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! tempod: HTTP server for the tempo scheduling service
//!
//! Wires configuration, the scheduling engines, and the store together and
//! serves the REST surface.

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

mod routes;

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing::info;

use tempo_core::clock::SystemClock;
use tempo_core::id::UuidIdGen;
use tempo_core::Settings;
use tempo_engine::{
    CpConfig, CpLnsScheduler, SchedulerRouter, SchedulingService, SwoConfig, SwoScheduler,
};
use tempo_storage::MemoryStore;

use crate::routes::AppState;

#[derive(Parser)]
#[command(name = "tempod")]
#[command(about = "tempo - calendar-aware task scheduling service")]
#[command(version)]
struct Args {
    /// Port to listen on (overrides APP_PORT)
    #[arg(long)]
    port: Option<u16>,

    /// JSON file backing the store; omit for a purely in-memory server
    #[arg(long)]
    state_file: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let args = Args::parse();
    let settings = Settings::from_env().context("loading configuration")?;
    let port = args.port.unwrap_or(settings.app_port);

    let cp = CpLnsScheduler::new(CpConfig::from_settings(&settings))
        .context("configuring the CP scheduler")?;
    let swo = SwoScheduler::new(SwoConfig::from_settings(&settings))
        .context("configuring the SWO scheduler")?;
    let service = SchedulingService::new(SchedulerRouter::new(cp, Some(swo)));

    let store = match &args.state_file {
        Some(path) => {
            tempo_storage::file::load_store(path, Arc::new(SystemClock), Arc::new(UuidIdGen))
                .with_context(|| format!("loading state from {}", path.display()))?
        }
        None => MemoryStore::new(),
    };

    let state = AppState {
        store: Arc::new(store),
        service: Arc::new(service),
        settings: Arc::new(settings),
        state_file: args.state_file.map(Arc::new),
    };
    let app = routes::router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    info!(%addr, "tempod listening");
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding {addr}"))?;
    axum::serve(listener, app).await.context("serving")?;
    Ok(())
}
