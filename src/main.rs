// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Destravate API Server
//!
//! Serves the routes, users, groups and challenges collections over HTTP.

use anyhow::Context;
use destravate::{
    config::Config,
    db::{self, Store},
    ids::IdGenerator,
    AppState,
};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize structured JSON logging
    init_logging()?;

    // Load configuration from environment
    let config = Config::from_env().context("Failed to load configuration")?;
    tracing::info!(
        port = config.port,
        backend = ?config.store_backend,
        "Starting Destravate API"
    );

    let store = Store::connect(&config)
        .await
        .context("Failed to connect to document store")?;

    // Continue numbering after the ids already persisted
    let ids = IdGenerator::new();
    let next_id = db::restore_id_counter(&store, &ids)
        .await
        .context("Failed to restore id counter")?;
    tracing::info!(next_id, "Id counter restored");

    let state = Arc::new(AppState {
        config: config.clone(),
        store,
        ids,
    });

    let app = destravate::routes::create_router(state);

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Initialize structured JSON logging.
fn init_logging() -> anyhow::Result<()> {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("destravate=debug".parse()?)
                .add_directive("info".parse()?),
        )
        .with(format)
        .init();
    Ok(())
}
