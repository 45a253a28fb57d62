//! # lampgridd — lampgrid daemon
//!
//! Composition root that wires all adapters together and starts the server.
//!
//! ## Responsibilities
//! - Parse configuration (config file, env vars)
//! - Initialize tracing
//! - Provision the light registry from the fleet file
//! - Construct application services, injecting the registry via port traits
//! - Spawn the schedule engine as a background task
//! - Build the axum router, bind to a TCP port, and serve
//!
//! ## Dependency rule
//! This is the **only** crate that depends on all other crates.
//! It is the wiring layer — no domain logic belongs here.

mod config;
mod fleet;

use std::time::Duration;

use tracing_subscriber::EnvFilter;

use lampgrid_adapter_http_axum::router;
use lampgrid_adapter_http_axum::state::AppState;
use lampgrid_adapter_storage_memory::InMemoryStreetRepository;
use lampgrid_app::ports::SystemClock;
use lampgrid_app::schedule_engine::ScheduleEngine;
use lampgrid_app::services::command_service::CommandService;
use lampgrid_app::services::street_service::StreetService;

use crate::config::Config;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&config.logging.filter))
        .init();

    // Registry, seeded from the fleet file.
    let repo = InMemoryStreetRepository::new();
    let provisioned = fleet::provision(&repo, &config.fleet.path).await?;
    tracing::info!(streets = provisioned, "fleet provisioned");

    // Schedule engine runs as an independent periodic task, mutating the
    // same registry through the same command path as manual commands.
    let engine = ScheduleEngine::new(
        repo.clone(),
        SystemClock,
        Duration::from_secs(config.engine.poll_interval_secs),
    );
    tokio::spawn(async move { engine.run().await });

    // HTTP
    let state = AppState::new(StreetService::new(repo.clone()), CommandService::new(repo));
    let app = router::build(state);

    let bind_addr = config.bind_addr();
    tracing::info!(%bind_addr, "lampgridd listening");

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to listen for shutdown signal");
    }
}
