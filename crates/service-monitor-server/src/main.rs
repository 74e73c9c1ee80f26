//! service-monitor
//!
//! - `GET /`        : health check that also generates synthetic traffic
//! - `GET /config`  : current roster read straight from disk
//! - `GET /metrics` : Prometheus scrape endpoint
//! - Background: roster file poller and load simulator

use std::sync::Arc;

use tracing_subscriber::{fmt, EnvFilter};

use service_monitor_core::error::{MonitorError, Result};
use service_monitor_server::{app_state, config, obs, router, simulator, watch};

#[tokio::main]
async fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt().with_env_filter(filter).init();

    if let Err(e) = run().await {
        tracing::error!(code = e.kind().as_str(), error = %e, "service-monitor stopped");
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let settings = config::load_from_env()?;
    let listen = settings.server.listen_addr()?;

    let metrics = Arc::new(obs::ServiceMetrics::new(settings.simulation.load_target));
    let boot = watch::prepare_roster(std::path::Path::new(&settings.roster.path));
    metrics.apply_roster(&boot.roster);

    let state = app_state::AppState::new(settings, Arc::clone(&metrics), boot.roster);

    watch::RosterWatcher::for_app(&state, boot.watch_state).spawn();
    simulator::spawn_load_simulator(metrics, state.settings().simulation.load_interval());

    let app = router::build_router(state);

    tracing::info!(%listen, "service-monitor starting");
    let listener = tokio::net::TcpListener::bind(listen)
        .await
        .map_err(|e| MonitorError::Internal(format!("failed to bind {listen}: {e}")))?;

    axum::serve(listener, app)
        .await
        .map_err(|e| MonitorError::Internal(format!("server failed: {e}")))
}
