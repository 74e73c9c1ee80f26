//! HTTP endpoints.
//!
//! - `/`        : liveness plus synthetic traffic (random latency, random 500s)
//! - `/config`  : plain-text roster, re-read from disk
//! - `/metrics` : Prometheus text format

use std::time::{Duration, Instant};

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use rand::Rng;

use crate::app_state::AppState;
use crate::watch::read_roster;

pub const OK_BODY: &str = "Service Monitor is running!";
pub const ERROR_BODY: &str = "Internal Server Error";

/// Draw the simulated work time and whether this call fails.
fn roll(max_work: Duration, error_probability: f64) -> (Duration, bool) {
    let mut rng = rand::thread_rng();
    let work = max_work.mul_f64(rng.gen::<f64>());
    (work, rng.gen_bool(error_probability))
}

pub async fn health(State(state): State<AppState>) -> Response {
    let metrics = state.metrics();
    let _inflight = metrics.active_requests.track_inflight();
    let start = Instant::now();

    let sim = &state.settings().simulation;
    let (work, fail) = roll(sim.max_work(), sim.error_probability);
    tokio::time::sleep(work).await;

    let resp = if fail {
        metrics.error_rate.set(sim.error_probability);
        (StatusCode::INTERNAL_SERVER_ERROR, ERROR_BODY).into_response()
    } else {
        metrics.error_rate.set(0.0);
        (StatusCode::OK, OK_BODY).into_response()
    };

    metrics.request_duration.observe_duration(start.elapsed());
    metrics.requests_total.inc();
    resp
}

pub async fn config_dump(State(state): State<AppState>) -> Response {
    let lock = state.roster_lock();
    let _shared = lock.read().await;

    match read_roster(state.roster_path()).await {
        Ok(r) => (StatusCode::OK, r.to_string()).into_response(),
        Err(e) => {
            tracing::warn!(code = e.kind().as_str(), error = %e, "config dump failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Error loading config: {e}"),
            )
                .into_response()
        }
    }
}

pub async fn metrics(State(state): State<AppState>) -> Response {
    let body = state.metrics().render();

    (
        StatusCode::OK,
        [(axum::http::header::CONTENT_TYPE, "text/plain; version=0.0.4; charset=utf-8")],
        body,
    )
        .into_response()
}
