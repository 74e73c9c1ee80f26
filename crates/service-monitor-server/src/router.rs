//! Axum router wiring.

use axum::{routing::get, Router};

use crate::{app_state::AppState, ops};

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(ops::health))
        .route("/config", get(ops::config_dump))
        .route("/metrics", get(ops::metrics))
        .with_state(state)
}
