//! Shared application state for the service monitor.
//!
//! Holds the settings, the metrics registry and the cached roster. The roster
//! lock serializes the watcher's reset-then-apply reload against `/config`
//! readers; metric reads go through the registry's own atomics.

use std::path::Path;
use std::sync::Arc;

use tokio::sync::RwLock;

use service_monitor_core::Roster;

use crate::config::Settings;
use crate::obs::ServiceMetrics;

#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
    metrics: Arc<ServiceMetrics>,
    roster: Arc<RwLock<Roster>>,
}

struct AppStateInner {
    settings: Settings,
}

impl AppState {
    /// Build state around an already applied roster.
    pub fn new(settings: Settings, metrics: Arc<ServiceMetrics>, roster: Roster) -> Self {
        Self {
            inner: Arc::new(AppStateInner { settings }),
            metrics,
            roster: Arc::new(RwLock::new(roster)),
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.inner.settings
    }

    pub fn roster_path(&self) -> &Path {
        Path::new(&self.inner.settings.roster.path)
    }

    pub fn metrics(&self) -> &ServiceMetrics {
        &self.metrics
    }

    pub fn metrics_handle(&self) -> Arc<ServiceMetrics> {
        Arc::clone(&self.metrics)
    }

    pub fn roster_lock(&self) -> Arc<RwLock<Roster>> {
        Arc::clone(&self.roster)
    }

    /// Last roster that loaded successfully.
    pub async fn current_roster(&self) -> Roster {
        self.roster.read().await.clone()
    }
}
