use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, SystemTime};

use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use service_monitor_core::error::{MonitorError, Result};
use service_monitor_core::{roster, Roster};

use crate::app_state::AppState;
use crate::obs::ServiceMetrics;

/// Last observed modification time of the roster file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WatchState {
    pub last_modified: Option<SystemTime>,
}

impl WatchState {
    pub fn at(modified: SystemTime) -> Self {
        Self { last_modified: Some(modified) }
    }

    /// Read the current mtime of `path`, or an empty state if it cannot be read.
    pub fn observe(path: &Path) -> Self {
        let last_modified = std::fs::metadata(path).and_then(|m| m.modified()).ok();
        Self { last_modified }
    }
}

/// Read and parse the roster without blocking the runtime.
pub async fn read_roster(path: &Path) -> Result<Roster> {
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|e| MonitorError::io("error reading config file", path, e))?;
    roster::load_from_bytes(&bytes, path)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollOutcome {
    Unchanged,
    Reloaded { up: usize, down: usize },
}

/// Polls the roster file and republishes it when its mtime moves.
pub struct RosterWatcher {
    path: PathBuf,
    interval: Duration,
    metrics: Arc<ServiceMetrics>,
    roster: Arc<RwLock<Roster>>,
    state: WatchState,
}

impl RosterWatcher {
    pub fn new(
        path: impl Into<PathBuf>,
        interval: Duration,
        metrics: Arc<ServiceMetrics>,
        roster: Arc<RwLock<Roster>>,
        state: WatchState,
    ) -> Self {
        Self {
            path: path.into(),
            interval,
            metrics,
            roster,
            state,
        }
    }

    /// Watcher over the app's roster path, metrics and cached roster.
    pub fn for_app(app: &AppState, state: WatchState) -> Self {
        Self::new(
            app.roster_path(),
            app.settings().roster.poll_interval(),
            app.metrics_handle(),
            app.roster_lock(),
            state,
        )
    }

    pub fn state(&self) -> WatchState {
        self.state
    }

    /// One poll step.
    ///
    /// On any error the watch state is left untouched, so the next step retries
    /// and the cached roster stays authoritative.
    pub async fn poll_once(&mut self) -> Result<PollOutcome> {
        let modified = tokio::fs::metadata(&self.path)
            .await
            .and_then(|m| m.modified())
            .map_err(|e| MonitorError::io("error checking config file", &self.path, e))?;

        if self.state.last_modified == Some(modified) {
            return Ok(PollOutcome::Unchanged);
        }

        tracing::info!(path = %self.path.display(), "config file changed, reloading");
        let next = read_roster(&self.path).await?;
        let outcome = PollOutcome::Reloaded {
            up: next.up.len(),
            down: next.down.len(),
        };

        let mut current = self.roster.write().await;
        self.metrics.apply_roster(&next);
        *current = next;
        self.state = WatchState::at(modified);

        Ok(outcome)
    }

    /// Poll forever.
    pub async fn run(mut self) {
        tracing::info!(
            path = %self.path.display(),
            interval_ms = self.interval.as_millis() as u64,
            "starting config watcher"
        );

        let mut tick = tokio::time::interval(self.interval);
        tick.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tick.tick().await;
            match self.poll_once().await {
                Ok(PollOutcome::Unchanged) => {}
                Ok(PollOutcome::Reloaded { up, down }) => {
                    tracing::info!(up, down, "reloaded config");
                }
                Err(e) => {
                    tracing::warn!(code = e.kind().as_str(), error = %e, "config reload skipped");
                }
            }
        }
    }

    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(self.run())
    }
}
