use std::net::SocketAddr;
use std::time::Duration;

use serde::Deserialize;
use service_monitor_core::error::{MonitorError, Result};

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Settings {
    #[serde(default = "default_version")]
    pub version: u32,

    #[serde(default)]
    pub server: ServerSection,

    #[serde(default)]
    pub roster: RosterSection,

    #[serde(default)]
    pub simulation: SimulationSection,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            version: default_version(),
            server: ServerSection::default(),
            roster: RosterSection::default(),
            simulation: SimulationSection::default(),
        }
    }
}

impl Settings {
    pub fn validate(&self) -> Result<()> {
        if self.version != 1 {
            return Err(MonitorError::InvalidSettings(format!(
                "unsupported settings version {}",
                self.version
            )));
        }

        self.server.validate()?;
        self.roster.validate()?;
        self.simulation.validate()?;

        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerSection {
    #[serde(default = "default_listen")]
    pub listen: String,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self { listen: default_listen() }
    }
}

impl ServerSection {
    pub fn validate(&self) -> Result<()> {
        self.listen_addr().map(|_| ())
    }

    pub fn listen_addr(&self) -> Result<SocketAddr> {
        self.listen.parse().map_err(|e| {
            MonitorError::InvalidSettings(format!(
                "server.listen must be a valid SocketAddr ({}): {e}",
                self.listen
            ))
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RosterSection {
    #[serde(default = "default_roster_path")]
    pub path: String,

    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
}

impl Default for RosterSection {
    fn default() -> Self {
        Self {
            path: default_roster_path(),
            poll_interval_ms: default_poll_interval_ms(),
        }
    }
}

impl RosterSection {
    pub fn validate(&self) -> Result<()> {
        if self.path.trim().is_empty() {
            return Err(MonitorError::InvalidSettings("roster.path must not be empty".into()));
        }
        if !(100..=600_000).contains(&self.poll_interval_ms) {
            return Err(MonitorError::InvalidSettings(
                "roster.poll_interval_ms must be between 100 and 600000".into(),
            ));
        }
        Ok(())
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

/// Which gauge the background load simulator writes to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadTarget {
    /// Dedicated `service_monitor_simulated_load` gauge.
    #[default]
    SimulatedLoad,
    /// Overwrite `service_monitor_active_requests`, clobbering the in-flight count.
    ActiveRequests,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SimulationSection {
    #[serde(default = "default_load_interval_ms")]
    pub load_interval_ms: u64,

    #[serde(default = "default_max_work_ms")]
    pub max_work_ms: u64,

    #[serde(default = "default_error_probability")]
    pub error_probability: f64,

    #[serde(default)]
    pub load_target: LoadTarget,
}

impl Default for SimulationSection {
    fn default() -> Self {
        Self {
            load_interval_ms: default_load_interval_ms(),
            max_work_ms: default_max_work_ms(),
            error_probability: default_error_probability(),
            load_target: LoadTarget::default(),
        }
    }
}

impl SimulationSection {
    pub fn validate(&self) -> Result<()> {
        if !(100..=600_000).contains(&self.load_interval_ms) {
            return Err(MonitorError::InvalidSettings(
                "simulation.load_interval_ms must be between 100 and 600000".into(),
            ));
        }
        if self.max_work_ms > 60_000 {
            return Err(MonitorError::InvalidSettings(
                "simulation.max_work_ms must be at most 60000".into(),
            ));
        }
        if !(0.0..=1.0).contains(&self.error_probability) {
            return Err(MonitorError::InvalidSettings(
                "simulation.error_probability must be between 0.0 and 1.0".into(),
            ));
        }
        Ok(())
    }

    pub fn load_interval(&self) -> Duration {
        Duration::from_millis(self.load_interval_ms)
    }

    pub fn max_work(&self) -> Duration {
        Duration::from_millis(self.max_work_ms)
    }
}

fn default_version() -> u32 {
    1
}
fn default_listen() -> String {
    "0.0.0.0:8080".into()
}
fn default_roster_path() -> String {
    "/app/config/config.toml".into()
}
fn default_poll_interval_ms() -> u64 {
    3000
}
fn default_load_interval_ms() -> u64 {
    5000
}
fn default_max_work_ms() -> u64 {
    500
}
fn default_error_probability() -> f64 {
    0.1
}
