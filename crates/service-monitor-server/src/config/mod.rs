//! Service settings loader (strict parsing).
//!
//! Settings come from an optional YAML file. The roster path can also be
//! overridden by `CONFIG_PATH`, which wins over the file.

pub mod schema;

use std::{env, fs};

use service_monitor_core::error::{MonitorError, Result};

pub use schema::{LoadTarget, RosterSection, ServerSection, Settings, SimulationSection};

/// Env var naming the YAML settings file.
pub const SETTINGS_ENV: &str = "SERVICE_MONITOR_SETTINGS";
/// Env var overriding `roster.path`.
pub const CONFIG_PATH_ENV: &str = "CONFIG_PATH";

pub fn load_from_file(path: &str) -> Result<Settings> {
    let s = fs::read_to_string(path)
        .map_err(|e| MonitorError::io("error reading settings file", path, e))?;
    load_from_str(&s)
}

pub fn load_from_str(s: &str) -> Result<Settings> {
    let settings: Settings = serde_yaml::from_str(s)
        .map_err(|e| MonitorError::InvalidSettings(format!("invalid yaml: {e}")))?;
    settings.validate()?;
    Ok(settings)
}

/// Resolve settings from the process environment.
pub fn load_from_env() -> Result<Settings> {
    let mut settings = match env::var(SETTINGS_ENV) {
        Ok(path) if !path.is_empty() => {
            tracing::info!(%path, "loading settings file");
            load_from_file(&path)?
        }
        _ => Settings::default(),
    };

    if let Ok(path) = env::var(CONFIG_PATH_ENV) {
        if !path.is_empty() {
            tracing::info!(%path, "using config path from environment");
            settings.roster.path = path;
        }
    }
    Ok(settings)
}
