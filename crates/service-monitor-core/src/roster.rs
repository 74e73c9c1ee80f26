//! Roster model and its TOML file format.
//!
//! A roster is two ordered lists of service names. The names double as the
//! `service` label values of the status gauge, so no other identity exists.
//! Every read goes back to disk; nothing here caches.

use std::fmt;
use std::fs;
use std::io::ErrorKind as IoErrorKind;
use std::path::Path;

use serde::Deserialize;

use crate::error::{MonitorError, Result};

/// Document written when the roster file does not exist at startup.
pub const DEFAULT_ROSTER_TOML: &str = r#"# Service Monitor Configuration

# Services that are currently up
up_services = [
  "api-gateway",
  "auth-service",
  "user-service",
  "payment-service"
]

# Services that are currently down
down_services = [
  "notification-service",
  "recommendation-engine"
]
"#;

/// Service published when even the first load fails.
pub const FALLBACK_SERVICE: &str = "default-service";

/// Keys other than the two lists are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Roster {
    #[serde(default, rename = "up_services")]
    pub up: Vec<String>,

    #[serde(default, rename = "down_services")]
    pub down: Vec<String>,
}

impl Roster {
    pub fn new<U, D>(up: U, down: D) -> Self
    where
        U: IntoIterator,
        U::Item: Into<String>,
        D: IntoIterator,
        D::Item: Into<String>,
    {
        Self {
            up: up.into_iter().map(Into::into).collect(),
            down: down.into_iter().map(Into::into).collect(),
        }
    }

    /// Hard-coded roster used when nothing could be loaded.
    pub fn fallback() -> Self {
        Self::new([FALLBACK_SERVICE], Vec::<String>::new())
    }

    /// Names listed as both up and down, in `up` order.
    ///
    /// Such names are not rejected: whichever list is applied last wins.
    pub fn overlapping(&self) -> Vec<&str> {
        self.up
            .iter()
            .filter(|name| self.down.contains(name))
            .map(String::as_str)
            .collect()
    }
}

/// Plain-text listing served by the config dump endpoint.
impl fmt::Display for Roster {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "UP SERVICES ({}):", self.up.len())?;
        for svc in &self.up {
            writeln!(f, "- {svc}")?;
        }

        writeln!(f, "\nDOWN SERVICES ({}):", self.down.len())?;
        for svc in &self.down {
            writeln!(f, "- {svc}")?;
        }
        Ok(())
    }
}

pub fn load_from_file(path: impl AsRef<Path>) -> Result<Roster> {
    let path = path.as_ref();
    let bytes = fs::read(path).map_err(|e| MonitorError::io("error reading config file", path, e))?;
    load_from_bytes(&bytes, path)
}

/// Parse raw file content read from `path`. Invalid UTF-8 is malformed content.
pub fn load_from_bytes(bytes: &[u8], path: &Path) -> Result<Roster> {
    let s = std::str::from_utf8(bytes).map_err(|e| MonitorError::Parse {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    parse(s, path)
}

pub fn load_from_str(s: &str) -> Result<Roster> {
    parse(s, Path::new("<inline>"))
}

fn parse(s: &str, path: &Path) -> Result<Roster> {
    toml::from_str(s).map_err(|e| MonitorError::Parse {
        path: path.to_path_buf(),
        message: e.message().to_string(),
    })
}

/// Create the roster's parent directory if it is absent.
///
/// Returns `true` when a directory was created.
pub fn ensure_parent_dir(path: impl AsRef<Path>) -> Result<bool> {
    let Some(dir) = path.as_ref().parent() else { return Ok(false) };
    if dir.as_os_str().is_empty() || dir.exists() {
        return Ok(false);
    }

    tracing::info!(dir = %dir.display(), "config directory does not exist, creating it");
    fs::create_dir_all(dir).map_err(|e| MonitorError::DirectoryMissing {
        path: dir.to_path_buf(),
        source: e,
    })?;
    Ok(true)
}

/// Write [`DEFAULT_ROSTER_TOML`] unless a file already exists at `path`.
///
/// Returns `true` when the default document was written.
pub fn write_default_if_missing(path: impl AsRef<Path>) -> Result<bool> {
    let path = path.as_ref();
    match fs::metadata(path) {
        Ok(_) => return Ok(false),
        Err(e) if e.kind() == IoErrorKind::NotFound => {}
        Err(e) => return Err(MonitorError::io("error checking config file", path, e)),
    }

    tracing::info!(path = %path.display(), "config file does not exist, creating default");
    fs::write(path, DEFAULT_ROSTER_TOML)
        .map_err(|e| MonitorError::io("error creating default config file", path, e))?;
    Ok(true)
}
