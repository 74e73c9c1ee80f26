//! Shared error type across service-monitor crates.

use std::path::PathBuf;

use thiserror::Error;

/// Stable error codes used in log fields and assertions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// File missing, unreadable or unwritable.
    IoFailure,
    /// Malformed roster content.
    ParseFailure,
    /// Roster directory absent and could not be created.
    DirectoryMissing,
    /// Settings document rejected.
    InvalidSettings,
    /// Anything else (bind, serve).
    Internal,
}

impl ErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorKind::IoFailure => "IO_FAILURE",
            ErrorKind::ParseFailure => "PARSE_FAILURE",
            ErrorKind::DirectoryMissing => "DIRECTORY_MISSING",
            ErrorKind::InvalidSettings => "INVALID_SETTINGS",
            ErrorKind::Internal => "INTERNAL",
        }
    }
}

/// Shared result type.
pub type Result<T> = std::result::Result<T, MonitorError>;

/// Unified error type used by core and server.
#[derive(Debug, Error)]
pub enum MonitorError {
    #[error("{op} {}: {source}", .path.display())]
    Io {
        op: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("error parsing config file {}: {message}", .path.display())]
    Parse { path: PathBuf, message: String },
    #[error("config directory {} is missing and could not be created: {source}", .path.display())]
    DirectoryMissing {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid settings: {0}")]
    InvalidSettings(String),
    #[error("internal: {0}")]
    Internal(String),
}

impl MonitorError {
    pub fn io(op: &'static str, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        MonitorError::Io { op, path: path.into(), source }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            MonitorError::Io { .. } => ErrorKind::IoFailure,
            MonitorError::Parse { .. } => ErrorKind::ParseFailure,
            MonitorError::DirectoryMissing { .. } => ErrorKind::DirectoryMissing,
            MonitorError::InvalidSettings(_) => ErrorKind::InvalidSettings,
            MonitorError::Internal(_) => ErrorKind::Internal,
        }
    }
}
