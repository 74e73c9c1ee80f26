//! service-monitor core: the roster model, its on-disk format, and the error
//! taxonomy shared by the server.
//!
//! This crate carries no runtime or HTTP dependencies so the roster rules can
//! be exercised in isolation.
//!
//! # Defensive guarantees
//! Panics, `unwrap`, and `expect` are compile-denied here
//! (`#![deny(clippy::panic, clippy::unwrap_used, clippy::expect_used)]`).
//! Every fallible path surfaces as `MonitorError`/`Result`; a bad roster file
//! must never take the process down.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod error;
pub mod roster;

/// Shared result type.
pub use error::{ErrorKind, MonitorError, Result};
pub use roster::Roster;
