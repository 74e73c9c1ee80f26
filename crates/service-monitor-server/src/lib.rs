//! service-monitor server library entry.
//!
//! Wires settings, the metrics registry, the roster watcher, the load
//! simulator and the HTTP endpoints together. Consumed by the binary
//! (`main.rs`) and by integration tests.

pub mod app_state;
pub mod config;
pub mod obs;
pub mod ops;
pub mod router;
pub mod simulator;
pub mod watch;
