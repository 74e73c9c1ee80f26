//! Lightweight in-process metrics.
//!
//! Metric values are stored as atomics and rendered in Prometheus text format
//! by the `/metrics` handler. The registry object is created once in `main`
//! and shared by handle; nothing here is global.

pub mod metrics;

pub use metrics::ServiceMetrics;
