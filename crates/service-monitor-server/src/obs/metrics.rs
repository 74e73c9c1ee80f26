//! Metrics registry for the service monitor.
//!
//! Provides counter, gauge, labeled gauge and histogram types. Floating point
//! values are kept as IEEE-754 bits inside `AtomicU64`. Labels are flattened
//! into sorted key vectors backed by `DashMap`; label sets are sorted again at
//! render time so every scrape lists series in the same order.

use dashmap::DashMap;
use std::fmt::Write;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use service_monitor_core::Roster;

use crate::config::LoadTarget;

type LabelKey = Vec<(String, String)>;

/// Helper to escape label values.
fn escape_label(v: &str) -> String {
    v.replace('\\', "\\\\").replace('"', "\\\"").replace('\n', "\\n")
}

fn label_key(labels: &[(&str, &str)]) -> LabelKey {
    let mut key: LabelKey = labels
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    key.sort();
    key
}

fn label_str(key: &[(String, String)]) -> String {
    key.iter()
        .map(|(k, v)| format!("{}=\"{}\"", k, escape_label(v)))
        .collect::<Vec<_>>()
        .join(",")
}

/// Prometheus spells infinities `+Inf`/`-Inf`.
fn fmt_value(v: f64) -> String {
    if v == f64::INFINITY {
        "+Inf".into()
    } else if v == f64::NEG_INFINITY {
        "-Inf".into()
    } else {
        v.to_string()
    }
}

fn write_header(out: &mut String, name: &str, help: &str, kind: &str) {
    let _ = writeln!(out, "# HELP {} {}", name, help);
    let _ = writeln!(out, "# TYPE {} {}", name, kind);
}

struct AtomicF64(AtomicU64);

impl AtomicF64 {
    fn new(v: f64) -> Self {
        Self(AtomicU64::new(v.to_bits()))
    }

    fn load(&self) -> f64 {
        f64::from_bits(self.0.load(Ordering::Relaxed))
    }

    fn store(&self, v: f64) {
        self.0.store(v.to_bits(), Ordering::Relaxed);
    }

    fn add(&self, delta: f64) {
        let _ = self.0.fetch_update(Ordering::Relaxed, Ordering::Relaxed, |bits| {
            Some((f64::from_bits(bits) + delta).to_bits())
        });
    }
}

impl Default for AtomicF64 {
    fn default() -> Self {
        Self::new(0.0)
    }
}

#[derive(Default)]
pub struct Counter {
    value: AtomicU64,
}

impl Counter {
    /// Increment by 1.
    pub fn inc(&self) {
        self.add(1);
    }

    pub fn add(&self, v: u64) {
        self.value.fetch_add(v, Ordering::Relaxed);
    }

    pub fn get(&self) -> u64 {
        self.value.load(Ordering::Relaxed)
    }

    fn render(&self, name: &str, help: &str, out: &mut String) {
        write_header(out, name, help, "counter");
        let _ = writeln!(out, "{} {}", name, self.get());
    }
}

#[derive(Default)]
pub struct Gauge {
    value: AtomicF64,
}

impl Gauge {
    pub fn set(&self, v: f64) {
        self.value.store(v);
    }

    pub fn get(&self) -> f64 {
        self.value.load()
    }

    pub fn add(&self, delta: f64) {
        self.value.add(delta);
    }

    /// Increment by 1.
    pub fn inc(&self) {
        self.add(1.0);
    }

    /// Decrement by 1.
    pub fn dec(&self) {
        self.add(-1.0);
    }

    /// Increment now and decrement when the returned guard drops.
    pub fn track_inflight(&self) -> InflightGuard<'_> {
        self.inc();
        InflightGuard { gauge: self }
    }

    fn render(&self, name: &str, help: &str, out: &mut String) {
        write_header(out, name, help, "gauge");
        let _ = writeln!(out, "{} {}", name, fmt_value(self.get()));
    }
}

/// Scope guard returned by [`Gauge::track_inflight`].
pub struct InflightGuard<'a> {
    gauge: &'a Gauge,
}

impl Drop for InflightGuard<'_> {
    fn drop(&mut self) {
        self.gauge.dec();
    }
}

#[derive(Default)]
pub struct GaugeVec {
    map: DashMap<LabelKey, AtomicF64>,
}

impl GaugeVec {
    pub fn set(&self, labels: &[(&str, &str)], v: f64) {
        self.map
            .entry(label_key(labels))
            .or_insert_with(AtomicF64::default)
            .store(v);
    }

    pub fn get(&self, labels: &[(&str, &str)]) -> Option<f64> {
        self.map.get(&label_key(labels)).map(|g| g.value().load())
    }

    /// Drop every label set.
    pub fn reset(&self) {
        self.map.clear();
    }

    /// Number of label sets currently present.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    fn render(&self, name: &str, help: &str, out: &mut String) {
        write_header(out, name, help, "gauge");
        let mut series: Vec<(String, f64)> = self
            .map
            .iter()
            .map(|r| (label_str(r.key()), r.value().load()))
            .collect();
        series.sort_by(|a, b| a.0.cmp(&b.0));

        for (labels, val) in series {
            let _ = writeln!(out, "{}{{{}}} {}", name, labels, fmt_value(val));
        }
    }
}

/// `count` upper bounds spaced `width` apart, the first at `start`.
pub fn linear_buckets(start: f64, width: f64, count: usize) -> Vec<f64> {
    (0..count).map(|i| start + width * i as f64).collect()
}

/// Histogram with fixed upper bounds in seconds. Buckets are cumulative.
pub struct Histogram {
    bounds: Vec<f64>,
    buckets: Vec<AtomicU64>,
    count: AtomicU64,
    sum: AtomicF64,
}

impl Histogram {
    pub fn new(mut bounds: Vec<f64>) -> Self {
        bounds.retain(|b| b.is_finite());
        bounds.sort_by(f64::total_cmp);
        bounds.dedup();
        let buckets = bounds.iter().map(|_| AtomicU64::new(0)).collect();
        Self {
            bounds,
            buckets,
            count: AtomicU64::new(0),
            sum: AtomicF64::default(),
        }
    }

    pub fn observe(&self, v: f64) {
        self.count.fetch_add(1, Ordering::Relaxed);
        self.sum.add(v);

        // Cumulative: every bucket whose bound is >= v
        for (i, &le) in self.bounds.iter().enumerate() {
            if v <= le {
                self.buckets[i].fetch_add(1, Ordering::Relaxed);
            }
        }
    }

    pub fn observe_duration(&self, d: Duration) {
        self.observe(d.as_secs_f64());
    }

    pub fn count(&self) -> u64 {
        self.count.load(Ordering::Relaxed)
    }

    pub fn sum(&self) -> f64 {
        self.sum.load()
    }

    fn render(&self, name: &str, help: &str, out: &mut String) {
        write_header(out, name, help, "histogram");
        for (i, &le) in self.bounds.iter().enumerate() {
            let count = self.buckets[i].load(Ordering::Relaxed);
            let _ = writeln!(out, "{}_bucket{{le=\"{}\"}} {}", name, fmt_value(le), count);
        }
        let count = self.count();
        let _ = writeln!(out, "{}_bucket{{le=\"+Inf\"}} {}", name, count);
        let _ = writeln!(out, "{}_sum {}", name, fmt_value(self.sum()));
        let _ = writeln!(out, "{}_count {}", name, count);
    }
}

pub const REQUESTS_TOTAL: &str = "service_monitor_requests_total";
pub const REQUEST_DURATION: &str = "service_monitor_request_duration_seconds";
pub const ACTIVE_REQUESTS: &str = "service_monitor_active_requests";
pub const ERROR_RATE: &str = "service_monitor_error_rate";
pub const SERVICE_UP: &str = "service_monitor_up";
pub const SIMULATED_LOAD: &str = "service_monitor_simulated_load";

/// Label name carried by the per-service status gauge.
pub const SERVICE_LABEL: &str = "service";

/// Every metric the service exposes.
pub struct ServiceMetrics {
    pub requests_total: Counter,
    pub request_duration: Histogram,
    pub active_requests: Gauge,
    pub error_rate: Gauge,
    pub service_status: GaugeVec,
    pub simulated_load: Gauge,
    load_target: LoadTarget,
}

impl Default for ServiceMetrics {
    fn default() -> Self {
        Self::new(LoadTarget::default())
    }
}

impl ServiceMetrics {
    pub fn new(load_target: LoadTarget) -> Self {
        Self {
            requests_total: Counter::default(),
            request_duration: Histogram::new(linear_buckets(0.01, 0.05, 10)),
            active_requests: Gauge::default(),
            error_rate: Gauge::default(),
            service_status: GaugeVec::default(),
            simulated_load: Gauge::default(),
            load_target,
        }
    }

    /// Gauge the background load simulator writes to.
    pub fn load_gauge(&self) -> &Gauge {
        match self.load_target {
            LoadTarget::SimulatedLoad => &self.simulated_load,
            LoadTarget::ActiveRequests => &self.active_requests,
        }
    }

    /// Replace every service status with the roster's view.
    ///
    /// Up names are set before down names, so a name listed in both ends at 0.
    pub fn apply_roster(&self, roster: &Roster) {
        let overlap = roster.overlapping();
        if !overlap.is_empty() {
            tracing::warn!(services = ?overlap, "services listed as both up and down, reporting down");
        }

        self.service_status.reset();

        for svc in &roster.up {
            self.service_status.set(&[(SERVICE_LABEL, svc.as_str())], 1.0);
        }
        for svc in &roster.down {
            self.service_status.set(&[(SERVICE_LABEL, svc.as_str())], 0.0);
        }
    }

    pub fn service_status(&self, service: &str) -> Option<f64> {
        self.service_status.get(&[(SERVICE_LABEL, service)])
    }

    /// Render all registered metrics.
    pub fn render(&self) -> String {
        let mut out = String::new();
        self.requests_total
            .render(REQUESTS_TOTAL, "The total number of processed requests", &mut out);
        self.request_duration
            .render(REQUEST_DURATION, "Request duration distribution", &mut out);
        self.active_requests
            .render(ACTIVE_REQUESTS, "Number of active requests", &mut out);
        self.error_rate.render(ERROR_RATE, "Current error rate", &mut out);
        self.service_status.render(
            SERVICE_UP,
            "Status of monitored services (1=up, 0=down)",
            &mut out,
        );
        if self.load_target == LoadTarget::SimulatedLoad {
            self.simulated_load
                .render(SIMULATED_LOAD, "Synthetic background load", &mut out);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn linear_buckets_match_duration_layout() {
        let b = linear_buckets(0.01, 0.05, 10);
        assert_eq!(b.len(), 10);
        assert!((b[0] - 0.01).abs() < 1e-12);
        assert!((b[9] - 0.46).abs() < 1e-12);
    }

    #[test]
    fn histogram_buckets_are_cumulative() {
        let h = Histogram::new(vec![0.1, 0.5, 1.0]);
        h.observe(0.05);
        h.observe(0.3);
        h.observe(2.0);

        let mut out = String::new();
        h.render("h", "test", &mut out);
        assert!(out.contains("h_bucket{le=\"0.1\"} 1\n"));
        assert!(out.contains("h_bucket{le=\"0.5\"} 2\n"));
        assert!(out.contains("h_bucket{le=\"1\"} 2\n"));
        assert!(out.contains("h_bucket{le=\"+Inf\"} 3\n"));
        assert!(out.contains("h_count 3\n"));
        assert!((h.sum() - 2.35).abs() < 1e-9);
    }

    #[test]
    fn inflight_guard_restores_gauge() {
        let g = Gauge::default();
        g.set(2.0);
        {
            let _guard = g.track_inflight();
            assert_eq!(g.get(), 3.0);
        }
        assert_eq!(g.get(), 2.0);
    }

    #[test]
    fn gauge_vec_labels_are_escaped_and_sorted() {
        let v = GaugeVec::default();
        v.set(&[("service", "zeta")], 1.0);
        v.set(&[("service", "al\"pha")], 0.0);

        let mut out = String::new();
        v.render("up", "test", &mut out);
        let alpha = out.find("up{service=\"al\\\"pha\"} 0").unwrap();
        let zeta = out.find("up{service=\"zeta\"} 1").unwrap();
        assert!(alpha < zeta);
    }

    #[test]
    fn load_gauge_follows_target() {
        let m = ServiceMetrics::new(LoadTarget::ActiveRequests);
        m.load_gauge().set(7.0);
        assert_eq!(m.active_requests.get(), 7.0);
        assert!(!m.render().contains(SIMULATED_LOAD));

        let m = ServiceMetrics::new(LoadTarget::SimulatedLoad);
        m.load_gauge().set(7.0);
        assert_eq!(m.active_requests.get(), 0.0);
        assert!(m.render().contains("service_monitor_simulated_load 7\n"));
    }
}
