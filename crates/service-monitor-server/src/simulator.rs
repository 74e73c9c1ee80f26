//! Background load simulator.
//!
//! Writes a random value in `[0, 10)` to the configured load gauge on every
//! tick, independent of real request traffic.

use std::sync::Arc;
use std::time::Duration;

use rand::Rng;
use tokio::task::JoinHandle;

use crate::obs::ServiceMetrics;

pub const MAX_SIMULATED_LOAD: f64 = 10.0;

pub fn sample_load() -> f64 {
    rand::thread_rng().gen_range(0.0..MAX_SIMULATED_LOAD)
}

pub async fn run_load_simulator(metrics: Arc<ServiceMetrics>, every: Duration) {
    tracing::debug!(interval_ms = every.as_millis() as u64, "starting load simulator");
    loop {
        metrics.load_gauge().set(sample_load());
        tokio::time::sleep(every).await;
    }
}

pub fn spawn_load_simulator(metrics: Arc<ServiceMetrics>, every: Duration) -> JoinHandle<()> {
    tokio::spawn(run_load_simulator(metrics, every))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn samples_stay_in_range() {
        for _ in 0..1000 {
            let v = sample_load();
            assert!((0.0..MAX_SIMULATED_LOAD).contains(&v));
        }
    }

    #[tokio::test]
    async fn simulator_writes_load_gauge() {
        let metrics = Arc::new(ServiceMetrics::default());
        metrics.simulated_load.set(-1.0);

        let handle = spawn_load_simulator(Arc::clone(&metrics), Duration::from_secs(5));
        tokio::time::sleep(Duration::from_millis(50)).await;
        handle.abort();

        let v = metrics.simulated_load.get();
        assert!((0.0..MAX_SIMULATED_LOAD).contains(&v));
        assert_eq!(metrics.active_requests.get(), 0.0);
    }
}
