use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

/// Latest completion rate (pages per second), readable from any thread.
#[derive(Debug, Clone, Default)]
pub struct ThroughputGauge(Arc<AtomicU64>);

impl ThroughputGauge {
    pub fn get(&self) -> f64 {
        f64::from_bits(self.0.load(Ordering::Relaxed))
    }

    pub fn set(&self, rate: f64) {
        self.0.store(rate.to_bits(), Ordering::Relaxed);
    }
}

/// Counts completions and publishes the average rate once per window.
///
/// The rate is only recomputed when a completion is recorded, so after completions stop the
/// gauge keeps reporting the last published value.
#[derive(Debug)]
pub struct RateMeter {
    window: Duration,
    started: Instant,
    count: u64,
    gauge: ThroughputGauge,
}

impl RateMeter {
    pub fn new(window: Duration, gauge: ThroughputGauge) -> Self {
        Self::starting_at(window, gauge, Instant::now())
    }

    pub fn starting_at(window: Duration, gauge: ThroughputGauge, started: Instant) -> Self {
        Self {
            window,
            started,
            count: 0,
            gauge,
        }
    }

    /// Records one completion at `now`. Returns the published rate when a window closes.
    pub fn record(&mut self, now: Instant) -> Option<f64> {
        self.count += 1;
        let elapsed = now.saturating_duration_since(self.started);
        if elapsed <= self.window {
            return None;
        }

        let rate = self.count as f64 / elapsed.as_secs_f64();
        self.gauge.set(rate);
        self.started = now;
        self.count = 0;
        Some(rate)
    }

    pub fn gauge(&self) -> &ThroughputGauge {
        &self.gauge
    }
}
