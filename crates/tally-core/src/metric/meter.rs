use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, PoisonError};
use std::time::Instant;

use crate::unit::TimeUnit;

/// Counts events and reports their mean rate since creation.
#[derive(Debug)]
pub struct Meter {
    event_type: String,
    rate_unit: TimeUnit,
    count: AtomicU64,
    started: Mutex<Instant>,
}

impl Meter {
    /// `event_type` is the plural noun of what is counted, e.g. `"requests"`.
    pub fn new(event_type: impl Into<String>, rate_unit: TimeUnit) -> Self {
        Self {
            event_type: event_type.into(),
            rate_unit,
            count: AtomicU64::new(0),
            started: Mutex::new(Instant::now()),
        }
    }

    pub fn mark(&self) {
        self.mark_n(1);
    }

    pub fn mark_n(&self, n: u64) {
        self.count.fetch_add(n, Ordering::Relaxed);
    }

    pub fn count(&self) -> u64 {
        self.count.load(Ordering::Relaxed)
    }

    /// Events per `rate_unit`, averaged over the meter's lifetime.
    pub fn mean_rate(&self) -> f64 {
        let elapsed = self
            .started
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .elapsed()
            .as_secs_f64();
        if elapsed <= 0.0 {
            return 0.0;
        }
        self.count() as f64 / elapsed * self.rate_unit.as_secs_f64()
    }

    /// Reset the count and restart the rate window.
    pub fn clear(&self) {
        let mut started = self.started.lock().unwrap_or_else(PoisonError::into_inner);
        self.count.store(0, Ordering::Relaxed);
        *started = Instant::now();
    }

    pub fn event_type(&self) -> &str {
        &self.event_type
    }

    pub fn rate_unit(&self) -> TimeUnit {
        self.rate_unit
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_marks() {
        let m = Meter::new("requests", TimeUnit::Seconds);
        m.mark();
        m.mark_n(4);
        assert_eq!(m.count(), 5);
        assert_eq!(m.event_type(), "requests");
        assert!(m.mean_rate() > 0.0);
    }

    #[test]
    fn clear_restarts_meter() {
        let m = Meter::new("requests", TimeUnit::Seconds);
        m.mark_n(10);
        m.clear();
        assert_eq!(m.count(), 0);
        assert_eq!(m.mean_rate(), 0.0);
    }

    #[test]
    fn idle_meter_has_zero_rate() {
        let m = Meter::new("jobs", TimeUnit::Minutes);
        assert_eq!(m.mean_rate(), 0.0);
    }
}
