use std::time::{Duration, Instant};

use super::histogram::{Histogram, SampleMode};
use super::meter::Meter;
use crate::unit::TimeUnit;

/// A histogram of durations plus a meter of how often they were recorded.
///
/// Durations are stored in nanoseconds and reported in `duration_unit`.
#[derive(Debug)]
pub struct Timer {
    duration_unit: TimeUnit,
    durations: Histogram,
    calls: Meter,
}

impl Timer {
    pub fn new(duration_unit: TimeUnit, rate_unit: TimeUnit) -> Self {
        Self {
            duration_unit,
            durations: Histogram::new(SampleMode::Biased),
            calls: Meter::new("calls", rate_unit),
        }
    }

    pub fn update(&self, elapsed: Duration) {
        let nanos = i64::try_from(elapsed.as_nanos()).unwrap_or(i64::MAX);
        self.durations.update(nanos);
        self.calls.mark();
    }

    /// Run `f` and record how long it took.
    pub fn time<R>(&self, f: impl FnOnce() -> R) -> R {
        let ctx = self.start();
        let out = f();
        ctx.stop();
        out
    }

    /// Start timing; the duration is recorded on [`TimerContext::stop`] or drop.
    pub fn start(&self) -> TimerContext<'_> {
        TimerContext {
            timer: self,
            started: Instant::now(),
            stopped: false,
        }
    }

    pub fn count(&self) -> u64 {
        self.durations.count()
    }

    pub fn min(&self) -> f64 {
        self.scale(self.durations.min() as f64)
    }

    pub fn max(&self) -> f64 {
        self.scale(self.durations.max() as f64)
    }

    pub fn mean(&self) -> f64 {
        self.scale(self.durations.mean())
    }

    pub fn std_dev(&self) -> f64 {
        self.scale(self.durations.std_dev())
    }

    pub fn quantiles(&self, qs: &[f64]) -> Vec<f64> {
        self.durations
            .quantiles(qs)
            .into_iter()
            .map(|v| self.scale(v))
            .collect()
    }

    pub fn mean_rate(&self) -> f64 {
        self.calls.mean_rate()
    }

    pub fn duration_unit(&self) -> TimeUnit {
        self.duration_unit
    }

    pub fn rate_unit(&self) -> TimeUnit {
        self.calls.rate_unit()
    }

    /// Forget recorded durations and restart the call rate.
    pub fn clear(&self) {
        self.durations.clear();
        self.calls.clear();
    }

    fn scale(&self, nanos: f64) -> f64 {
        self.duration_unit.from_nanos(nanos)
    }
}

/// An in-flight measurement started by [`Timer::start`].
#[must_use = "dropping the context immediately records a near-zero duration"]
pub struct TimerContext<'a> {
    timer: &'a Timer,
    started: Instant,
    stopped: bool,
}

impl TimerContext<'_> {
    /// Record the elapsed time and return it.
    pub fn stop(mut self) -> Duration {
        self.record()
    }

    fn record(&mut self) -> Duration {
        let elapsed = self.started.elapsed();
        self.stopped = true;
        self.timer.update(elapsed);
        elapsed
    }
}

impl Drop for TimerContext<'_> {
    fn drop(&mut self) {
        if !self.stopped {
            self.record();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reports_in_duration_unit() {
        let t = Timer::new(TimeUnit::Milliseconds, TimeUnit::Seconds);
        t.update(Duration::from_millis(10));
        t.update(Duration::from_millis(30));
        assert_eq!(t.count(), 2);
        assert_eq!(t.min(), 10.0);
        assert_eq!(t.max(), 30.0);
        assert_eq!(t.mean(), 20.0);
        assert_eq!(t.duration_unit(), TimeUnit::Milliseconds);
    }

    #[test]
    fn clear_resets_durations_and_rate() {
        let t = Timer::new(TimeUnit::Milliseconds, TimeUnit::Seconds);
        t.update(Duration::from_millis(3));
        t.update(Duration::from_millis(5));
        t.clear();
        assert_eq!(t.count(), 0);
        assert_eq!(t.max(), 0.0);
        assert_eq!(t.mean_rate(), 0.0);
    }

    #[test]
    fn time_records_once_and_returns_value() {
        let t = Timer::new(TimeUnit::Microseconds, TimeUnit::Seconds);
        let out = t.time(|| 2 + 2);
        assert_eq!(out, 4);
        assert_eq!(t.count(), 1);
    }

    #[test]
    fn context_records_on_drop() {
        let t = Timer::new(TimeUnit::Nanoseconds, TimeUnit::Seconds);
        {
            let _ctx = t.start();
        }
        let ctx = t.start();
        ctx.stop();
        assert_eq!(t.count(), 2);
    }
}
