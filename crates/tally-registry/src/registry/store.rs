use std::sync::Arc;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use tracing::{debug, trace};

use tally_core::error::{Result, TallyError};
use tally_core::{
    AttributeSource, Counter, ExternalGauge, Gauge, Histogram, Meter, Metric, MetricKey,
    Reading, SampleMode, TimeUnit, Timer, TypedMetric,
};

use super::snapshot::Snapshot;

/// Concurrent directory of metrics keyed by [`MetricKey`].
///
/// Entries are only ever added. The first handle published for a key stays
/// canonical for the registry's lifetime; every later request for that key
/// gets the same instance back.
///
/// Creation is speculative: a missing metric is built before taking the
/// shard lock and inserted only if the key is still vacant. A thread that
/// loses the race drops its candidate unpublished and returns the winner.
#[derive(Default)]
pub struct Registry {
    metrics: DashMap<MetricKey, Metric>,
}

impl Registry {
    pub fn new() -> Self {
        Self {
            metrics: DashMap::new(),
        }
    }

    pub fn get(&self, key: &MetricKey) -> Option<Metric> {
        self.metrics.get(key).map(|r| r.value().clone())
    }

    pub fn len(&self) -> usize {
        self.metrics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.metrics.is_empty()
    }

    /// Return the metric at `key`, publishing `make()` first if the key is vacant.
    ///
    /// `make` runs outside any lock and only when the key looked vacant; its
    /// result is discarded if another caller publishes first. No kind check
    /// happens here: whatever is already registered wins.
    pub fn get_or_create_with(&self, key: MetricKey, make: impl FnOnce() -> Metric) -> Metric {
        if let Some(existing) = self.get(&key) {
            return existing;
        }

        let candidate = make();

        match self.metrics.entry(key) {
            Entry::Occupied(e) => {
                trace!(key = %e.key(), "lost registration race, discarding candidate");
                e.get().clone()
            }
            Entry::Vacant(e) => {
                debug!(key = %e.key(), kind = %candidate.kind(), "metric registered");
                e.insert(candidate).value().clone()
            }
        }
    }

    /// Typed get-or-create shared by every kind-specific entry point.
    ///
    /// Fails with `KindMismatch` if `key` already holds another kind; the
    /// existing metric is left untouched.
    pub fn get_or_create<M: TypedMetric>(
        &self,
        key: MetricKey,
        make: impl FnOnce() -> M,
    ) -> Result<Arc<M>> {
        let metric = self.get_or_create_with(key.clone(), || M::into_metric(Arc::new(make())));
        M::from_metric(&metric).ok_or_else(|| TallyError::KindMismatch {
            key: key.to_string(),
            expected: M::KIND,
            found: metric.kind(),
        })
    }

    /// Register a caller-built gauge; returns the canonical one for `key`,
    /// which is not `gauge` if another caller got there first.
    pub fn get_or_create_gauge<T>(&self, key: MetricKey, gauge: Gauge<T>) -> Result<Arc<Gauge<T>>>
    where
        T: Into<Reading> + 'static,
    {
        self.get_or_create(key, move || gauge)
    }

    pub fn get_or_create_counter(&self, key: MetricKey) -> Result<Arc<Counter>> {
        self.get_or_create(key, Counter::new)
    }

    pub fn get_or_create_histogram(
        &self,
        key: MetricKey,
        mode: SampleMode,
    ) -> Result<Arc<Histogram>> {
        self.get_or_create(key, || Histogram::new(mode))
    }

    pub fn get_or_create_meter(
        &self,
        key: MetricKey,
        event_type: &str,
        rate_unit: TimeUnit,
    ) -> Result<Arc<Meter>> {
        self.get_or_create(key, || Meter::new(event_type, rate_unit))
    }

    pub fn get_or_create_timer(
        &self,
        key: MetricKey,
        duration_unit: TimeUnit,
        rate_unit: TimeUnit,
    ) -> Result<Arc<Timer>> {
        self.get_or_create(key, || Timer::new(duration_unit, rate_unit))
    }

    /// Register a gauge backed by `attribute` of the managed object `object_name`.
    ///
    /// The object name is validated before the registry is consulted.
    pub fn get_or_create_external_gauge(
        &self,
        key: MetricKey,
        object_name: &str,
        attribute: &str,
        source: Arc<dyn AttributeSource>,
    ) -> Result<Arc<ExternalGauge>> {
        let gauge = ExternalGauge::new(object_name, attribute, source)?;
        self.get_or_create(key, move || gauge)
    }

    /// Point-in-time copy of every registered (key, metric) pair.
    ///
    /// Shards are read one at a time, so registrations racing with the copy
    /// may or may not be included.
    pub fn snapshot(&self) -> Snapshot {
        self.metrics
            .iter()
            .map(|r| (r.key().clone(), r.value().clone()))
            .collect()
    }
}
