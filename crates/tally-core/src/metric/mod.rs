//! Metric kinds and the handle type the registry stores.
//!
//! Every kind is internally synchronized: once a caller holds an `Arc` to a
//! metric it updates and reads it directly, without going back through the
//! registry. [`Metric`] is the closed set of kinds a registry can hold;
//! [`TypedMetric`] lets typed callers get their concrete handle back out.

mod counter;
mod external;
mod gauge;
mod histogram;
mod meter;
mod timer;

use std::fmt;
use std::sync::Arc;

pub use counter::Counter;
pub use external::{AttributeSource, ExternalGauge};
pub use gauge::{Gauge, ReadGauge, Reading};
pub use histogram::{Histogram, SampleMode};
pub use meter::Meter;
pub use timer::{Timer, TimerContext};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetricKind {
    Gauge,
    Counter,
    Histogram,
    Meter,
    Timer,
    ExternalGauge,
}

impl MetricKind {
    pub fn as_str(self) -> &'static str {
        match self {
            MetricKind::Gauge => "gauge",
            MetricKind::Counter => "counter",
            MetricKind::Histogram => "histogram",
            MetricKind::Meter => "meter",
            MetricKind::Timer => "timer",
            MetricKind::ExternalGauge => "external gauge",
        }
    }
}

impl fmt::Display for MetricKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A shared handle to one registered metric.
///
/// Cloning clones the handle; both clones point at the same metric.
#[derive(Clone)]
pub enum Metric {
    Gauge(Arc<dyn ReadGauge>),
    Counter(Arc<Counter>),
    Histogram(Arc<Histogram>),
    Meter(Arc<Meter>),
    Timer(Arc<Timer>),
    ExternalGauge(Arc<ExternalGauge>),
}

impl Metric {
    pub fn kind(&self) -> MetricKind {
        match self {
            Metric::Gauge(_) => MetricKind::Gauge,
            Metric::Counter(_) => MetricKind::Counter,
            Metric::Histogram(_) => MetricKind::Histogram,
            Metric::Meter(_) => MetricKind::Meter,
            Metric::Timer(_) => MetricKind::Timer,
            Metric::ExternalGauge(_) => MetricKind::ExternalGauge,
        }
    }

    /// True when both handles refer to the same metric instance.
    pub fn same_instance(&self, other: &Metric) -> bool {
        self.addr() == other.addr()
    }

    fn addr(&self) -> *const () {
        match self {
            Metric::Gauge(m) => Arc::as_ptr(m) as *const (),
            Metric::Counter(m) => Arc::as_ptr(m) as *const (),
            Metric::Histogram(m) => Arc::as_ptr(m) as *const (),
            Metric::Meter(m) => Arc::as_ptr(m) as *const (),
            Metric::Timer(m) => Arc::as_ptr(m) as *const (),
            Metric::ExternalGauge(m) => Arc::as_ptr(m) as *const (),
        }
    }
}

impl fmt::Debug for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Metric").field(&self.kind()).finish()
    }
}

/// A concrete metric kind that can be stored in and recovered from a [`Metric`].
pub trait TypedMetric: Send + Sync + Sized + 'static {
    const KIND: MetricKind;

    fn into_metric(this: Arc<Self>) -> Metric;

    /// Recover the concrete handle, or `None` if `metric` holds something else.
    fn from_metric(metric: &Metric) -> Option<Arc<Self>>;
}

macro_rules! typed_metric {
    ($ty:ty, $variant:ident) => {
        impl TypedMetric for $ty {
            const KIND: MetricKind = MetricKind::$variant;

            fn into_metric(this: Arc<Self>) -> Metric {
                Metric::$variant(this)
            }

            fn from_metric(metric: &Metric) -> Option<Arc<Self>> {
                match metric {
                    Metric::$variant(m) => Some(Arc::clone(m)),
                    _ => None,
                }
            }
        }
    };
}

typed_metric!(Counter, Counter);
typed_metric!(Histogram, Histogram);
typed_metric!(Meter, Meter);
typed_metric!(Timer, Timer);
typed_metric!(ExternalGauge, ExternalGauge);

impl<T: Into<Reading> + 'static> TypedMetric for Gauge<T> {
    const KIND: MetricKind = MetricKind::Gauge;

    fn into_metric(this: Arc<Self>) -> Metric {
        Metric::Gauge(this)
    }

    fn from_metric(metric: &Metric) -> Option<Arc<Self>> {
        match metric {
            Metric::Gauge(g) => Arc::clone(g).into_any().downcast::<Gauge<T>>().ok(),
            _ => None,
        }
    }
}
