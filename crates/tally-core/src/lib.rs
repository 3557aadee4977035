//! tally core: metric identity, metric kinds, and the shared error surface.
//!
//! This crate defines what the registry stores and how it is addressed. It
//! carries no runtime or map dependencies so metric kinds can be used (and
//! tested) without a registry at all.
//!
//! # Defensive guarantees
//! Panics, `unwrap`, and `expect` are compile-denied here
//! (`#![deny(clippy::panic, clippy::unwrap_used, clippy::expect_used)]`).
//! All fallible paths surface as `TallyError`/`Result`.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod error;
pub mod key;
pub mod metric;
pub mod object_name;
pub mod unit;

/// Shared result type.
pub use error::{ErrorCode, Result, TallyError};
pub use key::MetricKey;
pub use metric::{
    AttributeSource, Counter, ExternalGauge, Gauge, Histogram, Meter, Metric, MetricKind,
    ReadGauge, Reading, SampleMode, Timer, TimerContext, TypedMetric,
};
pub use object_name::ObjectName;
pub use unit::TimeUnit;
