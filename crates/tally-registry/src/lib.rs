//! tally registry library entry.
//!
//! This crate owns the concurrent metric registry, the attribute server
//! behind external gauges, the console reporter, and the explicit
//! initialize/shutdown lifecycle that starts them. It is consumed by the demo
//! binary (`main.rs`), by the `tally` facade, and by integration tests.

pub mod attributes;
pub mod config;
pub mod global;
pub mod lifecycle;
pub mod registry;
pub mod report;
pub mod vm;

pub use attributes::AttributeServer;
pub use lifecycle::Metrics;
pub use registry::{Registry, Snapshot};
