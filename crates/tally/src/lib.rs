//! Top-level facade crate for tally.
//!
//! Re-exports metric kinds and the registry so users can depend on a single crate.

pub mod core {
    pub use tally_core::*;
}

pub mod registry {
    pub use tally_registry::*;
}

pub use tally_core::{MetricKey, Result, TallyError};
pub use tally_registry::{Metrics, Registry};
