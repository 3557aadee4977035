//! The metric registry and its snapshots.

mod snapshot;
mod store;

pub use snapshot::Snapshot;
pub use store::Registry;
