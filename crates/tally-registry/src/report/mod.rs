//! Reporters that periodically read the registry.

pub mod console;

pub use console::{render, ConsoleReporter};
