//! Process statistics exposed as built-in gauges.

use tally_core::error::Result;
use tally_core::{Gauge, MetricKey};

use crate::registry::Registry;

/// Owner of the built-in process gauges.
pub const VM_OWNER: &str = "tally.vm";

/// Register the built-in gauges on `registry`.
///
/// - `tally.vm.thread_count`: OS threads in this process (`-1` if unknown)
/// - `tally.vm.available_parallelism`: CPUs the process may run on
pub fn register(registry: &Registry) -> Result<()> {
    registry.get_or_create_gauge(
        MetricKey::new(VM_OWNER, "thread_count")?,
        Gauge::new(thread_count_or_unknown),
    )?;
    registry.get_or_create_gauge(
        MetricKey::new(VM_OWNER, "available_parallelism")?,
        Gauge::new(available_parallelism),
    )?;
    Ok(())
}

fn thread_count_or_unknown() -> i64 {
    thread_count().map_or(-1, |n| n as i64)
}

/// Best-effort number of OS threads in the current process.
pub fn thread_count() -> Option<u64> {
    #[cfg(target_os = "linux")]
    {
        read_status_threads()
    }
    #[cfg(not(target_os = "linux"))]
    {
        None
    }
}

#[cfg(target_os = "linux")]
fn read_status_threads() -> Option<u64> {
    let status = std::fs::read_to_string("/proc/self/status").ok()?;
    status
        .lines()
        .find_map(|line| line.strip_prefix("Threads:"))
        .and_then(|v| v.trim().parse().ok())
}

pub fn available_parallelism() -> u64 {
    std::thread::available_parallelism()
        .map(|n| n.get() as u64)
        .unwrap_or(1)
}
