//! tally demo host
//!
//! - Loads `tally.yaml` (defaults when the file is missing)
//! - Initializes the registry lifecycle (VM gauges, console reporter)
//! - Records a few demo metrics from worker tasks until Ctrl-C

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use tracing_subscriber::{fmt, EnvFilter};

use tally_core::error::Result;
use tally_core::{MetricKey, TimeUnit};
use tally_registry::{config, Metrics, Registry};

const CONFIG_PATH: &str = "tally.yaml";

#[tokio::main]
async fn main() {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    if let Err(e) = run().await {
        tracing::error!(error = %e, "tally demo failed");
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cfg = if Path::new(CONFIG_PATH).exists() {
        config::load_from_file(CONFIG_PATH)?
    } else {
        tracing::info!(path = CONFIG_PATH, "config not found, using defaults");
        config::TallyConfig::default()
    };

    let metrics = Metrics::initialize(&cfg, Arc::new(Registry::new()))?;
    let registry = metrics.registry();

    let requests = registry.get_or_create_meter(
        MetricKey::new("demo.Server", "requests")?,
        "requests",
        TimeUnit::Seconds,
    )?;
    let latency = registry.get_or_create_timer(
        MetricKey::new("demo.Server", "latency")?,
        TimeUnit::Milliseconds,
        TimeUnit::Seconds,
    )?;
    let in_flight = registry.get_or_create_counter(MetricKey::new("demo.Server", "in_flight")?)?;

    let worker = tokio::spawn(async move {
        let mut n: u64 = 0;
        loop {
            in_flight.inc();
            let ctx = latency.start();
            tokio::time::sleep(Duration::from_millis(5 + n % 20)).await;
            ctx.stop();
            in_flight.dec();
            requests.mark();
            n += 1;
        }
    });

    tracing::info!(metrics = registry.len(), "tally demo running, Ctrl-C to stop");
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "ctrl-c handler failed");
    }

    worker.abort();
    metrics.shutdown().await;
    Ok(())
}
