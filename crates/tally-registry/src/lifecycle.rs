//! Explicit start/stop of the registry's background work.
//!
//! Nothing happens on first use of a registry. The hosting application calls
//! [`Metrics::initialize`] once it has a config, and [`Metrics::shutdown`]
//! before exit.

use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::info;

use tally_core::error::{Result, TallyError};

use crate::attributes::AttributeServer;
use crate::config::TallyConfig;
use crate::registry::Registry;
use crate::report::ConsoleReporter;
use crate::vm;

struct ReporterTask {
    shutdown: watch::Sender<bool>,
    handle: JoinHandle<()>,
}

pub struct Metrics {
    registry: Arc<Registry>,
    attributes: Arc<AttributeServer>,
    reporter: Mutex<Option<ReporterTask>>,
}

impl Metrics {
    /// Register built-in gauges and start configured reporters.
    ///
    /// Starting the console reporter needs a running Tokio runtime; without
    /// one this fails with `Internal`.
    pub fn initialize(cfg: &TallyConfig, registry: Arc<Registry>) -> Result<Self> {
        cfg.validate()?;

        // Resolve the runtime before publishing anything.
        let console = &cfg.reporting.console;
        let rt = if console.enabled {
            let rt = tokio::runtime::Handle::try_current().map_err(|e| {
                TallyError::Internal(format!("console reporting needs a tokio runtime: {e}"))
            })?;
            Some(rt)
        } else {
            None
        };

        if cfg.vm_metrics {
            vm::register(&registry)?;
        }

        let reporter = rt.map(|rt| {
            let (tx, rx) = watch::channel(false);
            let reporter = ConsoleReporter::stdout(Arc::clone(&registry));
            let handle = rt.spawn(reporter.run(console.period(), rx));
            ReporterTask {
                shutdown: tx,
                handle,
            }
        });

        info!(
            vm_metrics = cfg.vm_metrics,
            console = console.enabled,
            "metrics initialized"
        );

        Ok(Self {
            registry,
            attributes: Arc::new(AttributeServer::new()),
            reporter: Mutex::new(reporter),
        })
    }

    pub fn registry(&self) -> Arc<Registry> {
        Arc::clone(&self.registry)
    }

    /// Attribute server backing external gauges created by this host.
    pub fn attributes(&self) -> Arc<AttributeServer> {
        Arc::clone(&self.attributes)
    }

    pub fn is_reporting(&self) -> bool {
        self.reporter
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    /// Stop reporters and wait for them to finish. Safe to call twice.
    pub async fn shutdown(&self) {
        let task = self
            .reporter
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        let Some(task) = task else {
            return;
        };

        let _ = task.shutdown.send(true);
        if let Err(e) = task.handle.await {
            tracing::warn!(error = %e, "reporter task ended abnormally");
        }
        info!("metrics shut down");
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use crate::config;
    use tally_core::MetricKey;

    #[test]
    fn initialize_without_reporting_needs_no_runtime() {
        let cfg = config::load_from_str("version: 1\n").unwrap();
        let metrics = Metrics::initialize(&cfg, Arc::new(Registry::new())).unwrap();
        assert!(!metrics.is_reporting());

        let key = MetricKey::new(vm::VM_OWNER, "thread_count").unwrap();
        assert!(metrics.registry().get(&key).is_some());
    }

    #[test]
    fn vm_metrics_can_be_disabled() {
        let cfg = config::load_from_str("version: 1\nvm_metrics: false\n").unwrap();
        let metrics = Metrics::initialize(&cfg, Arc::new(Registry::new())).unwrap();
        assert!(metrics.registry().is_empty());
    }

    #[test]
    fn console_reporting_outside_runtime_fails_without_side_effects() {
        let cfg = config::load_from_str("version: 1\nreporting:\n  console:\n    enabled: true\n")
            .unwrap();
        let registry = Arc::new(Registry::new());
        let err = Metrics::initialize(&cfg, Arc::clone(&registry)).err().unwrap();
        assert_eq!(err.code().as_str(), "INTERNAL");
        assert!(registry.is_empty());
    }

    #[tokio::test]
    async fn shutdown_stops_reporter_once() {
        let cfg = config::load_from_str(
            "version: 1\nvm_metrics: false\nreporting:\n  console:\n    enabled: true\n    period_ms: 60000\n",
        )
        .unwrap();
        let metrics = Metrics::initialize(&cfg, Arc::new(Registry::new())).unwrap();
        assert!(metrics.is_reporting());

        metrics.shutdown().await;
        assert!(!metrics.is_reporting());
        metrics.shutdown().await;
    }
}
