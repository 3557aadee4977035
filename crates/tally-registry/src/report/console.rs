//! Plain-text console reporter.
//!
//! Renders a registry snapshot grouped by owner, one block per metric, and
//! writes it to a sink on a fixed period until shutdown.

use std::fmt::Write as _;
use std::io::Write;
use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use tokio::sync::watch;
use tracing::{info, warn};

use tally_core::Metric;

use crate::registry::{Registry, Snapshot};

const QUANTILES: [f64; 4] = [0.5, 0.75, 0.95, 0.99];

pub struct ConsoleReporter {
    registry: Arc<Registry>,
    out: Box<dyn Write + Send>,
}

impl ConsoleReporter {
    pub fn new(registry: Arc<Registry>, out: Box<dyn Write + Send>) -> Self {
        Self { registry, out }
    }

    /// Reporter writing to standard output.
    pub fn stdout(registry: Arc<Registry>) -> Self {
        Self::new(registry, Box::new(std::io::stdout()))
    }

    /// Render and write one report of the registry's current contents.
    pub fn report(&mut self) -> std::io::Result<()> {
        let text = render(&self.registry.snapshot(), epoch_secs());
        self.out.write_all(text.as_bytes())?;
        self.out.flush()
    }

    /// Report every `period` until `shutdown` flips, then report once more.
    pub async fn run(mut self, period: Duration, mut shutdown: watch::Receiver<bool>) {
        info!(period_ms = period.as_millis() as u64, "console reporter started");

        loop {
            tokio::select! {
                _ = tokio::time::sleep(period) => {
                    if let Err(e) = self.report() {
                        warn!(error = %e, "console report failed");
                    }
                }
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        info!("console reporter shutting down");
                        if let Err(e) = self.report() {
                            warn!(error = %e, "final console report failed");
                        }
                        break;
                    }
                }
            }
        }
    }
}

/// Render `snapshot` as text. Output order follows key order.
pub fn render(snapshot: &Snapshot, epoch: u64) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "=== tally report @ {epoch} ===");

    let mut owner: Option<&str> = None;
    for (key, metric) in snapshot {
        if owner != Some(key.owner()) {
            owner = Some(key.owner());
            let _ = writeln!(out, "{}:", key.owner());
        }
        let _ = writeln!(out, "  {}:", key.name());
        render_metric(metric, &mut out);
    }
    out.push('\n');
    out
}

fn render_metric(metric: &Metric, out: &mut String) {
    match metric {
        Metric::Gauge(g) => {
            let _ = writeln!(out, "    value = {}", g.read());
        }
        Metric::ExternalGauge(g) => match g.value() {
            Some(v) => {
                let _ = writeln!(out, "    value = {v}");
            }
            None => {
                let _ = writeln!(
                    out,
                    "    value = <unavailable: {} {}>",
                    g.object_name(),
                    g.attribute()
                );
            }
        },
        Metric::Counter(c) => {
            let _ = writeln!(out, "    count = {}", c.count());
        }
        Metric::Meter(m) => {
            let _ = writeln!(out, "    count = {}", m.count());
            let _ = writeln!(
                out,
                "    mean rate = {:.2} {}/{}",
                m.mean_rate(),
                m.event_type(),
                m.rate_unit().singular()
            );
        }
        Metric::Histogram(h) => {
            let _ = writeln!(out, "    count = {}", h.count());
            let _ = writeln!(out, "    min = {}", h.min());
            let _ = writeln!(out, "    max = {}", h.max());
            let _ = writeln!(out, "    mean = {:.2}", h.mean());
            let _ = writeln!(out, "    stddev = {:.2}", h.std_dev());
            for (q, v) in QUANTILES.iter().zip(h.quantiles(&QUANTILES)) {
                let _ = writeln!(out, "    p{:.0} = {v:.2}", q * 100.0);
            }
        }
        Metric::Timer(t) => {
            let unit = t.duration_unit();
            let _ = writeln!(out, "    count = {}", t.count());
            let _ = writeln!(
                out,
                "    mean rate = {:.2} calls/{}",
                t.mean_rate(),
                t.rate_unit().singular()
            );
            let _ = writeln!(out, "    min = {:.2}{unit}", t.min());
            let _ = writeln!(out, "    max = {:.2}{unit}", t.max());
            let _ = writeln!(out, "    mean = {:.2}{unit}", t.mean());
            let _ = writeln!(out, "    stddev = {:.2}{unit}", t.std_dev());
            for (q, v) in QUANTILES.iter().zip(t.quantiles(&QUANTILES)) {
                let _ = writeln!(out, "    p{:.0} = {v:.2}{unit}", q * 100.0);
            }
        }
    }
}

fn epoch_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}
