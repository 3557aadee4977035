use std::time::Duration;

use serde::Deserialize;
use tally_core::error::{Result, TallyError};

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TallyConfig {
    pub version: u32,

    /// Register the built-in VM gauges on initialize.
    #[serde(default = "default_vm_metrics")]
    pub vm_metrics: bool,

    #[serde(default)]
    pub reporting: ReportingSection,
}

impl Default for TallyConfig {
    fn default() -> Self {
        Self {
            version: 1,
            vm_metrics: default_vm_metrics(),
            reporting: ReportingSection::default(),
        }
    }
}

impl TallyConfig {
    pub fn validate(&self) -> Result<()> {
        if self.version != 1 {
            return Err(TallyError::UnsupportedVersion);
        }
        self.reporting.console.validate()?;
        Ok(())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReportingSection {
    #[serde(default)]
    pub console: ConsoleSection,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConsoleSection {
    #[serde(default)]
    pub enabled: bool,

    #[serde(default = "default_period_ms")]
    pub period_ms: u64,
}

impl Default for ConsoleSection {
    fn default() -> Self {
        Self {
            enabled: false,
            period_ms: default_period_ms(),
        }
    }
}

impl ConsoleSection {
    pub fn validate(&self) -> Result<()> {
        if !(100..=3_600_000).contains(&self.period_ms) {
            return Err(TallyError::BadConfig(
                "reporting.console.period_ms must be between 100 and 3600000".into(),
            ));
        }
        Ok(())
    }

    pub fn period(&self) -> Duration {
        Duration::from_millis(self.period_ms)
    }
}

fn default_vm_metrics() -> bool {
    true
}
fn default_period_ms() -> u64 {
    10000
}
