use std::time::Duration;

use serde::Deserialize;
use simplemetrics_core::{MetricsError, Result};

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ManagerConfig {
    pub version: u32,

    #[serde(default)]
    pub persist: PersistSection,
}

impl ManagerConfig {
    pub fn validate(&self) -> Result<()> {
        if self.version != 1 {
            return Err(MetricsError::UnsupportedVersion);
        }

        self.persist.validate()?;

        Ok(())
    }

    /// Period of the persist job.
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.persist.interval_ms)
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PersistSection {
    #[serde(default = "default_interval_ms")]
    pub interval_ms: u64,

    #[serde(default = "default_true")]
    pub persist_on_shutdown: bool,

    /// Install a `TracingPersister` as value sink.
    #[serde(default = "default_true")]
    pub log_sink: bool,

    /// Install a `TracingPersister` as detail sink.
    #[serde(default)]
    pub log_details: bool,
}

impl Default for PersistSection {
    fn default() -> Self {
        Self {
            interval_ms: default_interval_ms(),
            persist_on_shutdown: true,
            log_sink: true,
            log_details: false,
        }
    }
}

impl PersistSection {
    pub fn validate(&self) -> Result<()> {
        if !(1_000..=86_400_000).contains(&self.interval_ms) {
            return Err(MetricsError::Config(
                "persist.interval_ms must be between 1000 and 86400000".into(),
            ));
        }
        Ok(())
    }
}

fn default_interval_ms() -> u64 {
    60_000
}
fn default_true() -> bool {
    true
}
