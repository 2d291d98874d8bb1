use tracing::Level;

use simplemetrics_core::{MetricsError, Result};

use super::{MetricDetailsMap, MetricDetailsPersister, MetricValues, MetricValuesPersister};

/// Sink that writes every metric as one `tracing` event.
#[derive(Debug, Clone, Copy)]
pub struct TracingPersister {
    level: Level,
}

impl Default for TracingPersister {
    fn default() -> Self {
        Self { level: Level::INFO }
    }
}

impl TracingPersister {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    pub fn level(&self) -> Level {
        self.level
    }
}

// `event!` needs a constant level, so fan out by hand.
macro_rules! emit {
    ($level:expr, $($field:tt)+) => {{
        let level = $level;
        if level == Level::ERROR {
            tracing::error!(target: "simplemetrics::persist", $($field)+);
        } else if level == Level::WARN {
            tracing::warn!(target: "simplemetrics::persist", $($field)+);
        } else if level == Level::INFO {
            tracing::info!(target: "simplemetrics::persist", $($field)+);
        } else if level == Level::DEBUG {
            tracing::debug!(target: "simplemetrics::persist", $($field)+);
        } else {
            tracing::trace!(target: "simplemetrics::persist", $($field)+);
        }
    }};
}

impl MetricValuesPersister for TracingPersister {
    fn persist(&self, values: &MetricValues, time_collected_millis: u64) -> Result<()> {
        for (metric, value) in values {
            emit!(
                self.level,
                metric = %metric.descriptor(),
                time_collected_millis,
                value = %value,
                "metric value"
            );
        }
        Ok(())
    }
}

impl MetricDetailsPersister for TracingPersister {
    fn persist(&self, details: &MetricDetailsMap, time_collected_millis: u64) -> Result<()> {
        for (metric, d) in details {
            let rendered = serde_json::to_string(d)
                .map_err(|e| MetricsError::Sink(format!("render details failed: {e}")))?;
            emit!(
                self.level,
                metric = %metric.descriptor(),
                time_collected_millis,
                details = %rendered,
                "metric details"
            );
        }
        Ok(())
    }
}
