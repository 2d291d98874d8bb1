//! Persistence sink contracts.
//!
//! Sinks receive read-only snapshot maps plus the collection timestamp shared
//! by every sink in the same cycle. A sink error is isolated by the manager:
//! the remaining sinks still run.

pub mod log_sink;

use std::collections::HashMap;

use simplemetrics_core::{MetricHandle, MetricNumber, MetricValueDetails, Result};

pub use log_sink::TracingPersister;

/// Metric -> scalar value snapshot.
pub type MetricValues = HashMap<MetricHandle, MetricNumber>;

/// Metric -> value details snapshot.
pub type MetricDetailsMap = HashMap<MetricHandle, MetricValueDetails>;

/// Sink for scalar values.
pub trait MetricValuesPersister: Send + Sync {
    fn persist(&self, values: &MetricValues, time_collected_millis: u64) -> Result<()>;
}

/// Sink for value details (value, sample count, min, max).
pub trait MetricDetailsPersister: Send + Sync {
    fn persist(&self, details: &MetricDetailsMap, time_collected_millis: u64) -> Result<()>;
}
