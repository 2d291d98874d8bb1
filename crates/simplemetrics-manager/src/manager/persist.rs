//! Snapshot-and-fan-out persist cycle.
//!
//! Rules:
//! - The metrics lock covers only the snapshot traversal; sinks run after it
//!   is released.
//! - One timestamp per cycle, shared by every sink.
//! - Every configured sink gets a dispatch attempt, whatever happened to the
//!   sinks before it. The last failure is returned.
//! - An updater failure aborts the cycle before any snapshot is taken.

use std::collections::HashMap;
use std::sync::atomic::Ordering;
use std::time::{SystemTime, UNIX_EPOCH};

use simplemetrics_core::{MetricsError, Result};

use super::lock;
use super::registry::MetricsManager;
use crate::persister::{MetricDetailsMap, MetricValues};

impl MetricsManager {
    /// Run the updaters, snapshot every metric, and hand the snapshot to the
    /// value sinks and then the detail sinks.
    pub fn persist(&self) -> Result<()> {
        self.update_metrics()?;

        let details_persisters = self.details_persisters();
        if details_persisters.is_empty() {
            return self.persist_values_only();
        }

        let time_collected_millis = now_millis();
        let details: MetricDetailsMap = {
            let metrics = lock(&self.metrics);
            let mut details = HashMap::with_capacity(metrics.len());
            for metric in metrics.iter() {
                details.insert(metric.clone(), metric.value_details_to_persist());
            }
            details
        };

        // derived from the details so both sink kinds see the same numbers
        let values_persisters = self.values_persisters();
        let values: MetricValues = if values_persisters.is_empty() {
            HashMap::new()
        } else {
            details.iter().map(|(m, d)| (m.clone(), d.value)).collect()
        };

        let mut last_failure = None;
        for persister in values_persisters.iter() {
            if let Err(e) = persister.persist(&values, time_collected_millis) {
                tracing::warn!(error = %e, "metric values persister failed");
                last_failure = Some(e);
            }
        }
        for persister in details_persisters.iter() {
            if let Err(e) = persister.persist(&details, time_collected_millis) {
                tracing::warn!(error = %e, "metric details persister failed");
                last_failure = Some(e);
            }
        }

        self.finish_cycle(details.len(), last_failure)
    }

    /// Persist to the value sinks only.
    ///
    /// Does not run the updaters; call `update_metrics` first if needed.
    pub fn persist_values_only(&self) -> Result<()> {
        let time_collected_millis = now_millis();
        let values: MetricValues = {
            let metrics = lock(&self.metrics);
            let mut values = HashMap::with_capacity(metrics.len());
            for metric in metrics.iter() {
                values.insert(metric.clone(), metric.value_to_persist());
            }
            values
        };

        let mut last_failure = None;
        for persister in self.values_persisters().iter() {
            if let Err(e) = persister.persist(&values, time_collected_millis) {
                tracing::warn!(error = %e, "metric values persister failed");
                last_failure = Some(e);
            }
        }

        self.finish_cycle(values.len(), last_failure)
    }

    fn finish_cycle(&self, metrics: usize, last_failure: Option<MetricsError>) -> Result<()> {
        let cycle = self.persist_count.fetch_add(1, Ordering::AcqRel) + 1;
        match last_failure {
            None => {
                tracing::debug!(cycle, metrics, "metrics persisted");
                Ok(())
            }
            Some(e) => Err(e.into_io()),
        }
    }
}

fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
