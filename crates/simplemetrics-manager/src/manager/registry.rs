use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, RwLock};

use simplemetrics_core::{MetricHandle, MetricNumber, Result};

use super::{lock, read, write};
use crate::persister::{MetricDetailsMap, MetricDetailsPersister, MetricValues, MetricValuesPersister};

/// Pushes fresh values into registered metrics right before a persist.
pub trait MetricsUpdater: Send + Sync {
    fn update_metrics(&self) -> Result<()>;
}

/// Observes metric registration. Called synchronously, outside registry locks.
pub trait MetricsRegisterListener: Send + Sync {
    fn metric_registered(&self, metric: &MetricHandle);
    fn metric_unregistered(&self, metric: &MetricHandle);
}

/// Registry of metrics, updaters, and listeners, plus the configured sinks.
///
/// One instance usually lives for the whole process, shared via `Arc`.
pub struct MetricsManager {
    pub(super) metrics: Mutex<Vec<MetricHandle>>,
    updaters: Mutex<Vec<Arc<dyn MetricsUpdater>>>,
    register_listeners: RwLock<Vec<Arc<dyn MetricsRegisterListener>>>,
    values_persisters: RwLock<Arc<[Arc<dyn MetricValuesPersister>]>>,
    details_persisters: RwLock<Arc<[Arc<dyn MetricDetailsPersister>]>>,
    pub(super) persist_count: AtomicU64,
}

impl Default for MetricsManager {
    fn default() -> Self {
        Self::new()
    }
}

impl MetricsManager {
    pub fn new() -> Self {
        Self {
            metrics: Mutex::new(Vec::new()),
            updaters: Mutex::new(Vec::new()),
            register_listeners: RwLock::new(Vec::new()),
            values_persisters: RwLock::new(Arc::from(Vec::new())),
            details_persisters: RwLock::new(Arc::from(Vec::new())),
            persist_count: AtomicU64::new(0),
        }
    }

    /// Register a metric. Registering the same metric twice lists it twice.
    pub fn register_metric(&self, metric: impl Into<MetricHandle>) {
        let metric = metric.into();
        lock(&self.metrics).push(metric.clone());
        tracing::debug!(metric = %metric.descriptor(), "metric registered");

        for listener in self.listeners() {
            listener.metric_registered(&metric);
        }
    }

    /// Unregister the first registration of this exact metric instance.
    pub fn unregister_metric(&self, metric: impl Into<MetricHandle>) {
        let metric = metric.into();
        let removed = {
            let mut metrics = lock(&self.metrics);
            match metrics.iter().position(|m| *m == metric) {
                Some(idx) => {
                    metrics.remove(idx);
                    true
                }
                None => false,
            }
        };
        if !removed {
            return;
        }
        tracing::debug!(metric = %metric.descriptor(), "metric unregistered");

        for listener in self.listeners() {
            listener.metric_unregistered(&metric);
        }
    }

    pub fn register_updater(&self, updater: Arc<dyn MetricsUpdater>) {
        lock(&self.updaters).push(updater);
    }

    pub fn register_register_listener(&self, listener: Arc<dyn MetricsRegisterListener>) {
        write(&self.register_listeners).push(listener);
    }

    /// Run every updater in registration order. The first failure stops the
    /// loop and is returned.
    pub fn update_metrics(&self) -> Result<()> {
        let updaters = lock(&self.updaters);
        for updater in updaters.iter() {
            updater.update_metrics()?;
        }
        Ok(())
    }

    /// Replace the value sinks. An empty list disables value persistence.
    pub fn set_values_persisters(&self, persisters: Vec<Arc<dyn MetricValuesPersister>>) {
        *write(&self.values_persisters) = Arc::from(persisters);
    }

    /// Replace the detail sinks. An empty list disables detail persistence.
    pub fn set_details_persisters(&self, persisters: Vec<Arc<dyn MetricDetailsPersister>>) {
        *write(&self.details_persisters) = Arc::from(persisters);
    }

    pub(super) fn values_persisters(&self) -> Arc<[Arc<dyn MetricValuesPersister>]> {
        Arc::clone(&read(&self.values_persisters))
    }

    pub(super) fn details_persisters(&self) -> Arc<[Arc<dyn MetricDetailsPersister>]> {
        Arc::clone(&read(&self.details_persisters))
    }

    fn listeners(&self) -> Vec<Arc<dyn MetricsRegisterListener>> {
        read(&self.register_listeners).clone()
    }

    /// Snapshot of the registered metrics, in registration order.
    pub fn metrics(&self) -> Vec<MetricHandle> {
        lock(&self.metrics).clone()
    }

    /// Current value of every metric. Does not run the updaters.
    ///
    /// Whole-number doubles are reported as integers.
    pub fn metric_values_map(&self) -> MetricValues {
        let metrics = lock(&self.metrics);
        let mut values = HashMap::with_capacity(metrics.len());
        for metric in metrics.iter() {
            values.insert(metric.clone(), integral_to_long(metric.current_value()));
        }
        values
    }

    /// Current value details of every metric. Does not run the updaters.
    pub fn metric_value_details_map(&self) -> MetricDetailsMap {
        let metrics = lock(&self.metrics);
        let mut details = HashMap::with_capacity(metrics.len());
        for metric in metrics.iter() {
            details.insert(metric.clone(), metric.current_value_details());
        }
        details
    }

    /// Run the updaters, then render `descriptor=value` for every metric.
    pub fn metric_value_strings(&self) -> Result<Vec<String>> {
        self.update_metrics()?;
        let metrics = lock(&self.metrics);
        Ok(metrics
            .iter()
            .map(|m| format!("{}={}", m.descriptor(), m.current_value()))
            .collect())
    }

    /// Number of persist cycles run so far, failed ones included.
    pub fn persist_count(&self) -> u64 {
        self.persist_count.load(Ordering::Acquire)
    }
}

fn integral_to_long(value: MetricNumber) -> MetricNumber {
    match value {
        MetricNumber::Double(v)
            if v.is_finite() && v == v.trunc() && v >= i64::MIN as f64 && v < i64::MAX as f64 =>
        {
            MetricNumber::Long(v as i64)
        }
        other => other,
    }
}
