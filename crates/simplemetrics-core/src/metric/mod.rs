//! Metric types and the controlled-metric contract.

pub mod accum;
pub mod descriptor;
pub mod holder;
pub mod value;

use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::Deref;
use std::sync::Arc;

pub use accum::{AccumValue, AccumulatorMetric};
pub use descriptor::MetricDescriptor;
pub use holder::MetricHolder;
pub use value::{MetricNumber, MetricValue, MetricValueDetails};

/// How values from several instances of one metric should be combined
/// downstream. A hint only; nothing here enforces it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AggregationType {
    Sum,
    Average,
}

/// A metric that can be registered with the manager.
///
/// The `*_to_persist` readers are called once per persist cycle and may
/// advance the metric's window; the `current_*` readers do not.
pub trait ControlledMetric: Send + Sync {
    fn descriptor(&self) -> &MetricDescriptor;

    fn current_value(&self) -> MetricNumber;

    fn current_value_details(&self) -> MetricValueDetails;

    fn value_to_persist(&self) -> MetricNumber;

    fn value_details_to_persist(&self) -> MetricValueDetails;

    fn aggregation_type(&self) -> AggregationType;
}

/// Shared metric reference with identity semantics.
///
/// Equality and hashing use the address of the metric, never its
/// descriptor, so two metrics with the same name stay distinct map keys.
#[derive(Clone)]
pub struct MetricHandle(Arc<dyn ControlledMetric>);

impl MetricHandle {
    pub fn new(metric: Arc<dyn ControlledMetric>) -> Self {
        Self(metric)
    }

    fn addr(&self) -> *const () {
        Arc::as_ptr(&self.0) as *const ()
    }
}

impl Deref for MetricHandle {
    type Target = dyn ControlledMetric;

    fn deref(&self) -> &Self::Target {
        self.0.as_ref()
    }
}

impl PartialEq for MetricHandle {
    fn eq(&self, other: &Self) -> bool {
        self.addr() == other.addr()
    }
}

impl Eq for MetricHandle {}

impl Hash for MetricHandle {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.addr().hash(state);
    }
}

impl fmt::Debug for MetricHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("MetricHandle")
            .field(&format_args!("{}", self.0.descriptor()))
            .field(&self.addr())
            .finish()
    }
}

impl<M: ControlledMetric + 'static> From<Arc<M>> for MetricHandle {
    fn from(metric: Arc<M>) -> Self {
        Self(metric)
    }
}
