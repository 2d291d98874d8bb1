//! Accumulator metric for counts that are added to continually (page views,
//! database accesses).
//!
//! Writers only touch an atomic counter. The counter is folded into the
//! immutable [`AccumValue`] when somebody reads the metric, so a busy counter
//! does not allocate a value object per increment.

use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

use super::descriptor::MetricDescriptor;
use super::holder::MetricHolder;
use super::value::{MetricNumber, MetricValue, MetricValueDetails};
use super::{AggregationType, ControlledMetric};

/// Accumulated count plus the reset-next flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccumValue {
    value: i64,
    reset_next: bool,
}

impl AccumValue {
    pub fn new(value: i64, reset_next: bool) -> Self {
        Self { value, reset_next }
    }

    pub fn count(&self) -> i64 {
        self.value
    }

    pub fn is_reset_next(&self) -> bool {
        self.reset_next
    }
}

impl Default for AccumValue {
    /// Zero, with the first fold overwriting.
    fn default() -> Self {
        Self::new(0, true)
    }
}

impl MetricValue for AccumValue {
    type Delta = i64;

    fn make_reset_next(&self) -> Self {
        Self::new(self.value, true)
    }

    fn make_adjusted(&self, delta: i64) -> Self {
        if self.reset_next {
            Self::new(delta, false)
        } else {
            Self::new(self.value.wrapping_add(delta), false)
        }
    }

    fn value(&self) -> MetricNumber {
        MetricNumber::Long(self.value)
    }

    fn num_samples(&self) -> i32 {
        // the count is the number of samples; a net-negative count has none
        self.value.clamp(0, i32::MAX as i64) as i32
    }

    fn min(&self) -> MetricNumber {
        MetricNumber::Long(self.value)
    }

    fn max(&self) -> MetricNumber {
        MetricNumber::Long(self.value)
    }
}

/// Lock-free counter metric with lazy folding.
pub struct AccumulatorMetric {
    holder: MetricHolder<AccumValue>,
    counter: AtomicI64,
}

impl AccumulatorMetric {
    pub fn new(descriptor: MetricDescriptor) -> Self {
        Self {
            holder: MetricHolder::new(descriptor, AccumValue::default()),
            counter: AtomicI64::new(0),
        }
    }

    /// Add `delta` to the live counter. Returns the raw counter, not the total.
    #[inline]
    pub fn add(&self, delta: i64) -> i64 {
        self.counter.fetch_add(delta, Ordering::AcqRel).wrapping_add(delta)
    }

    #[inline]
    pub fn increment(&self) -> i64 {
        self.add(1)
    }

    /// Generic adjustment entry point; goes through the counter like `add`.
    #[inline]
    pub fn adjust_value(&self, delta: i64) {
        self.counter.fetch_add(delta, Ordering::AcqRel);
    }

    /// Committed value object, without folding.
    pub fn committed(&self) -> Arc<AccumValue> {
        self.holder.current()
    }

    /// Drain the live counter into the committed value.
    ///
    /// The drain is a single atomic exchange, so each add is folded exactly
    /// once even when several readers fold concurrently.
    fn fold(&self) {
        let drained = self.counter.swap(0, Ordering::AcqRel);
        if drained != 0 {
            self.holder.adjust(drained);
        }
    }
}

impl ControlledMetric for AccumulatorMetric {
    fn descriptor(&self) -> &MetricDescriptor {
        self.holder.descriptor()
    }

    fn current_value(&self) -> MetricNumber {
        self.fold();
        self.holder.current_value()
    }

    fn current_value_details(&self) -> MetricValueDetails {
        self.fold();
        self.holder.current_value_details()
    }

    fn value_to_persist(&self) -> MetricNumber {
        self.fold();
        self.holder.value_to_persist()
    }

    fn value_details_to_persist(&self) -> MetricValueDetails {
        self.fold();
        self.holder.value_details_to_persist()
    }

    fn aggregation_type(&self) -> AggregationType {
        AggregationType::Sum
    }
}
