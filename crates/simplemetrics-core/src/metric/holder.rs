use std::sync::Arc;

use arc_swap::ArcSwap;

use super::descriptor::MetricDescriptor;
use super::value::{MetricNumber, MetricValue, MetricValueDetails};

/// Base value holder for controlled metrics.
///
/// Holds the descriptor and the current immutable value. Transitions swap in
/// a freshly built value with a read-copy-update loop, so readers never
/// take a lock.
pub struct MetricHolder<V: MetricValue> {
    descriptor: MetricDescriptor,
    value: ArcSwap<V>,
}

impl<V: MetricValue> MetricHolder<V> {
    pub fn new(descriptor: MetricDescriptor, initial: V) -> Self {
        Self {
            descriptor,
            value: ArcSwap::from_pointee(initial),
        }
    }

    pub fn descriptor(&self) -> &MetricDescriptor {
        &self.descriptor
    }

    /// Current value object (identity is stable until the next transition).
    pub fn current(&self) -> Arc<V> {
        self.value.load_full()
    }

    /// Merge `delta` into the current value.
    pub fn adjust(&self, delta: V::Delta) {
        self.value.rcu(|cur| cur.make_adjusted(delta));
    }

    pub fn current_value(&self) -> MetricNumber {
        self.value.load().value()
    }

    pub fn current_value_details(&self) -> MetricValueDetails {
        self.value.load().details()
    }

    /// Read the value for persistence and mark the next adjustment as the
    /// start of a new window.
    pub fn value_to_persist(&self) -> MetricNumber {
        self.take_window().value()
    }

    pub fn value_details_to_persist(&self) -> MetricValueDetails {
        self.take_window().details()
    }

    fn take_window(&self) -> Arc<V> {
        // rcu hands back the value that was replaced
        self.value.rcu(|cur| cur.make_reset_next())
    }
}
