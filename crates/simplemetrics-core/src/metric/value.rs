//! Immutable value protocol shared by all controlled metrics.
//!
//! A metric's current value is an immutable object. Every transition
//! (adjustment, window reset) builds a new object instead of mutating the
//! existing one, so readers holding an old value never observe a torn state.

use std::fmt;

use serde::Serialize;

/// Numeric value carried in snapshots.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum MetricNumber {
    Long(i64),
    Double(f64),
}

impl From<i64> for MetricNumber {
    fn from(v: i64) -> Self {
        MetricNumber::Long(v)
    }
}

impl From<f64> for MetricNumber {
    fn from(v: f64) -> Self {
        MetricNumber::Double(v)
    }
}

impl fmt::Display for MetricNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetricNumber::Long(v) => write!(f, "{v}"),
            MetricNumber::Double(v) => write!(f, "{v}"),
        }
    }
}

/// Value plus sample statistics, all read from one value object.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MetricValueDetails {
    pub value: MetricNumber,
    pub num_samples: i32,
    pub min: MetricNumber,
    pub max: MetricNumber,
}

/// Immutable metric value with a merge algebra.
pub trait MetricValue: Send + Sync + Sized + 'static {
    /// Input type folded into the value.
    type Delta: Copy;

    /// Copy of this value whose next adjustment starts a fresh window.
    fn make_reset_next(&self) -> Self;

    /// New value with `delta` merged in.
    fn make_adjusted(&self, delta: Self::Delta) -> Self;

    fn value(&self) -> MetricNumber;

    fn num_samples(&self) -> i32;

    fn min(&self) -> MetricNumber;

    fn max(&self) -> MetricNumber;

    fn details(&self) -> MetricValueDetails {
        MetricValueDetails {
            value: self.value(),
            num_samples: self.num_samples(),
            min: self.min(),
            max: self.max(),
        }
    }
}
