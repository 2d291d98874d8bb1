//! simplemetrics core: metric descriptors, the immutable value protocol, and
//! the accumulator metric.
//!
//! This crate carries no runtime or registry dependencies so metric types can
//! be embedded in any component. The manager crate owns registration and
//! persistence.
//!
//! # Defensive guarantees
//! Panics, `unwrap`, and `expect` are compile-denied here
//! (`#![deny(clippy::panic, clippy::unwrap_used, clippy::expect_used)]`).
//! Hot-path writes are plain atomic arithmetic and cannot fail.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod error;
pub mod metric;

/// Shared result type.
pub use error::{ErrorCode, MetricsError, Result};
pub use metric::{
    AccumValue, AccumulatorMetric, AggregationType, ControlledMetric, MetricDescriptor,
    MetricHandle, MetricHolder, MetricNumber, MetricValue, MetricValueDetails,
};
