//! simplemetrics manager library entry.
//!
//! This crate wires metric registration, updaters, register listeners, the
//! persist cycle, and the persist job into one manager. It is intended to be
//! embedded in long-running processes and used by integration tests.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod config;
pub mod job;
pub mod logging;
pub mod manager;
pub mod persister;

pub use job::PersistJob;
pub use manager::{MetricsManager, MetricsRegisterListener, MetricsUpdater};
pub use persister::{
    MetricDetailsMap, MetricDetailsPersister, MetricValues, MetricValuesPersister, TracingPersister,
};
