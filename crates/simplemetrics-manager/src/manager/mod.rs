//! Metrics manager: registry plus the persist cycle.
//!
//! Re-exports the manager and its hook traits so downstream consumers can
//! depend on this module directly.

pub mod persist;
pub mod registry;

use std::sync::{Mutex, MutexGuard, RwLock, RwLockReadGuard, RwLockWriteGuard};

pub use registry::{MetricsManager, MetricsRegisterListener, MetricsUpdater};

// The guarded data are plain lists, so a poisoned lock is still usable.

pub(crate) fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(|e| e.into_inner())
}

pub(crate) fn read<T>(l: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    l.read().unwrap_or_else(|e| e.into_inner())
}

pub(crate) fn write<T>(l: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    l.write().unwrap_or_else(|e| e.into_inner())
}
