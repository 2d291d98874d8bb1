//! Periodic persist driver.
//!
//! Each tick runs `MetricsManager::persist` on the blocking pool. A failed
//! cycle is logged and the next tick runs as usual; there is no retry.

use std::io;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};

use simplemetrics_core::{MetricsError, Result};

use crate::config::ManagerConfig;
use crate::manager::MetricsManager;

pub struct PersistJob {
    manager: Arc<MetricsManager>,
    stop: watch::Sender<bool>,
    handle: JoinHandle<()>,
    persist_on_shutdown: bool,
}

impl PersistJob {
    /// Start persisting every `period`. The first cycle runs one period
    /// after the call. Must be called inside a tokio runtime.
    pub fn spawn(manager: Arc<MetricsManager>, period: Duration) -> Self {
        let period = period.max(Duration::from_millis(1));
        let (stop, stop_rx) = watch::channel(false);
        let handle = tokio::spawn(run(Arc::clone(&manager), period, stop_rx));
        tracing::info!(period_ms = period.as_millis() as u64, "metrics persist job started");
        Self {
            manager,
            stop,
            handle,
            persist_on_shutdown: true,
        }
    }

    pub fn from_config(manager: Arc<MetricsManager>, cfg: &ManagerConfig) -> Self {
        Self::spawn(manager, cfg.interval()).with_persist_on_shutdown(cfg.persist.persist_on_shutdown)
    }

    /// Whether `shutdown` runs one last cycle (default true).
    pub fn with_persist_on_shutdown(mut self, enabled: bool) -> Self {
        self.persist_on_shutdown = enabled;
        self
    }

    /// Stop ticking, wait for an in-flight cycle, then optionally persist
    /// once more and return that cycle's result.
    pub async fn shutdown(self) -> Result<()> {
        let _ = self.stop.send(true);
        if let Err(e) = self.handle.await {
            tracing::warn!(error = %e, "metrics persist job ended abnormally");
        }
        tracing::info!("metrics persist job stopped");

        if !self.persist_on_shutdown {
            return Ok(());
        }
        persist_blocking(self.manager).await
    }
}

async fn run(manager: Arc<MetricsManager>, period: Duration, mut stop: watch::Receiver<bool>) {
    let mut ticker = time::interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                if let Err(e) = persist_blocking(Arc::clone(&manager)).await {
                    tracing::warn!(error = %e, "metrics persist cycle failed");
                }
            }
            changed = stop.changed() => {
                if changed.is_err() || *stop.borrow() {
                    break;
                }
            }
        }
    }
}

async fn persist_blocking(manager: Arc<MetricsManager>) -> Result<()> {
    tokio::task::spawn_blocking(move || manager.persist())
        .await
        .map_err(|e| MetricsError::Io(io::Error::other(e)))?
}
