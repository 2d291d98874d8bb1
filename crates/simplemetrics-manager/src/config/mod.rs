//! Manager config loader (strict parsing).

pub mod schema;

use std::fs;
use std::sync::Arc;

use simplemetrics_core::{MetricsError, Result};

use crate::manager::MetricsManager;
use crate::persister::{MetricDetailsPersister, MetricValuesPersister, TracingPersister};

pub use schema::{ManagerConfig, PersistSection};

pub fn load_from_file(path: &str) -> Result<ManagerConfig> {
    let s = fs::read_to_string(path)
        .map_err(|e| MetricsError::Config(format!("read config failed: {e}")))?;
    load_from_str(&s)
}

pub fn load_from_str(s: &str) -> Result<ManagerConfig> {
    let cfg: ManagerConfig = serde_yaml::from_str(s)
        .map_err(|e| MetricsError::Config(format!("invalid yaml: {e}")))?;
    cfg.validate()?;
    Ok(cfg)
}

impl ManagerConfig {
    /// Build a manager with the sinks this config asks for.
    pub fn build_manager(&self) -> MetricsManager {
        let manager = MetricsManager::new();
        let sink = Arc::new(TracingPersister::new());

        if self.persist.log_sink {
            let values: Vec<Arc<dyn MetricValuesPersister>> = vec![sink.clone()];
            manager.set_values_persisters(values);
        }
        if self.persist.log_details {
            let details: Vec<Arc<dyn MetricDetailsPersister>> = vec![sink];
            manager.set_details_persisters(details);
        }
        manager
    }
}
