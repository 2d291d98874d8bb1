use std::fmt;

use serde::Serialize;

use crate::error::{MetricsError, Result};

/// Identity metadata carried by every metric.
///
/// Descriptors are opaque to the registry: two metrics with equal descriptors
/// are still two different metrics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MetricDescriptor {
    component: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    module: Option<String>,
    name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    unit: Option<String>,
}

impl MetricDescriptor {
    /// Component short name (e.g. "web") and metric label are required.
    pub fn new(component: impl Into<String>, name: impl Into<String>) -> Result<Self> {
        let component = component.into();
        let name = name.into();
        if component.trim().is_empty() {
            return Err(MetricsError::InvalidDescriptor("component must not be empty".into()));
        }
        if name.trim().is_empty() {
            return Err(MetricsError::InvalidDescriptor("name must not be empty".into()));
        }
        Ok(Self {
            component,
            module: None,
            name,
            description: None,
            unit: None,
        })
    }

    pub fn with_module(mut self, module: impl Into<String>) -> Self {
        self.module = Some(module.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = Some(unit.into());
        self
    }

    pub fn component(&self) -> &str {
        &self.component
    }
    pub fn module(&self) -> Option<&str> {
        self.module.as_deref()
    }
    pub fn name(&self) -> &str {
        &self.name
    }
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }
    pub fn unit(&self) -> Option<&str> {
        self.unit.as_deref()
    }
}

impl fmt::Display for MetricDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.module {
            Some(module) => write!(f, "{}.{}.{}", self.component, module, self.name),
            None => write!(f, "{}.{}", self.component, self.name),
        }
    }
}
