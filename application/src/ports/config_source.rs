//! Configuration snapshot port.
//!
//! A request reads one snapshot at its start and uses it throughout, so a
//! concurrent reload is never observed half-applied.

use crate::config::OrchestrationConfig;
use std::sync::Arc;

pub trait ConfigSource: Send + Sync {
    /// The current complete configuration
    fn snapshot(&self) -> Arc<OrchestrationConfig>;
}

/// A configuration that never changes.
pub struct StaticConfig(Arc<OrchestrationConfig>);

impl StaticConfig {
    pub fn new(config: OrchestrationConfig) -> Self {
        Self(Arc::new(config))
    }
}

impl ConfigSource for StaticConfig {
    fn snapshot(&self) -> Arc<OrchestrationConfig> {
        Arc::clone(&self.0)
    }
}
