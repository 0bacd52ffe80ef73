//! In-memory rule configuration store for testing and development

use async_trait::async_trait;
use std::sync::{Arc, RwLock};

use crate::billing::config::RuleSetConfig;
use crate::traits::RuleConfigStore;
use crate::types::BillingResult;

/// In-memory configuration store.
///
/// Parameters can be replaced between batches; the billing engine snapshots
/// the configuration once at batch start, so a replacement never produces a
/// torn read mid-run.
#[derive(Debug, Clone)]
pub struct MemoryConfigStore {
    config: Arc<RwLock<RuleSetConfig>>,
}

impl MemoryConfigStore {
    /// Create a store holding the default club policy
    pub fn new() -> Self {
        Self::with_config(RuleSetConfig::default())
    }

    /// Create a store holding the given configuration
    pub fn with_config(config: RuleSetConfig) -> Self {
        Self {
            config: Arc::new(RwLock::new(config)),
        }
    }

    /// Replace the stored configuration; takes effect on the next batch
    pub fn replace(&self, config: RuleSetConfig) {
        *self.config.write().unwrap() = config;
    }
}

impl Default for MemoryConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RuleConfigStore for MemoryConfigStore {
    async fn load(&self) -> BillingResult<RuleSetConfig> {
        Ok(self.config.read().unwrap().clone())
    }

    async fn save(&self, config: &RuleSetConfig) -> BillingResult<()> {
        *self.config.write().unwrap() = config.clone();
        Ok(())
    }
}
