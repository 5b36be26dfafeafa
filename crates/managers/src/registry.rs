//! Lookup table from manager key to manager factory.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use redisapi_common::config::{DEFAULT_CONNECT_TIMEOUT_MS, EnvSource};
use redisapi_common::error::AppError;

use crate::{FakeManager, Manager, RedisManager};

/// Builds a fresh manager on every lookup.
pub type ManagerFactory = Box<dyn Fn() -> Result<Box<dyn Manager>, AppError> + Send + Sync>;

pub const SHARED: &str = "shared";
pub const FAKE: &str = "fake";

pub struct ManagerRegistry {
    factories: HashMap<String, ManagerFactory>,
}

impl ManagerRegistry {
    /// Registry with the default strategies, reading configuration from `env`.
    pub fn new(env: Arc<dyn EnvSource>) -> Self {
        Self::with_connect_timeout(env, Duration::from_millis(DEFAULT_CONNECT_TIMEOUT_MS))
    }

    pub fn with_connect_timeout(env: Arc<dyn EnvSource>, connect_timeout: Duration) -> Self {
        let mut registry = Self::empty();
        registry.register(
            SHARED,
            Box::new(move || {
                let manager =
                    RedisManager::from_env(env.as_ref())?.with_connect_timeout(connect_timeout);
                Ok(Box::new(manager) as Box<dyn Manager>)
            }),
        );
        registry.register(
            FAKE,
            Box::new(|| Ok(Box::new(FakeManager::new()) as Box<dyn Manager>)),
        );
        registry
    }

    pub fn empty() -> Self {
        Self {
            factories: HashMap::new(),
        }
    }

    /// Add or replace the factory for `key`.
    pub fn register(&mut self, key: &str, factory: ManagerFactory) {
        if self.factories.insert(key.to_string(), factory).is_some() {
            tracing::debug!(key, "Replaced manager factory");
        }
    }

    pub fn contains(&self, key: &str) -> bool {
        self.factories.contains_key(key)
    }

    /// Registered keys, sorted.
    pub fn keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self.factories.keys().map(String::as_str).collect();
        keys.sort_unstable();
        keys
    }

    /// Construct the manager registered under `key`.
    ///
    /// Unknown keys yield [`AppError::NotFound`]; construction errors propagate.
    pub fn create(&self, key: &str) -> Result<Box<dyn Manager>, AppError> {
        let factory = self
            .factories
            .get(key)
            .ok_or_else(|| AppError::NotFound(format!("manager '{}'", key)))?;
        let manager = factory()?;
        tracing::debug!(key, manager = manager.name(), "Created manager");
        Ok(manager)
    }
}
