//! Test double that records which operations were invoked.

use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;

use redisapi_common::error::AppError;
use redisapi_common::types::{BindResult, HealthResult};

use crate::Manager;

/// Snapshot of what a [`FakeManager`] has seen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FakeState {
    pub instance_added: bool,
    pub binded: bool,
    pub unbinded: bool,
    pub removed: bool,
    pub ok: bool,
    pub msg: String,
}

impl Default for FakeState {
    fn default() -> Self {
        Self {
            instance_added: false,
            binded: false,
            unbinded: false,
            removed: false,
            ok: false,
            msg: "error".to_string(),
        }
    }
}

#[derive(Debug, Default)]
pub struct FakeManager {
    state: Mutex<FakeState>,
}

impl FakeManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// A fake whose health check reports `(ok, msg)`.
    pub fn with_health(ok: bool, msg: impl Into<String>) -> Self {
        let manager = Self::new();
        manager.set_health(ok, msg);
        manager
    }

    pub fn set_health(&self, ok: bool, msg: impl Into<String>) {
        let mut state = self.lock();
        state.ok = ok;
        state.msg = msg.into();
    }

    pub fn snapshot(&self) -> FakeState {
        self.lock().clone()
    }

    // A poisoned lock still holds plain flags; keep recording.
    fn lock(&self) -> MutexGuard<'_, FakeState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait]
impl Manager for FakeManager {
    fn name(&self) -> &'static str {
        "fake"
    }

    async fn add_instance(&self) -> Result<(), AppError> {
        self.lock().instance_added = true;
        Ok(())
    }

    async fn bind(&self) -> Result<BindResult, AppError> {
        self.lock().binded = true;
        Ok(BindResult::new())
    }

    async fn unbind(&self) -> Result<(), AppError> {
        self.lock().unbinded = true;
        Ok(())
    }

    async fn remove_instance(&self) -> Result<(), AppError> {
        self.lock().removed = true;
        Ok(())
    }

    async fn is_ok(&self) -> HealthResult {
        let state = self.lock();
        HealthResult {
            ok: state.ok,
            message: state.msg.clone(),
        }
    }
}
