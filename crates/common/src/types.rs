use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Connection details handed to an application when it binds to an instance.
///
/// Keys are environment variable names (`REDIS_HOST`, `REDIS_PORT`, and
/// `REDIS_PASSWORD` when a password is configured).
pub type BindResult = BTreeMap<String, String>;

pub const BIND_HOST: &str = "REDIS_HOST";
pub const BIND_PORT: &str = "REDIS_PORT";
pub const BIND_PASSWORD: &str = "REDIS_PASSWORD";

/// Outcome of a manager health check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthResult {
    pub ok: bool,
    /// Empty on success, otherwise the reason the check failed.
    pub message: String,
}

impl HealthResult {
    pub fn healthy() -> Self {
        Self {
            ok: true,
            message: String::new(),
        }
    }

    pub fn unhealthy(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            message: message.into(),
        }
    }
}

impl From<(bool, String)> for HealthResult {
    fn from((ok, message): (bool, String)) -> Self {
        Self { ok, message }
    }
}

impl From<HealthResult> for (bool, String) {
    fn from(result: HealthResult) -> Self {
        (result.ok, result.message)
    }
}
