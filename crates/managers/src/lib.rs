//! Provisioning strategies for the redis-api broker.
//!
//! A [`Manager`] knows how to add, bind, unbind and remove a service
//! instance and how to report whether its backend is reachable. The
//! [`ManagerRegistry`] selects one by name:
//!
//! | Key      | Manager          |
//! |----------|------------------|
//! | `shared` | [`RedisManager`] |
//! | `fake`   | [`FakeManager`]  |
//!
//! [`DockerManager`] is kept outside the registry and must be built directly.

use async_trait::async_trait;

use redisapi_common::error::AppError;
use redisapi_common::types::{BindResult, HealthResult};

pub mod docker;
pub mod fake;
pub mod redis;
pub mod registry;

pub use docker::DockerManager;
pub use fake::{FakeManager, FakeState};
pub use redis::RedisManager;
pub use registry::{ManagerFactory, ManagerRegistry};

/// Operations every provisioning strategy supports.
#[async_trait]
pub trait Manager: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    async fn add_instance(&self) -> Result<(), AppError>;

    /// Produce the connection details an application needs to use the instance.
    async fn bind(&self) -> Result<BindResult, AppError>;

    async fn unbind(&self) -> Result<(), AppError>;

    async fn remove_instance(&self) -> Result<(), AppError>;

    /// Check whether the backing service is reachable.
    ///
    /// Failures are reported in the result, never as an error.
    async fn is_ok(&self) -> HealthResult;
}
