//! Shared application state for the Axum API server.

use std::sync::Arc;

use redisapi_managers::Manager;

/// Application state shared across all route handlers via Axum `State`.
#[derive(Clone)]
pub struct AppState {
    pub manager: Arc<dyn Manager>,
}

impl AppState {
    pub fn new(manager: Arc<dyn Manager>) -> Self {
        Self { manager }
    }
}
