//! HTTP surface of the redis-api broker.
//!
//! Endpoints:
//! - POST   /resources                           add an instance
//! - POST   /resources/{name}                    bind an app, returns its environment
//! - DELETE /resources/{name}/hostname/{host}    unbind an app host
//! - DELETE /resources/{name}                    remove an instance
//! - GET    /resources/{name}/status             backend health
//! - GET    /health                              service liveness

pub mod routes;
pub mod state;
