//! Shared configuration, error and wire types for the redis-api broker.

pub mod config;
pub mod error;
pub mod redis_client;
pub mod types;
