//! Infrastructure layer modules
//!
//! - `config`: Application configuration and settings
//! - `error`: Unified HTTP error type
//! - `metrics`: Prometheus metrics helpers
//! - `redis`: Redis connection pool, circuit breaker, and health tracking

pub mod config;
pub mod error;
pub mod metrics;
pub mod redis;
