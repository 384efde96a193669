//! Redis connectivity for the collection store
//!
//! - `CircuitBreaker`: stops hammering Redis while it is unavailable
//! - `RedisHealth`: outcome of the latest store operations, for `/health` and metrics
//! - `pool`: the shared, self-reconnecting connection

mod circuit_breaker;
mod health;
pub mod pool;

pub use circuit_breaker::{CircuitBreaker, CircuitBreakerConfig, CircuitBreakerStats, CircuitState};
pub use health::{RedisHealth, RedisHealthStats, RedisHealthStatus};

/// Get current time in milliseconds since epoch
pub(crate) fn current_time_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}
