//! Outcome tracking for collection store operations against Redis.
//!
//! The Redis collection store reports every load and save here; `/health`
//! and the metrics scrape read the result.

use std::sync::atomic::{AtomicI64, AtomicU32, AtomicU64, AtomicU8, Ordering};
use std::sync::Mutex;

use super::current_time_ms;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum RedisHealthStatus {
    /// No store operation has reached Redis yet
    Unknown = 0,
    /// The last operation succeeded
    Healthy = 1,
    /// The last operation failed
    Failing = 2,
    /// The last operation was rejected by the circuit breaker
    CircuitOpen = 3,
}

impl RedisHealthStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RedisHealthStatus::Unknown => "unknown",
            RedisHealthStatus::Healthy => "healthy",
            RedisHealthStatus::Failing => "failing",
            RedisHealthStatus::CircuitOpen => "circuit_open",
        }
    }

    /// Failing or rejected; an untouched store is not degraded
    pub fn is_degraded(&self) -> bool {
        matches!(self, RedisHealthStatus::Failing | RedisHealthStatus::CircuitOpen)
    }

    fn from_u8(value: u8) -> Self {
        match value {
            1 => RedisHealthStatus::Healthy,
            2 => RedisHealthStatus::Failing,
            3 => RedisHealthStatus::CircuitOpen,
            _ => RedisHealthStatus::Unknown,
        }
    }
}

pub struct RedisHealth {
    status: AtomicU8,
    consecutive_failures: AtomicU32,
    total_failures: AtomicU64,
    last_success_ms: AtomicI64,
    last_error: Mutex<Option<String>>,
}

impl RedisHealth {
    pub fn new() -> Self {
        Self {
            status: AtomicU8::new(RedisHealthStatus::Unknown as u8),
            consecutive_failures: AtomicU32::new(0),
            total_failures: AtomicU64::new(0),
            last_success_ms: AtomicI64::new(0),
            last_error: Mutex::new(None),
        }
    }

    pub fn record_success(&self) {
        self.status
            .store(RedisHealthStatus::Healthy as u8, Ordering::Release);
        self.consecutive_failures.store(0, Ordering::Release);
        self.last_success_ms
            .store(current_time_ms(), Ordering::Release);
    }

    /// `rejected` marks a failure that never reached Redis (breaker open)
    pub fn record_failure(&self, operation: &str, error: &str, rejected: bool) {
        let status = if rejected {
            RedisHealthStatus::CircuitOpen
        } else {
            RedisHealthStatus::Failing
        };
        self.status.store(status as u8, Ordering::Release);
        self.consecutive_failures.fetch_add(1, Ordering::AcqRel);
        self.total_failures.fetch_add(1, Ordering::Relaxed);

        if let Ok(mut last) = self.last_error.lock() {
            *last = Some(format!("{}: {}", operation, error));
        }
    }

    pub fn status(&self) -> RedisHealthStatus {
        RedisHealthStatus::from_u8(self.status.load(Ordering::Acquire))
    }

    pub fn stats(&self) -> RedisHealthStats {
        let last_success_ms = self.last_success_ms.load(Ordering::Acquire);
        RedisHealthStats {
            status: self.status(),
            consecutive_failures: self.consecutive_failures.load(Ordering::Acquire),
            total_failures: self.total_failures.load(Ordering::Relaxed),
            last_success_ms: (last_success_ms > 0).then_some(last_success_ms),
            last_error: self.last_error.lock().ok().and_then(|e| e.clone()),
        }
    }
}

impl Default for RedisHealth {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone)]
pub struct RedisHealthStats {
    pub status: RedisHealthStatus,
    pub consecutive_failures: u32,
    pub total_failures: u64,
    pub last_success_ms: Option<i64>,
    /// "<operation>: <error>" of the most recent failure
    pub last_error: Option<String>,
}
