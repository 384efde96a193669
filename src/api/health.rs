//! Health check endpoint.

use axum::{extract::State, Json};
use serde::Serialize;

use crate::notification::DispatcherStatsSnapshot;
use crate::server::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_seconds: u64,
    pub store: StoreHealthResponse,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub redis: Option<RedisHealthResponse>,
    pub dispatcher: DispatcherStatsSnapshot,
}

#[derive(Debug, Serialize)]
pub struct StoreHealthResponse {
    pub backend: String,
}

#[derive(Debug, Serialize)]
pub struct RedisHealthResponse {
    pub status: String,
    pub consecutive_failures: u32,
    pub total_failures: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_success_ms: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_error: Option<String>,
    pub circuit_breaker_state: String,
    pub circuit_breaker_failures: u32,
}

pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let redis = state.uses_redis().then(|| {
        let health = state.redis_health.stats();
        let breaker = state.redis_circuit_breaker.stats();
        RedisHealthResponse {
            status: health.status.as_str().to_string(),
            consecutive_failures: health.consecutive_failures,
            total_failures: health.total_failures,
            last_success_ms: health.last_success_ms,
            last_error: health.last_error,
            circuit_breaker_state: breaker.state.as_str().to_string(),
            circuit_breaker_failures: breaker.failure_count,
        }
    });

    let degraded = state.uses_redis() && state.redis_health.status().is_degraded();
    let status = if degraded { "degraded" } else { "healthy" };

    Json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: state.start_time.elapsed().as_secs(),
        store: StoreHealthResponse {
            backend: state.store.backend_type().to_string(),
        },
        redis,
        dispatcher: state.dispatcher.stats(),
    })
}
