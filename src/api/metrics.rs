//! Prometheus metrics endpoint.

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::IntoResponse,
};

use crate::metrics::{self, DeliveryMetrics, SubscriberMetrics};
use crate::redis::RedisHealthStatus;
use crate::server::AppState;

/// GET /metrics - Prometheus metrics endpoint
pub async fn prometheus_metrics(State(state): State<AppState>) -> impl IntoResponse {
    update_metrics_from_state(&state).await;

    match metrics::encode_metrics() {
        Ok(output) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "text/plain; version=0.0.4; charset=utf-8")],
            output,
        ),
        Err(e) => {
            tracing::error!(error = %e, "Failed to encode Prometheus metrics");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                [(header::CONTENT_TYPE, "text/plain")],
                format!("Failed to encode metrics: {}", e),
            )
        }
    }
}

/// Refresh gauges that are derived from stored state
async fn update_metrics_from_state(state: &AppState) {
    match state.subscribers.stats().await {
        Ok(stats) => {
            SubscriberMetrics::set_population(stats.active, stats.unsubscribed, stats.bounced)
        }
        Err(e) => tracing::warn!(error = %e, "Failed to refresh subscriber gauges"),
    }

    match state.notifications.stats().await {
        Ok(stats) => DeliveryMetrics::set_notifications(stats.pending, stats.sent, stats.failed),
        Err(e) => tracing::warn!(error = %e, "Failed to refresh notification gauges"),
    }

    if state.uses_redis() {
        let healthy = state.redis_health.status() == RedisHealthStatus::Healthy;
        metrics::REDIS_CONNECTION_STATUS.set(if healthy { 1 } else { 0 });
        metrics::REDIS_CIRCUIT_BREAKER_STATE.set(state.redis_circuit_breaker.state().as_gauge());
    }
}
