//! Metrics helper structs for convenient metric recording

use prometheus::{Encoder, TextEncoder};

use super::{
    DISPATCH_RUNS_TOTAL, EMAILS_FAILED_TOTAL, EMAILS_SENT_TOTAL, EMAIL_SEND_LATENCY,
    NOTIFICATIONS, STORE_ERRORS_TOTAL, STORE_OPERATION_LATENCY, SUBSCRIBERS,
    SUBSCRIBERS_ADDED_TOTAL, TEMPLATE_RENDER_LATENCY, UNSUBSCRIBES_TOTAL,
};

/// Encode all metrics to Prometheus text format
pub fn encode_metrics() -> Result<String, prometheus::Error> {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    encoder.encode(&metric_families, &mut buffer)?;
    Ok(String::from_utf8(buffer).unwrap_or_default())
}

/// Helper struct for subscriber metrics
pub struct SubscriberMetrics;

impl SubscriberMetrics {
    pub fn record_added() {
        SUBSCRIBERS_ADDED_TOTAL.inc();
    }

    pub fn record_unsubscribed() {
        UNSUBSCRIBES_TOTAL.inc();
    }

    /// Refresh the population gauges from a stats snapshot
    pub fn set_population(active: usize, unsubscribed: usize, bounced: usize) {
        SUBSCRIBERS.with_label_values(&["active"]).set(active as i64);
        SUBSCRIBERS
            .with_label_values(&["unsubscribed"])
            .set(unsubscribed as i64);
        SUBSCRIBERS.with_label_values(&["bounced"]).set(bounced as i64);
    }
}

/// Helper struct for email delivery metrics
pub struct DeliveryMetrics;

impl DeliveryMetrics {
    pub fn record_sent(latency_secs: f64) {
        EMAILS_SENT_TOTAL.inc();
        EMAIL_SEND_LATENCY.observe(latency_secs);
    }

    pub fn record_failed(latency_secs: f64) {
        EMAILS_FAILED_TOTAL.inc();
        EMAIL_SEND_LATENCY.observe(latency_secs);
    }

    pub fn record_render(latency_secs: f64) {
        TEMPLATE_RENDER_LATENCY.observe(latency_secs);
    }

    /// Record a finished dispatch run ("completed" or "no_recipients")
    pub fn record_run(outcome: &str) {
        DISPATCH_RUNS_TOTAL.with_label_values(&[outcome]).inc();
    }

    /// Refresh the notification gauges from a stats snapshot
    pub fn set_notifications(pending: usize, sent: usize, failed: usize) {
        NOTIFICATIONS.with_label_values(&["pending"]).set(pending as i64);
        NOTIFICATIONS.with_label_values(&["sent"]).set(sent as i64);
        NOTIFICATIONS.with_label_values(&["failed"]).set(failed as i64);
    }
}

/// Helper struct for collection store metrics
pub struct BackendMetrics;

impl BackendMetrics {
    /// Record backend operation latency
    pub fn record_latency(backend: &str, operation: &str, latency_secs: f64) {
        STORE_OPERATION_LATENCY
            .with_label_values(&[backend, operation])
            .observe(latency_secs);
    }

    /// Record backend error
    pub fn record_error(backend: &str, operation: &str) {
        STORE_ERRORS_TOTAL
            .with_label_values(&[backend, operation])
            .inc();
    }
}
