//! Prometheus metrics for the email notification service.
//!
//! - Subscriber metrics (sign-ups, unsubscribes, population by status)
//! - Delivery metrics (emails sent/failed, dispatch runs by outcome)
//! - Latency metrics (send, template rendering, collection store)
//! - Redis health metrics

mod helpers;

pub use helpers::{encode_metrics, BackendMetrics, DeliveryMetrics, SubscriberMetrics};

use lazy_static::lazy_static;
use prometheus::{
    register_histogram, register_histogram_vec, register_int_counter, register_int_counter_vec,
    register_int_gauge, register_int_gauge_vec, Histogram, HistogramVec, IntCounter,
    IntCounterVec, IntGauge, IntGaugeVec,
};

/// Prefix for all metrics
const METRIC_PREFIX: &str = "mailer";

lazy_static! {
    // ============================================================================
    // Subscriber Metrics
    // ============================================================================

    /// Subscribers by status (refreshed on scrape)
    pub static ref SUBSCRIBERS: IntGaugeVec = register_int_gauge_vec!(
        format!("{}_subscribers", METRIC_PREFIX),
        "Number of subscribers by status",
        &["status"]
    ).unwrap();

    /// Total subscribers added
    pub static ref SUBSCRIBERS_ADDED_TOTAL: IntCounter = register_int_counter!(
        format!("{}_subscribers_added_total", METRIC_PREFIX),
        "Total subscribers added"
    ).unwrap();

    /// Total unsubscribe requests that changed a subscriber's status
    pub static ref UNSUBSCRIBES_TOTAL: IntCounter = register_int_counter!(
        format!("{}_unsubscribes_total", METRIC_PREFIX),
        "Total subscribers moved to unsubscribed"
    ).unwrap();

    // ============================================================================
    // Delivery Metrics
    // ============================================================================

    /// Emails accepted by the transport
    pub static ref EMAILS_SENT_TOTAL: IntCounter = register_int_counter!(
        format!("{}_emails_sent_total", METRIC_PREFIX),
        "Total emails accepted by the transport"
    ).unwrap();

    /// Emails rejected by the transport
    pub static ref EMAILS_FAILED_TOTAL: IntCounter = register_int_counter!(
        format!("{}_emails_failed_total", METRIC_PREFIX),
        "Total emails the transport failed to send"
    ).unwrap();

    /// Dispatch runs by outcome (completed, no_recipients)
    pub static ref DISPATCH_RUNS_TOTAL: IntCounterVec = register_int_counter_vec!(
        format!("{}_dispatch_runs_total", METRIC_PREFIX),
        "Total dispatch runs by outcome",
        &["outcome"]
    ).unwrap();

    /// Notifications by status (refreshed on scrape)
    pub static ref NOTIFICATIONS: IntGaugeVec = register_int_gauge_vec!(
        format!("{}_notifications", METRIC_PREFIX),
        "Number of notification records by status",
        &["status"]
    ).unwrap();

    /// Transport send latency
    pub static ref EMAIL_SEND_LATENCY: Histogram = register_histogram!(
        format!("{}_email_send_latency_seconds", METRIC_PREFIX),
        "Email transport send latency in seconds",
        vec![0.01, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0]
    ).unwrap();

    /// Template expansion latency (all three fields)
    pub static ref TEMPLATE_RENDER_LATENCY: Histogram = register_histogram!(
        format!("{}_template_render_latency_seconds", METRIC_PREFIX),
        "Template expansion latency in seconds",
        vec![0.00001, 0.00005, 0.0001, 0.0005, 0.001, 0.005, 0.01]
    ).unwrap();

    // ============================================================================
    // Collection Store Metrics
    // ============================================================================

    /// Collection store operation latency
    pub static ref STORE_OPERATION_LATENCY: HistogramVec = register_histogram_vec!(
        format!("{}_store_operation_latency_seconds", METRIC_PREFIX),
        "Collection store operation latency in seconds",
        &["backend", "operation"],
        vec![0.0001, 0.0005, 0.001, 0.005, 0.01, 0.05, 0.1, 0.5]
    ).unwrap();

    /// Collection store errors
    pub static ref STORE_ERRORS_TOTAL: IntCounterVec = register_int_counter_vec!(
        format!("{}_store_errors_total", METRIC_PREFIX),
        "Total collection store errors",
        &["backend", "operation"]
    ).unwrap();

    // ============================================================================
    // Redis Metrics
    // ============================================================================

    /// 1 when the last store operation against Redis succeeded
    pub static ref REDIS_CONNECTION_STATUS: IntGauge = register_int_gauge!(
        format!("{}_redis_connection_status", METRIC_PREFIX),
        "Redis store status (1=last operation succeeded, 0=failing or unknown)"
    ).unwrap();

    /// Redis circuit breaker state (0=closed, 1=open, 2=half-open)
    pub static ref REDIS_CIRCUIT_BREAKER_STATE: IntGauge = register_int_gauge!(
        format!("{}_redis_circuit_breaker_state", METRIC_PREFIX),
        "Redis circuit breaker state (0=closed, 1=open, 2=half-open)"
    ).unwrap();
}
