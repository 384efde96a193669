use axum::{
    routing::{get, patch, post},
    Router,
};

use crate::server::AppState;

use super::health::health;
use super::metrics::prometheus_metrics;
use super::notification::{list_notifications, notification_stats, notify_update};
use super::public::{get_email_preferences, unsubscribe_link, update_email_preferences};
use super::subscriber::{
    add_subscriber, export_subscribers, get_subscriber, list_subscribers, relevant_subscribers,
    subscriber_stats, unsubscribe_subscriber, update_subscriber_preferences,
};
use super::template::{get_template, list_templates, preview_template};

pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Health & Metrics
        .route("/health", get(health))
        .route("/metrics", get(prometheus_metrics))
        // Targets of the links embedded in every email
        .route("/unsubscribe", get(unsubscribe_link))
        .route(
            "/email-preferences",
            get(get_email_preferences).post(update_email_preferences),
        )
        .nest(
            "/api/v1",
            Router::new()
                // Subscribers
                .route("/subscribers", post(add_subscriber).get(list_subscribers))
                .route("/subscribers/stats", get(subscriber_stats))
                .route("/subscribers/export", get(export_subscribers))
                .route("/subscribers/relevant", get(relevant_subscribers))
                .route("/subscribers/{id}", get(get_subscriber))
                .route(
                    "/subscribers/{id}/preferences",
                    patch(update_subscriber_preferences),
                )
                .route("/subscribers/{id}/unsubscribe", post(unsubscribe_subscriber))
                // Templates
                .route("/templates", get(list_templates))
                .route("/templates/{id}", get(get_template))
                .route("/templates/{id}/preview", post(preview_template))
                // Notifications
                .route("/notifications", get(list_notifications))
                .route("/notifications/stats", get(notification_stats))
                .route("/updates/notify", post(notify_update)),
        )
}
