//! API layer - HTTP endpoint handlers organized by domain.

mod health;
mod metrics;
mod notification;
mod public;
mod routes;
mod subscriber;
mod template;

pub use health::health;
pub use metrics::prometheus_metrics;
pub use notification::{list_notifications, notification_stats, notify_update};
pub use public::{get_email_preferences, unsubscribe_link, update_email_preferences};
pub use routes::api_routes;
pub use subscriber::{
    add_subscriber, export_subscribers, get_subscriber, list_subscribers, relevant_subscribers,
    subscriber_stats, unsubscribe_subscriber, update_subscriber_preferences,
};
pub use template::{get_template, list_templates, preview_template};
