//! Subscribers and their notification preferences.
//!
//! - `SubscriberStore`: add, preference updates, unsubscribe, relevance queries
//! - CSV export and statistics for the admin dashboard

mod store;
mod types;

pub use store::SubscriberStore;
pub use types::{
    NewSubscriber, NotificationPreferences, PreferencesPatch, Subscriber, SubscriberError,
    SubscriberFilter, SubscriberResult, SubscriberStats, SubscriberStatus,
};
