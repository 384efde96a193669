//! Subscriber repository over the subscribers collection

use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::content::UpdateKind;
use crate::metrics::SubscriberMetrics;
use crate::storage::{Collection, CollectionKey, CollectionStore};

use super::types::{
    NewSubscriber, NotificationPreferences, PreferencesPatch, Subscriber, SubscriberError,
    SubscriberFilter, SubscriberResult, SubscriberStats, SubscriberStatus,
};

const CSV_HEADER: &str =
    "Email,Name,Status,Subscription Date,Milestones,Progress,Announcements,Research,Categories";

/// Persistent subscriber list.
///
/// Every mutation is a load-modify-save of the whole collection, serialized
/// behind `write_lock`.
pub struct SubscriberStore {
    collection: Collection<Subscriber>,
    seed_examples: bool,
    write_lock: Mutex<()>,
}

impl SubscriberStore {
    pub fn new(store: Arc<dyn CollectionStore>, seed_examples: bool) -> Self {
        Self {
            collection: Collection::new(store, CollectionKey::Subscribers),
            seed_examples,
            write_lock: Mutex::new(()),
        }
    }

    async fn load(&self) -> SubscriberResult<Vec<Subscriber>> {
        match self.collection.load().await? {
            Some(subscribers) => Ok(subscribers),
            None if self.seed_examples => Ok(example_subscribers()),
            None => Ok(Vec::new()),
        }
    }

    async fn save(&self, subscribers: &[Subscriber]) -> SubscriberResult<()> {
        self.collection.save(subscribers).await?;

        let mut stats = SubscriberStats::default();
        for s in subscribers {
            count_status(&mut stats, s.status);
        }
        SubscriberMetrics::set_population(stats.active, stats.unsubscribed, stats.bounced);
        Ok(())
    }

    /// Register a new subscriber and return its id.
    #[tracing::instrument(name = "subscriber.add", skip(self, request))]
    pub async fn add(&self, request: NewSubscriber) -> SubscriberResult<String> {
        let email = request.email.trim();
        if email.is_empty() {
            return Err(SubscriberError::InvalidEmail);
        }

        let name = request
            .name
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .map(str::to_string);

        let subscriber = Subscriber {
            id: format!("sub-{}", Uuid::new_v4()),
            email: email.to_string(),
            name,
            subscription_date: Utc::now().date_naive(),
            preferences: request.preferences,
            status: SubscriberStatus::Active,
            last_email_sent: None,
        };
        let id = subscriber.id.clone();

        let _guard = self.write_lock.lock().await;
        let mut subscribers = self.load().await?;
        subscribers.push(subscriber);
        self.save(&subscribers).await?;

        SubscriberMetrics::record_added();
        tracing::info!(subscriber_id = %id, "Subscriber added");
        Ok(id)
    }

    /// Merge `patch` into the subscriber's preferences.
    ///
    /// Returns `false` (and writes nothing) when the id is unknown.
    #[tracing::instrument(name = "subscriber.update_preferences", skip(self, patch))]
    pub async fn update_preferences(&self, id: &str, patch: PreferencesPatch) -> SubscriberResult<bool> {
        let _guard = self.write_lock.lock().await;
        let mut subscribers = self.load().await?;

        let Some(subscriber) = subscribers.iter_mut().find(|s| s.id == id) else {
            tracing::debug!(subscriber_id = %id, "Preference update for unknown subscriber");
            return Ok(false);
        };
        subscriber.preferences.apply(patch);

        self.save(&subscribers).await?;
        Ok(true)
    }

    /// Mark the subscriber unsubscribed. Idempotent.
    ///
    /// Returns `false` when the id is unknown.
    #[tracing::instrument(name = "subscriber.unsubscribe", skip(self))]
    pub async fn unsubscribe(&self, id: &str) -> SubscriberResult<bool> {
        let _guard = self.write_lock.lock().await;
        let mut subscribers = self.load().await?;

        let Some(subscriber) = subscribers.iter_mut().find(|s| s.id == id) else {
            return Ok(false);
        };
        if subscriber.status == SubscriberStatus::Unsubscribed {
            return Ok(true);
        }
        subscriber.status = SubscriberStatus::Unsubscribed;

        self.save(&subscribers).await?;
        SubscriberMetrics::record_unsubscribed();
        tracing::info!(subscriber_id = %id, "Subscriber unsubscribed");
        Ok(true)
    }

    /// Stamp `lastEmailSent` after a successful delivery.
    pub async fn record_delivery(&self, id: &str, at: DateTime<Utc>) -> SubscriberResult<bool> {
        let _guard = self.write_lock.lock().await;
        let mut subscribers = self.load().await?;

        let Some(subscriber) = subscribers.iter_mut().find(|s| s.id == id) else {
            return Ok(false);
        };
        subscriber.last_email_sent = Some(at);

        self.save(&subscribers).await?;
        Ok(true)
    }

    pub async fn get(&self, id: &str) -> SubscriberResult<Option<Subscriber>> {
        Ok(self.load().await?.into_iter().find(|s| s.id == id))
    }

    pub async fn list(&self, filter: &SubscriberFilter) -> SubscriberResult<Vec<Subscriber>> {
        Ok(self
            .load()
            .await?
            .into_iter()
            .filter(|s| filter.matches(s))
            .collect())
    }

    /// Active subscribers that want `kind` updates in `category`, in insertion order.
    #[tracing::instrument(name = "subscriber.relevant", skip(self))]
    pub async fn relevant(&self, kind: UpdateKind, category: &str) -> SubscriberResult<Vec<Subscriber>> {
        let relevant: Vec<Subscriber> = self
            .load()
            .await?
            .into_iter()
            .filter(|s| s.is_relevant(kind, category))
            .collect();

        tracing::debug!(count = relevant.len(), "Relevant subscribers resolved");
        Ok(relevant)
    }

    pub async fn stats(&self) -> SubscriberResult<SubscriberStats> {
        let subscribers = self.load().await?;
        let mut stats = SubscriberStats::default();
        for s in &subscribers {
            count_status(&mut stats, s.status);
        }
        Ok(stats)
    }

    /// CSV of the subscribers matching `filter`, header first.
    pub async fn export_csv(&self, filter: &SubscriberFilter) -> SubscriberResult<String> {
        let subscribers = self.list(filter).await?;

        let mut lines = Vec::with_capacity(subscribers.len() + 1);
        lines.push(CSV_HEADER.to_string());
        lines.extend(subscribers.iter().map(csv_row));
        Ok(lines.join("\n"))
    }
}

fn count_status(stats: &mut SubscriberStats, status: SubscriberStatus) {
    stats.total += 1;
    match status {
        SubscriberStatus::Active => stats.active += 1,
        SubscriberStatus::Unsubscribed => stats.unsubscribed += 1,
        SubscriberStatus::Bounced => stats.bounced += 1,
    }
}

fn csv_row(s: &Subscriber) -> String {
    let p = &s.preferences;
    [
        csv_field(&s.email),
        csv_field(s.name.as_deref().unwrap_or("")),
        s.status.as_str().to_string(),
        s.subscription_date.format("%Y-%m-%d").to_string(),
        p.milestones.to_string(),
        p.progress.to_string(),
        p.announcements.to_string(),
        p.research.to_string(),
        csv_field(&p.categories.join(";")),
    ]
    .join(",")
}

/// Quote a field only when it contains a separator, quote or line break.
fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

/// Records served when the collection has never been written.
fn example_subscribers() -> Vec<Subscriber> {
    let date = |y, m, d| NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default();

    vec![
        Subscriber {
            id: "sub-1".to_string(),
            email: "demo@example.com".to_string(),
            name: Some("Demo User".to_string()),
            subscription_date: date(2025, 1, 15),
            preferences: NotificationPreferences {
                milestones: true,
                progress: true,
                announcements: true,
                research: false,
                categories: vec![
                    "company".to_string(),
                    "cybersecurity".to_string(),
                    "education".to_string(),
                ],
            },
            status: SubscriberStatus::Active,
            last_email_sent: None,
        },
        Subscriber {
            id: "sub-2".to_string(),
            email: "investor@example.com".to_string(),
            name: Some("Investor Relations".to_string()),
            subscription_date: date(2025, 1, 10),
            preferences: NotificationPreferences {
                milestones: true,
                progress: false,
                announcements: true,
                research: false,
                categories: vec!["company".to_string()],
            },
            status: SubscriberStatus::Active,
            last_email_sent: None,
        },
    ]
}
