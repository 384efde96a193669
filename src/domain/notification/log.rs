//! Persistent notification log

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::metrics::DeliveryMetrics;
use crate::storage::{Collection, CollectionKey, CollectionStore};

use super::types::{
    Notification, NotificationFilter, NotificationLogError, NotificationStats, NotificationStatus,
};

pub type LogResult<T> = Result<T, NotificationLogError>;

/// Notification records with the pending -> sent | failed transition.
///
/// A record leaves `pending` at most once; later transitions are rejected.
pub struct NotificationLog {
    collection: Collection<Notification>,
    write_lock: Mutex<()>,
}

impl NotificationLog {
    pub fn new(store: Arc<dyn CollectionStore>) -> Self {
        Self {
            collection: Collection::new(store, CollectionKey::Notifications),
            write_lock: Mutex::new(()),
        }
    }

    async fn load(&self) -> LogResult<Vec<Notification>> {
        Ok(self.collection.load().await?.unwrap_or_default())
    }

    async fn save(&self, notifications: &[Notification]) -> LogResult<()> {
        self.collection.save(notifications).await?;

        let stats = compute_stats(notifications);
        DeliveryMetrics::set_notifications(stats.pending, stats.sent, stats.failed);
        Ok(())
    }

    /// Append a pending notification and return its id.
    pub async fn queue(
        &self,
        update_id: &str,
        subscriber_id: &str,
        template_id: &str,
    ) -> LogResult<String> {
        let notification = Notification {
            id: format!("notif-{}", Uuid::new_v4()),
            update_id: update_id.to_string(),
            subscriber_id: subscriber_id.to_string(),
            template_id: template_id.to_string(),
            status: NotificationStatus::Pending,
            sent_at: None,
            message_id: None,
            error_message: None,
            created_at: Some(Utc::now()),
        };
        let id = notification.id.clone();

        let _guard = self.write_lock.lock().await;
        let mut notifications = self.load().await?;
        notifications.push(notification);
        self.save(&notifications).await?;

        tracing::debug!(notification_id = %id, subscriber_id = %subscriber_id, "Notification queued");
        Ok(id)
    }

    pub async fn mark_sent(
        &self,
        id: &str,
        message_id: Option<String>,
        at: DateTime<Utc>,
    ) -> LogResult<Notification> {
        self.transition(id, |n| {
            n.status = NotificationStatus::Sent;
            n.sent_at = Some(at);
            n.message_id = message_id;
        })
        .await
    }

    pub async fn mark_failed(&self, id: &str, error: &str) -> LogResult<Notification> {
        self.transition(id, |n| {
            n.status = NotificationStatus::Failed;
            n.error_message = Some(error.to_string());
        })
        .await
    }

    async fn transition<F>(&self, id: &str, apply: F) -> LogResult<Notification>
    where
        F: FnOnce(&mut Notification),
    {
        let _guard = self.write_lock.lock().await;
        let mut notifications = self.load().await?;

        let notification = notifications
            .iter_mut()
            .find(|n| n.id == id)
            .ok_or_else(|| NotificationLogError::NotFound(id.to_string()))?;

        if notification.status.is_final() {
            return Err(NotificationLogError::AlreadyFinal {
                id: id.to_string(),
                status: notification.status,
            });
        }
        apply(notification);
        let updated = notification.clone();

        self.save(&notifications).await?;
        Ok(updated)
    }

    pub async fn get(&self, id: &str) -> LogResult<Option<Notification>> {
        Ok(self.load().await?.into_iter().find(|n| n.id == id))
    }

    pub async fn list(&self, filter: &NotificationFilter) -> LogResult<Vec<Notification>> {
        Ok(self
            .load()
            .await?
            .into_iter()
            .filter(|n| filter.matches(n))
            .collect())
    }

    pub async fn stats(&self) -> LogResult<NotificationStats> {
        Ok(compute_stats(&self.load().await?))
    }
}

fn compute_stats(notifications: &[Notification]) -> NotificationStats {
    let count = |status| notifications.iter().filter(|n| n.status == status).count();

    NotificationStats {
        total: notifications.len(),
        sent: count(NotificationStatus::Sent),
        pending: count(NotificationStatus::Pending),
        failed: count(NotificationStatus::Failed),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryCollectionStore;

    fn create_log() -> NotificationLog {
        NotificationLog::new(Arc::new(MemoryCollectionStore::new()))
    }

    #[tokio::test]
    async fn test_absent_collection_is_empty() {
        let log = create_log();
        assert!(log.list(&NotificationFilter::default()).await.unwrap().is_empty());
        assert_eq!(log.stats().await.unwrap(), NotificationStats::default());
    }

    #[tokio::test]
    async fn test_queue_then_sent() {
        let log = create_log();
        let id = log.queue("u-1", "sub-1", "milestone-template").await.unwrap();
        assert!(id.starts_with("notif-"));

        let pending = log.get(&id).await.unwrap().unwrap();
        assert_eq!(pending.status, NotificationStatus::Pending);
        assert!(pending.created_at.is_some());

        let at = Utc::now();
        let sent = log
            .mark_sent(&id, Some("msg-1".to_string()), at)
            .await
            .unwrap();
        assert_eq!(sent.status, NotificationStatus::Sent);
        assert_eq!(sent.sent_at, Some(at));
        assert_eq!(sent.message_id.as_deref(), Some("msg-1"));
    }

    #[tokio::test]
    async fn test_terminal_state_is_final() {
        let log = create_log();
        let id = log.queue("u-1", "sub-1", "t").await.unwrap();
        log.mark_failed(&id, "SMTP connection failed").await.unwrap();

        let result = log.mark_sent(&id, None, Utc::now()).await;
        assert!(matches!(
            result,
            Err(NotificationLogError::AlreadyFinal {
                status: NotificationStatus::Failed,
                ..
            })
        ));

        let stored = log.get(&id).await.unwrap().unwrap();
        assert_eq!(stored.status, NotificationStatus::Failed);
        assert_eq!(stored.error_message.as_deref(), Some("SMTP connection failed"));
    }

    #[tokio::test]
    async fn test_unknown_id() {
        let log = create_log();
        let result = log.mark_failed("notif-missing", "x").await;
        assert!(matches!(result, Err(NotificationLogError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_stats_and_filter() {
        let log = create_log();
        let a = log.queue("u-1", "sub-1", "t").await.unwrap();
        let b = log.queue("u-1", "sub-2", "t").await.unwrap();
        log.queue("u-2", "sub-1", "t").await.unwrap();

        log.mark_sent(&a, None, Utc::now()).await.unwrap();
        log.mark_failed(&b, "boom").await.unwrap();

        let stats = log.stats().await.unwrap();
        assert_eq!(
            stats,
            NotificationStats {
                total: 3,
                sent: 1,
                pending: 1,
                failed: 1
            }
        );

        let for_update = log
            .list(&NotificationFilter {
                update_id: Some("u-1".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(for_update.len(), 2);
    }
}
