//! End-to-end dispatch runs over the memory store and the simulated transport.

use std::sync::Arc;
use std::time::Duration;

use serde_json::{json, Map};
use tokio_test::assert_ok;

use email_notification_service::content::{ContentUpdate, UpdateKind};
use email_notification_service::notification::{
    DispatchOutcome, LinkBuilder, NotificationDispatcher, NotificationFilter, NotificationLog,
    NotificationStatus, SimulatedTransport,
};
use email_notification_service::storage::{CollectionStore, MemoryCollectionStore};
use email_notification_service::subscriber::{
    NewSubscriber, NotificationPreferences, PreferencesPatch, SubscriberStore,
};
use email_notification_service::template::TemplateCatalog;

struct Environment {
    subscribers: Arc<SubscriberStore>,
    log: Arc<NotificationLog>,
    dispatcher: NotificationDispatcher,
}

fn environment(success_rate: f64) -> Environment {
    let backend: Arc<dyn CollectionStore> = Arc::new(MemoryCollectionStore::new());
    let subscribers = Arc::new(SubscriberStore::new(backend.clone(), true));
    let log = Arc::new(NotificationLog::new(backend));
    let dispatcher = NotificationDispatcher::new(
        subscribers.clone(),
        log.clone(),
        Arc::new(TemplateCatalog::builtin()),
        Arc::new(SimulatedTransport::new(Duration::ZERO, success_rate)),
        LinkBuilder::new("https://innovia.example/"),
    );

    Environment {
        subscribers,
        log,
        dispatcher,
    }
}

fn progress_update() -> ContentUpdate {
    serde_json::from_value(json!({
        "id": "weekly-12",
        "type": "progress",
        "category": "education",
        "title": "Curriculum pilot",
        "summary": "Three schools onboarded",
        "metrics": [
            { "label": "Schools", "value": 3, "change": "+2" },
            { "label": "Retention", "value": "94%" }
        ]
    }))
    .unwrap()
}

#[tokio::test]
async fn test_progress_update_reaches_only_interested_subscribers() {
    let env = environment(1.0);

    // investor@example.com has progress disabled and only follows "company"
    let outcome = assert_ok!(env.dispatcher.dispatch(&progress_update()).await);
    let DispatchOutcome::Completed(report) = outcome else {
        panic!("expected a completed run");
    };

    assert_eq!(report.template_id, "progress-template");
    assert_eq!(report.total, 1);
    assert_eq!(report.sent, 1);

    let records = env
        .log
        .list(&NotificationFilter {
            update_id: Some("weekly-12".to_string()),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].subscriber_id, "sub-1");
    assert_eq!(records[0].status, NotificationStatus::Sent);
    assert!(records[0]
        .message_id
        .as_deref()
        .is_some_and(|id| id.starts_with("msg-")));
}

#[tokio::test]
async fn test_transport_failures_are_logged_per_notification() {
    let env = environment(0.0);

    let mut update = progress_update();
    update.kind = UpdateKind::Announcement;
    update.category = "company".to_string();

    let outcome = assert_ok!(env.dispatcher.dispatch(&update).await);
    let DispatchOutcome::Completed(report) = outcome else {
        panic!("expected a completed run");
    };
    assert_eq!(report.total, 2);
    assert_eq!(report.failed, 2);

    let stats = env.log.stats().await.unwrap();
    assert_eq!(stats.failed, 2);
    assert_eq!(stats.sent, 0);

    let failed = env
        .log
        .list(&NotificationFilter {
            status: Some(NotificationStatus::Failed),
            ..Default::default()
        })
        .await
        .unwrap();
    assert!(failed
        .iter()
        .all(|n| n.error_message.as_deref() == Some("SMTP connection failed")));

    // Nobody got an email, so no delivery timestamps were recorded
    let demo = env.subscribers.get("sub-1").await.unwrap().unwrap();
    assert!(demo.last_email_sent.is_none());
}

#[tokio::test]
async fn test_unsubscribed_and_opted_out_subscribers_are_skipped() {
    let env = environment(1.0);

    let id = env
        .subscribers
        .add(NewSubscriber {
            email: "researcher@example.com".to_string(),
            name: Some("Researcher".to_string()),
            preferences: NotificationPreferences {
                research: true,
                categories: vec!["cybersecurity".to_string()],
                ..Default::default()
            },
        })
        .await
        .unwrap();

    let mut update = progress_update();
    update.kind = UpdateKind::Research;
    update.category = "cybersecurity".to_string();
    update.variables = Map::new();

    let outcome = env.dispatcher.dispatch(&update).await.unwrap();
    let DispatchOutcome::Completed(report) = outcome else {
        panic!("expected a completed run");
    };
    assert_eq!(report.total, 1);

    env.subscribers.unsubscribe(&id).await.unwrap();
    let outcome = env.dispatcher.dispatch(&update).await.unwrap();
    assert_eq!(
        outcome,
        DispatchOutcome::NoRecipients {
            update_id: "weekly-12".to_string()
        }
    );

    // Re-enabling research for the demo subscriber brings them back in
    env.subscribers
        .update_preferences(
            "sub-1",
            PreferencesPatch {
                research: Some(true),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    let outcome = env.dispatcher.dispatch(&update).await.unwrap();
    assert!(matches!(outcome, DispatchOutcome::Completed(ref r) if r.total == 1));

    let stats = env.dispatcher.stats();
    assert_eq!(stats.runs, 3);
    assert_eq!(stats.emails_sent, 2);
}
