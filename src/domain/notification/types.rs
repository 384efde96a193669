//! Notification record types and error definitions

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::storage::StoreError;
use crate::subscriber::SubscriberError;

/// Notification log error type
#[derive(Debug, Error)]
pub enum NotificationLogError {
    #[error("Notification not found: {0}")]
    NotFound(String),

    #[error("Notification {id} is already {status}")]
    AlreadyFinal { id: String, status: NotificationStatus },

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Errors that abort a dispatch run
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("Template catalog is empty")]
    EmptyCatalog,

    #[error(transparent)]
    Subscribers(#[from] SubscriberError),

    #[error(transparent)]
    Log(#[from] NotificationLogError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationStatus {
    #[default]
    Pending,
    Sent,
    Failed,
    Bounced,
}

impl NotificationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationStatus::Pending => "pending",
            NotificationStatus::Sent => "sent",
            NotificationStatus::Failed => "failed",
            NotificationStatus::Bounced => "bounced",
        }
    }

    pub fn is_final(&self) -> bool {
        !matches!(self, NotificationStatus::Pending)
    }
}

impl std::fmt::Display for NotificationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One delivery attempt of one update to one subscriber
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: String,
    pub update_id: String,
    pub subscriber_id: String,
    pub template_id: String,
    pub status: NotificationStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sent_at: Option<DateTime<Utc>>,
    /// Provider message id of a successful send
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    /// Absent on records written before creation time was tracked
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NotificationStats {
    pub total: usize,
    pub sent: usize,
    pub pending: usize,
    pub failed: usize,
}

/// Listing filter for the notification log
#[derive(Debug, Clone, Default)]
pub struct NotificationFilter {
    pub update_id: Option<String>,
    pub subscriber_id: Option<String>,
    pub status: Option<NotificationStatus>,
}

impl NotificationFilter {
    pub fn matches(&self, n: &Notification) -> bool {
        self.update_id.as_ref().is_none_or(|id| *id == n.update_id)
            && self
                .subscriber_id
                .as_ref()
                .is_none_or(|id| *id == n.subscriber_id)
            && self.status.is_none_or(|s| s == n.status)
    }
}

/// Per-run summary returned by the dispatcher
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DispatchReport {
    pub update_id: String,
    pub template_id: String,
    pub total: usize,
    pub sent: usize,
    pub failed: usize,
    pub notification_ids: Vec<String>,
}

/// Outcome of a dispatch run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum DispatchOutcome {
    /// No active subscriber wants this update; nothing was queued
    NoRecipients {
        #[serde(rename = "updateId")]
        update_id: String,
    },
    Completed(DispatchReport),
}

impl DispatchOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            DispatchOutcome::NoRecipients { .. } => "no_recipients",
            DispatchOutcome::Completed(_) => "completed",
        }
    }
}
