//! Subscriber type definitions

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::content::UpdateKind;
use crate::storage::StoreError;

#[derive(Debug, Error)]
pub enum SubscriberError {
    #[error("Email address must not be empty")]
    InvalidEmail,

    #[error(transparent)]
    Store(#[from] StoreError),
}

pub type SubscriberResult<T> = Result<T, SubscriberError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubscriberStatus {
    #[default]
    Active,
    Unsubscribed,
    Bounced,
}

impl SubscriberStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SubscriberStatus::Active => "active",
            SubscriberStatus::Unsubscribed => "unsubscribed",
            SubscriberStatus::Bounced => "bounced",
        }
    }
}

impl std::str::FromStr for SubscriberStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(SubscriberStatus::Active),
            "unsubscribed" => Ok(SubscriberStatus::Unsubscribed),
            "bounced" => Ok(SubscriberStatus::Bounced),
            other => Err(format!("unknown subscriber status '{}'", other)),
        }
    }
}

/// Which notifications a subscriber wants.
///
/// The four flags select update kinds; `categories` selects topics
/// (company, cybersecurity, education, healthcare, supply-chain, team).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationPreferences {
    pub milestones: bool,
    pub progress: bool,
    pub announcements: bool,
    pub research: bool,
    #[serde(default)]
    pub categories: Vec<String>,
}

impl Default for NotificationPreferences {
    /// Same preselection the subscription form offers.
    fn default() -> Self {
        Self {
            milestones: true,
            progress: true,
            announcements: true,
            research: false,
            categories: vec![
                "company".to_string(),
                "cybersecurity".to_string(),
                "education".to_string(),
            ],
        }
    }
}

impl NotificationPreferences {
    /// The flag that governs updates of `kind`
    pub fn wants(&self, kind: UpdateKind) -> bool {
        match kind {
            UpdateKind::Milestone => self.milestones,
            UpdateKind::Progress => self.progress,
            UpdateKind::Announcement => self.announcements,
            UpdateKind::Research => self.research,
        }
    }

    pub fn follows(&self, category: &str) -> bool {
        self.categories.iter().any(|c| c == category)
    }

    /// Merge the fields present in `patch`
    pub fn apply(&mut self, patch: PreferencesPatch) {
        if let Some(milestones) = patch.milestones {
            self.milestones = milestones;
        }
        if let Some(progress) = patch.progress {
            self.progress = progress;
        }
        if let Some(announcements) = patch.announcements {
            self.announcements = announcements;
        }
        if let Some(research) = patch.research {
            self.research = research;
        }
        if let Some(categories) = patch.categories {
            self.categories = categories;
        }
    }
}

/// Partial preference update; absent fields are left untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PreferencesPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub milestones: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub progress: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub announcements: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub research: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub categories: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subscriber {
    pub id: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub subscription_date: NaiveDate,
    pub preferences: NotificationPreferences,
    pub status: SubscriberStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_email_sent: Option<DateTime<Utc>>,
}

impl Subscriber {
    /// Active, wants this kind of update, and follows the category
    pub fn is_relevant(&self, kind: UpdateKind, category: &str) -> bool {
        self.status == SubscriberStatus::Active
            && self.preferences.wants(kind)
            && self.preferences.follows(category)
    }
}

/// Request to add a subscriber
#[derive(Debug, Clone, Deserialize)]
pub struct NewSubscriber {
    pub email: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub preferences: NotificationPreferences,
}

/// Listing filter used by the admin dashboard
#[derive(Debug, Clone, Default)]
pub struct SubscriberFilter {
    /// Case-insensitive substring of email or name
    pub search: Option<String>,
    /// `None` means every status
    pub status: Option<SubscriberStatus>,
}

impl SubscriberFilter {
    pub fn matches(&self, subscriber: &Subscriber) -> bool {
        let matches_search = match self.search.as_deref() {
            None | Some("") => true,
            Some(term) => {
                let term = term.to_lowercase();
                subscriber.email.to_lowercase().contains(&term)
                    || subscriber
                        .name
                        .as_ref()
                        .is_some_and(|n| n.to_lowercase().contains(&term))
            }
        };

        let matches_status = self.status.is_none_or(|s| s == subscriber.status);

        matches_search && matches_status
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SubscriberStats {
    pub total: usize,
    pub active: usize,
    pub unsubscribed: usize,
    pub bounced: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn subscriber(prefs: NotificationPreferences) -> Subscriber {
        Subscriber {
            id: "sub-test".to_string(),
            email: "reader@example.com".to_string(),
            name: Some("Reader".to_string()),
            subscription_date: NaiveDate::from_ymd_opt(2025, 1, 15).unwrap(),
            preferences: prefs,
            status: SubscriberStatus::Active,
            last_email_sent: None,
        }
    }

    #[test]
    fn test_relevance_scenario() {
        let s = subscriber(NotificationPreferences {
            milestones: true,
            progress: false,
            announcements: false,
            research: false,
            categories: vec!["company".to_string()],
        });

        assert!(!s.is_relevant(UpdateKind::Progress, "company"));
        assert!(s.is_relevant(UpdateKind::Milestone, "company"));
        assert!(!s.is_relevant(UpdateKind::Milestone, "healthcare"));
    }

    #[test]
    fn test_inactive_never_relevant() {
        let mut s = subscriber(NotificationPreferences::default());
        s.status = SubscriberStatus::Bounced;
        assert!(!s.is_relevant(UpdateKind::Milestone, "company"));
    }

    #[test]
    fn test_patch_merges_only_present_fields() {
        let mut prefs = NotificationPreferences::default();
        prefs.apply(PreferencesPatch {
            research: Some(true),
            ..Default::default()
        });

        assert!(prefs.research);
        assert!(prefs.milestones);
        assert_eq!(prefs.categories.len(), 3);
    }

    #[test]
    fn test_subscriber_json_shape() {
        let s = subscriber(NotificationPreferences::default());
        let value = serde_json::to_value(&s).unwrap();

        assert_eq!(value["subscriptionDate"], "2025-01-15");
        assert_eq!(value["status"], "active");
        assert!(value.get("lastEmailSent").is_none());

        let parsed: Subscriber = serde_json::from_value(json!({
            "id": "sub-2",
            "email": "investor@example.com",
            "subscriptionDate": "2025-01-10",
            "preferences": {
                "milestones": true, "progress": false,
                "announcements": true, "research": false,
                "categories": ["company"]
            },
            "status": "unsubscribed"
        }))
        .unwrap();
        assert_eq!(parsed.status, SubscriberStatus::Unsubscribed);
        assert!(parsed.name.is_none());
    }

    #[test]
    fn test_filter() {
        let s = subscriber(NotificationPreferences::default());

        let by_name = SubscriberFilter {
            search: Some("READ".to_string()),
            status: None,
        };
        assert!(by_name.matches(&s));

        let by_status = SubscriberFilter {
            search: None,
            status: Some(SubscriberStatus::Unsubscribed),
        };
        assert!(!by_status.matches(&s));
    }
}
