//! Content updates published by the CMS.
//!
//! The notification pipeline only reads these; it never stores them.

use serde::{Deserialize, Serialize};

/// Kind of a published update. Each kind maps to one subscriber preference flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UpdateKind {
    Milestone,
    Progress,
    Announcement,
    Research,
}

impl UpdateKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            UpdateKind::Milestone => "milestone",
            UpdateKind::Progress => "progress",
            UpdateKind::Announcement => "announcement",
            UpdateKind::Research => "research",
        }
    }
}

impl std::fmt::Display for UpdateKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for UpdateKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "milestone" => Ok(UpdateKind::Milestone),
            "progress" => Ok(UpdateKind::Progress),
            "announcement" => Ok(UpdateKind::Announcement),
            "research" => Ok(UpdateKind::Research),
            other => Err(format!("unknown update type '{}'", other)),
        }
    }
}

/// Metric value as entered in the CMS: either a number or free text like "94%".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetricValue {
    Number(serde_json::Number),
    Text(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateMetric {
    pub label: String,
    pub value: MetricValue,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub change: Option<String>,
}

/// A progress update, milestone, announcement or research note.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentUpdate {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: UpdateKind,
    pub category: String,
    pub title: String,
    pub summary: String,
    /// Full markdown body
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metrics: Option<Vec<UpdateMetric>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub achievements: Option<Vec<String>>,
    /// Extra template variables; the update's own fields take precedence
    #[serde(default, skip_serializing_if = "serde_json::Map::is_empty")]
    pub variables: serde_json::Map<String, serde_json::Value>,
}
