//! Template types

use serde::{Deserialize, Serialize};

use crate::content::UpdateKind;

/// Kind of email a template produces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TemplateKind {
    Milestone,
    Progress,
    Announcement,
    Research,
    Digest,
}

impl From<UpdateKind> for TemplateKind {
    fn from(kind: UpdateKind) -> Self {
        match kind {
            UpdateKind::Milestone => TemplateKind::Milestone,
            UpdateKind::Progress => TemplateKind::Progress,
            UpdateKind::Announcement => TemplateKind::Announcement,
            UpdateKind::Research => TemplateKind::Research,
        }
    }
}

/// An email template definition
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Template {
    /// Unique template identifier
    pub id: String,

    /// Human-readable template name
    pub name: String,

    #[serde(rename = "type")]
    pub kind: TemplateKind,

    /// Subject line with {{variable}} placeholders
    pub subject: String,

    pub html_content: String,

    pub text_content: String,

    /// Variable names the template documents as available
    #[serde(default)]
    pub variables: Vec<String>,
}

/// Result of expanding a template
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderedEmail {
    pub subject: String,
    pub html_content: String,
    pub text_content: String,
}

/// Catalog entry without the bodies, for listings
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateSummary {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: TemplateKind,
    pub subject: String,
    pub variables: Vec<String>,
}

impl From<&Template> for TemplateSummary {
    fn from(t: &Template) -> Self {
        Self {
            id: t.id.clone(),
            name: t.name.clone(),
            kind: t.kind,
            subject: t.subject.clone(),
            variables: t.variables.clone(),
        }
    }
}
