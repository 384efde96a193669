//! Built-in email template catalog.
//!
//! The catalog is static and immutable at runtime. Lookup by update kind
//! falls back to the first template when no template of that kind exists
//! (research updates use the milestone template).

use crate::content::UpdateKind;

use super::types::{Template, TemplateKind, TemplateSummary};

/// Ordered, read-only set of templates
#[derive(Debug, Clone)]
pub struct TemplateCatalog {
    templates: Vec<Template>,
}

impl Default for TemplateCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

impl TemplateCatalog {
    /// Catalog over arbitrary templates, order preserved
    pub fn new(templates: Vec<Template>) -> Self {
        Self { templates }
    }

    /// The four templates shipped with the service
    pub fn builtin() -> Self {
        Self::new(vec![
            template(
                "milestone-template",
                "Milestone Achievement",
                TemplateKind::Milestone,
                "🎯 Major Milestone: {{title}}",
                MILESTONE_HTML,
                MILESTONE_TEXT,
                &[
                    "title",
                    "summary",
                    "metrics",
                    "achievements",
                    "readMoreUrl",
                    "logoUrl",
                    "unsubscribeUrl",
                    "preferencesUrl",
                ],
            ),
            template(
                "progress-template",
                "Progress Update",
                TemplateKind::Progress,
                "📈 Progress Update: {{title}}",
                PROGRESS_HTML,
                PROGRESS_TEXT,
                &[
                    "title",
                    "summary",
                    "category",
                    "metrics",
                    "readMoreUrl",
                    "logoUrl",
                    "unsubscribeUrl",
                    "preferencesUrl",
                ],
            ),
            template(
                "announcement-template",
                "Announcement",
                TemplateKind::Announcement,
                "📢 Important Announcement: {{title}}",
                ANNOUNCEMENT_HTML,
                ANNOUNCEMENT_TEXT,
                &[
                    "title",
                    "summary",
                    "readMoreUrl",
                    "logoUrl",
                    "unsubscribeUrl",
                    "preferencesUrl",
                ],
            ),
            template(
                "weekly-digest-template",
                "Weekly Digest",
                TemplateKind::Digest,
                "📊 Weekly Progress Digest - {{weekOf}}",
                DIGEST_HTML,
                DIGEST_TEXT,
                &[
                    "weekOf",
                    "totalUpdates",
                    "milestones",
                    "progressUpdates",
                    "updates",
                    "allUpdatesUrl",
                    "logoUrl",
                    "unsubscribeUrl",
                    "preferencesUrl",
                ],
            ),
        ])
    }

    pub fn get(&self, id: &str) -> Option<&Template> {
        self.templates.iter().find(|t| t.id == id)
    }

    pub fn list(&self) -> &[Template] {
        &self.templates
    }

    pub fn summaries(&self) -> Vec<TemplateSummary> {
        self.templates.iter().map(TemplateSummary::from).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    /// Template for an update kind, or the first template of the catalog.
    ///
    /// `None` only when the catalog is empty.
    pub fn find_for(&self, kind: UpdateKind) -> Option<&Template> {
        let wanted = TemplateKind::from(kind);
        self.templates
            .iter()
            .find(|t| t.kind == wanted)
            .or_else(|| self.templates.first())
    }
}

fn template(
    id: &str,
    name: &str,
    kind: TemplateKind,
    subject: &str,
    html: &str,
    text: &str,
    variables: &[&str],
) -> Template {
    Template {
        id: id.to_string(),
        name: name.to_string(),
        kind,
        subject: subject.to_string(),
        html_content: html.to_string(),
        text_content: text.to_string(),
        variables: variables.iter().map(|v| v.to_string()).collect(),
    }
}

const MILESTONE_HTML: &str = r##"
        <!DOCTYPE html>
        <html>
        <head>
          <meta charset="utf-8">
          <meta name="viewport" content="width=device-width, initial-scale=1.0">
          <title>{{title}}</title>
          <style>
            body { font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif; margin: 0; padding: 0; background-color: #f3f4f6; }
            .container { max-width: 600px; margin: 0 auto; background-color: #ffffff; }
            .header { background: linear-gradient(135deg, #3b82f6 0%, #8b5cf6 100%); padding: 40px 20px; text-align: center; }
            .logo { width: 60px; height: 60px; margin: 0 auto 20px; }
            .header h1 { color: #ffffff; margin: 0; font-size: 28px; font-weight: bold; }
            .content { padding: 40px 20px; }
            .milestone-badge { background: linear-gradient(135deg, #10b981 0%, #059669 100%); color: white; padding: 8px 16px; border-radius: 20px; font-size: 14px; font-weight: 600; display: inline-block; margin-bottom: 20px; }
            .title { font-size: 24px; font-weight: bold; color: #1f2937; margin-bottom: 16px; }
            .summary { font-size: 16px; color: #6b7280; line-height: 1.6; margin-bottom: 30px; }
            .metrics { display: flex; flex-wrap: wrap; gap: 20px; margin: 30px 0; }
            .metric { background: #f9fafb; padding: 20px; border-radius: 8px; text-align: center; flex: 1; min-width: 120px; }
            .metric-value { font-size: 24px; font-weight: bold; color: #3b82f6; }
            .metric-label { font-size: 14px; color: #6b7280; margin-top: 4px; }
            .achievements { background: #f0fdf4; border-left: 4px solid #10b981; padding: 20px; margin: 30px 0; }
            .achievements h3 { color: #065f46; margin: 0 0 15px 0; font-size: 18px; }
            .achievement { display: flex; align-items: flex-start; margin-bottom: 12px; }
            .achievement-bullet { width: 8px; height: 8px; background: #10b981; border-radius: 50%; margin-top: 6px; margin-right: 12px; flex-shrink: 0; }
            .cta { text-align: center; margin: 40px 0; }
            .cta-button { background: linear-gradient(135deg, #3b82f6 0%, #8b5cf6 100%); color: white; padding: 14px 28px; text-decoration: none; border-radius: 8px; font-weight: 600; display: inline-block; }
            .footer { background: #1f2937; color: #9ca3af; padding: 30px 20px; text-align: center; font-size: 14px; }
            .footer a { color: #60a5fa; text-decoration: none; }
            .unsubscribe { margin-top: 20px; font-size: 12px; }
          </style>
        </head>
        <body>
          <div class="container">
            <div class="header">
              <div class="logo">
                <img src="{{logoUrl}}" alt="InnovIA Technologies" style="width: 60px; height: 60px;">
              </div>
              <h1>InnovIA Technologies</h1>
            </div>
            
            <div class="content">
              <div class="milestone-badge">🎯 MILESTONE ACHIEVED</div>
              <h2 class="title">{{title}}</h2>
              <p class="summary">{{summary}}</p>
              
              {{#if metrics}}
              <div class="metrics">
                {{#each metrics}}
                <div class="metric">
                  <div class="metric-value">{{value}}</div>
                  <div class="metric-label">{{label}}</div>
                </div>
                {{/each}}
              </div>
              {{/if}}
              
              {{#if achievements}}
              <div class="achievements">
                <h3>Key Achievements</h3>
                {{#each achievements}}
                <div class="achievement">
                  <div class="achievement-bullet"></div>
                  <div>{{this}}</div>
                </div>
                {{/each}}
              </div>
              {{/if}}
              
              <div class="cta">
                <a href="{{readMoreUrl}}" class="cta-button">Read Full Update</a>
              </div>
            </div>
            
            <div class="footer">
              <p>© 2025 InnovIA Technologies. All rights reserved.</p>
              <p>2120 Rue Phil Goyette, Vaudreuil-Dorion, QC J7V 3E5, Canada</p>
              <div class="unsubscribe">
                <a href="{{unsubscribeUrl}}">Unsubscribe</a> | 
                <a href="{{preferencesUrl}}">Update Preferences</a>
              </div>
            </div>
          </div>
        </body>
        </html>
      "##;

const MILESTONE_TEXT: &str = r##"
🎯 MILESTONE ACHIEVED: {{title}}

{{summary}}

{{#if achievements}}
Key Achievements:
{{#each achievements}}
• {{this}}
{{/each}}
{{/if}}

Read the full update: {{readMoreUrl}}

---
InnovIA Technologies
2120 Rue Phil Goyette, Vaudreuil-Dorion, QC J7V 3E5, Canada

Unsubscribe: {{unsubscribeUrl}}
Update Preferences: {{preferencesUrl}}
      "##;

const PROGRESS_HTML: &str = r##"
        <!DOCTYPE html>
        <html>
        <head>
          <meta charset="utf-8">
          <meta name="viewport" content="width=device-width, initial-scale=1.0">
          <title>{{title}}</title>
          <style>
            body { font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif; margin: 0; padding: 0; background-color: #f3f4f6; }
            .container { max-width: 600px; margin: 0 auto; background-color: #ffffff; }
            .header { background: linear-gradient(135deg, #06b6d4 0%, #3b82f6 100%); padding: 40px 20px; text-align: center; }
            .logo { width: 60px; height: 60px; margin: 0 auto 20px; }
            .header h1 { color: #ffffff; margin: 0; font-size: 28px; font-weight: bold; }
            .content { padding: 40px 20px; }
            .progress-badge { background: linear-gradient(135deg, #06b6d4 0%, #0891b2 100%); color: white; padding: 8px 16px; border-radius: 20px; font-size: 14px; font-weight: 600; display: inline-block; margin-bottom: 20px; }
            .title { font-size: 24px; font-weight: bold; color: #1f2937; margin-bottom: 16px; }
            .summary { font-size: 16px; color: #6b7280; line-height: 1.6; margin-bottom: 30px; }
            .category-tag { background: #dbeafe; color: #1e40af; padding: 4px 12px; border-radius: 12px; font-size: 12px; font-weight: 600; display: inline-block; margin-bottom: 20px; }
            .metrics { display: flex; flex-wrap: wrap; gap: 20px; margin: 30px 0; }
            .metric { background: #f0f9ff; padding: 20px; border-radius: 8px; text-align: center; flex: 1; min-width: 120px; border-left: 4px solid #06b6d4; }
            .metric-value { font-size: 24px; font-weight: bold; color: #0891b2; }
            .metric-label { font-size: 14px; color: #6b7280; margin-top: 4px; }
            .metric-change { font-size: 12px; color: #059669; margin-top: 2px; }
            .cta { text-align: center; margin: 40px 0; }
            .cta-button { background: linear-gradient(135deg, #06b6d4 0%, #3b82f6 100%); color: white; padding: 14px 28px; text-decoration: none; border-radius: 8px; font-weight: 600; display: inline-block; }
            .footer { background: #1f2937; color: #9ca3af; padding: 30px 20px; text-align: center; font-size: 14px; }
            .footer a { color: #60a5fa; text-decoration: none; }
            .unsubscribe { margin-top: 20px; font-size: 12px; }
          </style>
        </head>
        <body>
          <div class="container">
            <div class="header">
              <div class="logo">
                <img src="{{logoUrl}}" alt="InnovIA Technologies" style="width: 60px; height: 60px;">
              </div>
              <h1>InnovIA Technologies</h1>
            </div>
            
            <div class="content">
              <div class="progress-badge">📈 PROGRESS UPDATE</div>
              <div class="category-tag">{{category}}</div>
              <h2 class="title">{{title}}</h2>
              <p class="summary">{{summary}}</p>
              
              {{#if metrics}}
              <div class="metrics">
                {{#each metrics}}
                <div class="metric">
                  <div class="metric-value">{{value}}</div>
                  <div class="metric-label">{{label}}</div>
                  {{#if change}}<div class="metric-change">{{change}}</div>{{/if}}
                </div>
                {{/each}}
              </div>
              {{/if}}
              
              <div class="cta">
                <a href="{{readMoreUrl}}" class="cta-button">Read Full Update</a>
              </div>
            </div>
            
            <div class="footer">
              <p>© 2025 InnovIA Technologies. All rights reserved.</p>
              <p>2120 Rue Phil Goyette, Vaudreuil-Dorion, QC J7V 3E5, Canada</p>
              <div class="unsubscribe">
                <a href="{{unsubscribeUrl}}">Unsubscribe</a> | 
                <a href="{{preferencesUrl}}">Update Preferences</a>
              </div>
            </div>
          </div>
        </body>
        </html>
      "##;

const PROGRESS_TEXT: &str = r##"
📈 PROGRESS UPDATE: {{title}}

Category: {{category}}

{{summary}}

{{#if metrics}}
Key Metrics:
{{#each metrics}}
• {{label}}: {{value}} {{#if change}}({{change}}){{/if}}
{{/each}}
{{/if}}

Read the full update: {{readMoreUrl}}

---
InnovIA Technologies
2120 Rue Phil Goyette, Vaudreuil-Dorion, QC J7V 3E5, Canada

Unsubscribe: {{unsubscribeUrl}}
Update Preferences: {{preferencesUrl}}
      "##;

const ANNOUNCEMENT_HTML: &str = r##"
        <!DOCTYPE html>
        <html>
        <head>
          <meta charset="utf-8">
          <meta name="viewport" content="width=device-width, initial-scale=1.0">
          <title>{{title}}</title>
          <style>
            body { font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif; margin: 0; padding: 0; background-color: #f3f4f6; }
            .container { max-width: 600px; margin: 0 auto; background-color: #ffffff; }
            .header { background: linear-gradient(135deg, #8b5cf6 0%, #ec4899 100%); padding: 40px 20px; text-align: center; }
            .logo { width: 60px; height: 60px; margin: 0 auto 20px; }
            .header h1 { color: #ffffff; margin: 0; font-size: 28px; font-weight: bold; }
            .content { padding: 40px 20px; }
            .announcement-badge { background: linear-gradient(135deg, #8b5cf6 0%, #7c3aed 100%); color: white; padding: 8px 16px; border-radius: 20px; font-size: 14px; font-weight: 600; display: inline-block; margin-bottom: 20px; }
            .title { font-size: 24px; font-weight: bold; color: #1f2937; margin-bottom: 16px; }
            .summary { font-size: 16px; color: #6b7280; line-height: 1.6; margin-bottom: 30px; }
            .highlight-box { background: #faf5ff; border-left: 4px solid #8b5cf6; padding: 20px; margin: 30px 0; }
            .highlight-box h3 { color: #6b21a8; margin: 0 0 15px 0; font-size: 18px; }
            .cta { text-align: center; margin: 40px 0; }
            .cta-button { background: linear-gradient(135deg, #8b5cf6 0%, #ec4899 100%); color: white; padding: 14px 28px; text-decoration: none; border-radius: 8px; font-weight: 600; display: inline-block; }
            .footer { background: #1f2937; color: #9ca3af; padding: 30px 20px; text-align: center; font-size: 14px; }
            .footer a { color: #60a5fa; text-decoration: none; }
            .unsubscribe { margin-top: 20px; font-size: 12px; }
          </style>
        </head>
        <body>
          <div class="container">
            <div class="header">
              <div class="logo">
                <img src="{{logoUrl}}" alt="InnovIA Technologies" style="width: 60px; height: 60px;">
              </div>
              <h1>InnovIA Technologies</h1>
            </div>
            
            <div class="content">
              <div class="announcement-badge">📢 ANNOUNCEMENT</div>
              <h2 class="title">{{title}}</h2>
              <p class="summary">{{summary}}</p>
              
              <div class="highlight-box">
                <h3>What This Means</h3>
                <p>This announcement represents a significant step forward in our AI development journey and demonstrates our commitment to innovation and transparency.</p>
              </div>
              
              <div class="cta">
                <a href="{{readMoreUrl}}" class="cta-button">Read Full Announcement</a>
              </div>
            </div>
            
            <div class="footer">
              <p>© 2025 InnovIA Technologies. All rights reserved.</p>
              <p>2120 Rue Phil Goyette, Vaudreuil-Dorion, QC J7V 3E5, Canada</p>
              <div class="unsubscribe">
                <a href="{{unsubscribeUrl}}">Unsubscribe</a> | 
                <a href="{{preferencesUrl}}">Update Preferences</a>
              </div>
            </div>
          </div>
        </body>
        </html>
      "##;

const ANNOUNCEMENT_TEXT: &str = r##"
📢 ANNOUNCEMENT: {{title}}

{{summary}}

What This Means:
This announcement represents a significant step forward in our AI development journey and demonstrates our commitment to innovation and transparency.

Read the full announcement: {{readMoreUrl}}

---
InnovIA Technologies
2120 Rue Phil Goyette, Vaudreuil-Dorion, QC J7V 3E5, Canada

Unsubscribe: {{unsubscribeUrl}}
Update Preferences: {{preferencesUrl}}
      "##;

const DIGEST_HTML: &str = r##"
        <!DOCTYPE html>
        <html>
        <head>
          <meta charset="utf-8">
          <meta name="viewport" content="width=device-width, initial-scale=1.0">
          <title>Weekly Progress Digest</title>
          <style>
            body { font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif; margin: 0; padding: 0; background-color: #f3f4f6; }
            .container { max-width: 600px; margin: 0 auto; background-color: #ffffff; }
            .header { background: linear-gradient(135deg, #1f2937 0%, #374151 100%); padding: 40px 20px; text-align: center; }
            .logo { width: 60px; height: 60px; margin: 0 auto 20px; }
            .header h1 { color: #ffffff; margin: 0; font-size: 28px; font-weight: bold; }
            .header p { color: #d1d5db; margin: 10px 0 0 0; }
            .content { padding: 40px 20px; }
            .digest-badge { background: linear-gradient(135deg, #f59e0b 0%, #d97706 100%); color: white; padding: 8px 16px; border-radius: 20px; font-size: 14px; font-weight: 600; display: inline-block; margin-bottom: 30px; }
            .update-item { border-left: 4px solid #e5e7eb; padding-left: 20px; margin-bottom: 30px; }
            .update-item.milestone { border-left-color: #10b981; }
            .update-item.progress { border-left-color: #06b6d4; }
            .update-item.announcement { border-left-color: #8b5cf6; }
            .update-title { font-size: 18px; font-weight: 600; color: #1f2937; margin-bottom: 8px; }
            .update-summary { font-size: 14px; color: #6b7280; line-height: 1.5; margin-bottom: 10px; }
            .update-meta { font-size: 12px; color: #9ca3af; }
            .stats-grid { display: flex; flex-wrap: wrap; gap: 15px; margin: 30px 0; }
            .stat-item { background: #f9fafb; padding: 15px; border-radius: 8px; text-align: center; flex: 1; min-width: 100px; }
            .stat-value { font-size: 20px; font-weight: bold; color: #3b82f6; }
            .stat-label { font-size: 12px; color: #6b7280; margin-top: 4px; }
            .cta { text-align: center; margin: 40px 0; }
            .cta-button { background: linear-gradient(135deg, #3b82f6 0%, #8b5cf6 100%); color: white; padding: 14px 28px; text-decoration: none; border-radius: 8px; font-weight: 600; display: inline-block; }
            .footer { background: #1f2937; color: #9ca3af; padding: 30px 20px; text-align: center; font-size: 14px; }
            .footer a { color: #60a5fa; text-decoration: none; }
            .unsubscribe { margin-top: 20px; font-size: 12px; }
          </style>
        </head>
        <body>
          <div class="container">
            <div class="header">
              <div class="logo">
                <img src="{{logoUrl}}" alt="InnovIA Technologies" style="width: 60px; height: 60px;">
              </div>
              <h1>InnovIA Technologies</h1>
              <p>Weekly Progress Digest</p>
            </div>
            
            <div class="content">
              <div class="digest-badge">📊 WEEKLY DIGEST</div>
              <h2>Week of {{weekOf}}</h2>
              
              <div class="stats-grid">
                <div class="stat-item">
                  <div class="stat-value">{{totalUpdates}}</div>
                  <div class="stat-label">Total Updates</div>
                </div>
                <div class="stat-item">
                  <div class="stat-value">{{milestones}}</div>
                  <div class="stat-label">Milestones</div>
                </div>
                <div class="stat-item">
                  <div class="stat-value">{{progressUpdates}}</div>
                  <div class="stat-label">Progress Updates</div>
                </div>
              </div>
              
              {{#each updates}}
              <div class="update-item {{type}}">
                <div class="update-title">{{title}}</div>
                <div class="update-summary">{{summary}}</div>
                <div class="update-meta">{{category}} • {{date}}</div>
              </div>
              {{/each}}
              
              <div class="cta">
                <a href="{{allUpdatesUrl}}" class="cta-button">View All Updates</a>
              </div>
            </div>
            
            <div class="footer">
              <p>© 2025 InnovIA Technologies. All rights reserved.</p>
              <p>2120 Rue Phil Goyette, Vaudreuil-Dorion, QC J7V 3E5, Canada</p>
              <div class="unsubscribe">
                <a href="{{unsubscribeUrl}}">Unsubscribe</a> | 
                <a href="{{preferencesUrl}}">Update Preferences</a>
              </div>
            </div>
          </div>
        </body>
        </html>
      "##;

const DIGEST_TEXT: &str = r##"
📊 WEEKLY PROGRESS DIGEST - Week of {{weekOf}}

This Week's Summary:
• {{totalUpdates}} Total Updates
• {{milestones}} Milestones
• {{progressUpdates}} Progress Updates

{{#each updates}}
{{title}}
{{summary}}
Category: {{category}} • {{date}}

{{/each}}

View all updates: {{allUpdatesUrl}}

---
InnovIA Technologies
2120 Rue Phil Goyette, Vaudreuil-Dorion, QC J7V 3E5, Canada

Unsubscribe: {{unsubscribeUrl}}
Update Preferences: {{preferencesUrl}}
      "##;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::process_template;
    use serde_json::{json, Map, Value};

    fn vars(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("variables must be an object"),
        }
    }

    #[test]
    fn test_builtin_order() {
        let catalog = TemplateCatalog::builtin();
        let ids: Vec<_> = catalog.list().iter().map(|t| t.id.as_str()).collect();
        assert_eq!(
            ids,
            vec![
                "milestone-template",
                "progress-template",
                "announcement-template",
                "weekly-digest-template"
            ]
        );
    }

    #[test]
    fn test_find_for_exact_kind() {
        let catalog = TemplateCatalog::builtin();
        assert_eq!(
            catalog.find_for(UpdateKind::Progress).unwrap().id,
            "progress-template"
        );
        assert_eq!(
            catalog.find_for(UpdateKind::Announcement).unwrap().id,
            "announcement-template"
        );
    }

    #[test]
    fn test_research_falls_back_to_first() {
        let catalog = TemplateCatalog::builtin();
        assert_eq!(
            catalog.find_for(UpdateKind::Research).unwrap().id,
            "milestone-template"
        );
    }

    #[test]
    fn test_empty_catalog() {
        let catalog = TemplateCatalog::new(Vec::new());
        assert!(catalog.is_empty());
        assert!(catalog.find_for(UpdateKind::Milestone).is_none());
    }

    #[test]
    fn test_progress_template_renders_metric_changes() {
        let catalog = TemplateCatalog::builtin();
        let template = catalog.get("progress-template").unwrap();
        let rendered = process_template(
            template,
            &vars(json!({
                "title": "Q2 Update",
                "summary": "Steady progress",
                "category": "education",
                "metrics": [
                    {"label": "Pilots", "value": 3, "change": "+1"},
                    {"label": "Accuracy", "value": "94%"}
                ],
                "readMoreUrl": "https://example.com/#progress-updates",
                "logoUrl": "https://example.com/innovia-logo.png",
                "unsubscribeUrl": "https://example.com/unsubscribe?id=sub-1",
                "preferencesUrl": "https://example.com/email-preferences?id=sub-1"
            })),
        );

        assert_eq!(rendered.subject, "📈 Progress Update: Q2 Update");
        assert!(rendered.text_content.contains("• Pilots: 3 (+1)"));
        assert!(rendered.text_content.contains("• Accuracy: 94% \n"));
        assert!(rendered
            .html_content
            .contains(r#"<div class="metric-change">+1</div>"#));
        assert!(!rendered.html_content.contains("{{"));
        assert!(!rendered.text_content.contains("{{"));
    }

    #[test]
    fn test_milestone_without_optional_sections() {
        let catalog = TemplateCatalog::builtin();
        let template = catalog.get("milestone-template").unwrap();
        let rendered = process_template(
            template,
            &vars(json!({"title": "Launch", "summary": "Done"})),
        );

        assert!(!rendered.text_content.contains("Key Achievements"));
        assert!(!rendered.html_content.contains(r#"class="metrics""#));
        // Links were not supplied
        assert!(rendered.text_content.contains("{{readMoreUrl}}"));
    }
}
