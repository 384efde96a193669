//! Links embedded in outgoing emails

use crate::config::SiteConfig;

/// Builds the absolute URLs placed in every email.
///
/// Unsubscribe and preference links are `{origin}/unsubscribe?id={id}` and
/// `{origin}/email-preferences?id={id}`; the website routes depend on them.
#[derive(Debug, Clone)]
pub struct LinkBuilder {
    origin: String,
    logo_path: String,
    updates_path: String,
}

impl LinkBuilder {
    pub fn new(origin: impl Into<String>) -> Self {
        Self::from(&SiteConfig {
            origin: origin.into(),
            ..SiteConfig::default()
        })
    }

    pub fn origin(&self) -> &str {
        &self.origin
    }

    pub fn unsubscribe_url(&self, subscriber_id: &str) -> String {
        format!("{}/unsubscribe?id={}", self.origin, subscriber_id)
    }

    pub fn preferences_url(&self, subscriber_id: &str) -> String {
        format!("{}/email-preferences?id={}", self.origin, subscriber_id)
    }

    pub fn read_more_url(&self) -> String {
        format!("{}{}", self.origin, self.updates_path)
    }

    pub fn logo_url(&self) -> String {
        format!("{}{}", self.origin, self.logo_path)
    }
}

impl From<&SiteConfig> for LinkBuilder {
    fn from(site: &SiteConfig) -> Self {
        Self {
            origin: site.origin.trim_end_matches('/').to_string(),
            logo_path: site.logo_path.clone(),
            updates_path: site.updates_path.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subscriber_links() {
        let links = LinkBuilder::new("https://innovia.example");
        assert_eq!(
            links.unsubscribe_url("sub-1"),
            "https://innovia.example/unsubscribe?id=sub-1"
        );
        assert_eq!(
            links.preferences_url("sub-1"),
            "https://innovia.example/email-preferences?id=sub-1"
        );
    }

    #[test]
    fn test_site_links() {
        let links = LinkBuilder::new("https://innovia.example/");
        assert_eq!(links.origin(), "https://innovia.example");
        assert_eq!(
            links.read_more_url(),
            "https://innovia.example/#progress-updates"
        );
        assert_eq!(links.logo_url(), "https://innovia.example/innovia-logo.png");
    }
}
