//! Per-category URL templates that turn an application identifier into links.

use super::{LinkCategory, LinkEntry, Metadata};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Placeholder replaced by the application identifier in every template.
pub const APP_PLACEHOLDER: &str = "{app}";

/// Label and URL template for one category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkTemplate {
    pub label: String,
    /// URL containing [`APP_PLACEHOLDER`] at least once.
    pub template: String,
}

impl LinkTemplate {
    pub fn new(label: impl Into<String>, template: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            template: template.into(),
        }
    }

    pub fn render(&self, app_id: &str) -> LinkEntry {
        LinkEntry {
            label: self.label.clone(),
            url: self.template.replace(APP_PLACEHOLDER, app_id),
        }
    }
}

/// Configuration problem in a link template.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TemplateError {
    #[error("links.{0}: label must not be empty")]
    EmptyLabel(LinkCategory),
    #[error("links.{0}: template must contain {{app}}")]
    MissingPlaceholder(LinkCategory),
}

/// Templates for all five categories. Missing sections in config fall back to the defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LinkTemplates {
    pub metrics: LinkTemplate,
    pub logs: LinkTemplate,
    pub traces: LinkTemplate,
    pub secrets: LinkTemplate,
    pub infrastructure: LinkTemplate,
}

impl Default for LinkTemplates {
    fn default() -> Self {
        let t = |c: LinkCategory, url: &str| LinkTemplate::new(c.default_label(), url);
        Self {
            metrics: t(
                LinkCategory::Metrics,
                "https://grafana.example.com/d/app/{app}",
            ),
            logs: t(LinkCategory::Logs, "https://logs.example.com/app/{app}"),
            traces: t(LinkCategory::Traces, "https://traces.example.com/app/{app}"),
            secrets: t(
                LinkCategory::Secrets,
                "https://vault.example.com/ui/vault/secrets/{app}",
            ),
            infrastructure: t(
                LinkCategory::Infrastructure,
                "https://github.com/example/configs/tree/main/{app}",
            ),
        }
    }
}

impl LinkTemplates {
    pub fn get(&self, category: LinkCategory) -> &LinkTemplate {
        match category {
            LinkCategory::Metrics => &self.metrics,
            LinkCategory::Logs => &self.logs,
            LinkCategory::Traces => &self.traces,
            LinkCategory::Secrets => &self.secrets,
            LinkCategory::Infrastructure => &self.infrastructure,
        }
    }

    /// Builds a complete snapshot for `app_id` stamped with `last_updated`.
    pub fn render(&self, app_id: &str, last_updated: DateTime<Utc>) -> Metadata {
        Metadata {
            metrics: self.metrics.render(app_id),
            logs: self.logs.render(app_id),
            traces: self.traces.render(app_id),
            secrets: self.secrets.render(app_id),
            infrastructure: self.infrastructure.render(app_id),
            last_updated,
        }
    }

    pub fn validate(&self) -> Result<(), TemplateError> {
        for category in LinkCategory::ALL {
            let t = self.get(category);
            if t.label.trim().is_empty() {
                return Err(TemplateError::EmptyLabel(category));
            }
            if !t.template.contains(APP_PLACEHOLDER) {
                return Err(TemplateError::MissingPlaceholder(category));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_default_url_contains_app_id() {
        let md = LinkTemplates::default().render("checkout", Utc::now());
        for (category, entry) in md.links() {
            assert!(
                entry.url.contains("checkout"),
                "{category} url {} missing app id",
                entry.url
            );
            assert!(!entry.label.is_empty());
        }
        assert!(LinkTemplates::default().validate().is_ok());
    }

    #[test]
    fn placeholder_replaced_everywhere() {
        let t = LinkTemplate::new("Logs", "https://logs/{app}?q=app:{app}");
        assert_eq!(t.render("web").url, "https://logs/web?q=app:web");
    }

    #[test]
    fn validate_requires_placeholder() {
        let mut templates = LinkTemplates::default();
        templates.secrets.template = "https://vault.example.com".to_string();
        assert_eq!(
            templates.validate(),
            Err(TemplateError::MissingPlaceholder(LinkCategory::Secrets))
        );
    }

    #[test]
    fn partial_override_keeps_defaults() {
        let toml = r#"
            [logs]
            label = "Loki"
            template = "https://loki.internal/{app}"
        "#;
        let templates: LinkTemplates = toml::from_str(toml).unwrap();
        assert_eq!(templates.logs.label, "Loki");
        assert_eq!(templates.metrics, LinkTemplates::default().metrics);
    }
}
