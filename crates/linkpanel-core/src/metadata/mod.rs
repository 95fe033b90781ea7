//! Link-panel data model: five named external links plus a freshness timestamp.
//!
//! A [`Metadata`] snapshot is built in one piece by [`LinkTemplates::render`]
//! and is never partially populated. Snapshots received over the wire are
//! checked with [`Metadata::validate`] before the panel shows them.

mod templates;

pub use templates::{LinkTemplate, LinkTemplates, TemplateError, APP_PLACEHOLDER};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier substituted when the caller supplies no application name.
pub const UNKNOWN_APP: &str = "unknown";

/// Normalizes an application identifier.
///
/// Surrounding whitespace is trimmed; an absent or empty identifier becomes
/// [`UNKNOWN_APP`]. Never fails.
pub fn normalize_app_id(app_id: Option<&str>) -> String {
    match app_id.map(str::trim) {
        Some(id) if !id.is_empty() => id.to_string(),
        _ => UNKNOWN_APP.to_string(),
    }
}

/// The five link destinations a panel shows, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkCategory {
    Metrics,
    Logs,
    Traces,
    Secrets,
    Infrastructure,
}

impl LinkCategory {
    /// Fixed display order.
    pub const ALL: [LinkCategory; 5] = [
        LinkCategory::Metrics,
        LinkCategory::Logs,
        LinkCategory::Traces,
        LinkCategory::Secrets,
        LinkCategory::Infrastructure,
    ];

    /// Position in the display order (0-based).
    pub fn index(self) -> usize {
        match self {
            LinkCategory::Metrics => 0,
            LinkCategory::Logs => 1,
            LinkCategory::Traces => 2,
            LinkCategory::Secrets => 3,
            LinkCategory::Infrastructure => 4,
        }
    }

    /// Wire/config key (`metrics`, `logs`, ...).
    pub fn as_str(self) -> &'static str {
        match self {
            LinkCategory::Metrics => "metrics",
            LinkCategory::Logs => "logs",
            LinkCategory::Traces => "traces",
            LinkCategory::Secrets => "secrets",
            LinkCategory::Infrastructure => "infrastructure",
        }
    }

    /// Label used when the configuration does not override it.
    pub fn default_label(self) -> &'static str {
        match self {
            LinkCategory::Metrics => "Metrics",
            LinkCategory::Logs => "Logs",
            LinkCategory::Traces => "Traces",
            LinkCategory::Secrets => "Secrets",
            LinkCategory::Infrastructure => "IaaC",
        }
    }
}

impl fmt::Display for LinkCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One labeled external URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkEntry {
    pub label: String,
    pub url: String,
}

/// A resolved snapshot for one application identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Metadata {
    pub metrics: LinkEntry,
    pub logs: LinkEntry,
    pub traces: LinkEntry,
    pub secrets: LinkEntry,
    pub infrastructure: LinkEntry,
    /// Freshness marker; RFC 3339 on the wire.
    pub last_updated: DateTime<Utc>,
}

/// Reason a [`Metadata`] snapshot is not well-formed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvalidMetadata {
    #[error("{0} link has an empty label")]
    EmptyLabel(LinkCategory),
    #[error("{0} link has an empty url")]
    EmptyUrl(LinkCategory),
}

impl Metadata {
    pub fn entry(&self, category: LinkCategory) -> &LinkEntry {
        match category {
            LinkCategory::Metrics => &self.metrics,
            LinkCategory::Logs => &self.logs,
            LinkCategory::Traces => &self.traces,
            LinkCategory::Secrets => &self.secrets,
            LinkCategory::Infrastructure => &self.infrastructure,
        }
    }

    /// All five entries in display order.
    pub fn links(&self) -> [(LinkCategory, &LinkEntry); 5] {
        LinkCategory::ALL.map(|c| (c, self.entry(c)))
    }

    /// Checks that every entry has a non-empty label and url.
    pub fn validate(&self) -> Result<(), InvalidMetadata> {
        for (category, entry) in self.links() {
            if entry.label.trim().is_empty() {
                return Err(InvalidMetadata::EmptyLabel(category));
            }
            if entry.url.trim().is_empty() {
                return Err(InvalidMetadata::EmptyUrl(category));
            }
        }
        Ok(())
    }
}
