//! Presentation constants for rendered panels.

use crate::metadata::LinkCategory;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Theme {
    pub title: String,
    pub loading_text: String,
    pub retry_label: String,
    pub refresh_label: String,
    pub expanded_glyph: String,
    pub collapsed_glyph: String,
    pub error_prefix: String,
    pub last_updated_prefix: String,
    /// Row icons indexed by [`LinkCategory::index`].
    pub icons: [String; 5],
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            title: "GlueOps".to_string(),
            loading_text: "Loading...".to_string(),
            retry_label: "Retry".to_string(),
            refresh_label: "↻ Refresh".to_string(),
            expanded_glyph: "▼".to_string(),
            collapsed_glyph: "▶".to_string(),
            error_prefix: "Error: ".to_string(),
            last_updated_prefix: "Last Updated: ".to_string(),
            icons: ["📊", "📝", "🔍", "🔐", "🏗️"].map(String::from),
        }
    }
}

impl Theme {
    pub fn with_title(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    pub fn icon(&self, category: LinkCategory) -> &str {
        &self.icons[category.index()]
    }
}
