//! Turns a panel's state into a flat view model and plain text.

use chrono::{DateTime, Utc};
use std::fmt;

use super::relative_time::format_relative;
use super::state::ViewState;
use super::theme::Theme;
use crate::metadata::LinkCategory;

/// Header button of a rendered panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelAction {
    Retry,
    Refresh,
}

/// One link row, in display order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkRow {
    pub category: LinkCategory,
    pub icon: String,
    pub label: String,
    pub url: String,
}

/// Everything a frontend needs to draw a panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedPanel {
    pub title: String,
    /// Inline loading indicator (only while loading).
    pub indicator: Option<String>,
    /// Expand/collapse glyph (only when ready).
    pub toggle: Option<String>,
    pub action: Option<(PanelAction, String)>,
    pub error: Option<String>,
    /// Empty unless ready and expanded.
    pub rows: Vec<LinkRow>,
    pub footer: Option<String>,
}

impl RenderedPanel {
    fn titled(theme: &Theme) -> Self {
        Self {
            title: theme.title.clone(),
            indicator: None,
            toggle: None,
            action: None,
            error: None,
            rows: Vec::new(),
            footer: None,
        }
    }

    pub fn action_kind(&self) -> Option<PanelAction> {
        self.action.as_ref().map(|(kind, _)| *kind)
    }
}

/// Renders `state` as of `now`. `expanded` only matters for `Ready`.
pub fn render(
    state: &ViewState,
    expanded: bool,
    now: DateTime<Utc>,
    theme: &Theme,
) -> RenderedPanel {
    let mut out = RenderedPanel::titled(theme);
    match state {
        ViewState::Loading => {
            out.indicator = Some(theme.loading_text.clone());
        }
        ViewState::Error(message) => {
            out.action = Some((PanelAction::Retry, theme.retry_label.clone()));
            out.error = Some(format!("{}{}", theme.error_prefix, message));
        }
        ViewState::Empty => {}
        ViewState::Ready(metadata) => {
            let glyph = if expanded {
                &theme.expanded_glyph
            } else {
                &theme.collapsed_glyph
            };
            out.toggle = Some(glyph.clone());
            out.action = Some((PanelAction::Refresh, theme.refresh_label.clone()));
            if expanded {
                out.rows = metadata
                    .links()
                    .iter()
                    .map(|(category, entry)| LinkRow {
                        category: *category,
                        icon: theme.icon(*category).to_string(),
                        label: entry.label.clone(),
                        url: entry.url.clone(),
                    })
                    .collect();
                out.footer = Some(format!(
                    "{}{}",
                    theme.last_updated_prefix,
                    format_relative(now, metadata.last_updated)
                ));
            }
        }
    }
    out
}

impl fmt::Display for RenderedPanel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.title)?;
        if let Some(toggle) = &self.toggle {
            write!(f, " {}", toggle)?;
        }
        if let Some(indicator) = &self.indicator {
            write!(f, "  {}", indicator)?;
        }
        if let Some((_, label)) = &self.action {
            write!(f, "  [{}]", label)?;
        }
        writeln!(f)?;
        if let Some(error) = &self.error {
            writeln!(f, "  {}", error)?;
        }
        for row in &self.rows {
            writeln!(f, "  {} {}: {}", row.icon, row.label, row.url)?;
        }
        if let Some(footer) = &self.footer {
            writeln!(f, "  {}", footer)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::LinkTemplates;
    use chrono::{TimeDelta, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
    }

    fn ready() -> ViewState {
        ViewState::Ready(
            LinkTemplates::default().render("checkout", now() - TimeDelta::minutes(10)),
        )
    }

    #[test]
    fn loading_shows_title_and_indicator_only() {
        let r = render(&ViewState::Loading, true, now(), &Theme::default());
        assert_eq!(r.title, "GlueOps");
        assert_eq!(r.indicator.as_deref(), Some("Loading..."));
        assert!(r.action.is_none() && r.rows.is_empty() && r.toggle.is_none());
        assert_eq!(r.to_string(), "GlueOps  Loading...\n");
    }

    #[test]
    fn error_shows_retry_and_message() {
        let state = ViewState::Error("API returned 503".into());
        let r = render(&state, false, now(), &Theme::default());
        assert_eq!(r.action_kind(), Some(PanelAction::Retry));
        assert_eq!(r.error.as_deref(), Some("Error: API returned 503"));
        assert_eq!(r.to_string(), "GlueOps  [Retry]\n  Error: API returned 503\n");
    }

    #[test]
    fn collapsed_ready_hides_rows() {
        let r = render(&ready(), false, now(), &Theme::default());
        assert_eq!(r.toggle.as_deref(), Some("▶"));
        assert_eq!(r.action_kind(), Some(PanelAction::Refresh));
        assert!(r.rows.is_empty());
        assert!(r.footer.is_none());
    }

    #[test]
    fn expanded_ready_lists_rows_in_order_then_footer() {
        let r = render(&ready(), true, now(), &Theme::default());
        let labels: Vec<&str> = r.rows.iter().map(|row| row.label.as_str()).collect();
        assert_eq!(labels, ["Metrics", "Logs", "Traces", "Secrets", "IaaC"]);
        assert!(r.rows.iter().all(|row| row.url.contains("checkout")));
        assert_eq!(r.rows[0].icon, "📊");
        assert_eq!(r.footer.as_deref(), Some("Last Updated: 10 mins ago"));
        let text = r.to_string();
        assert!(text.starts_with("GlueOps ▼  [↻ Refresh]\n"));
        assert!(text.ends_with("  Last Updated: 10 mins ago\n"));
    }

    #[test]
    fn empty_renders_title_only() {
        let r = render(&ViewState::Empty, true, now(), &Theme::with_title("Acme"));
        assert_eq!(r.to_string(), "Acme\n");
    }
}
