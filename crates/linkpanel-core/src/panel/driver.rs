//! Async owner of a [`Panel`]: runs fetches on the blocking pool and settles them.

use chrono::{DateTime, Utc};
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

use super::render::RenderedPanel;
use super::source::MetadataSource;
use super::state::ViewState;
use super::theme::Theme;
use super::{FetchTicket, Panel};

/// Drives one panel instance. Must be created inside a tokio runtime.
///
/// Each trigger returns the `JoinHandle` of its fetch; the handle yields
/// `true` if the result was applied and `false` if a newer trigger had
/// superseded it.
pub struct PanelDriver {
    panel: Arc<Mutex<Panel>>,
    source: Arc<dyn MetadataSource>,
}

impl PanelDriver {
    pub fn mount(
        app_id: Option<&str>,
        source: Arc<dyn MetadataSource>,
    ) -> (Self, JoinHandle<bool>) {
        let (panel, ticket) = Panel::mount(app_id);
        let driver = Self {
            panel: Arc::new(Mutex::new(panel)),
            source,
        };
        let handle = driver.spawn_fetch(ticket);
        (driver, handle)
    }

    /// `None` when the identifier is unchanged.
    pub async fn identifier_changed(&self, new_id: Option<&str>) -> Option<JoinHandle<bool>> {
        let ticket = self.panel.lock().await.on_identifier_changed(new_id)?;
        Some(self.spawn_fetch(ticket))
    }

    pub async fn refresh(&self) -> JoinHandle<bool> {
        let ticket = self.panel.lock().await.on_refresh();
        self.spawn_fetch(ticket)
    }

    pub async fn toggle_expand(&self) -> bool {
        self.panel.lock().await.on_toggle_expand()
    }

    pub async fn state(&self) -> ViewState {
        self.panel.lock().await.state().clone()
    }

    pub async fn app_id(&self) -> String {
        self.panel.lock().await.app_id().to_string()
    }

    pub async fn render(&self, now: DateTime<Utc>, theme: &Theme) -> RenderedPanel {
        self.panel.lock().await.render(now, theme)
    }

    fn spawn_fetch(&self, ticket: FetchTicket) -> JoinHandle<bool> {
        let panel = Arc::clone(&self.panel);
        let source = Arc::clone(&self.source);
        tokio::spawn(async move {
            let app_id = ticket.app_id().to_string();
            let outcome = tokio::task::spawn_blocking(move || source.fetch(&app_id))
                .await
                .unwrap_or_else(|e| Err(format!("fetch task failed: {}", e)));
            panel.lock().await.settle(&ticket, outcome)
        })
    }
}
