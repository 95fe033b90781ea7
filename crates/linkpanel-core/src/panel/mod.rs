//! Panel view: a per-instance state machine over [`ViewState`].
//!
//! Every trigger (mount, identifier change, refresh) moves the panel to
//! `Loading` and hands out a [`FetchTicket`]. A settled fetch is applied only
//! if its ticket is still the latest one, so a slow response for an older
//! trigger can never overwrite a newer state. Expansion is local and does not
//! interact with fetching.

mod driver;
mod relative_time;
mod render;
mod source;
mod state;
mod theme;

pub use driver::PanelDriver;
pub use relative_time::format_relative;
pub use render::{render, LinkRow, PanelAction, RenderedPanel};
pub use source::{LocalSource, MetadataSource, ProxySource};
pub use state::ViewState;
pub use theme::Theme;

use chrono::{DateTime, Utc};

use crate::envelope::MetadataEnvelope;
use crate::metadata::normalize_app_id;

/// Handle for one fetch. Only the newest ticket of a panel can settle it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    generation: u64,
    app_id: String,
}

impl FetchTicket {
    pub fn app_id(&self) -> &str {
        &self.app_id
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}

#[derive(Debug)]
pub struct Panel {
    app_id: String,
    state: ViewState,
    expanded: bool,
    generation: u64,
}

impl Panel {
    /// New panel in `Loading`, plus the ticket for its first fetch.
    pub fn mount(app_id: Option<&str>) -> (Self, FetchTicket) {
        let mut panel = Self {
            app_id: normalize_app_id(app_id),
            state: ViewState::Loading,
            expanded: false,
            generation: 0,
        };
        let ticket = panel.begin();
        (panel, ticket)
    }

    /// Restart for `new_id` if it differs from the current identifier.
    pub fn on_identifier_changed(&mut self, new_id: Option<&str>) -> Option<FetchTicket> {
        let new_id = normalize_app_id(new_id);
        if new_id == self.app_id {
            return None;
        }
        tracing::debug!(from = %self.app_id, to = %new_id, "panel identifier changed");
        self.app_id = new_id;
        Some(self.begin())
    }

    /// Restart for the current identifier, whatever the current state.
    pub fn on_refresh(&mut self) -> FetchTicket {
        self.begin()
    }

    /// Flip expansion; returns the new value.
    pub fn on_toggle_expand(&mut self) -> bool {
        self.expanded = !self.expanded;
        self.expanded
    }

    /// Apply a fetch outcome. Returns false (and changes nothing) for a stale ticket.
    pub fn settle(
        &mut self,
        ticket: &FetchTicket,
        outcome: Result<MetadataEnvelope, String>,
    ) -> bool {
        if ticket.generation != self.generation {
            tracing::debug!(
                app = %ticket.app_id,
                stale = ticket.generation,
                current = self.generation,
                "dropping stale panel result"
            );
            return false;
        }
        self.state = ViewState::from_outcome(outcome);
        if let ViewState::Error(message) = &self.state {
            tracing::warn!(app = %self.app_id, "panel fetch failed: {}", message);
        }
        true
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn app_id(&self) -> &str {
        &self.app_id
    }

    pub fn is_expanded(&self) -> bool {
        self.expanded
    }

    pub fn render(&self, now: DateTime<Utc>, theme: &Theme) -> RenderedPanel {
        render(&self.state, self.expanded, now, theme)
    }

    fn begin(&mut self) -> FetchTicket {
        self.generation += 1;
        self.state = ViewState::Loading;
        FetchTicket {
            generation: self.generation,
            app_id: self.app_id.clone(),
        }
    }
}
