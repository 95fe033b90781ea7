//! CLI command handlers, one per file.

mod completions;
mod manifest;
mod panel;
mod resolve;
mod serve;

pub use completions::run_completions;
pub use manifest::run_manifest;
pub use panel::run_panel;
#[cfg(test)]
pub(crate) use panel::{parse_panel_command, PanelCommand};
pub use resolve::run_resolve;
pub use serve::run_serve;
