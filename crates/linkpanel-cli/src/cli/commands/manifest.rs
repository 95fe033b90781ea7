//! `linkpanel manifest` – print the host registration.

use anyhow::Result;
use linkpanel_core::config::LinkPanelConfig;
use linkpanel_core::registry::{register_panel, InMemoryRegistry};

pub fn run_manifest(cfg: &LinkPanelConfig) -> Result<()> {
    let mut registry = InMemoryRegistry::new();
    register_panel(&mut registry, cfg);
    println!("{}", registry.to_manifest_json()?);
    Ok(())
}
