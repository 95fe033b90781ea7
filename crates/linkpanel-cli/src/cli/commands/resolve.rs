//! `linkpanel resolve [app]` – one in-process resolution.

use anyhow::{Context, Result};
use chrono::Utc;
use linkpanel_core::config::LinkPanelConfig;
use linkpanel_core::envelope::MetadataEnvelope;
use linkpanel_core::resolver::MetadataResolver;

pub async fn run_resolve(cfg: &LinkPanelConfig, app: Option<String>) -> Result<()> {
    let resolver = MetadataResolver::from_config(cfg);
    let result = tokio::task::spawn_blocking(move || resolver.resolve_with_echo(app.as_deref()))
        .await
        .context("resolver task join")?;
    let envelope = MetadataEnvelope::from_resolution(result, Utc::now());
    println!("{}", serde_json::to_string_pretty(&envelope)?);
    if !envelope.success {
        anyhow::bail!("resolution failed: {}", envelope.error_text());
    }
    Ok(())
}
