use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::metadata::LinkTemplates;

/// Outbound lookup parameters (optional section in config.toml).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpstreamConfig {
    /// Lookup endpoint; the app id is passed as the `app` query parameter.
    pub endpoint: String,
    /// Value of the `source` query parameter sent with every lookup.
    pub source_tag: String,
    pub connect_timeout_secs: u64,
    pub timeout_secs: u64,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://postman-echo.com/get".to_string(),
            source_tag: "glueops-argocd-extension".to_string(),
            connect_timeout_secs: 15,
            timeout_secs: 30,
        }
    }
}

impl UpstreamConfig {
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Global configuration loaded from `~/.config/linkpanel/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinkPanelConfig {
    /// Address the metadata endpoint listens on.
    pub bind_addr: String,
    /// Extension namespace; the endpoint is `/extensions/<namespace>/api/metadata`.
    pub namespace: String,
    /// Panel title and registration display name.
    pub display_name: String,
    /// Icon class passed to the host registry.
    #[serde(default = "default_icon")]
    pub icon: String,
    /// How far in the past `lastUpdated` is stamped, in seconds.
    pub freshness_offset_secs: u64,
    /// Base URL the panel uses to reach the metadata endpoint.
    pub proxy_base_url: String,
    #[serde(default)]
    pub upstream: UpstreamConfig,
    /// Per-category label/template overrides; missing categories use defaults.
    #[serde(default)]
    pub links: LinkTemplates,
}

fn default_icon() -> String {
    "fa fa-puzzle-piece".to_string()
}

impl Default for LinkPanelConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:8085".to_string(),
            namespace: "glueops".to_string(),
            display_name: "GlueOps".to_string(),
            icon: default_icon(),
            freshness_offset_secs: 600,
            proxy_base_url: "http://127.0.0.1:8085".to_string(),
            upstream: UpstreamConfig::default(),
            links: LinkTemplates::default(),
        }
    }
}

impl LinkPanelConfig {
    /// Route path of the metadata endpoint for the configured namespace.
    pub fn metadata_path(&self) -> String {
        format!("/extensions/{}/api/metadata", self.namespace)
    }

    pub fn freshness_offset(&self) -> chrono::TimeDelta {
        i64::try_from(self.freshness_offset_secs)
            .ok()
            .and_then(chrono::TimeDelta::try_seconds)
            .unwrap_or(chrono::TimeDelta::MAX)
    }

    pub fn validate(&self) -> Result<()> {
        if self.namespace.is_empty() {
            anyhow::bail!("namespace must not be empty");
        }
        if !self.namespace.chars().all(is_namespace_char) {
            anyhow::bail!(
                "namespace {:?} may only contain ASCII letters, digits, '_', '.' and '-'",
                self.namespace
            );
        }
        if self.display_name.trim().is_empty() {
            anyhow::bail!("display_name must not be empty");
        }
        if self.freshness_offset_secs > i64::MAX as u64 / 1000 {
            anyhow::bail!("freshness_offset_secs is out of range");
        }
        url::Url::parse(&self.upstream.endpoint)
            .with_context(|| format!("upstream.endpoint {:?}", self.upstream.endpoint))?;
        url::Url::parse(&self.proxy_base_url)
            .with_context(|| format!("proxy_base_url {:?}", self.proxy_base_url))?;
        self.links.validate()?;
        Ok(())
    }
}

/// Namespaces become a literal route segment, so route syntax (`:`, `*`, `{`) is excluded.
fn is_namespace_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-')
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("linkpanel")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<LinkPanelConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = LinkPanelConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    load_from(&path)
}

/// Load and validate configuration from an explicit file.
pub fn load_from(path: &Path) -> Result<LinkPanelConfig> {
    let data = fs::read_to_string(path)
        .with_context(|| format!("read config {}", path.display()))?;
    let cfg: LinkPanelConfig =
        toml::from_str(&data).with_context(|| format!("parse config {}", path.display()))?;
    cfg.validate()
        .with_context(|| format!("invalid config {}", path.display()))?;
    Ok(cfg)
}
