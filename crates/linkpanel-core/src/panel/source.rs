//! Where a panel gets its envelopes from.
//!
//! [`ProxySource`] calls the metadata endpoint over HTTP; [`LocalSource`]
//! calls an in-process resolver. Both are blocking. Failures surface as an
//! error message and are never replaced by locally built metadata.

use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;

use crate::config::{LinkPanelConfig, UpstreamConfig};
use crate::envelope::MetadataEnvelope;
use crate::resolver::MetadataResolver;
use crate::upstream::http_get;

pub trait MetadataSource: Send + Sync {
    /// Fetch the envelope for `app_id`. `Err` carries a display message.
    fn fetch(&self, app_id: &str) -> Result<MetadataEnvelope, String>;
}

/// `GET <base_url><metadata_path>?appName=<id>`.
#[derive(Debug, Clone)]
pub struct ProxySource {
    base_url: String,
    metadata_path: String,
    connect_timeout: Duration,
    timeout: Duration,
}

impl ProxySource {
    pub fn new(base_url: impl Into<String>, metadata_path: impl Into<String>) -> Self {
        let defaults = UpstreamConfig::default();
        Self {
            base_url: base_url.into(),
            metadata_path: metadata_path.into(),
            connect_timeout: defaults.connect_timeout(),
            timeout: defaults.timeout(),
        }
    }

    /// Proxy source for the configured endpoint, sharing the upstream timeouts.
    pub fn from_config(cfg: &LinkPanelConfig) -> Self {
        Self::new(cfg.proxy_base_url.clone(), cfg.metadata_path())
            .with_timeouts(cfg.upstream.connect_timeout(), cfg.upstream.timeout())
    }

    pub fn with_timeouts(mut self, connect_timeout: Duration, timeout: Duration) -> Self {
        self.connect_timeout = connect_timeout;
        self.timeout = timeout;
        self
    }

    pub fn request_url(&self, app_id: &str) -> Result<String, url::ParseError> {
        let mut url = url::Url::parse(&self.base_url)?.join(&self.metadata_path)?;
        url.query_pairs_mut().append_pair("appName", app_id);
        Ok(url.into())
    }
}

impl MetadataSource for ProxySource {
    fn fetch(&self, app_id: &str) -> Result<MetadataEnvelope, String> {
        let url = self
            .request_url(app_id)
            .map_err(|e| format!("invalid proxy URL: {}", e))?;
        tracing::debug!(%url, "panel fetch");
        let raw = http_get(&url, self.connect_timeout, self.timeout)
            .map_err(|e| format!("Failed to fetch metadata: {}", e))?;

        // A failed resolution still answers with a decodable envelope (HTTP 500).
        match serde_json::from_slice::<MetadataEnvelope>(&raw.body) {
            Ok(envelope) => Ok(envelope),
            Err(_) if !raw.is_success() => Err(format!("API error: {}", raw.status)),
            Err(e) => Err(format!("malformed response: {}", e)),
        }
    }
}

/// Resolves in-process, without an HTTP hop.
#[derive(Debug, Clone)]
pub struct LocalSource {
    resolver: Arc<MetadataResolver>,
}

impl LocalSource {
    pub fn new(resolver: Arc<MetadataResolver>) -> Self {
        Self { resolver }
    }
}

impl MetadataSource for LocalSource {
    fn fetch(&self, app_id: &str) -> Result<MetadataEnvelope, String> {
        Ok(MetadataEnvelope::from_resolution(
            self.resolver.resolve_with_echo(Some(app_id)),
            Utc::now(),
        ))
    }
}
