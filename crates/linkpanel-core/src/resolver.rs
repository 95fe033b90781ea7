//! Metadata resolver: one upstream lookup, then a deterministic link snapshot.
//!
//! The upstream call gates success; its body must parse as JSON. The decoded
//! body is handed back next to the links as [`Resolution::upstream_echo`] and
//! never feeds into [`Metadata`]. Links come from [`LinkTemplates`] and
//! `lastUpdated` is stamped `now - freshness_offset`.

use chrono::{DateTime, TimeDelta, Utc};
use std::sync::Arc;

use crate::config::LinkPanelConfig;
use crate::metadata::{normalize_app_id, LinkTemplates, Metadata};
use crate::upstream::{CurlUpstream, Upstream};

/// Default distance between resolution time and `lastUpdated`, in seconds.
pub const DEFAULT_FRESHNESS_OFFSET_SECS: i64 = 600;

/// Why a resolution failed. All-or-nothing: there is no partial result.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResolutionError {
    /// The upstream call could not be made.
    #[error("upstream request failed: {0}")]
    Transport(String),
    /// Upstream answered with a status outside 200-299.
    #[error("API returned {0}")]
    UpstreamStatus(u32),
    /// Upstream body was not valid JSON.
    #[error("malformed upstream response: {0}")]
    MalformedResponse(String),
}

impl ResolutionError {
    /// One-line summary exposed across the resolver boundary.
    pub fn summary(&self) -> String {
        match self {
            ResolutionError::Transport(_) => "upstream request failed".to_string(),
            ResolutionError::UpstreamStatus(code) => format!("API returned {}", code),
            ResolutionError::MalformedResponse(_) => "malformed upstream response".to_string(),
        }
    }

    /// Underlying cause, when there is more to say than the summary.
    pub fn detail(&self) -> Option<String> {
        match self {
            ResolutionError::Transport(d) | ResolutionError::MalformedResponse(d) => {
                Some(d.clone())
            }
            ResolutionError::UpstreamStatus(_) => None,
        }
    }
}

/// A successful resolution and the decoded upstream body that gated it.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    pub metadata: Metadata,
    pub upstream_echo: serde_json::Value,
}

/// Produces [`Metadata`] snapshots for application identifiers.
#[derive(Clone)]
pub struct MetadataResolver {
    upstream: Arc<dyn Upstream>,
    templates: LinkTemplates,
    freshness_offset: TimeDelta,
}

impl std::fmt::Debug for MetadataResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MetadataResolver")
            .field("templates", &self.templates)
            .field("freshness_offset", &self.freshness_offset)
            .finish_non_exhaustive()
    }
}

impl MetadataResolver {
    pub fn new(upstream: Arc<dyn Upstream>, templates: LinkTemplates) -> Self {
        Self {
            upstream,
            templates,
            freshness_offset: TimeDelta::seconds(DEFAULT_FRESHNESS_OFFSET_SECS),
        }
    }

    /// Resolver backed by [`CurlUpstream`] with the configured templates and offset.
    pub fn from_config(cfg: &LinkPanelConfig) -> Self {
        Self::new(
            Arc::new(CurlUpstream::from_config(&cfg.upstream)),
            cfg.links.clone(),
        )
        .with_freshness_offset(cfg.freshness_offset())
    }

    pub fn with_freshness_offset(mut self, offset: TimeDelta) -> Self {
        self.freshness_offset = offset;
        self
    }

    pub fn resolve(&self, app_id: Option<&str>) -> Result<Metadata, ResolutionError> {
        self.resolve_at(app_id, Utc::now())
    }

    /// Like [`resolve`](Self::resolve) with an explicit clock.
    pub fn resolve_at(
        &self,
        app_id: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<Metadata, ResolutionError> {
        self.resolve_with_echo_at(app_id, now).map(|r| r.metadata)
    }

    /// Resolve and keep the upstream body alongside the links.
    pub fn resolve_with_echo(&self, app_id: Option<&str>) -> Result<Resolution, ResolutionError> {
        self.resolve_with_echo_at(app_id, Utc::now())
    }

    pub fn resolve_with_echo_at(
        &self,
        app_id: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<Resolution, ResolutionError> {
        let app_id = normalize_app_id(app_id);
        tracing::info!(app = %app_id, "fetching metadata from upstream");

        match self.check_upstream(&app_id) {
            Ok(upstream_echo) => {
                let last_updated = now
                    .checked_sub_signed(self.freshness_offset)
                    .unwrap_or(DateTime::<Utc>::MIN_UTC);
                tracing::debug!(app = %app_id, "upstream lookup succeeded");
                Ok(Resolution {
                    metadata: self.templates.render(&app_id, last_updated),
                    upstream_echo,
                })
            }
            Err(e) => {
                tracing::error!(app = %app_id, error = %e, "metadata resolution failed");
                Err(e)
            }
        }
    }

    fn check_upstream(&self, app_id: &str) -> Result<serde_json::Value, ResolutionError> {
        let raw = self
            .upstream
            .fetch_upstream(app_id)
            .map_err(|e| ResolutionError::Transport(e.to_string()))?;
        if !raw.is_success() {
            return Err(ResolutionError::UpstreamStatus(raw.status));
        }
        serde_json::from_slice(&raw.body)
            .map_err(|e| ResolutionError::MalformedResponse(e.to_string()))
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use crate::upstream::{RawResponse, Upstream, UpstreamError};
    use std::sync::Mutex;

    /// Upstream stub that answers every call with the same status/body and records app ids.
    pub struct StubUpstream {
        pub status: u32,
        pub body: &'static str,
        pub fail_transport: bool,
        pub calls: Mutex<Vec<String>>,
    }

    impl StubUpstream {
        pub fn ok() -> Self {
            Self::with_status(200, r#"{"args":{}}"#)
        }

        pub fn with_status(status: u32, body: &'static str) -> Self {
            Self {
                status,
                body,
                fail_transport: false,
                calls: Mutex::new(Vec::new()),
            }
        }

        pub fn unreachable() -> Self {
            Self {
                fail_transport: true,
                ..Self::ok()
            }
        }
    }

    impl Upstream for StubUpstream {
        fn fetch_upstream(&self, app_id: &str) -> Result<RawResponse, UpstreamError> {
            self.calls.lock().unwrap().push(app_id.to_string());
            if self.fail_transport {
                return Err(UpstreamError::InvalidUrl(url::ParseError::EmptyHost));
            }
            Ok(RawResponse {
                status: self.status,
                body: self.body.as_bytes().to_vec(),
            })
        }
    }
}
