//! Outbound lookup used by the resolver.
//!
//! The resolver only depends on the [`Upstream`] trait; [`CurlUpstream`] is
//! the default implementation and issues one blocking GET through the curl
//! crate (libcurl). Call it from `spawn_blocking` when used from async code.

use std::time::Duration;

use crate::config::UpstreamConfig;

/// Status and body of one upstream response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u32,
    pub body: Vec<u8>,
}

impl RawResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// The call could not be made or did not complete.
#[derive(Debug, thiserror::Error)]
pub enum UpstreamError {
    #[error("invalid upstream URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("{0}")]
    Curl(#[from] curl::Error),
}

/// Capability the resolver uses to perform its single lookup.
pub trait Upstream: Send + Sync {
    fn fetch_upstream(&self, app_id: &str) -> Result<RawResponse, UpstreamError>;
}

/// `GET <endpoint>?source=<tag>&app=<app_id>` via libcurl.
#[derive(Debug, Clone)]
pub struct CurlUpstream {
    endpoint: String,
    source_tag: String,
    connect_timeout: Duration,
    timeout: Duration,
}

impl CurlUpstream {
    pub fn new(endpoint: impl Into<String>, source_tag: impl Into<String>) -> Self {
        let defaults = UpstreamConfig::default();
        Self {
            endpoint: endpoint.into(),
            source_tag: source_tag.into(),
            connect_timeout: defaults.connect_timeout(),
            timeout: defaults.timeout(),
        }
    }

    pub fn from_config(cfg: &UpstreamConfig) -> Self {
        Self::new(cfg.endpoint.clone(), cfg.source_tag.clone())
            .with_timeouts(cfg.connect_timeout(), cfg.timeout())
    }

    pub fn with_timeouts(mut self, connect_timeout: Duration, timeout: Duration) -> Self {
        self.connect_timeout = connect_timeout;
        self.timeout = timeout;
        self
    }

    /// Full lookup URL for `app_id`, query parameters form-encoded.
    pub fn request_url(&self, app_id: &str) -> Result<String, url::ParseError> {
        let url = url::Url::parse_with_params(
            &self.endpoint,
            &[("source", self.source_tag.as_str()), ("app", app_id)],
        )?;
        Ok(url.into())
    }
}

impl Upstream for CurlUpstream {
    fn fetch_upstream(&self, app_id: &str) -> Result<RawResponse, UpstreamError> {
        let url = self.request_url(app_id)?;
        tracing::debug!(%url, "upstream GET");
        Ok(http_get(&url, self.connect_timeout, self.timeout)?)
    }
}

/// Performs a GET and returns status and body, whatever the status.
///
/// Follows redirects. Runs in the current thread.
pub(crate) fn http_get(
    url: &str,
    connect_timeout: Duration,
    timeout: Duration,
) -> Result<RawResponse, curl::Error> {
    let mut body = Vec::new();

    let mut easy = curl::easy::Easy::new();
    easy.url(url)?;
    easy.get(true)?;
    easy.follow_location(true)?;
    easy.max_redirections(10)?;
    easy.connect_timeout(connect_timeout)?;
    easy.timeout(timeout)?;

    let mut list = curl::easy::List::new();
    list.append("Accept: application/json")?;
    easy.http_headers(list)?;

    {
        let mut transfer = easy.transfer();
        transfer.write_function(|data| {
            body.extend_from_slice(data);
            Ok(data.len())
        })?;
        transfer.perform()?;
    }

    let status = easy.response_code()?;
    Ok(RawResponse { status, body })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_url_encodes_query() {
        let up = CurlUpstream::new("https://echo.example.com/get", "panel");
        assert_eq!(
            up.request_url("checkout").unwrap(),
            "https://echo.example.com/get?source=panel&app=checkout"
        );
        assert_eq!(
            up.request_url("a b&c").unwrap(),
            "https://echo.example.com/get?source=panel&app=a+b%26c"
        );
    }

    #[test]
    fn request_url_keeps_existing_query() {
        let up = CurlUpstream::new("https://echo.example.com/get?v=2", "panel");
        assert_eq!(
            up.request_url("x").unwrap(),
            "https://echo.example.com/get?v=2&source=panel&app=x"
        );
    }

    #[test]
    fn invalid_endpoint_is_transport_error() {
        let up = CurlUpstream::new("not a url", "panel");
        match up.fetch_upstream("x") {
            Err(UpstreamError::InvalidUrl(_)) => {}
            other => panic!("expected InvalidUrl, got {other:?}"),
        }
    }

    #[test]
    fn raw_response_success_range() {
        let r = |status| RawResponse {
            status,
            body: Vec::new(),
        };
        assert!(r(200).is_success());
        assert!(r(204).is_success());
        assert!(!r(301).is_success());
        assert!(!r(503).is_success());
    }

    #[test]
    fn from_config_applies_timeouts() {
        let cfg = UpstreamConfig {
            connect_timeout_secs: 2,
            timeout_secs: 5,
            ..UpstreamConfig::default()
        };
        let up = CurlUpstream::from_config(&cfg);
        assert_eq!(up.connect_timeout, Duration::from_secs(2));
        assert_eq!(up.timeout, Duration::from_secs(5));
    }
}
