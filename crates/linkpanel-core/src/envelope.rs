//! `{ success, data | error }` envelope shared by the metadata endpoint and the panel.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::metadata::Metadata;
use crate::resolver::{Resolution, ResolutionError};

/// Error text used when a failed envelope carries no `error` field.
pub const UNKNOWN_ERROR: &str = "Unknown error occurred";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetadataEnvelope {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Metadata>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Server time at which the envelope was produced.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub debug: Option<EnvelopeDebug>,
}

/// Evidence that the upstream call ran server-side: its decoded body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvelopeDebug {
    #[serde(rename = "postmanEcho")]
    pub upstream_echo: serde_json::Value,
}

impl MetadataEnvelope {
    pub fn ok(data: Metadata, timestamp: DateTime<Utc>) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            message: None,
            timestamp: Some(timestamp),
            debug: None,
        }
    }

    /// Failure envelope: summary in `error`, cause (if any) in `message`.
    pub fn failure(err: &ResolutionError, timestamp: DateTime<Utc>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(err.summary()),
            message: err.detail(),
            timestamp: Some(timestamp),
            debug: None,
        }
    }

    pub fn from_result(
        result: Result<Metadata, ResolutionError>,
        timestamp: DateTime<Utc>,
    ) -> Self {
        match result {
            Ok(data) => Self::ok(data, timestamp),
            Err(e) => Self::failure(&e, timestamp),
        }
    }

    /// Like [`from_result`](Self::from_result), attaching the upstream body under `debug`.
    pub fn from_resolution(
        result: Result<Resolution, ResolutionError>,
        timestamp: DateTime<Utc>,
    ) -> Self {
        match result {
            Ok(resolution) => Self {
                debug: Some(EnvelopeDebug {
                    upstream_echo: resolution.upstream_echo,
                }),
                ..Self::ok(resolution.metadata, timestamp)
            },
            Err(e) => Self::failure(&e, timestamp),
        }
    }

    /// Human-readable error for a failed envelope.
    pub fn error_text(&self) -> String {
        match (self.error.as_deref(), self.message.as_deref()) {
            (Some(error), Some(message)) => format!("{}: {}", error, message),
            (Some(error), None) => error.to_string(),
            (None, Some(message)) => message.to_string(),
            (None, None) => UNKNOWN_ERROR.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::LinkTemplates;
    use chrono::TimeZone;

    fn at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn status_failure_serializes_without_message() {
        let env = MetadataEnvelope::failure(&ResolutionError::UpstreamStatus(503), at());
        let json = serde_json::to_value(&env).unwrap();
        assert_eq!(json["success"], false);
        assert_eq!(json["error"], "API returned 503");
        assert!(json.get("message").is_none());
        assert!(json.get("data").is_none());
        assert_eq!(env.error_text(), "API returned 503");
    }

    #[test]
    fn transport_failure_carries_detail() {
        let env = MetadataEnvelope::failure(
            &ResolutionError::Transport("Couldn't connect to server".into()),
            at(),
        );
        assert_eq!(env.error.as_deref(), Some("upstream request failed"));
        assert_eq!(
            env.error_text(),
            "upstream request failed: Couldn't connect to server"
        );
    }

    #[test]
    fn success_serializes_data() {
        let md = LinkTemplates::default().render("checkout", at());
        let env = MetadataEnvelope::from_result(Ok(md.clone()), at());
        let json = serde_json::to_string(&env).unwrap();
        let back: MetadataEnvelope = serde_json::from_str(&json).unwrap();
        assert!(back.success);
        assert_eq!(back.data, Some(md));
        assert!(back.error.is_none());
    }

    #[test]
    fn resolution_envelope_carries_echo_under_debug() {
        let md = LinkTemplates::default().render("checkout", at());
        let resolution = Resolution {
            metadata: md.clone(),
            upstream_echo: serde_json::json!({"args": {"app": "checkout"}}),
        };
        let env = MetadataEnvelope::from_resolution(Ok(resolution), at());
        assert_eq!(env.data, Some(md.clone()));

        let json = serde_json::to_value(&env).unwrap();
        assert_eq!(json["debug"]["postmanEcho"]["args"]["app"], "checkout");
        assert_eq!(json["data"], serde_json::to_value(&md).unwrap());
        assert!(json["data"].get("postmanEcho").is_none());
    }

    #[test]
    fn failed_resolution_has_no_debug() {
        let env = MetadataEnvelope::from_resolution(Err(ResolutionError::UpstreamStatus(502)), at());
        assert!(env.debug.is_none());
        assert_eq!(env.error.as_deref(), Some("API returned 502"));
    }

    #[test]
    fn bare_failure_decodes_with_fallback_text() {
        let env: MetadataEnvelope = serde_json::from_str(r#"{"success":false}"#).unwrap();
        assert_eq!(env.error_text(), UNKNOWN_ERROR);
    }
}
