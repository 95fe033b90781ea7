use crate::envelope::MetadataEnvelope;
use crate::metadata::Metadata;

/// What a panel instance shows. Exactly one variant holds at a time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewState {
    /// A resolution is in flight.
    Loading,
    /// The last resolution failed; carries a human-readable message.
    Error(String),
    Ready(Metadata),
    /// The last resolution succeeded but carried no data.
    Empty,
}

impl ViewState {
    /// Interprets a settled fetch: a source error or failed envelope becomes
    /// `Error`, a successful envelope with data becomes `Ready` once its links
    /// are well-formed, and a successful envelope without data becomes `Empty`.
    pub fn from_outcome(outcome: Result<MetadataEnvelope, String>) -> Self {
        let envelope = match outcome {
            Ok(envelope) => envelope,
            Err(message) => return ViewState::Error(message),
        };
        if !envelope.success {
            return ViewState::Error(envelope.error_text());
        }
        match envelope.data {
            Some(metadata) => match metadata.validate() {
                Ok(()) => ViewState::Ready(metadata),
                Err(e) => ViewState::Error(format!("invalid metadata: {}", e)),
            },
            None => ViewState::Empty,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, ViewState::Loading)
    }

    pub fn metadata(&self) -> Option<&Metadata> {
        match self {
            ViewState::Ready(m) => Some(m),
            _ => None,
        }
    }
}
