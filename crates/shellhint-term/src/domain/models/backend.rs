use strum::Display;
use strum::EnumIter;
use strum::IntoEnumIterator;
use thiserror::Error;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Display, EnumIter)]
#[strum(serialize_all = "kebab-case")]
pub enum BackendName {
    #[default]
    Ollama,
}

impl BackendName {
    pub fn parse(s: &str) -> Option<BackendName> {
        BackendName::iter().find(|e| e.to_string() == s)
    }
}

/// Failures a backend round trip can end in. The `Display` text is shown to
/// the user as-is in the warning banner.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BackendError {
    #[error("Can't reach the model server at {url}: {reason}")]
    BackendUnavailable { url: String, reason: String },
    #[error("Failed to pull model {model}: {reason}")]
    ModelPullFailed { model: String, reason: String },
    #[error("The model failed to answer: {0}")]
    GenerationFailed(String),
    #[error("The model answered with an unusable suggestion: {0}")]
    MalformedPayload(String),
}

/// Text the model produced for a generate request, before it is parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawSuggestionPayload(pub String);

impl RawSuggestionPayload {
    pub fn new(text: impl Into<String>) -> RawSuggestionPayload {
        return RawSuggestionPayload(text.into());
    }

    pub fn as_str(&self) -> &str {
        return &self.0;
    }
}
