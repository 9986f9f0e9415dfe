use super::{ErrorKind, FailureCategory, ProviderId, RemoteError};

/// Source passage for one transform. Never blank.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptRequest {
    source_text: String,
}

impl PromptRequest {
    pub fn new(source_text: impl Into<String>) -> Result<Self, TransformFailure> {
        let source_text = source_text.into();
        if source_text.trim().is_empty() {
            return Err(TransformFailure::empty_input());
        }
        Ok(Self { source_text })
    }

    /// The text exactly as supplied, surrounding whitespace included.
    pub fn source_text(&self) -> &str {
        &self.source_text
    }
}

/// Result of a single transform invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerationOutcome {
    Success(String),
    Failure(TransformFailure),
}

impl GenerationOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    pub fn text(&self) -> Option<&str> {
        match self {
            Self::Success(text) => Some(text),
            Self::Failure(_) => None,
        }
    }

    pub fn failure(&self) -> Option<&TransformFailure> {
        match self {
            Self::Success(_) => None,
            Self::Failure(failure) => Some(failure),
        }
    }

    pub fn into_result(self) -> Result<String, TransformFailure> {
        match self {
            Self::Success(text) => Ok(text),
            Self::Failure(failure) => Err(failure),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransformFailure {
    pub kind: ErrorKind,
    pub provider: Option<ProviderId>,
    pub detail: String,
}

impl TransformFailure {
    pub fn empty_input() -> Self {
        Self {
            kind: ErrorKind::EmptyInput,
            provider: None,
            detail: "source text must not be empty".to_string(),
        }
    }

    pub fn missing_credential(provider: ProviderId) -> Self {
        Self {
            kind: ErrorKind::MissingCredential,
            provider: Some(provider),
            detail: format!("{} API key is not configured", provider.display_name()),
        }
    }

    pub fn category(&self) -> FailureCategory {
        self.kind.category()
    }

    /// Notice text for the person who submitted the passage.
    pub fn user_message(&self) -> String {
        let name = self
            .provider
            .map(ProviderId::display_name)
            .unwrap_or("Provider");
        let detail = &self.detail;

        match self.kind {
            ErrorKind::EmptyInput => "Please enter some text to convert.".to_string(),
            ErrorKind::MissingCredential => format!("Enter your {name} API key in settings."),
            ErrorKind::HttpStatus(status) => format!("{name} Error: {status}"),
            ErrorKind::MalformedResponse => {
                format!("{name} returned an unexpected response: {detail}")
            }
            ErrorKind::TransportFailure => format!("Could not reach {name}: {detail}"),
        }
    }
}

impl From<RemoteError> for TransformFailure {
    fn from(error: RemoteError) -> Self {
        let kind = error.kind();
        let provider = Some(error.provider());
        let detail = match error {
            RemoteError::HttpStatus { status, .. } => status.to_string(),
            RemoteError::MalformedResponse { message, .. }
            | RemoteError::Transport { message, .. } => message,
            RemoteError::MissingCredential { provider } => {
                return Self::missing_credential(provider);
            }
        };

        Self {
            kind,
            provider,
            detail,
        }
    }
}
