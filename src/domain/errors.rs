use thiserror::Error;

use super::ProviderId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureCategory {
    UserActionRequired,
    TemporaryFailure,
    InternalFailure,
}

/// Classification of a failed transform, independent of provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    EmptyInput,
    MissingCredential,
    HttpStatus(u16),
    MalformedResponse,
    TransportFailure,
}

impl ErrorKind {
    pub fn category(self) -> FailureCategory {
        match self {
            Self::EmptyInput | Self::MissingCredential => FailureCategory::UserActionRequired,
            Self::HttpStatus(401 | 403) => FailureCategory::UserActionRequired,
            Self::HttpStatus(408 | 429) | Self::TransportFailure => {
                FailureCategory::TemporaryFailure
            }
            Self::HttpStatus(status) if status >= 500 => FailureCategory::TemporaryFailure,
            Self::HttpStatus(_) | Self::MalformedResponse => FailureCategory::InternalFailure,
        }
    }
}

/// Failure reported by a provider client for a single remote call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RemoteError {
    #[error("{} returned HTTP {status}", provider.display_name())]
    HttpStatus {
        provider: ProviderId,
        status: u16,
        body: String,
    },
    #[error("{} returned a malformed response: {message}", provider.display_name())]
    MalformedResponse {
        provider: ProviderId,
        message: String,
    },
    #[error("{} transport failed: {message}", provider.display_name())]
    Transport {
        provider: ProviderId,
        message: String,
    },
    #[error("{} request was not sent: no API key", provider.display_name())]
    MissingCredential { provider: ProviderId },
}

impl RemoteError {
    pub fn malformed(provider: ProviderId, message: impl Into<String>) -> Self {
        Self::MalformedResponse {
            provider,
            message: message.into(),
        }
    }

    pub fn transport(provider: ProviderId, message: impl Into<String>) -> Self {
        Self::Transport {
            provider,
            message: message.into(),
        }
    }

    pub fn provider(&self) -> ProviderId {
        match self {
            Self::HttpStatus { provider, .. }
            | Self::MalformedResponse { provider, .. }
            | Self::Transport { provider, .. }
            | Self::MissingCredential { provider } => *provider,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::HttpStatus { status, .. } => ErrorKind::HttpStatus(*status),
            Self::MalformedResponse { .. } => ErrorKind::MalformedResponse,
            Self::Transport { .. } => ErrorKind::TransportFailure,
            Self::MissingCredential { .. } => ErrorKind::MissingCredential,
        }
    }
}

/// Invalid runtime configuration detected while wiring clients.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("invalid configuration: {message}")]
    Invalid { message: String },
    #[error("failed to create HTTP client: {message}")]
    HttpClient { message: String },
    #[error("registry slot for {expected} was given a {actual} client")]
    ProviderMismatch {
        expected: ProviderId,
        actual: ProviderId,
    },
}

impl ConfigError {
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::Invalid {
            message: message.into(),
        }
    }
}

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("settings file could not be accessed: {0}")]
    Io(#[from] std::io::Error),
    #[error("settings file is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid value for {key}: {message}")]
    InvalidValue { key: &'static str, message: String },
}
