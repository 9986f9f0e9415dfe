mod credential;
mod errors;
mod provider_id;
mod settings;
mod transform_contract;

pub use credential::Credential;
pub use errors::{ConfigError, ErrorKind, FailureCategory, RemoteError, SettingsError};
pub use provider_id::{ProviderId, UnknownProvider};
pub use settings::{SettingsKey, SettingsStore, credential_for, default_provider};
pub use transform_contract::{GenerationOutcome, PromptRequest, TransformFailure};
