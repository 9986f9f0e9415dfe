use crate::domain::{Credential, ProviderId, RemoteError};

/// Uniform capability shared by every remote text-generation backend.
pub trait LlmProvider: Send + Sync {
    fn provider_id(&self) -> ProviderId;

    /// Sends `prompt` in one request and returns the generated text.
    fn generate(&self, prompt: &str, credential: &Credential) -> Result<String, RemoteError>;
}
