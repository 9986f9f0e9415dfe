use std::sync::Arc;

use crate::domain::{ConfigError, ProviderId};

use super::{GeminiClient, GroqClient, LlmProvider};

/// One client per [`ProviderId`]; resolution cannot miss.
#[derive(Clone)]
pub struct ProviderRegistry {
    gemini: Arc<dyn LlmProvider>,
    groq: Arc<dyn LlmProvider>,
}

impl ProviderRegistry {
    pub fn new<G, Q>(gemini: G, groq: Q) -> Result<Self, ConfigError>
    where
        G: LlmProvider + 'static,
        Q: LlmProvider + 'static,
    {
        Self::from_shared(Arc::new(gemini), Arc::new(groq))
    }

    pub fn from_shared(
        gemini: Arc<dyn LlmProvider>,
        groq: Arc<dyn LlmProvider>,
    ) -> Result<Self, ConfigError> {
        ensure_slot(ProviderId::Gemini, gemini.as_ref())?;
        ensure_slot(ProviderId::Groq, groq.as_ref())?;

        Ok(Self { gemini, groq })
    }

    /// Builds the default HTTP clients, honouring environment overrides.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::new(GeminiClient::from_env()?, GroqClient::from_env()?)
    }

    pub fn resolve(&self, provider: ProviderId) -> Arc<dyn LlmProvider> {
        match provider {
            ProviderId::Gemini => Arc::clone(&self.gemini),
            ProviderId::Groq => Arc::clone(&self.groq),
        }
    }
}

fn ensure_slot(expected: ProviderId, provider: &dyn LlmProvider) -> Result<(), ConfigError> {
    let actual = provider.provider_id();
    if actual != expected {
        return Err(ConfigError::ProviderMismatch { expected, actual });
    }
    Ok(())
}
