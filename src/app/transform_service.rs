use crate::domain::{
    Credential, GenerationOutcome, PromptRequest, ProviderId, SettingsStore, TransformFailure,
    credential_for,
};
use crate::infra::llm::{PromptBuilder, ProviderRegistry};

/// Runs one passage through the selected provider.
///
/// Stateless across calls: every invocation validates, issues at most one
/// remote request and returns a single outcome. Failures are never retried
/// here.
#[derive(Clone)]
pub struct TransformService {
    registry: ProviderRegistry,
}

impl TransformService {
    pub fn new(registry: ProviderRegistry) -> Self {
        Self { registry }
    }

    pub fn transform<F>(
        &self,
        source_text: &str,
        provider: ProviderId,
        credential_lookup: F,
    ) -> GenerationOutcome
    where
        F: FnOnce(ProviderId) -> Credential,
    {
        let span = tracing::info_span!("transform", %provider);
        let _entered = span.enter();

        let request = match PromptRequest::new(source_text) {
            Ok(request) => request,
            Err(failure) => return GenerationOutcome::Failure(failure),
        };

        let credential = credential_lookup(provider);
        if !credential.is_present() {
            tracing::info!("credential missing, request not sent");
            return GenerationOutcome::Failure(TransformFailure::missing_credential(provider));
        }

        let prompt = PromptBuilder::build(request.source_text());
        let client = self.registry.resolve(provider);

        match client.generate(&prompt, &credential) {
            Ok(text) => {
                tracing::info!(output_chars = text.chars().count(), "transform succeeded");
                GenerationOutcome::Success(text)
            }
            Err(error) => {
                tracing::warn!(%error, "transform failed");
                GenerationOutcome::Failure(error.into())
            }
        }
    }

    /// Reads the credential for `provider` from `settings`; the store is never written.
    pub fn transform_with_settings(
        &self,
        source_text: &str,
        provider: ProviderId,
        settings: &dyn SettingsStore,
    ) -> GenerationOutcome {
        self.transform(source_text, provider, |id| credential_for(settings, id))
    }
}
