use super::{Credential, ProviderId, SettingsError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SettingsKey {
    GeminiCredential,
    GroqCredential,
    DefaultProvider,
}

impl SettingsKey {
    pub const ALL: [SettingsKey; 3] = [
        SettingsKey::GeminiCredential,
        SettingsKey::GroqCredential,
        SettingsKey::DefaultProvider,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::GeminiCredential => "geminiCredential",
            Self::GroqCredential => "groqCredential",
            Self::DefaultProvider => "defaultProvider",
        }
    }

    pub fn credential_for(provider: ProviderId) -> Self {
        match provider {
            ProviderId::Gemini => Self::GeminiCredential,
            ProviderId::Groq => Self::GroqCredential,
        }
    }
}

/// Durable key-value store holding credentials and the default provider.
pub trait SettingsStore {
    fn get(&self, key: SettingsKey) -> Option<String>;

    fn set(&mut self, key: SettingsKey, value: String) -> Result<(), SettingsError>;
}

pub fn credential_for(store: &dyn SettingsStore, provider: ProviderId) -> Credential {
    store
        .get(SettingsKey::credential_for(provider))
        .map(Credential::new)
        .unwrap_or_default()
}

/// Stored default provider; absent or unrecognised values fall back to Gemini.
pub fn default_provider(store: &dyn SettingsStore) -> ProviderId {
    let Some(value) = store.get(SettingsKey::DefaultProvider) else {
        return ProviderId::default();
    };

    value.parse().unwrap_or_else(|error| {
        tracing::warn!(%error, "ignoring stored default provider");
        ProviderId::default()
    })
}
