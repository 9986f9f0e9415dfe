use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind as IoErrorKind;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::domain::{ProviderId, SettingsError, SettingsKey, SettingsStore};

/// In-process store; nothing survives the process.
#[derive(Debug, Default, Clone)]
pub struct MemorySettingsStore {
    values: BTreeMap<SettingsKey, String>,
}

impl MemorySettingsStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: SettingsKey, value: impl Into<String>) -> Self {
        self.values.insert(key, value.into());
        self
    }
}

impl SettingsStore for MemorySettingsStore {
    fn get(&self, key: SettingsKey) -> Option<String> {
        self.values.get(&key).cloned()
    }

    fn set(&mut self, key: SettingsKey, value: String) -> Result<(), SettingsError> {
        validate_value(key, &value)?;
        self.values.insert(key, value);
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct SettingsDocument {
    gemini_credential: String,
    groq_credential: String,
    default_provider: String,
}

impl Default for SettingsDocument {
    fn default() -> Self {
        Self {
            gemini_credential: String::new(),
            groq_credential: String::new(),
            default_provider: ProviderId::default().as_str().to_string(),
        }
    }
}

impl SettingsDocument {
    fn field(&self, key: SettingsKey) -> &str {
        match key {
            SettingsKey::GeminiCredential => &self.gemini_credential,
            SettingsKey::GroqCredential => &self.groq_credential,
            SettingsKey::DefaultProvider => &self.default_provider,
        }
    }

    fn field_mut(&mut self, key: SettingsKey) -> &mut String {
        match key {
            SettingsKey::GeminiCredential => &mut self.gemini_credential,
            SettingsKey::GroqCredential => &mut self.groq_credential,
            SettingsKey::DefaultProvider => &mut self.default_provider,
        }
    }
}

/// Settings persisted as a single JSON object, rewritten on every change.
///
/// A missing file yields defaults: no credentials and Gemini as the
/// default provider. Unknown fields in an existing file are dropped on the
/// next write.
#[derive(Debug)]
pub struct JsonFileSettingsStore {
    path: PathBuf,
    document: SettingsDocument,
}

impl JsonFileSettingsStore {
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, SettingsError> {
        let path = path.into();
        let document = match fs::read_to_string(&path) {
            Ok(contents) if contents.trim().is_empty() => SettingsDocument::default(),
            Ok(contents) => serde_json::from_str(&contents)?,
            Err(error) if error.kind() == IoErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "settings file not found, using defaults");
                SettingsDocument::default()
            }
            Err(error) => return Err(error.into()),
        };

        Ok(Self { path, document })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self) -> Result<(), SettingsError> {
        let parent = self.path.parent().filter(|dir| !dir.as_os_str().is_empty());
        if let Some(parent) = parent {
            fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(&self.document)?;
        fs::write(&self.path, contents)?;
        Ok(())
    }
}

impl SettingsStore for JsonFileSettingsStore {
    fn get(&self, key: SettingsKey) -> Option<String> {
        let value = self.document.field(key);
        (!value.is_empty()).then(|| value.to_string())
    }

    fn set(&mut self, key: SettingsKey, value: String) -> Result<(), SettingsError> {
        validate_value(key, &value)?;
        *self.document.field_mut(key) = value;
        self.persist()?;
        tracing::debug!(key = key.as_str(), "settings updated");
        Ok(())
    }
}

fn validate_value(key: SettingsKey, value: &str) -> Result<(), SettingsError> {
    if key == SettingsKey::DefaultProvider {
        value
            .parse::<ProviderId>()
            .map_err(|error| SettingsError::InvalidValue {
                key: key.as_str(),
                message: error.to_string(),
            })?;
    }
    Ok(())
}
