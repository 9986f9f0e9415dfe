use std::fmt;

const REDACTED: &str = "[redacted]";

/// Per-provider API secret.
///
/// The value is trimmed on construction and a blank value counts as absent.
/// `Debug` never prints the secret.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    pub fn new(raw: impl AsRef<str>) -> Self {
        Self(raw.as_ref().trim().to_string())
    }

    pub fn absent() -> Self {
        Self::default()
    }

    pub fn is_present(&self) -> bool {
        !self.0.is_empty()
    }

    /// Returns the secret only when it is present.
    pub fn expose(&self) -> Option<&str> {
        self.is_present().then_some(self.0.as_str())
    }

    /// Replaces each occurrence of the secret in `text` that stands as a
    /// whole token, so a short key never mangles the words around it.
    pub fn redact(&self, text: &str) -> String {
        let Some(secret) = self.expose() else {
            return text.to_string();
        };

        let mut redacted = String::with_capacity(text.len());
        let mut copied = 0;
        for (start, _) in text.match_indices(secret) {
            let end = start + secret.len();
            let before = text[..start].chars().next_back();
            let after = text[end..].chars().next();
            if is_token_edge(before) && is_token_edge(after) {
                redacted.push_str(&text[copied..start]);
                redacted.push_str(REDACTED);
                copied = end;
            }
        }
        redacted.push_str(&text[copied..]);
        redacted
    }

    /// Short mask suitable for showing that a key is configured.
    pub fn masked(&self) -> String {
        match self.expose() {
            Some(secret) if secret.chars().count() > 8 => {
                let tail: String = secret
                    .chars()
                    .rev()
                    .take(4)
                    .collect::<Vec<_>>()
                    .into_iter()
                    .rev()
                    .collect();
                format!("****{tail}")
            }
            Some(_) => "****".to_string(),
            None => "(not set)".to_string(),
        }
    }
}

fn is_token_edge(neighbour: Option<char>) -> bool {
    match neighbour {
        Some(c) => !(c.is_alphanumeric() || c == '-' || c == '_'),
        None => true,
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_present() {
            f.write_str("Credential(<redacted>)")
        } else {
            f.write_str("Credential(<absent>)")
        }
    }
}

impl From<&str> for Credential {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for Credential {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}
