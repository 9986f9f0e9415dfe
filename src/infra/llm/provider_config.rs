use reqwest::blocking::RequestBuilder;

use crate::domain::ProviderId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthStyle {
    /// Credential travels as a URL query parameter with the given name.
    QueryParam(&'static str),
    /// Credential travels as `Authorization: Bearer <credential>`.
    BearerHeader,
}

impl AuthStyle {
    pub(crate) fn apply(self, request: RequestBuilder, credential: &str) -> RequestBuilder {
        match self {
            Self::QueryParam(name) => request.query(&[(name, credential)]),
            Self::BearerHeader => request.bearer_auth(credential),
        }
    }
}

/// Compiled-in wire settings for one provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProviderConfig {
    pub id: ProviderId,
    pub display_name: &'static str,
    pub default_base_url: &'static str,
    pub endpoint_path: &'static str,
    pub auth_style: AuthStyle,
    pub model: &'static str,
    pub response_path: &'static str,
}

pub const GEMINI: ProviderConfig = ProviderConfig {
    id: ProviderId::Gemini,
    display_name: "Gemini",
    default_base_url: "https://generativelanguage.googleapis.com",
    endpoint_path: "/v1beta/models/gemini-1.5-flash:generateContent",
    auth_style: AuthStyle::QueryParam("key"),
    model: "gemini-1.5-flash",
    response_path: "candidates[0].content.parts[0].text",
};

pub const GROQ: ProviderConfig = ProviderConfig {
    id: ProviderId::Groq,
    display_name: "Groq",
    default_base_url: "https://api.groq.com",
    endpoint_path: "/openai/v1/chat/completions",
    auth_style: AuthStyle::BearerHeader,
    model: "llama-3.3-70b-versatile",
    response_path: "choices[0].message.content",
};

impl ProviderConfig {
    pub fn for_provider(id: ProviderId) -> &'static ProviderConfig {
        match id {
            ProviderId::Gemini => &GEMINI,
            ProviderId::Groq => &GROQ,
        }
    }

    pub fn endpoint_url(&self, base_url: &str) -> String {
        format!("{}{}", base_url.trim_end_matches('/'), self.endpoint_path)
    }
}
