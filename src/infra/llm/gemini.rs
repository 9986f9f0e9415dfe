use std::time::Duration;

use reqwest::StatusCode;
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};

use crate::domain::{ConfigError, Credential, ProviderId, RemoteError};

use super::LlmProvider;
use super::env::ClientEnvConfig;
use super::provider_config::GEMINI;
use super::response_parsing::{
    decode_response, diagnostic_excerpt, map_transport_error, missing_path,
};

pub struct GeminiClient {
    api_base_url: String,
    client: Client,
}

impl GeminiClient {
    pub fn new() -> Result<Self, ConfigError> {
        Self::with_config(GEMINI.default_base_url, None)
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        let config = ClientEnvConfig::from_env(ProviderId::Gemini)?;
        let api_base_url = config
            .base_url
            .unwrap_or_else(|| GEMINI.default_base_url.to_string());
        Self::with_config(api_base_url, config.timeout)
    }

    pub fn with_config(
        api_base_url: impl Into<String>,
        timeout: Option<Duration>,
    ) -> Result<Self, ConfigError> {
        let api_base_url = api_base_url.into();
        if api_base_url.trim().is_empty() {
            return Err(ConfigError::invalid(format!(
                "{} API base URL must not be empty",
                GEMINI.display_name
            )));
        }

        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(|err| ConfigError::HttpClient {
            message: format!("{}: {err}", GEMINI.display_name),
        })?;

        Ok(Self {
            api_base_url,
            client,
        })
    }

    fn endpoint_url(&self) -> String {
        GEMINI.endpoint_url(&self.api_base_url)
    }

    fn map_success_response(
        &self,
        response_body: &str,
        credential: &Credential,
    ) -> Result<String, RemoteError> {
        let response: GeminiGenerateResponse =
            decode_response(ProviderId::Gemini, response_body, credential)?;

        response
            .candidates
            .into_iter()
            .next()
            .and_then(|candidate| candidate.content)
            .and_then(|content| content.parts.into_iter().next())
            .and_then(|part| part.text)
            .ok_or_else(|| {
                missing_path(
                    ProviderId::Gemini,
                    GEMINI.response_path,
                    response_body,
                    credential,
                )
            })
    }
}

impl LlmProvider for GeminiClient {
    fn provider_id(&self) -> ProviderId {
        ProviderId::Gemini
    }

    fn generate(&self, prompt: &str, credential: &Credential) -> Result<String, RemoteError> {
        let Some(api_key) = credential.expose() else {
            return Err(RemoteError::MissingCredential {
                provider: ProviderId::Gemini,
            });
        };

        let payload = GeminiGenerateRequest {
            contents: vec![GeminiContentRequest {
                parts: vec![GeminiPartRequest { text: prompt }],
            }],
        };

        tracing::debug!(
            provider = %ProviderId::Gemini,
            model = GEMINI.model,
            prompt_chars = prompt.chars().count(),
            "sending generation request"
        );
        let response = GEMINI
            .auth_style
            .apply(self.client.post(self.endpoint_url()), api_key)
            .header("content-type", "application/json")
            .json(&payload)
            .send()
            .map_err(|err| map_transport_error(ProviderId::Gemini, err, credential))?;

        let status = response.status();
        let response_body = response
            .text()
            .map_err(|err| map_transport_error(ProviderId::Gemini, err, credential))?;

        if status != StatusCode::OK {
            let body = diagnostic_excerpt(&response_body, credential);
            tracing::warn!(
                provider = %ProviderId::Gemini,
                status = status.as_u16(),
                body = %body,
                "generation request rejected"
            );
            return Err(RemoteError::HttpStatus {
                provider: ProviderId::Gemini,
                status: status.as_u16(),
                body,
            });
        }

        self.map_success_response(&response_body, credential)
    }
}

#[derive(Debug, Serialize)]
struct GeminiGenerateRequest<'a> {
    contents: Vec<GeminiContentRequest<'a>>,
}

#[derive(Debug, Serialize)]
struct GeminiContentRequest<'a> {
    parts: Vec<GeminiPartRequest<'a>>,
}

#[derive(Debug, Serialize)]
struct GeminiPartRequest<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct GeminiGenerateResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
}

#[derive(Debug, Deserialize)]
struct GeminiCandidate {
    #[serde(default)]
    content: Option<GeminiContent>,
}

#[derive(Debug, Deserialize)]
struct GeminiContent {
    #[serde(default)]
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Deserialize)]
struct GeminiPart {
    #[serde(default)]
    text: Option<String>,
}
