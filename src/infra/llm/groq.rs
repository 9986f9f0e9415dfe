use std::time::Duration;

use reqwest::StatusCode;
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};

use crate::domain::{ConfigError, Credential, ProviderId, RemoteError};

use super::LlmProvider;
use super::env::ClientEnvConfig;
use super::provider_config::GROQ;
use super::response_parsing::{
    decode_response, diagnostic_excerpt, map_transport_error, missing_path,
};

pub struct GroqClient {
    api_base_url: String,
    client: Client,
}

impl GroqClient {
    pub fn new() -> Result<Self, ConfigError> {
        Self::with_config(GROQ.default_base_url, None)
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        let config = ClientEnvConfig::from_env(ProviderId::Groq)?;
        let api_base_url = config
            .base_url
            .unwrap_or_else(|| GROQ.default_base_url.to_string());
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
                GROQ.display_name
            )));
        }

        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(|err| ConfigError::HttpClient {
            message: format!("{}: {err}", GROQ.display_name),
        })?;

        Ok(Self {
            api_base_url,
            client,
        })
    }

    fn endpoint_url(&self) -> String {
        GROQ.endpoint_url(&self.api_base_url)
    }

    fn build_request_payload<'a>(&self, prompt: &'a str) -> GroqChatCompletionsRequest<'a> {
        GroqChatCompletionsRequest {
            model: GROQ.model,
            messages: vec![GroqChatMessageRequest {
                role: "user",
                content: prompt,
            }],
        }
    }

    fn map_success_response(
        &self,
        response_body: &str,
        credential: &Credential,
    ) -> Result<String, RemoteError> {
        let response: GroqChatCompletionsResponse =
            decode_response(ProviderId::Groq, response_body, credential)?;

        response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message)
            .and_then(|message| message.content)
            .ok_or_else(|| {
                missing_path(
                    ProviderId::Groq,
                    GROQ.response_path,
                    response_body,
                    credential,
                )
            })
    }
}

impl LlmProvider for GroqClient {
    fn provider_id(&self) -> ProviderId {
        ProviderId::Groq
    }

    fn generate(&self, prompt: &str, credential: &Credential) -> Result<String, RemoteError> {
        let Some(api_key) = credential.expose() else {
            return Err(RemoteError::MissingCredential {
                provider: ProviderId::Groq,
            });
        };
        let payload = self.build_request_payload(prompt);

        tracing::debug!(
            provider = %ProviderId::Groq,
            model = GROQ.model,
            prompt_chars = prompt.chars().count(),
            "sending generation request"
        );
        let response = GROQ
            .auth_style
            .apply(self.client.post(self.endpoint_url()), api_key)
            .header("content-type", "application/json")
            .json(&payload)
            .send()
            .map_err(|err| map_transport_error(ProviderId::Groq, err, credential))?;

        let status = response.status();
        let response_body = response
            .text()
            .map_err(|err| map_transport_error(ProviderId::Groq, err, credential))?;

        if status != StatusCode::OK {
            // Groq error payloads vary by failure, so the raw body is kept for diagnosis.
            let body = diagnostic_excerpt(&response_body, credential);
            tracing::warn!(
                provider = %ProviderId::Groq,
                status = status.as_u16(),
                body = %body,
                "generation request rejected"
            );
            return Err(RemoteError::HttpStatus {
                provider: ProviderId::Groq,
                status: status.as_u16(),
                body,
            });
        }

        self.map_success_response(&response_body, credential)
    }
}

#[derive(Debug, Serialize)]
struct GroqChatCompletionsRequest<'a> {
    model: &'static str,
    messages: Vec<GroqChatMessageRequest<'a>>,
}

#[derive(Debug, Serialize)]
struct GroqChatMessageRequest<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct GroqChatCompletionsResponse {
    #[serde(default)]
    choices: Vec<GroqChoice>,
}

#[derive(Debug, Deserialize)]
struct GroqChoice {
    #[serde(default)]
    message: Option<GroqChoiceMessage>,
}

#[derive(Debug, Deserialize)]
struct GroqChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}
