use crate::domain::{Credential, ProviderId, RemoteError};

const MAX_ERROR_MESSAGE_LEN: usize = 256;

pub(crate) fn truncate_message(body: &str) -> String {
    let compact = body.trim().replace('\n', " ");
    compact.chars().take(MAX_ERROR_MESSAGE_LEN).collect()
}

/// Builds the diagnostic excerpt kept with an error, minus any trace of the credential.
pub(crate) fn diagnostic_excerpt(body: &str, credential: &Credential) -> String {
    truncate_message(&credential.redact(body))
}

/// Decodes a 200 body into the provider's typed response.
pub(crate) fn decode_response<T>(
    provider: ProviderId,
    body: &str,
    credential: &Credential,
) -> Result<T, RemoteError>
where
    T: serde::de::DeserializeOwned,
{
    serde_json::from_str(body).map_err(|err| {
        RemoteError::malformed(
            provider,
            format!(
                "response decode failed: {err}; body: {}",
                diagnostic_excerpt(body, credential)
            ),
        )
    })
}

pub(crate) fn missing_path(
    provider: ProviderId,
    path: &str,
    body: &str,
    credential: &Credential,
) -> RemoteError {
    RemoteError::malformed(
        provider,
        format!(
            "response did not include {path}; body: {}",
            diagnostic_excerpt(body, credential)
        ),
    )
}

pub(crate) fn map_transport_error(
    provider: ProviderId,
    error: reqwest::Error,
    credential: &Credential,
) -> RemoteError {
    let kind = if error.is_timeout() {
        "request timed out"
    } else if error.is_connect() {
        "connection failed"
    } else {
        "request failed"
    };
    // The request URL may carry the credential as a query parameter.
    let message = credential.redact(&error.without_url().to_string());
    RemoteError::transport(provider, format!("{kind}: {message}"))
}
