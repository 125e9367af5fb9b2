//! HttpInferenceClient -- concrete [`InferenceClient`] for the model backend.
//!
//! Sends the assembled context to `POST {base_url}/generate` and decodes
//! the single-reply JSON body. The API key is wrapped in
//! [`secrecy::SecretString`] and only exposed while building the
//! Authorization header; it never appears in logs or `Debug` output.

use std::time::{Duration, Instant};

use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, info};

use parley_core::llm::client::InferenceClient;
use parley_types::config::InferenceConfig;
use parley_types::error::InferenceError;
use parley_types::llm::{GenerateReply, GenerateRequest};

/// HTTP client for the inference backend.
///
/// Every request is bounded by the configured timeout; transport errors
/// and non-2xx statuses surface as [`InferenceError::Unavailable`], an
/// undecodable body as [`InferenceError::Malformed`].
pub struct HttpInferenceClient {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<SecretString>,
    model: String,
    max_tokens: u32,
}

impl HttpInferenceClient {
    /// Build a client from the inference section of the service config.
    pub fn new(config: &InferenceConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .expect("failed to create reqwest client");

        Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            max_tokens: config.max_tokens,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

// HttpInferenceClient intentionally does NOT derive Debug; the
// SecretString field keeps the key out of output either way, but omitting
// Debug avoids printing internal state at all.

impl InferenceClient for HttpInferenceClient {
    fn name(&self) -> &str {
        "http"
    }

    async fn generate(
        &self,
        mut request: GenerateRequest,
    ) -> Result<GenerateReply, InferenceError> {
        let started = Instant::now();

        // Fill in configured defaults when the caller left the hints unset.
        if request.model.is_none() {
            request.model = Some(self.model.clone());
        }
        if request.max_tokens.is_none() {
            request.max_tokens = Some(self.max_tokens);
        }

        let url = self.url("/generate");
        debug!(%url, turns = request.messages.len(), "sending inference request");

        let mut builder = self.client.post(&url).json(&request);
        if let Some(key) = &self.api_key {
            builder = builder.bearer_auth(key.expose_secret());
        }

        let response = builder
            .send()
            .await
            .map_err(|e| InferenceError::Unavailable(format!("request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(InferenceError::Unavailable(format!(
                "backend returned {status}"
            )));
        }

        let reply: GenerateReply = response
            .json()
            .await
            .map_err(|e| InferenceError::Malformed(format!("failed to parse reply: {e}")))?;

        info!(
            elapsed_ms = started.elapsed().as_millis() as u64,
            total_tokens = reply.usage.total_tokens,
            "inference request completed"
        );

        Ok(reply)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parley_types::llm::{MessageRole, Turn};

    fn config(base_url: &str) -> InferenceConfig {
        InferenceConfig {
            base_url: base_url.to_string(),
            ..InferenceConfig::default()
        }
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let client = HttpInferenceClient::new(&config("http://models.internal/"));
        assert_eq!(client.url("/generate"), "http://models.internal/generate");
    }

    #[tokio::test]
    async fn test_unreachable_backend_is_unavailable() {
        // Nothing listens on the discard port; the connection is refused
        // immediately rather than timing out.
        let client = HttpInferenceClient::new(&config("http://127.0.0.1:9"));

        let result = client
            .generate(GenerateRequest {
                messages: vec![Turn::new(MessageRole::User, "hello")],
                model: None,
                max_tokens: None,
            })
            .await;

        assert!(matches!(result, Err(InferenceError::Unavailable(_))));
    }
}
