//! StaticInferenceClient -- canned-reply [`InferenceClient`] with no I/O.
//!
//! Lets the service run end-to-end without a model backend: local
//! development, demos, and tests.

use parley_core::llm::client::InferenceClient;
use parley_types::error::InferenceError;
use parley_types::llm::{GenerateReply, GenerateRequest, MessageRole, TokenUsage, Turn};

/// Inference client that always answers with the same text.
pub struct StaticInferenceClient {
    reply: String,
}

impl StaticInferenceClient {
    pub fn new(reply: impl Into<String>) -> Self {
        Self {
            reply: reply.into(),
        }
    }
}

impl Default for StaticInferenceClient {
    fn default() -> Self {
        Self::new("This is a canned reply from the static inference client.")
    }
}

impl InferenceClient for StaticInferenceClient {
    fn name(&self) -> &str {
        "static"
    }

    async fn generate(&self, request: GenerateRequest) -> Result<GenerateReply, InferenceError> {
        if request.messages.is_empty() {
            return Err(InferenceError::InvalidRequest(
                "context must contain at least one turn".to_string(),
            ));
        }

        Ok(GenerateReply {
            message: Turn::new(MessageRole::Assistant, self.reply.clone()),
            usage: TokenUsage::default(),
            model: "static".to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_replies_with_configured_text() {
        let client = StaticInferenceClient::new("pong");
        let reply = client
            .generate(GenerateRequest {
                messages: vec![Turn::new(MessageRole::User, "ping")],
                model: None,
                max_tokens: None,
            })
            .await
            .unwrap();

        assert_eq!(reply.message.role, MessageRole::Assistant);
        assert_eq!(reply.message.content, "pong");
    }

    #[tokio::test]
    async fn test_empty_context_is_invalid() {
        let client = StaticInferenceClient::default();
        let result = client
            .generate(GenerateRequest {
                messages: vec![],
                model: None,
                max_tokens: None,
            })
            .await;

        assert!(matches!(result, Err(InferenceError::InvalidRequest(_))));
    }
}
