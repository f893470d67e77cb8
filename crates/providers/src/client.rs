//! In-band completion client.
//!
//! Unlike the memory stores, this boundary never raises: a failed call
//! becomes a reply starting with [`ERROR_MARKER`], so logging and evaluation
//! downstream always receive text.

use memtier_core::message::Message;
use memtier_core::provider::{Provider, ProviderRequest};
use std::sync::Arc;
use tracing::{debug, warn};

/// Prefix of every in-band failure reply.
pub const ERROR_MARKER: &str = "Error: ";

/// Whether `reply` is an in-band failure produced by [`LlmClient::generate`].
pub fn is_error_reply(reply: &str) -> bool {
    reply.starts_with(ERROR_MARKER)
}

pub struct LlmClient {
    provider: Arc<dyn Provider>,
    model: String,
    temperature: f32,
    max_tokens: Option<u32>,
}

impl LlmClient {
    pub fn new(provider: Arc<dyn Provider>, model: impl Into<String>) -> Self {
        Self {
            provider,
            model: model.into(),
            temperature: 0.7,
            max_tokens: None,
        }
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: Option<u32>) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    /// Send `messages` and return the reply text, or `"Error: …"` on failure.
    pub async fn generate(&self, messages: &[Message]) -> String {
        let request = ProviderRequest {
            model: self.model.clone(),
            messages: messages.to_vec(),
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        };

        match self.provider.complete(request).await {
            Ok(response) => {
                debug!(
                    provider = self.provider.name(),
                    model = %response.model,
                    chars = response.message.content.len(),
                    "Completion received"
                );
                response.message.content
            }
            Err(e) => {
                warn!(provider = self.provider.name(), error = %e, "Completion failed");
                format!("{ERROR_MARKER}{e}")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use memtier_core::error::ProviderError;
    use memtier_core::provider::ProviderResponse;
    use std::sync::Mutex;

    /// Echoes the message count and records the last request.
    struct RecordingProvider {
        last: Mutex<Option<ProviderRequest>>,
    }

    #[async_trait]
    impl Provider for RecordingProvider {
        fn name(&self) -> &str {
            "recording"
        }

        async fn complete(&self, request: ProviderRequest) -> Result<ProviderResponse, ProviderError> {
            let reply = format!("{} messages", request.messages.len());
            let model = request.model.clone();
            *self.last.lock().unwrap() = Some(request);
            Ok(ProviderResponse {
                message: Message::assistant(reply),
                usage: None,
                model,
            })
        }
    }

    struct DownProvider;

    #[async_trait]
    impl Provider for DownProvider {
        fn name(&self) -> &str {
            "down"
        }

        async fn complete(&self, _request: ProviderRequest) -> Result<ProviderResponse, ProviderError> {
            Err(ProviderError::Network("connection refused".into()))
        }
    }

    #[tokio::test]
    async fn returns_reply_content() {
        let provider = Arc::new(RecordingProvider {
            last: Mutex::new(None),
        });
        let client = LlmClient::new(provider.clone(), "test-model")
            .with_temperature(0.2)
            .with_max_tokens(Some(64));

        let reply = client
            .generate(&[Message::system("s"), Message::user("hi")])
            .await;
        assert_eq!(reply, "2 messages");
        assert!(!is_error_reply(&reply));

        let last = provider.last.lock().unwrap().clone().unwrap();
        assert_eq!(last.model, "test-model");
        assert_eq!(last.max_tokens, Some(64));
        assert!((last.temperature - 0.2).abs() < f32::EPSILON);
    }

    #[tokio::test]
    async fn failures_are_reported_in_band() {
        let client = LlmClient::new(Arc::new(DownProvider), "m");
        let reply = client.generate(&[Message::user("hi")]).await;
        assert!(is_error_reply(&reply));
        assert!(reply.contains("connection refused"));
    }
}
