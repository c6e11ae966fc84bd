//! OpenAI Provider
//!
//! Implementation of the LlmProvider trait for the chat-completions API.

use async_trait::async_trait;
use tokio::sync::mpsc;

use super::provider::{missing_api_key_error, parse_http_error, pump_sse_stream, LlmProvider};
use super::types::{LlmError, LlmResult, Message, MessageRole, ProviderConfig};
use crate::http_client::build_http_client;
use crate::streaming_adapters::OpenAIAdapter;
use medchat_core::StreamEvent;

/// Default OpenAI API endpoint
const OPENAI_API_URL: &str = "https://api.openai.com/v1/chat/completions";

/// OpenAI provider
pub struct OpenAIProvider {
    config: ProviderConfig,
    client: reqwest::Client,
}

impl OpenAIProvider {
    /// Create a new OpenAI provider with the given configuration
    pub fn new(config: ProviderConfig) -> Self {
        let client = build_http_client();
        Self { config, client }
    }

    /// Get the API base URL
    fn base_url(&self) -> &str {
        self.config.base_url.as_deref().unwrap_or(OPENAI_API_URL)
    }

    /// Build the streaming request body for the API.
    ///
    /// The system instruction is injected as the first message with
    /// `role: "system"`; conversation roles map natively.
    fn build_request_body(&self, messages: &[Message], system: &str) -> serde_json::Value {
        let mut openai_messages: Vec<serde_json::Value> = Vec::with_capacity(messages.len() + 1);

        openai_messages.push(serde_json::json!({
            "role": "system",
            "content": system,
        }));

        for msg in messages {
            let role = match msg.role {
                MessageRole::User => "user",
                MessageRole::Assistant => "assistant",
                MessageRole::System => "system",
            };
            openai_messages.push(serde_json::json!({
                "role": role,
                "content": msg.content,
            }));
        }

        serde_json::json!({
            "model": self.config.model,
            "max_tokens": self.config.max_tokens,
            "temperature": self.config.temperature,
            "stream": true,
            "messages": openai_messages,
        })
    }
}

#[async_trait]
impl LlmProvider for OpenAIProvider {
    fn name(&self) -> &'static str {
        "openai"
    }

    fn model(&self) -> &str {
        &self.config.model
    }

    fn config(&self) -> &ProviderConfig {
        &self.config
    }

    async fn stream_chat(
        &self,
        messages: Vec<Message>,
        system: &str,
        tx: mpsc::Sender<StreamEvent>,
    ) -> LlmResult<()> {
        let api_key = self
            .config
            .api_key
            .as_ref()
            .ok_or_else(|| missing_api_key_error("openai"))?;

        let body = self.build_request_body(&messages, system);

        let response = self
            .client
            .post(self.base_url())
            .header("Authorization", format!("Bearer {}", api_key))
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| LlmError::NetworkError {
                message: e.to_string(),
            })?;

        let status = response.status().as_u16();
        if status != 200 {
            let body_text = response.text().await.map_err(|e| LlmError::NetworkError {
                message: e.to_string(),
            })?;
            return Err(parse_http_error(status, &body_text, "openai"));
        }

        let mut adapter = OpenAIAdapter::new();
        pump_sse_stream(response, &mut adapter, &tx).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ProviderType;

    fn test_config() -> ProviderConfig {
        ProviderConfig {
            provider: ProviderType::OpenAI,
            api_key: Some("sk-test".to_string()),
            model: "gpt-4o".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_provider_creation() {
        let provider = OpenAIProvider::new(test_config());
        assert_eq!(provider.name(), "openai");
        assert_eq!(provider.model(), "gpt-4o");
    }

    #[test]
    fn test_system_prepended_as_first_message() {
        let provider = OpenAIProvider::new(test_config());
        let body = provider.build_request_body(&[Message::user("Hello")], "be helpful");

        let sent = body["messages"].as_array().unwrap();
        assert_eq!(sent.len(), 2);
        assert_eq!(sent[0]["role"], "system");
        assert_eq!(sent[0]["content"], "be helpful");
        assert_eq!(sent[1]["role"], "user");
        assert_eq!(sent[1]["content"], "Hello");
    }

    #[test]
    fn test_native_role_mapping() {
        let provider = OpenAIProvider::new(test_config());
        let messages = vec![
            Message::user("Hi"),
            Message::assistant("Hello!"),
            Message::system("extra instruction"),
        ];
        let body = provider.build_request_body(&messages, "sys");

        let sent = body["messages"].as_array().unwrap();
        assert_eq!(sent.len(), 4);
        assert_eq!(sent[1]["role"], "user");
        assert_eq!(sent[2]["role"], "assistant");
        assert_eq!(sent[3]["role"], "system");
    }

    #[tokio::test]
    async fn test_missing_api_key_is_setup_failure() {
        let provider = OpenAIProvider::new(ProviderConfig {
            api_key: None,
            ..test_config()
        });
        let (tx, mut rx) = mpsc::channel(4);

        let result = provider.stream_chat(vec![Message::user("Hi")], "sys", tx).await;
        assert!(matches!(
            result,
            Err(LlmError::AuthenticationFailed { .. })
        ));
        assert!(rx.recv().await.is_none());
    }
}
