//! Claude Provider
//!
//! Implementation of the LlmProvider trait for the Claude messages API.

use async_trait::async_trait;
use tokio::sync::mpsc;

use super::provider::{missing_api_key_error, parse_http_error, pump_sse_stream, LlmProvider};
use super::types::{LlmError, LlmResult, Message, MessageRole, ProviderConfig};
use crate::http_client::build_http_client;
use crate::streaming_adapters::ClaudeApiAdapter;
use medchat_core::StreamEvent;

/// Default Claude API endpoint
const ANTHROPIC_API_URL: &str = "https://api.anthropic.com/v1/messages";

/// Current API version
const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Claude provider
pub struct ClaudeProvider {
    config: ProviderConfig,
    client: reqwest::Client,
}

impl ClaudeProvider {
    /// Create a new Claude provider with the given configuration
    pub fn new(config: ProviderConfig) -> Self {
        let client = build_http_client();
        Self { config, client }
    }

    /// Get the API base URL
    fn base_url(&self) -> &str {
        self.config.base_url.as_deref().unwrap_or(ANTHROPIC_API_URL)
    }

    /// Build the streaming request body for the API.
    ///
    /// The system instruction travels in the dedicated top-level `system`
    /// field; the messages list carries only user/assistant turns.
    fn build_request_body(&self, messages: &[Message], system: &str) -> serde_json::Value {
        let claude_messages: Vec<serde_json::Value> = messages
            .iter()
            .filter(|m| m.role != MessageRole::System) // system is separate in Claude
            .map(|m| {
                serde_json::json!({
                    "role": match m.role {
                        MessageRole::User => "user",
                        MessageRole::Assistant => "assistant",
                        MessageRole::System => unreachable!("filtered above"),
                    },
                    "content": m.content,
                })
            })
            .collect();

        serde_json::json!({
            "model": self.config.model,
            "max_tokens": self.config.max_tokens,
            "temperature": self.config.temperature,
            "stream": true,
            "system": system,
            "messages": claude_messages,
        })
    }
}

#[async_trait]
impl LlmProvider for ClaudeProvider {
    fn name(&self) -> &'static str {
        "claude"
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
            .ok_or_else(|| missing_api_key_error("claude"))?;

        let body = self.build_request_body(&messages, system);

        let response = self
            .client
            .post(self.base_url())
            .header("x-api-key", api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .header("content-type", "application/json")
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
            return Err(parse_http_error(status, &body_text, "claude"));
        }

        let mut adapter = ClaudeApiAdapter::new();
        pump_sse_stream(response, &mut adapter, &tx).await
    }
}
