//! Gemini Provider
//!
//! Implementation of the LlmProvider trait for the Gemini
//! `streamGenerateContent` API.

use async_trait::async_trait;
use tokio::sync::mpsc;

use super::provider::{missing_api_key_error, parse_http_error, pump_sse_stream, LlmProvider};
use super::types::{LlmError, LlmResult, Message, MessageRole, ProviderConfig};
use crate::http_client::build_http_client;
use crate::streaming_adapters::GeminiAdapter;
use medchat_core::StreamEvent;

/// Default Gemini API base URL
const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com";

/// Gemini provider
pub struct GeminiProvider {
    config: ProviderConfig,
    client: reqwest::Client,
}

impl GeminiProvider {
    /// Create a new Gemini provider with the given configuration
    pub fn new(config: ProviderConfig) -> Self {
        let client = build_http_client();
        Self { config, client }
    }

    /// Get the streaming endpoint URL for the configured model
    fn stream_url(&self) -> String {
        let base = self
            .config
            .base_url
            .as_deref()
            .unwrap_or(GEMINI_API_BASE)
            .trim_end_matches('/');
        format!(
            "{}/v1beta/models/{}:streamGenerateContent?alt=sse",
            base, self.config.model
        )
    }

    /// Wrap the system instruction so the model can tell it apart from the
    /// user's own words. Gemini has no native system slot.
    fn wrap_system(system: &str, user_content: &str) -> String {
        if user_content.is_empty() {
            format!("[System instructions]\n{}\n[End system instructions]", system)
        } else {
            format!(
                "[System instructions]\n{}\n[End system instructions]\n\n{}",
                system, user_content
            )
        }
    }

    /// Build the streaming request body for the API.
    ///
    /// Gemini only knows `user` and `model` roles, so assistant maps to
    /// `model` and system-role turns map to `user`. The system instruction
    /// is textually prepended to the first user entry; when the conversation
    /// does not start with a user turn, a leading user entry carrying only
    /// the instruction is inserted.
    fn build_request_body(&self, messages: &[Message], system: &str) -> serde_json::Value {
        let mut contents: Vec<serde_json::Value> = Vec::with_capacity(messages.len() + 1);
        let mut system_placed = false;

        for msg in messages {
            let role = match msg.role {
                MessageRole::Assistant => "model",
                MessageRole::User | MessageRole::System => "user",
            };

            let text = if !system_placed && role == "user" {
                system_placed = true;
                Self::wrap_system(system, &msg.content)
            } else {
                msg.content.clone()
            };

            contents.push(serde_json::json!({
                "role": role,
                "parts": [{ "text": text }],
            }));
        }

        if !system_placed {
            contents.insert(
                0,
                serde_json::json!({
                    "role": "user",
                    "parts": [{ "text": Self::wrap_system(system, "") }],
                }),
            );
        }

        serde_json::json!({
            "contents": contents,
            "generationConfig": {
                "maxOutputTokens": self.config.max_tokens,
                "temperature": self.config.temperature,
            },
        })
    }
}

#[async_trait]
impl LlmProvider for GeminiProvider {
    fn name(&self) -> &'static str {
        "gemini"
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
            .ok_or_else(|| missing_api_key_error("gemini"))?;

        let body = self.build_request_body(&messages, system);

        let response = self
            .client
            .post(self.stream_url())
            .header("x-goog-api-key", api_key)
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
            return Err(parse_http_error(status, &body_text, "gemini"));
        }

        let mut adapter = GeminiAdapter::new();
        pump_sse_stream(response, &mut adapter, &tx).await
    }
}
