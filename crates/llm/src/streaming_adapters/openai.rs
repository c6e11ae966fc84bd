//! OpenAI API Adapter
//!
//! Handles the chat-completions SSE format: structured chunks whose
//! `choices[].delta.content` field carries the text deltas.

use medchat_core::{AdapterError, StreamAdapter, StreamEvent};
use serde::Deserialize;

/// Internal chunk shape from the chat-completions SSE stream
#[derive(Debug, Deserialize)]
struct OpenAIChunk {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    #[serde(default)]
    delta: Option<Delta>,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Delta {
    #[serde(default)]
    content: Option<String>,
}

/// Adapter for the OpenAI chat-completions SSE format.
///
/// Only non-null, non-empty `content` deltas become text events; role
/// announcements, tool deltas, and usage-only chunks are ignored.
#[derive(Default)]
pub struct OpenAIAdapter;

impl OpenAIAdapter {
    pub fn new() -> Self {
        Self
    }
}

impl StreamAdapter for OpenAIAdapter {
    fn provider_name(&self) -> &'static str {
        "openai"
    }

    fn adapt(&mut self, input: &str) -> Result<Vec<StreamEvent>, AdapterError> {
        let trimmed = input.trim();

        // Handle SSE format: "data: {...}"
        let json_str = if let Some(rest) = trimmed.strip_prefix("data: ") {
            rest
        } else if trimmed.starts_with('{') {
            trimmed
        } else {
            return Ok(vec![]);
        };

        if json_str.is_empty() {
            return Ok(vec![]);
        }
        if json_str == "[DONE]" {
            return Ok(vec![StreamEvent::Complete { stop_reason: None }]);
        }

        let chunk: OpenAIChunk =
            serde_json::from_str(json_str).map_err(|e| AdapterError::ParseError(e.to_string()))?;

        let mut events = vec![];
        for choice in chunk.choices {
            if let Some(content) = choice.delta.and_then(|d| d.content) {
                if !content.is_empty() {
                    events.push(StreamEvent::TextDelta { content });
                }
            }
            if let Some(finish_reason) = choice.finish_reason {
                events.push(StreamEvent::Complete {
                    stop_reason: Some(finish_reason),
                });
            }
        }

        Ok(events)
    }
}
