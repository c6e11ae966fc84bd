//! Claude API Adapter
//!
//! Handles the SSE format from the Claude API with content_block_delta parsing.

use medchat_core::{AdapterError, StreamAdapter, StreamEvent};
use serde::Deserialize;

/// Internal event types from Claude API SSE format
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ClaudeApiEvent {
    MessageStart,
    ContentBlockStart,
    ContentBlockDelta {
        delta: Delta,
    },
    ContentBlockStop,
    MessageDelta {
        delta: MessageDelta,
    },
    MessageStop,
    Ping,
    Error {
        error: ApiError,
    },
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum Delta {
    TextDelta {
        text: String,
    },
    #[serde(other)]
    Other,
}

#[derive(Debug, Deserialize)]
struct MessageDelta {
    #[serde(default)]
    stop_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    message: String,
    #[serde(rename = "type")]
    error_type: Option<String>,
}

/// Adapter for the Claude API SSE format.
///
/// The provider emits text deltas directly; everything that is not a text
/// delta, a terminal signal, or an error is ignored.
#[derive(Default)]
pub struct ClaudeApiAdapter;

impl ClaudeApiAdapter {
    pub fn new() -> Self {
        Self
    }
}

impl StreamAdapter for ClaudeApiAdapter {
    fn provider_name(&self) -> &'static str {
        "claude-api"
    }

    fn adapt(&mut self, input: &str) -> Result<Vec<StreamEvent>, AdapterError> {
        let trimmed = input.trim();

        // Handle SSE format: "data: {...}"
        // SSE streams may include event:, id:, retry:, and comment lines.
        let json_str = if let Some(rest) = trimmed.strip_prefix("data: ") {
            rest
        } else if trimmed.starts_with('{') {
            // Raw JSON without SSE prefix
            trimmed
        } else {
            // Skip non-data SSE lines (event:, id:, retry:, comments, empty)
            return Ok(vec![]);
        };

        if json_str.is_empty() || json_str == "[DONE]" {
            return Ok(vec![]);
        }

        let event: ClaudeApiEvent =
            serde_json::from_str(json_str).map_err(|e| AdapterError::ParseError(e.to_string()))?;

        let events = match event {
            ClaudeApiEvent::ContentBlockDelta { delta } => match delta {
                Delta::TextDelta { text } => {
                    vec![StreamEvent::TextDelta { content: text }]
                }
                Delta::Other => vec![],
            },
            ClaudeApiEvent::MessageDelta { delta } => {
                if delta.stop_reason.is_some() {
                    vec![StreamEvent::Complete {
                        stop_reason: delta.stop_reason,
                    }]
                } else {
                    vec![]
                }
            }
            ClaudeApiEvent::MessageStop => {
                vec![StreamEvent::Complete { stop_reason: None }]
            }
            ClaudeApiEvent::Error { error } => {
                vec![StreamEvent::Error {
                    message: error.message,
                    code: error.error_type,
                }]
            }
            ClaudeApiEvent::MessageStart
            | ClaudeApiEvent::ContentBlockStart
            | ClaudeApiEvent::ContentBlockStop
            | ClaudeApiEvent::Ping
            | ClaudeApiEvent::Unknown => vec![],
        };

        Ok(events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sse_format_parsing() {
        let mut adapter = ClaudeApiAdapter::new();

        let events = adapter.adapt(r#"data: {"type": "content_block_delta", "index": 0, "delta": {"type": "text_delta", "text": "Hello"}}"#).unwrap();
        assert_eq!(events.len(), 1);
        match &events[0] {
            StreamEvent::TextDelta { content } => {
                assert_eq!(content, "Hello");
            }
            _ => panic!("Expected TextDelta"),
        }
    }

    #[test]
    fn test_message_stop() {
        let mut adapter = ClaudeApiAdapter::new();

        let events = adapter.adapt(r#"data: {"type": "message_stop"}"#).unwrap();
        assert_eq!(events.len(), 1);
        match &events[0] {
            StreamEvent::Complete { .. } => {}
            _ => panic!("Expected Complete"),
        }
    }

    #[test]
    fn test_stop_reason_from_message_delta() {
        let mut adapter = ClaudeApiAdapter::new();

        let events = adapter
            .adapt(r#"data: {"type": "message_delta", "delta": {"stop_reason": "end_turn"}}"#)
            .unwrap();
        assert_eq!(
            events,
            vec![StreamEvent::Complete {
                stop_reason: Some("end_turn".to_string())
            }]
        );
    }

    #[test]
    fn test_error_event() {
        let mut adapter = ClaudeApiAdapter::new();

        let events = adapter
            .adapt(r#"data: {"type": "error", "error": {"type": "overloaded_error", "message": "Overloaded"}}"#)
            .unwrap();
        assert_eq!(events.len(), 1);
        match &events[0] {
            StreamEvent::Error { message, code } => {
                assert_eq!(message, "Overloaded");
                assert_eq!(code.as_deref(), Some("overloaded_error"));
            }
            _ => panic!("Expected Error"),
        }
    }

    #[test]
    fn test_ignored_events() {
        let mut adapter = ClaudeApiAdapter::new();

        assert!(adapter.adapt("").unwrap().is_empty());
        assert!(adapter.adapt("data: [DONE]").unwrap().is_empty());
        assert!(adapter.adapt("event: content_block_delta").unwrap().is_empty());
        assert!(adapter
            .adapt(r#"data: {"type": "ping"}"#)
            .unwrap()
            .is_empty());
        assert!(adapter
            .adapt(r#"data: {"type": "content_block_start", "index": 0, "content_block": {"type": "text", "text": ""}}"#)
            .unwrap()
            .is_empty());
    }
}
