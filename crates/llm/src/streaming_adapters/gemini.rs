//! Gemini API Adapter
//!
//! Handles the `streamGenerateContent?alt=sse` chunk format: candidates
//! carrying content parts, with an optional top-level error object.

use medchat_core::{AdapterError, StreamAdapter, StreamEvent};
use serde::Deserialize;

/// Internal chunk shape from the Gemini streaming endpoint
#[derive(Debug, Deserialize)]
struct GeminiChunk {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(default)]
    error: Option<ApiError>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<Content>,
    #[serde(rename = "finishReason", default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    message: String,
    #[serde(default)]
    status: Option<String>,
}

/// Adapter for the Gemini streaming chunk format.
///
/// Only parts carrying non-empty text become text events; chunks without
/// text (safety metadata, usage metadata) are ignored.
#[derive(Default)]
pub struct GeminiAdapter;

impl GeminiAdapter {
    pub fn new() -> Self {
        Self
    }
}

impl StreamAdapter for GeminiAdapter {
    fn provider_name(&self) -> &'static str {
        "gemini"
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

        let chunk: GeminiChunk =
            serde_json::from_str(json_str).map_err(|e| AdapterError::ParseError(e.to_string()))?;

        if let Some(error) = chunk.error {
            return Ok(vec![StreamEvent::Error {
                message: error.message,
                code: error.status,
            }]);
        }

        let mut events = vec![];
        for candidate in chunk.candidates {
            if let Some(content) = candidate.content {
                for part in content.parts {
                    if let Some(text) = part.text {
                        if !text.is_empty() {
                            events.push(StreamEvent::TextDelta { content: text });
                        }
                    }
                }
            }
            if let Some(finish_reason) = candidate.finish_reason {
                events.push(StreamEvent::Complete {
                    stop_reason: Some(finish_reason),
                });
            }
        }

        Ok(events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_part() {
        let mut adapter = GeminiAdapter::new();

        let events = adapter
            .adapt(r#"data: {"candidates": [{"content": {"parts": [{"text": "Hello"}], "role": "model"}}]}"#)
            .unwrap();
        assert_eq!(
            events,
            vec![StreamEvent::TextDelta {
                content: "Hello".to_string()
            }]
        );
    }

    #[test]
    fn test_finish_reason_with_trailing_text() {
        let mut adapter = GeminiAdapter::new();

        let events = adapter
            .adapt(r#"data: {"candidates": [{"content": {"parts": [{"text": "bye"}]}, "finishReason": "STOP"}]}"#)
            .unwrap();
        assert_eq!(events.len(), 2);
        assert_eq!(
            events[0],
            StreamEvent::TextDelta {
                content: "bye".to_string()
            }
        );
        assert_eq!(
            events[1],
            StreamEvent::Complete {
                stop_reason: Some("STOP".to_string())
            }
        );
    }

    #[test]
    fn test_empty_text_ignored() {
        let mut adapter = GeminiAdapter::new();

        let events = adapter
            .adapt(r#"data: {"candidates": [{"content": {"parts": [{"text": ""}]}}]}"#)
            .unwrap();
        assert!(events.is_empty());
    }

    #[test]
    fn test_error_object() {
        let mut adapter = GeminiAdapter::new();

        let events = adapter
            .adapt(r#"data: {"error": {"code": 429, "message": "Quota exceeded", "status": "RESOURCE_EXHAUSTED"}}"#)
            .unwrap();
        assert_eq!(events.len(), 1);
        match &events[0] {
            StreamEvent::Error { message, code } => {
                assert_eq!(message, "Quota exceeded");
                assert_eq!(code.as_deref(), Some("RESOURCE_EXHAUSTED"));
            }
            _ => panic!("Expected Error"),
        }
    }

    #[test]
    fn test_non_data_lines_skipped() {
        let mut adapter = GeminiAdapter::new();

        assert!(adapter.adapt("").unwrap().is_empty());
        assert!(adapter.adapt(": heartbeat").unwrap().is_empty());
    }
}
