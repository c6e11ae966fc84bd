//! LLM Provider Trait
//!
//! Defines the common streaming interface for all LLM providers.

use async_trait::async_trait;
use tokio::sync::mpsc;

use super::types::{LlmError, LlmResult, Message, ProviderConfig};
use medchat_core::{StreamAdapter, StreamEvent};

/// Trait that all LLM providers must implement.
///
/// A provider encodes a normalized conversation plus the system instruction
/// into its own wire shape, opens one streaming call, and emits unified
/// [`StreamEvent`]s through the channel as they arrive.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Returns the provider name for identification.
    fn name(&self) -> &'static str;

    /// Returns the current model being used.
    fn model(&self) -> &str;

    /// Get the configuration for this provider.
    fn config(&self) -> &ProviderConfig;

    /// Stream a completion for the conversation via a channel.
    ///
    /// Failures before the first event (missing credential, rejected request,
    /// connection refusal) are returned as `Err` without sending anything.
    /// Failures after streaming has begun are surfaced as a terminal
    /// [`StreamEvent::Error`] before the error is returned. A closed receiver
    /// means the caller has gone away; the provider stops promptly, closing
    /// the upstream connection.
    async fn stream_chat(
        &self,
        messages: Vec<Message>,
        system: &str,
        tx: mpsc::Sender<StreamEvent>,
    ) -> LlmResult<()>;
}

/// Pump an SSE response body through a stream adapter, forwarding unified
/// events into the channel.
///
/// Returns when the upstream signals completion, the body is exhausted, or
/// the receiver is dropped (caller disconnect). An in-band upstream error is
/// forwarded as a terminal event and then returned; unparseable individual
/// lines are logged and skipped.
pub(crate) async fn pump_sse_stream(
    response: reqwest::Response,
    adapter: &mut dyn StreamAdapter,
    tx: &mpsc::Sender<StreamEvent>,
) -> LlmResult<()> {
    use futures_util::StreamExt;

    let mut stream = response.bytes_stream();
    let mut buffer = String::new();

    while let Some(chunk) = stream.next().await {
        let chunk = match chunk {
            Ok(chunk) => chunk,
            Err(e) => {
                let err = LlmError::NetworkError {
                    message: e.to_string(),
                };
                let _ = tx
                    .send(StreamEvent::Error {
                        message: err.to_string(),
                        code: None,
                    })
                    .await;
                return Err(err);
            }
        };

        buffer.push_str(&String::from_utf8_lossy(&chunk));

        // Process complete lines
        while let Some(line_end) = buffer.find('\n') {
            let line = buffer[..line_end].to_string();
            buffer = buffer[line_end + 1..].to_string();

            if line.trim().is_empty() {
                continue;
            }

            match adapter.adapt(&line) {
                Ok(events) => {
                    for event in events {
                        match event {
                            StreamEvent::Error { message, code } => {
                                let err = LlmError::ServerError {
                                    message: message.clone(),
                                    status: None,
                                };
                                let _ = tx.send(StreamEvent::Error { message, code }).await;
                                return Err(err);
                            }
                            StreamEvent::Complete { .. } => {
                                let _ = tx.send(event).await;
                                return Ok(());
                            }
                            StreamEvent::TextDelta { .. } => {
                                if tx.send(event).await.is_err() {
                                    // Receiver gone: the caller disconnected.
                                    // Dropping the response closes the upstream
                                    // connection.
                                    return Ok(());
                                }
                            }
                        }
                    }
                }
                Err(e) => {
                    tracing::warn!(
                        provider = adapter.provider_name(),
                        error = %e,
                        "skipping unparseable stream line"
                    );
                }
            }
        }
    }

    Ok(())
}

/// Helper function to create an error for a missing API key
pub fn missing_api_key_error(provider: &str) -> LlmError {
    LlmError::AuthenticationFailed {
        message: format!("API key not configured for {}", provider),
    }
}

/// Helper function to map upstream HTTP error status codes
pub fn parse_http_error(status: u16, body: &str, provider: &str) -> LlmError {
    match status {
        401 => LlmError::AuthenticationFailed {
            message: format!("{}: Invalid API key", provider),
        },
        403 => LlmError::AuthenticationFailed {
            message: format!("{}: Access denied", provider),
        },
        404 => LlmError::ModelNotFound {
            model: body.to_string(),
        },
        429 => LlmError::RateLimited {
            message: body.to_string(),
        },
        400 => LlmError::InvalidRequest {
            message: body.to_string(),
        },
        500..=599 => LlmError::ServerError {
            message: body.to_string(),
            status: Some(status),
        },
        _ => LlmError::Other {
            message: format!("HTTP {}: {}", status, body),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_api_key_error() {
        let err = missing_api_key_error("claude");
        match err {
            LlmError::AuthenticationFailed { message } => {
                assert!(message.contains("claude"));
            }
            _ => panic!("Expected AuthenticationFailed"),
        }
    }

    #[test]
    fn test_parse_http_error() {
        let err = parse_http_error(401, "unauthorized", "openai");
        assert!(matches!(err, LlmError::AuthenticationFailed { .. }));

        let err = parse_http_error(429, "rate limited", "openai");
        assert!(matches!(err, LlmError::RateLimited { .. }));

        let err = parse_http_error(500, "internal error", "gemini");
        assert!(matches!(err, LlmError::ServerError { .. }));

        let err = parse_http_error(418, "teapot", "gemini");
        assert!(matches!(err, LlmError::Other { .. }));
    }
}
