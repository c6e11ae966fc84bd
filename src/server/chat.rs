//! Streaming Chat Endpoint
//!
//! Normalizes the inbound conversation, routes it to one provider adapter,
//! and forwards the adapter's fragment stream to the caller as a single
//! continuously-flushed plain-text body.
//!
//! Setup failures (anything before the first fragment) become a structured
//! JSON error with zero fragments sent. Mid-stream failures terminate the
//! body with an explicit error marker so callers can tell a truncated reply
//! from a completed one.

use std::convert::Infallible;
use std::time::Duration;

use axum::body::Body;
use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use bytes::Bytes;
use futures_util::Stream;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

use medchat_core::StreamEvent;
use medchat_llm::Message;

use super::AppState;
use crate::model_router;
use crate::normalize::normalize_conversation;
use crate::prompt::SYSTEM_PROMPT;

/// Inbound chat request
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    /// Ordered conversation turns
    pub messages: Vec<Message>,
    /// Opaque model selector; unrecognized values fall back to the default
    #[serde(default)]
    pub model: Option<String>,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

const STREAM_CHANNEL_CAPACITY: usize = 32;

/// Terminal marker appended when the upstream fails after output has begun.
fn interruption_marker(message: &str) -> String {
    format!("\n\n[error] stream interrupted: {}\n", message)
}

pub async fn chat(State(state): State<AppState>, Json(request): Json<ChatRequest>) -> Response {
    let conversation = normalize_conversation(request.messages);
    if conversation.is_empty() {
        return error_response(
            StatusCode::BAD_REQUEST,
            "conversation is empty after dropping blank messages",
        );
    }

    let provider = model_router::build(
        model_router::resolve(request.model.as_deref()),
        &state.config,
    );
    tracing::info!(
        provider = provider.name(),
        model = provider.model(),
        turns = conversation.len(),
        "starting completion stream"
    );

    let (tx, mut rx) = mpsc::channel(STREAM_CHANNEL_CAPACITY);
    let task = tokio::spawn(async move {
        provider.stream_chat(conversation, SYSTEM_PROMPT, tx).await
    });

    // Setup gate: nothing reaches the caller until the first event (or the
    // provider's setup error) is known, so setup failures surface as one
    // complete error response rather than a broken stream.
    let first = match rx.recv().await {
        Some(StreamEvent::Error { message, .. }) => {
            tracing::error!(error = %message, "upstream rejected the stream");
            return error_response(StatusCode::INTERNAL_SERVER_ERROR, &message);
        }
        Some(event) => event,
        None => {
            // Channel closed before any event: the provider task ended
            // during setup.
            let message = match task.await {
                Ok(Err(e)) => e.to_string(),
                Ok(Ok(())) => "provider produced no output".to_string(),
                Err(e) => format!("provider task failed: {}", e),
            };
            tracing::error!(error = %message, "stream setup failed");
            return error_response(StatusCode::INTERNAL_SERVER_ERROR, &message);
        }
    };

    let body = Body::from_stream(fragment_stream(first, rx, state.config.stream_delay_ms));
    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "text/plain; charset=utf-8")
        .header(header::CACHE_CONTROL, "no-cache")
        .body(body)
        .unwrap()
}

fn error_response(status: StatusCode, message: &str) -> Response {
    (
        status,
        Json(ErrorBody {
            error: message.to_string(),
        }),
    )
        .into_response()
}

/// Bridge the adapter's event channel into a byte stream for the response
/// body.
///
/// Fragments are forwarded in production order with no buffering beyond the
/// current fragment. A mid-stream error event appends the interruption
/// marker and closes the body; dropping the returned stream drops the
/// receiver, which the provider observes as cancellation.
fn fragment_stream(
    first: StreamEvent,
    mut rx: mpsc::Receiver<StreamEvent>,
    delay_ms: u64,
) -> impl Stream<Item = Result<Bytes, Infallible>> {
    async_stream::stream! {
        let mut next = Some(first);
        loop {
            let event = match next.take() {
                Some(event) => event,
                None => match rx.recv().await {
                    Some(event) => event,
                    None => break,
                },
            };
            match event {
                StreamEvent::TextDelta { content } => {
                    yield Ok(Bytes::from(content));
                    // Optional pacing between fragments to avoid
                    // overwhelming slow consumers.
                    if delay_ms > 0 {
                        tokio::time::sleep(Duration::from_millis(delay_ms)).await;
                    }
                }
                StreamEvent::Error { message, .. } => {
                    yield Ok(Bytes::from(interruption_marker(&message)));
                    break;
                }
                StreamEvent::Complete { .. } => break,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures_util::StreamExt;

    async fn collect(stream: impl Stream<Item = Result<Bytes, Infallible>>) -> String {
        let chunks: Vec<_> = Box::pin(stream).collect().await;
        let mut out = String::new();
        for chunk in chunks {
            out.push_str(std::str::from_utf8(&chunk.unwrap()).unwrap());
        }
        out
    }

    #[tokio::test]
    async fn test_fragment_order_preserved() {
        let (tx, mut rx) = mpsc::channel(8);
        for content in ["A", "B", "C"] {
            tx.send(StreamEvent::TextDelta {
                content: content.to_string(),
            })
            .await
            .unwrap();
        }
        tx.send(StreamEvent::Complete { stop_reason: None })
            .await
            .unwrap();
        drop(tx);

        let first = rx.recv().await.unwrap();
        let body = collect(fragment_stream(first, rx, 0)).await;
        assert_eq!(body, "ABC");
    }

    #[tokio::test]
    async fn test_channel_close_ends_stream() {
        let (tx, mut rx) = mpsc::channel(8);
        tx.send(StreamEvent::TextDelta {
            content: "partial".to_string(),
        })
        .await
        .unwrap();
        drop(tx);

        let first = rx.recv().await.unwrap();
        let body = collect(fragment_stream(first, rx, 0)).await;
        assert_eq!(body, "partial");
    }

    #[tokio::test]
    async fn test_mid_stream_error_appends_marker() {
        let (tx, mut rx) = mpsc::channel(8);
        tx.send(StreamEvent::TextDelta {
            content: "Hello".to_string(),
        })
        .await
        .unwrap();
        tx.send(StreamEvent::Error {
            message: "connection reset".to_string(),
            code: None,
        })
        .await
        .unwrap();
        drop(tx);

        let first = rx.recv().await.unwrap();
        let body = collect(fragment_stream(first, rx, 0)).await;
        assert!(body.starts_with("Hello"));
        assert!(body.ends_with("[error] stream interrupted: connection reset\n"));
    }

    #[tokio::test]
    async fn test_nothing_after_complete() {
        let (tx, mut rx) = mpsc::channel(8);
        tx.send(StreamEvent::TextDelta {
            content: "done".to_string(),
        })
        .await
        .unwrap();
        tx.send(StreamEvent::Complete {
            stop_reason: Some("end_turn".to_string()),
        })
        .await
        .unwrap();
        tx.send(StreamEvent::TextDelta {
            content: "late".to_string(),
        })
        .await
        .unwrap();
        drop(tx);

        let first = rx.recv().await.unwrap();
        let body = collect(fragment_stream(first, rx, 0)).await;
        assert_eq!(body, "done");
    }
}
