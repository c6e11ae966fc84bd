//! Medchat LLM
//!
//! Provides a unified streaming interface over multiple LLM providers:
//! - Claude (messages API)
//! - OpenAI (chat completions)
//! - Gemini (streamGenerateContent)
//!
//! Also includes provider-specific streaming adapters and the HTTP client
//! factory.

pub mod anthropic;
pub mod gemini;
pub mod http_client;
pub mod openai;
pub mod provider;
pub mod streaming_adapters;
pub mod types;

// Re-export main types
pub use anthropic::ClaudeProvider;
pub use gemini::GeminiProvider;
pub use http_client::build_http_client;
pub use openai::OpenAIProvider;
pub use provider::LlmProvider;
pub use types::*;

// Re-export streaming adapters
pub use streaming_adapters::{ClaudeApiAdapter, GeminiAdapter, OpenAIAdapter};
