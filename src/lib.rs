//! Medchat Gateway
//!
//! Streaming chat gateway over multiple LLM providers. An inbound
//! conversation is normalized, routed to one provider adapter, and the
//! adapter's incremental output is relayed to the caller as a plain-text
//! stream.

pub mod config;
pub mod model_router;
pub mod normalize;
pub mod prompt;
pub mod server;
