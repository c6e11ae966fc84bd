//! Medchat Core
//!
//! Provider-agnostic streaming vocabulary shared by the LLM crate and the
//! gateway crate: unified stream events and the stream adapter trait.

pub mod streaming;

pub use streaming::{AdapterError, StreamAdapter, StreamEvent};
