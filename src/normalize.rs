//! Message Normalizer
//!
//! Pure filtering pass applied to the raw conversation before any provider
//! adapter sees it.

use medchat_llm::{Message, MessageRole};

/// Drop messages with empty content, except a trailing empty assistant
/// message.
///
/// Empty messages elsewhere are accidental and some providers reject them
/// outright; an empty trailing assistant message is a valid "assistant is
/// about to speak" placeholder and is retained. Relative order of retained
/// messages is preserved. No role remapping or truncation happens here —
/// that is each adapter's job.
pub fn normalize_conversation(messages: Vec<Message>) -> Vec<Message> {
    let last_index = messages.len().wrapping_sub(1);
    messages
        .into_iter()
        .enumerate()
        .filter(|(i, msg)| {
            !msg.content.is_empty() || (*i == last_index && msg.role == MessageRole::Assistant)
        })
        .map(|(_, msg)| msg)
        .collect()
}
