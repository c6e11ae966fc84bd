//! HTTP Client Factory
//!
//! Provides a factory function for building reqwest clients used by the
//! provider implementations. Each provider instance gets its own client so
//! requests stay independent of one another.

use std::time::Duration;

/// Build a `reqwest::Client` for streaming provider calls.
///
/// A connect timeout guards against unreachable endpoints; no overall
/// request timeout is set because streaming responses are long-lived.
pub fn build_http_client() -> reqwest::Client {
    reqwest::Client::builder()
        .connect_timeout(Duration::from_secs(10))
        .build()
        .expect("failed to build reqwest client")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_http_client() {
        let _client = build_http_client();
    }
}
