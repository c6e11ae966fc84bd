//! Provider Router
//!
//! Maps the caller-supplied model selector to exactly one provider adapter.
//! Resolution is pure; no network I/O happens here.

use medchat_llm::{ClaudeProvider, GeminiProvider, LlmProvider, OpenAIProvider, ProviderType};

use crate::config::AppConfig;

/// Resolve a model selector to a provider type, case-insensitively.
///
/// Unrecognized selectors — including absent and empty ones — fall back to
/// Claude rather than failing the request; a non-empty unknown selector is
/// logged so caller typos stay observable.
pub fn resolve(selector: Option<&str>) -> ProviderType {
    let selector = selector.unwrap_or("").trim();
    match selector.to_ascii_lowercase().as_str() {
        "claude" | "anthropic" => ProviderType::Claude,
        "gpt" | "openai" => ProviderType::OpenAI,
        "gemini" | "google" => ProviderType::Gemini,
        "" => ProviderType::Claude,
        other => {
            tracing::warn!(selector = other, "unknown model selector, using claude");
            ProviderType::Claude
        }
    }
}

/// Construct the provider adapter for the resolved type.
///
/// Providers are built per request so no client state is shared across
/// requests.
pub fn build(provider: ProviderType, config: &AppConfig) -> Box<dyn LlmProvider> {
    let provider_config = config.provider_config(provider);
    match provider {
        ProviderType::Claude => Box::new(ClaudeProvider::new(provider_config)),
        ProviderType::OpenAI => Box::new(OpenAIProvider::new(provider_config)),
        ProviderType::Gemini => Box::new(GeminiProvider::new(provider_config)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_selectors() {
        assert_eq!(resolve(Some("claude")), ProviderType::Claude);
        assert_eq!(resolve(Some("anthropic")), ProviderType::Claude);
        assert_eq!(resolve(Some("gpt")), ProviderType::OpenAI);
        assert_eq!(resolve(Some("openai")), ProviderType::OpenAI);
        assert_eq!(resolve(Some("gemini")), ProviderType::Gemini);
        assert_eq!(resolve(Some("google")), ProviderType::Gemini);
    }

    #[test]
    fn test_case_insensitive() {
        assert_eq!(resolve(Some("Claude")), ProviderType::Claude);
        assert_eq!(resolve(Some("GPT")), ProviderType::OpenAI);
        assert_eq!(resolve(Some("GeMiNi")), ProviderType::Gemini);
    }

    #[test]
    fn test_fallback() {
        assert_eq!(resolve(None), ProviderType::Claude);
        assert_eq!(resolve(Some("")), ProviderType::Claude);
        assert_eq!(resolve(Some("   ")), ProviderType::Claude);
        assert_eq!(resolve(Some("llama-7b")), ProviderType::Claude);
        assert_eq!(resolve(Some("gpt!")), ProviderType::Claude);
    }

    #[test]
    fn test_build_matches_resolution() {
        let config = AppConfig::default();
        assert_eq!(build(ProviderType::Claude, &config).name(), "claude");
        assert_eq!(build(ProviderType::OpenAI, &config).name(), "openai");
        assert_eq!(build(ProviderType::Gemini, &config).name(), "gemini");
    }
}
