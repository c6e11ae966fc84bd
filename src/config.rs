//! Gateway Configuration
//!
//! Environment-driven configuration, loaded once at startup and shared
//! read-only by all requests. Each provider credential is independently
//! optional; a provider with no key fails deterministically at first use.

use medchat_llm::{ProviderConfig, ProviderType};

/// Process-wide gateway configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Bind address
    pub host: String,
    /// Bind port
    pub port: u16,
    /// Claude API key
    pub anthropic_api_key: Option<String>,
    /// OpenAI API key
    pub openai_api_key: Option<String>,
    /// Gemini API key
    pub gemini_api_key: Option<String>,
    /// Model served by the Claude adapter
    pub claude_model: String,
    /// Model served by the OpenAI adapter
    pub openai_model: String,
    /// Model served by the Gemini adapter
    pub gemini_model: String,
    /// Completion token budget passed to every provider
    pub max_tokens: u32,
    /// Pacing delay between streamed fragments (0 disables)
    pub stream_delay_ms: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            anthropic_api_key: None,
            openai_api_key: None,
            gemini_api_key: None,
            claude_model: "claude-3-5-sonnet-20240620".to_string(),
            openai_model: "gpt-4o".to_string(),
            gemini_model: "gemini-1.5-flash".to_string(),
            max_tokens: 2000,
            stream_delay_ms: 10,
        }
    }
}

fn env_string(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn env_parsed<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

impl AppConfig {
    /// Load configuration from the environment, falling back to defaults.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            host: env_string("HOST").unwrap_or(defaults.host),
            port: env_parsed("PORT", defaults.port),
            anthropic_api_key: env_string("ANTHROPIC_API_KEY"),
            openai_api_key: env_string("OPENAI_API_KEY"),
            gemini_api_key: env_string("GEMINI_API_KEY"),
            claude_model: env_string("CLAUDE_MODEL").unwrap_or(defaults.claude_model),
            openai_model: env_string("OPENAI_MODEL").unwrap_or(defaults.openai_model),
            gemini_model: env_string("GEMINI_MODEL").unwrap_or(defaults.gemini_model),
            max_tokens: env_parsed("LLM_MAX_TOKENS", defaults.max_tokens),
            stream_delay_ms: env_parsed("STREAM_DELAY_MS", defaults.stream_delay_ms),
        }
    }

    /// Build the per-provider configuration for one backend.
    pub fn provider_config(&self, provider: ProviderType) -> ProviderConfig {
        let (api_key, model) = match provider {
            ProviderType::Claude => (self.anthropic_api_key.clone(), self.claude_model.clone()),
            ProviderType::OpenAI => (self.openai_api_key.clone(), self.openai_model.clone()),
            ProviderType::Gemini => (self.gemini_api_key.clone(), self.gemini_model.clone()),
        };
        ProviderConfig {
            provider,
            api_key,
            model,
            max_tokens: self.max_tokens,
            ..Default::default()
        }
    }
}
