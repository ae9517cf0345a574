//! Configuration types and per-provider defaults for the
//! OpenAI-compatible client.
//!
//! Each backend that speaks the OpenAI chat completions protocol gets a
//! factory function returning an [`OpenAiCompatConfig`] with the correct
//! base URL and capabilities.

use secrecy::SecretString;

use docent_types::llm::ProviderCapabilities;

/// Configuration for an OpenAI-compatible LLM provider.
///
/// Used to construct an [`super::OpenAiCompatProvider`].
pub struct OpenAiCompatConfig {
    /// Human-readable provider name (e.g., "gemini", "openai").
    pub provider_name: String,
    /// Base URL for the API.
    pub base_url: String,
    /// API key for authentication.
    pub api_key: SecretString,
    /// Model identifier (e.g., "gemini-1.5-flash", "gpt-4o-mini").
    pub model: String,
    /// What this provider supports.
    pub capabilities: ProviderCapabilities,
}

/// Google Gemini default configuration (OpenAI-compatible endpoint).
///
/// Base URL: `https://generativelanguage.googleapis.com/v1beta/openai`
/// Capabilities: streaming; 1M context, 8K output.
pub fn gemini_defaults(api_key: SecretString, model: &str) -> OpenAiCompatConfig {
    OpenAiCompatConfig {
        provider_name: "gemini".into(),
        base_url: "https://generativelanguage.googleapis.com/v1beta/openai".into(),
        api_key,
        model: model.into(),
        capabilities: ProviderCapabilities {
            streaming: true,
            max_context_tokens: 1_000_000,
            max_output_tokens: 8_192,
        },
    }
}

/// OpenAI default configuration.
///
/// Base URL: `https://api.openai.com/v1`
/// Capabilities: streaming; 128K context, 16K output.
pub fn openai_defaults(api_key: SecretString, model: &str) -> OpenAiCompatConfig {
    OpenAiCompatConfig {
        provider_name: "openai".into(),
        base_url: "https://api.openai.com/v1".into(),
        api_key,
        model: model.into(),
        capabilities: ProviderCapabilities {
            streaming: true,
            max_context_tokens: 128_000,
            max_output_tokens: 16_384,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gemini_defaults() {
        let config = gemini_defaults(SecretString::from("key"), "gemini-1.5-flash");
        assert_eq!(config.provider_name, "gemini");
        assert!(config.base_url.contains("generativelanguage.googleapis.com"));
        assert_eq!(config.model, "gemini-1.5-flash");
        assert_eq!(config.capabilities.max_context_tokens, 1_000_000);
    }

    #[test]
    fn test_openai_defaults() {
        let config = openai_defaults(SecretString::from("key"), "gpt-4o-mini");
        assert_eq!(config.provider_name, "openai");
        assert_eq!(config.base_url, "https://api.openai.com/v1");
        assert_eq!(config.capabilities.max_context_tokens, 128_000);
    }
}
