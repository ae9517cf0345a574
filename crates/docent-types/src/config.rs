//! Configuration types for Docent.
//!
//! `DocentConfig` represents the top-level `docent.toml` that controls
//! corpus location, chunking, retrieval, the LLM provider, and
//! conversation memory. All fields have defaults matching the shipped
//! assistant, so an empty (or missing) config file is fully usable.

use serde::{Deserialize, Serialize};

use crate::llm::ProviderKind;

/// Top-level configuration for the Docent assistant.
///
/// Loaded from `{data_dir}/docent.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DocentConfig {
    #[serde(default)]
    pub assistant: AssistantConfig,
    #[serde(default)]
    pub corpus: CorpusConfig,
    #[serde(default)]
    pub chunking: ChunkingConfig,
    #[serde(default)]
    pub retrieval: RetrievalConfig,
    #[serde(default)]
    pub provider: ProviderConfig,
    #[serde(default)]
    pub memory: MemoryConfig,
}

/// Identity shown in the banner and woven into the answer prompt.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssistantConfig {
    #[serde(default = "default_assistant_name")]
    pub name: String,
    #[serde(default = "default_assistant_description")]
    pub description: String,
}

fn default_assistant_name() -> String {
    "Docent".to_string()
}

fn default_assistant_description() -> String {
    "Answers questions from the organization's handbook and direction documents".to_string()
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            name: default_assistant_name(),
            description: default_assistant_description(),
        }
    }
}

/// Where the handbook corpus lives.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CorpusConfig {
    /// Corpus directory. When unset, `{data_dir}/corpus` is used.
    #[serde(default)]
    pub dir: Option<String>,
}

/// How corpus documents are split into passages.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunkingConfig {
    /// Target chunk size in characters.
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,
    /// Overlap between adjacent chunks in characters.
    #[serde(default = "default_chunk_overlap")]
    pub chunk_overlap: usize,
}

fn default_chunk_size() -> usize {
    500
}

fn default_chunk_overlap() -> usize {
    60
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            chunk_size: default_chunk_size(),
            chunk_overlap: default_chunk_overlap(),
        }
    }
}

/// Retrieval parameters for the MMR retriever.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievalConfig {
    /// Number of passages handed to the LLM per question.
    #[serde(default = "default_top_k")]
    pub top_k: usize,
    /// Number of candidates fetched from the index before MMR re-ranking.
    #[serde(default = "default_fetch_k")]
    pub fetch_k: usize,
    /// MMR relevance/diversity trade-off; 1.0 = pure relevance.
    #[serde(default = "default_mmr_lambda")]
    pub mmr_lambda: f32,
}

fn default_top_k() -> usize {
    8
}

fn default_fetch_k() -> usize {
    18
}

fn default_mmr_lambda() -> f32 {
    0.5
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            top_k: default_top_k(),
            fetch_k: default_fetch_k(),
            mmr_lambda: default_mmr_lambda(),
        }
    }
}

/// LLM provider selection and generation parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    #[serde(default = "default_provider_kind")]
    pub kind: ProviderKind,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_temperature")]
    pub temperature: f64,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    /// Environment variable holding the API key.
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
    /// Override the provider's default base URL.
    #[serde(default)]
    pub base_url: Option<String>,
}

fn default_provider_kind() -> ProviderKind {
    ProviderKind::Gemini
}

fn default_model() -> String {
    "gemini-1.5-flash".to_string()
}

fn default_temperature() -> f64 {
    0.3
}

fn default_max_tokens() -> u32 {
    2048
}

fn default_api_key_env() -> String {
    "GOOGLE_API_KEY".to_string()
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            kind: default_provider_kind(),
            model: default_model(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            api_key_env: default_api_key_env(),
            base_url: None,
        }
    }
}

/// Conversation memory limits.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryConfig {
    /// Estimated-token budget for the recent-message buffer; older
    /// messages beyond it are folded into the running summary.
    #[serde(default = "default_max_token_limit")]
    pub max_token_limit: u32,
}

fn default_max_token_limit() -> u32 {
    2000
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            max_token_limit: default_max_token_limit(),
        }
    }
}

impl DocentConfig {
    /// Validate cross-field constraints.
    ///
    /// Returns a human-readable description of the first violation found.
    pub fn validate(&self) -> Result<(), String> {
        if self.chunking.chunk_overlap >= self.chunking.chunk_size {
            return Err(format!(
                "chunk_overlap ({}) must be smaller than chunk_size ({})",
                self.chunking.chunk_overlap, self.chunking.chunk_size
            ));
        }
        if self.retrieval.top_k == 0 {
            return Err("retrieval.top_k must be at least 1".to_string());
        }
        if self.retrieval.top_k > self.retrieval.fetch_k {
            return Err(format!(
                "retrieval.top_k ({}) must not exceed retrieval.fetch_k ({})",
                self.retrieval.top_k, self.retrieval.fetch_k
            ));
        }
        if !(0.0..=1.0).contains(&self.retrieval.mmr_lambda) {
            return Err(format!(
                "retrieval.mmr_lambda ({}) must be within [0.0, 1.0]",
                self.retrieval.mmr_lambda
            ));
        }
        if !(0.0..=2.0).contains(&self.provider.temperature) {
            return Err(format!(
                "provider.temperature ({}) must be within [0.0, 2.0]",
                self.provider.temperature
            ));
        }
        Ok(())
    }
}
