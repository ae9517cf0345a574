//! Conversation memory for Docent.
//!
//! `SummaryBufferMemory` keeps a buffer of recent messages plus a running
//! summary of everything older. `HistorySummarizer` issues the LLM call
//! that folds drained messages into the summary.

pub mod buffer;
pub mod summarizer;

pub use buffer::SummaryBufferMemory;
pub use summarizer::HistorySummarizer;

/// Estimate the token count of a piece of text.
///
/// Character-based estimation: ~4 chars per token, plus a small per-message
/// overhead applied by callers. Matches the estimation used by
/// `count_tokens` on the provider side.
pub fn estimate_tokens(text: &str) -> u32 {
    (text.len() as f64 / 4.0).ceil() as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_estimate_tokens_rounds_up() {
        assert_eq!(estimate_tokens(""), 0);
        assert_eq!(estimate_tokens("abcd"), 1);
        assert_eq!(estimate_tokens("abcde"), 2);
    }
}
