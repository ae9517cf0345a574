//! Progressive conversation summarizer.
//!
//! `HistorySummarizer` condenses messages drained from the recent-message
//! buffer into a running summary, so long conversations keep their context
//! without exhausting the token budget.

use docent_types::llm::{CompletionRequest, LlmError, Message, MessageRole};

use crate::llm::BoxLlmProvider;

/// System prompt for the progressive summarization LLM call.
const SUMMARY_SYSTEM_PROMPT: &str = r#"Progressively summarize the conversation, folding the new lines into the current summary. Preserve:
1. Topics the user has asked about and the answers given
2. Important facts and policy details mentioned
3. The user's current goals and any unresolved questions

Keep the summary under 400 words. Write in third person (e.g., "The user asked about..." "The assistant explained...")."#;

/// Stateless utility for folding conversation history into a summary.
pub struct HistorySummarizer;

impl HistorySummarizer {
    /// Fold drained messages into the previous summary, returning the new
    /// summary text.
    ///
    /// An empty `previous_summary` starts a fresh summary; empty `messages`
    /// return the previous summary unchanged without an LLM call.
    #[tracing::instrument(
        name = "summarize_history",
        skip(provider, previous_summary, messages),
        fields(model = %model, message_count = messages.len())
    )]
    pub async fn fold(
        provider: &BoxLlmProvider,
        previous_summary: &str,
        messages: &[Message],
        model: &str,
    ) -> Result<String, LlmError> {
        if messages.is_empty() {
            return Ok(previous_summary.to_string());
        }

        let new_lines: String = messages
            .iter()
            .map(|m| format!("{}: {}", m.role, m.content))
            .collect::<Vec<_>>()
            .join("\n\n");

        let current_summary = if previous_summary.is_empty() {
            "(none yet)"
        } else {
            previous_summary
        };

        let request = CompletionRequest {
            model: model.to_string(),
            messages: vec![Message {
                role: MessageRole::User,
                content: format!(
                    "Current summary:\n{current_summary}\n\nNew lines of conversation:\n<conversation>\n{new_lines}\n</conversation>\n\nNew summary:"
                ),
            }],
            system: Some(SUMMARY_SYSTEM_PROMPT.to_string()),
            max_tokens: 1024,
            temperature: Some(0.0),
            stream: false,
        };

        let response = provider.complete(&request).await?;
        Ok(response.content.trim().to_string())
    }
}
