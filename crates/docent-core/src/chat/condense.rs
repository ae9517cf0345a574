//! Follow-up question condensing.
//!
//! Retrieval works on a single standalone question, but users ask
//! follow-ups ("what about contractors?"). `QuestionCondenser` rephrases
//! a follow-up into a standalone question using the conversation so far.

use docent_types::llm::{CompletionRequest, LlmError, Message, MessageRole};

use crate::llm::BoxLlmProvider;

/// System prompt for the condense LLM call.
const CONDENSE_SYSTEM_PROMPT: &str = "Given the following conversation and a follow up question, \
rephrase the follow up question to be a standalone question, in its original language. \
Return only the standalone question with no preamble.";

/// Stateless utility for rephrasing follow-ups into standalone questions.
pub struct QuestionCondenser;

impl QuestionCondenser {
    /// True when the question needs no condensing (no prior conversation).
    pub fn is_standalone(summary: Option<&str>, history: &[Message]) -> bool {
        summary.is_none() && history.is_empty()
    }

    /// Rephrase `question` into a standalone question given the
    /// conversation summary and buffered history.
    #[tracing::instrument(
        name = "condense_question",
        skip(provider, summary, history, question),
        fields(model = %model, history_len = history.len())
    )]
    pub async fn condense(
        provider: &BoxLlmProvider,
        summary: Option<&str>,
        history: &[Message],
        question: &str,
        model: &str,
    ) -> Result<String, LlmError> {
        if Self::is_standalone(summary, history) {
            return Ok(question.to_string());
        }

        let mut transcript = String::new();
        if let Some(summary) = summary {
            transcript.push_str("Summary of earlier conversation:\n");
            transcript.push_str(summary);
            transcript.push_str("\n\n");
        }
        for message in history {
            transcript.push_str(&format!("{}: {}\n", message.role, message.content));
        }

        let request = CompletionRequest {
            model: model.to_string(),
            messages: vec![Message {
                role: MessageRole::User,
                content: format!(
                    "Chat history:\n{transcript}\nFollow up question: {question}\n\nStandalone question:"
                ),
            }],
            system: Some(CONDENSE_SYSTEM_PROMPT.to_string()),
            max_tokens: 256,
            temperature: Some(0.0),
            stream: false,
        };

        let response = provider.complete(&request).await?;
        let standalone = response.content.trim().to_string();

        // An empty rephrase is useless; fall back to the raw question.
        if standalone.is_empty() {
            Ok(question.to_string())
        } else {
            Ok(standalone)
        }
    }
}
