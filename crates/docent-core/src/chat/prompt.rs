//! Answer prompt construction.
//!
//! Builds the grounded completion request for a turn: the system prompt
//! carries the assistant's instructions plus the retrieved passages as a
//! context block; the message list carries the conversation summary (when
//! present), the buffered history, and the new question.

use docent_types::config::{AssistantConfig, ProviderConfig};
use docent_types::corpus::ScoredPassage;
use docent_types::llm::{CompletionRequest, Message, MessageRole};

/// Render retrieved passages into the context block.
///
/// Each passage is preceded by its citation header so the model can cite
/// the source section in its answer.
pub fn render_context(passages: &[ScoredPassage]) -> String {
    passages
        .iter()
        .map(|scored| {
            format!(
                "[{}]\n{}",
                scored.passage.citation(),
                scored.passage.text.trim()
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Build the system prompt: assistant instructions plus the context block.
pub fn answer_system_prompt(assistant: &AssistantConfig, context: &str) -> String {
    format!(
        r#"You are {name}, an expert assistant trained on the organization's official handbook and direction documents.

Please:
- Answer with as much useful detail as possible.
- Use bullet points or formatting if appropriate.
- Cite the source section when available.
- Only answer from the handbook materials. Politely decline anything off-topic.

Context:
{context}"#,
        name = assistant.name,
        context = context,
    )
}

/// Build the streaming completion request for an answer turn.
pub fn build_answer_request(
    assistant: &AssistantConfig,
    provider: &ProviderConfig,
    summary: Option<&str>,
    history: &[Message],
    passages: &[ScoredPassage],
    question: &str,
) -> CompletionRequest {
    let context = render_context(passages);

    let mut messages = Vec::with_capacity(history.len() + 2);
    if let Some(summary) = summary {
        messages.push(Message {
            role: MessageRole::System,
            content: format!("Summary of the conversation so far:\n{summary}"),
        });
    }
    messages.extend(history.iter().cloned());
    messages.push(Message::user(question));

    CompletionRequest {
        model: provider.model.clone(),
        messages,
        system: Some(answer_system_prompt(assistant, &context)),
        max_tokens: provider.max_tokens,
        temperature: Some(provider.temperature),
        stream: true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::make_passage;

    fn scored(source: &str, section: &str, text: &str) -> ScoredPassage {
        ScoredPassage {
            passage: make_passage(source, section, text, 0),
            similarity: 0.8,
        }
    }

    #[test]
    fn test_render_context_includes_citations() {
        let passages = vec![
            scored("handbook.md", "Time Off", "Unlimited PTO."),
            scored("direction.md", "", "FY26 themes."),
        ];
        let context = render_context(&passages);
        assert!(context.contains("[handbook.md -> Time Off]\nUnlimited PTO."));
        assert!(context.contains("[direction.md]\nFY26 themes."));
    }

    #[test]
    fn test_system_prompt_carries_instructions_and_context() {
        let assistant = AssistantConfig::default();
        let prompt = answer_system_prompt(&assistant, "[handbook.md]\ncontent");
        assert!(prompt.contains("Docent"));
        assert!(prompt.contains("Cite the source section"));
        assert!(prompt.contains("Politely decline anything off-topic"));
        assert!(prompt.ends_with("[handbook.md]\ncontent"));
    }

    #[test]
    fn test_build_answer_request_message_order() {
        let assistant = AssistantConfig::default();
        let provider = ProviderConfig::default();
        let history = vec![
            Message::user("earlier question"),
            Message::assistant("earlier answer"),
        ];
        let passages = vec![scored("handbook.md", "Values", "We iterate.")];

        let request = build_answer_request(
            &assistant,
            &provider,
            Some("The user asked about values."),
            &history,
            &passages,
            "what else?",
        );

        assert!(request.stream);
        assert_eq!(request.model, "gemini-1.5-flash");
        assert_eq!(request.temperature, Some(0.3));
        // summary + 2 history + question
        assert_eq!(request.messages.len(), 4);
        assert_eq!(request.messages[0].role, MessageRole::System);
        assert!(request.messages[0].content.contains("values"));
        assert_eq!(request.messages[3].content, "what else?");
        assert!(request.system.as_ref().unwrap().contains("We iterate."));
    }

    #[test]
    fn test_build_answer_request_without_summary() {
        let request = build_answer_request(
            &AssistantConfig::default(),
            &ProviderConfig::default(),
            None,
            &[],
            &[],
            "first question",
        );
        assert_eq!(request.messages.len(), 1);
        assert_eq!(request.messages[0].content, "first question");
    }
}
