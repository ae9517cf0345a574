//! Summary buffer memory for a chat session.
//!
//! Holds the recent messages verbatim plus a running summary of everything
//! older. After each exchange the buffer is checked against its token
//! budget; overflowing messages are drained (oldest first) for the caller
//! to fold into the summary via `HistorySummarizer`.
//!
//! Draining and folding are split so the store can release its lock while
//! the summarization LLM call is in flight.

use docent_types::llm::Message;

use super::estimate_tokens;

/// Per-message structural overhead added to the token estimate.
const MESSAGE_OVERHEAD_TOKENS: u32 = 3;

/// Recent-message buffer with a running summary of older history.
#[derive(Debug, Clone)]
pub struct SummaryBufferMemory {
    summary: String,
    buffer: Vec<Message>,
    max_token_limit: u32,
}

impl SummaryBufferMemory {
    /// Create an empty memory with the given buffer token budget.
    pub fn new(max_token_limit: u32) -> Self {
        Self {
            summary: String::new(),
            buffer: Vec::new(),
            max_token_limit,
        }
    }

    /// The running summary, if any history has been folded yet.
    pub fn summary(&self) -> Option<&str> {
        if self.summary.is_empty() {
            None
        } else {
            Some(&self.summary)
        }
    }

    /// The buffered recent messages, oldest first.
    pub fn messages(&self) -> &[Message] {
        &self.buffer
    }

    /// Append one user/assistant exchange to the buffer.
    pub fn append_exchange(&mut self, question: &str, answer: &str) {
        self.buffer.push(Message::user(question));
        self.buffer.push(Message::assistant(answer));
    }

    /// Estimated token count of the buffered messages.
    pub fn estimated_tokens(&self) -> u32 {
        self.buffer
            .iter()
            .map(|m| estimate_tokens(&m.content) + MESSAGE_OVERHEAD_TOKENS)
            .sum()
    }

    /// True when the buffer exceeds its token budget.
    pub fn over_limit(&self) -> bool {
        self.estimated_tokens() > self.max_token_limit
    }

    /// Drain the oldest messages until the buffer fits its budget.
    ///
    /// Returns the drained messages for the caller to summarize. Messages
    /// are drained in pairs so a user question is never separated from its
    /// answer.
    pub fn drain_overflow(&mut self) -> Vec<Message> {
        let mut drained = Vec::new();
        while self.over_limit() && self.buffer.len() > 2 {
            drained.extend(self.buffer.drain(..2));
        }
        drained
    }

    /// Replace the running summary after a successful fold.
    pub fn set_summary(&mut self, summary: String) {
        self.summary = summary;
    }

    /// Put drained messages back at the front of the buffer.
    ///
    /// Used when summarization fails, so no history is lost; the next
    /// prune retries with the same messages.
    pub fn restore(&mut self, mut drained: Vec<Message>) {
        drained.extend(self.buffer.drain(..));
        self.buffer = drained;
    }

    /// Reset summary and buffer.
    pub fn clear(&mut self) {
        self.summary.clear();
        self.buffer.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use docent_types::llm::MessageRole;

    #[test]
    fn test_empty_memory_has_no_summary() {
        let memory = SummaryBufferMemory::new(2000);
        assert!(memory.summary().is_none());
        assert!(memory.messages().is_empty());
        assert_eq!(memory.estimated_tokens(), 0);
    }

    #[test]
    fn test_append_exchange_keeps_order() {
        let mut memory = SummaryBufferMemory::new(2000);
        memory.append_exchange("first question", "first answer");
        memory.append_exchange("second question", "second answer");

        let messages = memory.messages();
        assert_eq!(messages.len(), 4);
        assert_eq!(messages[0].role, MessageRole::User);
        assert_eq!(messages[0].content, "first question");
        assert_eq!(messages[3].role, MessageRole::Assistant);
        assert_eq!(messages[3].content, "second answer");
    }

    #[test]
    fn test_no_drain_under_limit() {
        let mut memory = SummaryBufferMemory::new(2000);
        memory.append_exchange("short", "answer");
        assert!(!memory.over_limit());
        assert!(memory.drain_overflow().is_empty());
        assert_eq!(memory.messages().len(), 2);
    }

    #[test]
    fn test_drain_overflow_removes_oldest_pairs() {
        // Budget of 50 tokens; each exchange is ~100 chars -> ~31 tokens.
        let mut memory = SummaryBufferMemory::new(50);
        memory.append_exchange(&"a".repeat(50), &"b".repeat(50));
        memory.append_exchange(&"c".repeat(50), &"d".repeat(50));
        memory.append_exchange(&"e".repeat(50), &"f".repeat(50));

        assert!(memory.over_limit());
        let drained = memory.drain_overflow();

        // Oldest messages drained first, in pairs.
        assert!(!drained.is_empty());
        assert_eq!(drained.len() % 2, 0);
        assert!(drained[0].content.starts_with('a'));

        // The last exchange always survives.
        let remaining = memory.messages();
        assert_eq!(remaining.len(), 2);
        assert!(remaining[0].content.starts_with('e'));
    }

    #[test]
    fn test_drain_never_empties_last_exchange() {
        // Budget so small even one exchange overflows: the buffer still
        // keeps the latest exchange rather than draining everything.
        let mut memory = SummaryBufferMemory::new(1);
        memory.append_exchange(&"x".repeat(100), &"y".repeat(100));
        let drained = memory.drain_overflow();
        assert!(drained.is_empty());
        assert_eq!(memory.messages().len(), 2);
    }

    #[test]
    fn test_restore_puts_messages_back_in_front() {
        let mut memory = SummaryBufferMemory::new(50);
        memory.append_exchange(&"a".repeat(50), &"b".repeat(50));
        memory.append_exchange(&"c".repeat(50), &"d".repeat(50));
        memory.append_exchange(&"e".repeat(50), &"f".repeat(50));

        let drained = memory.drain_overflow();
        let drained_len = drained.len();
        memory.restore(drained);

        assert_eq!(memory.messages().len(), drained_len + 2);
        assert!(memory.messages()[0].content.starts_with('a'));
    }

    #[test]
    fn test_set_summary_and_clear() {
        let mut memory = SummaryBufferMemory::new(2000);
        memory.append_exchange("q", "a");
        memory.set_summary("The user asked about onboarding.".to_string());
        assert_eq!(memory.summary(), Some("The user asked about onboarding."));

        memory.clear();
        assert!(memory.summary().is_none());
        assert!(memory.messages().is_empty());
    }
}
