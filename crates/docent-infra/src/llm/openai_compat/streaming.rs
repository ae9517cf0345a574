//! OpenAI SSE stream to [`StreamEvent`] adapter.
//!
//! Maps `async-openai`'s [`ChatCompletionResponseStream`] events to the
//! provider-agnostic [`StreamEvent`] enum defined in `docent-types`.

use std::pin::Pin;

use futures_util::{Stream, StreamExt};

use async_openai::types::chat::{ChatCompletionResponseStream, FinishReason};

use docent_types::llm::{LlmError, StopReason, StreamEvent, Usage};

/// Map an async-openai [`ChatCompletionResponseStream`] to a stream of
/// [`StreamEvent`]s.
///
/// The returned stream emits events in this order:
/// 1. `Connected` -- immediately on entry
/// 2. `TextDelta` -- for each text content chunk
/// 3. `MessageDelta` -- with the stop reason when finish_reason appears
/// 4. `Usage` -- token usage (requires `stream_options.include_usage =
///    true` on the request; arrives on the final chunk)
/// 5. `Done` -- at the end of the stream
pub fn map_openai_stream(
    stream: ChatCompletionResponseStream,
) -> Pin<Box<dyn Stream<Item = Result<StreamEvent, LlmError>> + Send + 'static>> {
    Box::pin(async_stream::try_stream! {
        yield StreamEvent::Connected;

        let mut stream = stream;

        while let Some(result) = stream.next().await {
            let chunk = result.map_err(|e| LlmError::Stream(e.to_string()))?;

            // The final chunk carries usage data with an empty choices array.
            if let Some(usage) = chunk.usage.as_ref() {
                yield StreamEvent::Usage(Usage {
                    input_tokens: usage.prompt_tokens,
                    output_tokens: usage.completion_tokens,
                });
            }

            // Typically one choice per chunk.
            for choice in &chunk.choices {
                if let Some(text) = choice.delta.content.clone() {
                    if !text.is_empty() {
                        yield StreamEvent::TextDelta { text };
                    }
                }

                if let Some(finish_reason) = choice.finish_reason.clone() {
                    yield StreamEvent::MessageDelta {
                        stop_reason: map_finish_reason(finish_reason),
                    };
                }
            }
        }

        yield StreamEvent::Done;
    })
}

/// Map an OpenAI finish reason to the provider-agnostic [`StopReason`].
pub(super) fn map_finish_reason(finish_reason: FinishReason) -> StopReason {
    match finish_reason {
        FinishReason::Stop => StopReason::EndTurn,
        FinishReason::Length => StopReason::MaxTokens,
        FinishReason::ContentFilter => StopReason::EndTurn,
        FinishReason::ToolCalls | FinishReason::FunctionCall => StopReason::EndTurn,
    }
}
