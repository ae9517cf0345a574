//! Main chat loop orchestration.
//!
//! Coordinates the conversation lifecycle: session creation, welcome
//! banner, input loop with streamed answers, slash commands, sources
//! footer, and session cleanup.

use std::io::Write;
use std::time::Instant;

use console::style;
use futures_util::StreamExt;
use tracing::info;

use docent_types::chat::ChatMessage;
use docent_types::llm::{MessageRole, StreamEvent};

use crate::state::AppState;

use super::banner::print_welcome_banner;
use super::commands::{self, ChatCommand};
use super::input::{ChatInput, InputEvent};
use super::renderer::ChatRenderer;

/// Run the interactive chat loop.
pub async fn run_chat_loop(state: &AppState) -> anyhow::Result<()> {
    let service = state.service.clone();
    let model = service.model().to_string();

    // Create session
    let session = service.sessions().create(model.clone());
    let session_id = session.id;

    print_welcome_banner(
        &state.config.assistant.name,
        &state.config.assistant.description,
        state.index_report.passages,
        &model,
        &session_id.to_string(),
    );

    let renderer = ChatRenderer::new();
    let mut show_sources = true;

    let prompt = format!("  {} ", style("You >").green().bold());
    let (mut chat_input, _writer) =
        ChatInput::new(prompt).map_err(|e| anyhow::anyhow!("Failed to initialize input: {e}"))?;

    loop {
        let event = chat_input.read_line().await;
        match event {
            InputEvent::Eof => {
                println!("\n  {}", style("Session ended.").dim());
                break;
            }
            InputEvent::Interrupted => {
                println!("\n  {}", style("Press Ctrl+D to exit, or keep chatting.").dim());
                continue;
            }
            InputEvent::Message(text) => {
                if text.is_empty() {
                    continue;
                }

                // Slash commands
                if let Some(cmd) = commands::parse(&text) {
                    match cmd {
                        ChatCommand::Help => {
                            commands::print_help();
                            continue;
                        }
                        ChatCommand::Clear => {
                            chat_input.clear();
                            continue;
                        }
                        ChatCommand::Exit => {
                            println!("\n  {}", style("Session ended.").dim());
                            break;
                        }
                        ChatCommand::Sources => {
                            show_sources = !show_sources;
                            let label = if show_sources { "on" } else { "off" };
                            println!("\n  {} Sources footer {}\n", style("*").cyan().bold(), label);
                            continue;
                        }
                        ChatCommand::History => {
                            let messages = service
                                .sessions()
                                .messages(&session_id)
                                .unwrap_or_default();
                            println!();
                            for msg in &messages {
                                let role_label = match msg.role {
                                    MessageRole::User => format!("{}", style("You").green()),
                                    MessageRole::Assistant => {
                                        format!("{}", style(&state.config.assistant.name).cyan())
                                    }
                                    _ => "System".to_string(),
                                };
                                let preview = if msg.content.len() > 100 {
                                    format!("{}...", &msg.content[..97])
                                } else {
                                    msg.content.clone()
                                };
                                println!("  {} {}", style(role_label).bold(), preview);
                            }
                            println!();
                            continue;
                        }
                        ChatCommand::Unknown(cmd_name) => {
                            println!(
                                "\n  {} Unknown command: {}. Type /help for available commands.\n",
                                style("?").yellow().bold(),
                                style(cmd_name).dim()
                            );
                            continue;
                        }
                    }
                }

                // Thinking spinner while retrieval + first token are pending
                let spinner = indicatif::ProgressBar::new_spinner();
                spinner.set_style(
                    indicatif::ProgressStyle::default_spinner()
                        .template("{spinner:.cyan} {msg}")
                        .unwrap(),
                );
                spinner.set_message("thinking...");
                spinner.enable_steady_tick(std::time::Duration::from_millis(80));

                let start_time = Instant::now();
                let turn = match service.answer(session_id, &text).await {
                    Ok(turn) => turn,
                    Err(e) => {
                        spinner.finish_and_clear();
                        let message = docent_core::chat::AssistantService::report_failure(&e);
                        eprintln!("\n  {} {}\n", style("!").red().bold(), message);
                        continue;
                    }
                };

                let mut stream = turn.stream;
                let mut full_response = String::new();
                let mut input_tokens: u32 = 0;
                let mut output_tokens: u32 = 0;
                let mut stop_reason = "end_turn".to_string();
                let mut first_token_received = false;
                let mut had_error = false;

                while let Some(event_result) = stream.next().await {
                    match event_result {
                        Ok(stream_event) => match stream_event {
                            StreamEvent::TextDelta { text: delta } => {
                                if !first_token_received {
                                    spinner.finish_and_clear();
                                    first_token_received = true;
                                    print!(
                                        "\n  {} ",
                                        style(&state.config.assistant.name).cyan().bold()
                                    );
                                    let _ = std::io::stdout().flush();
                                }
                                renderer.print_streaming_token(&delta);
                                full_response.push_str(&delta);
                            }
                            StreamEvent::Usage(usage) => {
                                input_tokens = usage.input_tokens;
                                output_tokens = usage.output_tokens;
                            }
                            StreamEvent::MessageDelta { stop_reason: sr } => {
                                stop_reason = sr.to_string();
                            }
                            StreamEvent::Done => {
                                break;
                            }
                            _ => {}
                        },
                        Err(e) => {
                            spinner.finish_and_clear();
                            let chat_error = docent_types::error::ChatError::from(e);
                            let message =
                                docent_core::chat::AssistantService::report_failure(&chat_error);
                            eprintln!("\n  {} {}", style("!").red().bold(), message);
                            eprintln!(
                                "  {}",
                                style("Type a message to retry, /exit to quit.").dim()
                            );
                            had_error = true;
                            break;
                        }
                    }
                }

                if !first_token_received && !had_error {
                    spinner.finish_and_clear();
                }
                if had_error || full_response.is_empty() {
                    continue;
                }

                let response_ms = start_time.elapsed().as_millis() as u64;
                println!();
                renderer.print_stats_footer(output_tokens, response_ms, &model);
                if show_sources {
                    renderer.print_sources(&turn.sources);
                }
                println!();

                // Persist the exchange into session memory (may fold
                // overflow into the summary).
                let _ = service
                    .record_exchange(
                        session_id,
                        ChatMessage::user(session_id, text.clone()),
                        ChatMessage::assistant(
                            session_id,
                            full_response.clone(),
                            model.clone(),
                            input_tokens,
                            output_tokens,
                            stop_reason,
                            response_ms,
                        ),
                    )
                    .await;
            }
        }
    }

    service.sessions().end(&session_id);
    info!(session_id = %session_id, "Chat session ended");
    Ok(())
}
