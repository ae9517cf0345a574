//! Slash command parsing and execution for the chat loop.
//!
//! Commands start with `/` and provide in-chat controls for help,
//! history, and the sources footer.

use console::style;

/// Available slash commands in the chat loop.
#[derive(Debug, PartialEq)]
pub enum ChatCommand {
    /// Show available commands.
    Help,
    /// Clear the terminal screen.
    Clear,
    /// Exit the chat session.
    Exit,
    /// Show conversation history for this session.
    History,
    /// Toggle the sources footer after answers.
    Sources,
    /// Unknown command.
    Unknown(String),
}

/// Parse user input as a slash command.
///
/// Returns `None` if the input doesn't start with `/`.
pub fn parse(input: &str) -> Option<ChatCommand> {
    let trimmed = input.trim();
    if !trimmed.starts_with('/') {
        return None;
    }

    let cmd = trimmed
        .split_whitespace()
        .next()
        .unwrap_or(trimmed)
        .to_lowercase();

    match cmd.as_str() {
        "/help" | "/h" | "/?" => Some(ChatCommand::Help),
        "/clear" | "/cls" => Some(ChatCommand::Clear),
        "/exit" | "/quit" | "/q" => Some(ChatCommand::Exit),
        "/history" => Some(ChatCommand::History),
        "/sources" | "/src" => Some(ChatCommand::Sources),
        other => Some(ChatCommand::Unknown(other.to_string())),
    }
}

/// Print the help text listing all available commands.
pub fn print_help() {
    println!();
    println!("  {}", style("Available commands:").bold());
    println!();
    println!("  {}    {}", style("/help").cyan(), "Show this help message");
    println!("  {}   {}", style("/clear").cyan(), "Clear the screen");
    println!("  {}    {}", style("/exit").cyan(), "End the chat session");
    println!(
        "  {} {}",
        style("/history").cyan(),
        "Show conversation history"
    );
    println!(
        "  {} {}",
        style("/sources").cyan(),
        "Toggle the sources footer"
    );
    println!();
    println!("  {}", style("Ctrl+D to exit").dim());
    println!();
}
