//! Welcome banner display for chat sessions.
//!
//! Prints a styled banner when a chat session starts, showing the
//! assistant's identity, corpus stats, model, and session information.

use console::style;

/// Print the welcome banner at the start of a chat session.
pub fn print_welcome_banner(
    name: &str,
    description: &str,
    passages: u64,
    model: &str,
    session_id: &str,
) {
    println!();
    println!("  {}", style(name).cyan().bold());
    println!("  {}", style(description).dim());
    println!();
    println!(
        "  {}  {} handbook passages indexed",
        style("Corpus:").bold(),
        passages
    );
    println!("  {}  {}", style("Model:").bold(), style(model).dim());
    println!(
        "  {}  {}",
        style("Session:").bold(),
        style(&session_id[..8.min(session_id.len())]).dim()
    );
    println!();
    println!(
        "  {}",
        style("Ask anything from the handbook. Type /help for commands, Ctrl+D to exit").dim()
    );
    println!("  {}", style("---").dim());
    println!();
}
