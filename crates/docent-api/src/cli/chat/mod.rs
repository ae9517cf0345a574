//! Interactive chat REPL.
//!
//! Submodules mirror the moving parts of the loop: banner, slash
//! commands, async input, markdown rendering, and the loop runner itself.

pub mod banner;
pub mod commands;
pub mod input;
pub mod loop_runner;
pub mod renderer;

pub use loop_runner::run_chat_loop;
