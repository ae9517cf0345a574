//! CLI argument definitions and the `status` command.

pub mod chat;

use clap::{Parser, Subcommand};
use clap_complete::Shell;

use docent_infra::config::{load_config, resolve_corpus_dir, resolve_data_dir};

/// Docent -- a retrieval-augmented assistant for the organization's
/// handbook.
#[derive(Debug, Parser)]
#[command(name = "docent", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase log verbosity (-v: debug, -vv: trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Only log errors and suppress progress output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Emit machine-readable JSON where supported
    #[arg(long, global = true)]
    pub json: bool,

    /// Export spans via OpenTelemetry (stdout exporter)
    #[arg(long, global = true)]
    pub otel: bool,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Start an interactive chat session
    Chat,

    /// Run the HTTP API server
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value_t = 7870)]
        port: u16,

        /// Host to bind
        #[arg(long, default_value = "127.0.0.1")]
        host: String,
    },

    /// Rebuild the vector index from the corpus
    Reindex,

    /// Show corpus, index, and provider status
    Status,

    /// Generate shell completions
    Completions {
        /// Target shell
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Print corpus/index/provider status (the `docent status` command).
pub async fn status(json: bool) -> anyhow::Result<()> {
    let data_dir = resolve_data_dir();
    tokio::fs::create_dir_all(&data_dir).await?;
    let config = load_config(&data_dir).await;
    let corpus_dir = resolve_corpus_dir(&config, &data_dir);

    let (_, _, report) = crate::state::prepare_index(&data_dir, &config, false, !json).await?;

    let api_key_set = std::env::var(&config.provider.api_key_env).is_ok();

    if json {
        let status = serde_json::json!({
            "data_dir": data_dir.display().to_string(),
            "corpus_dir": corpus_dir.display().to_string(),
            "documents": report.documents,
            "passages": report.passages,
            "embedding_model": report.embedding_model,
            "provider": config.provider.kind.to_string(),
            "model": config.provider.model,
            "api_key_env": config.provider.api_key_env,
            "api_key_set": api_key_set,
        });
        println!("{}", serde_json::to_string_pretty(&status)?);
        return Ok(());
    }

    let check_mark = |ok: bool| {
        if ok {
            format!("{}", console::style("ok").green())
        } else {
            format!("{}", console::style("missing").red())
        }
    };

    println!();
    println!("  {}", console::style(&config.assistant.name).cyan().bold());
    println!("  {}", console::style(&config.assistant.description).dim());
    println!();
    println!("  {}  {}", console::style("Corpus:").bold(), corpus_dir.display());
    println!(
        "  {}  {} documents, {} passages",
        console::style("Index:").bold(),
        report.documents,
        report.passages
    );
    println!(
        "  {}  {}",
        console::style("Embeddings:").bold(),
        report.embedding_model
    );
    println!(
        "  {}  {} ({})",
        console::style("Provider:").bold(),
        config.provider.kind,
        config.provider.model
    );
    println!(
        "  {}  {} ({})",
        console::style("API key:").bold(),
        check_mark(api_key_set),
        config.provider.api_key_env
    );
    println!();

    Ok(())
}
