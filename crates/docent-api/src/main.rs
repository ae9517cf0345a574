//! Docent CLI and HTTP server entry point.
//!
//! Binary name: `docent`
//!
//! Parses CLI arguments, builds the corpus index and services, then
//! dispatches to the interactive chat loop, the HTTP server, or one of
//! the maintenance commands.

mod cli;
mod http;
mod state;

use clap::Parser;
use clap_complete::generate;

use cli::{Cli, Commands};
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Set up tracing based on verbosity
    let filter = match cli.verbose {
        0 if cli.quiet => "error",
        0 => "warn",
        1 => "info,docent=debug",
        _ => "trace",
    };
    if let Err(e) = docent_observe::tracing_setup::init_tracing(filter, cli.otel) {
        eprintln!("Failed to initialize tracing: {e}");
    }

    // Shell completions don't need app state
    if let Commands::Completions { shell } = &cli.command {
        let mut cmd = <Cli as clap::CommandFactory>::command();
        generate(*shell, &mut cmd, "docent", &mut std::io::stdout());
        return Ok(());
    }

    let result = run(cli).await;
    docent_observe::tracing_setup::shutdown_tracing();
    result
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Chat => {
            let state = AppState::init(false, !cli.quiet).await?;
            cli::chat::run_chat_loop(&state).await?;
        }

        Commands::Serve { port, host } => {
            let state = AppState::init(false, !cli.quiet).await?;

            let addr = format!("{host}:{port}");
            let listener = tokio::net::TcpListener::bind(&addr).await?;

            println!(
                "  {} Docent API listening on {}",
                console::style("*").bold(),
                console::style(format!("http://{addr}")).cyan()
            );
            println!("  {}", console::style("Press Ctrl+C to stop").dim());

            let router = http::router::build_router(state);

            axum::serve(listener, router)
                .with_graceful_shutdown(shutdown_signal())
                .await?;

            println!("\n  Server stopped.");
        }

        Commands::Reindex => {
            let report = state::rebuild_index(!cli.quiet).await?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                println!();
                println!(
                    "  {} Reindexed {} documents into {} passages ({})",
                    console::style("*").green().bold(),
                    report.documents,
                    report.passages,
                    report.embedding_model,
                );
                println!();
            }
        }

        Commands::Status => {
            cli::status(cli.json).await?;
        }

        Commands::Completions { .. } => unreachable!("handled above"),
    }

    Ok(())
}

/// Wait for Ctrl+C or SIGTERM for graceful shutdown.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
