//! Smart Teacher CLI and REST API entry point.
//!
//! Binary name: `tutor`
//!
//! Parses CLI arguments, initializes tracing and application state, then
//! dispatches to the command handler or starts the REST API server.

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
        1 => "info,tutor=debug",
        _ => "trace",
    };
    tutor_observe::tracing_setup::init_tracing(filter, cli.otel)
        .map_err(|e| anyhow::anyhow!("failed to initialize tracing: {e}"))?;

    // Shell completions don't need app state
    if let Commands::Completions { shell } = &cli.command {
        let mut cmd = <Cli as clap::CommandFactory>::command();
        generate(*shell, &mut cmd, "tutor", &mut std::io::stdout());
        return Ok(());
    }

    with_tracing_flush(async {
        let state = AppState::init().await?;
        run(cli, state).await
    })
    .await
}

/// Run `work`, then flush tracing whether it succeeded or not.
async fn with_tracing_flush<T>(
    work: impl std::future::Future<Output = anyhow::Result<T>>,
) -> anyhow::Result<T> {
    let result = work.await;
    tutor_observe::tracing_setup::shutdown_tracing();
    result
}

async fn run(cli: Cli, state: AppState) -> anyhow::Result<()> {
    match cli.command {
        Commands::Serve { port, host } => {
            let host = host.unwrap_or_else(|| state.config.server.host.clone());
            let port = port.unwrap_or(state.config.server.port);

            let addr = format!("{host}:{port}");
            let listener = tokio::net::TcpListener::bind(&addr).await?;

            if !cli.quiet {
                println!(
                    "  {} Smart Teacher API listening on {} (gateway: {})",
                    console::style("⚡").bold(),
                    console::style(format!("http://{addr}")).cyan(),
                    state.tutor.gateway_name()
                );
                println!("  {}", console::style("Press Ctrl+C to stop").dim());
            }

            let router = http::router::build_router(state);

            axum::serve(listener, router)
                .with_graceful_shutdown(shutdown_signal())
                .await?;

            if !cli.quiet {
                println!("\n  Server stopped.");
            }
        }

        Commands::Ask { message, grade } => {
            cli::ask::ask(&state, &message, grade, cli.json).await?;
        }

        Commands::Hint { problem, grade } => {
            cli::ask::hint(&state, &problem, grade, cli.json).await?;
        }

        Commands::Chat { grade } => {
            cli::chat::run_chat(&state, grade).await?;
        }

        Commands::AnalyzeImage { path, media_type } => {
            cli::analyze::analyze_image(&state, &path, media_type, cli.json).await?;
        }

        Commands::Import { path } => {
            cli::curriculum::import(&state, &path, cli.json).await?;
        }

        Commands::Search {
            query,
            grade,
            limit,
        } => {
            cli::curriculum::search(&state, &query, grade, limit, cli.json).await?;
        }

        Commands::Completions { .. } => unreachable!("handled above"),
    }

    Ok(())
}

/// Wait for Ctrl+C or SIGTERM for graceful shutdown.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("failed to install Ctrl+C handler: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("failed to install SIGTERM handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
