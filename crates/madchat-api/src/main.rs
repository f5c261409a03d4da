//! madchat CLI and `/chat` server entry point.
//!
//! Binary name: `madchat`
//!
//! Parses CLI arguments, sets up tracing, loads configuration and the
//! persisted store, then dispatches to the command handler or starts the
//! generation server.

mod cli;
mod http;
mod state;

use clap::Parser;
use clap_complete::generate;

use madchat_observe::{TracingOptions, init_tracing, shutdown_tracing};

use cli::{Cli, Commands};
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Serve logs at info by default; interactive commands stay quiet.
    let is_serve = matches!(cli.command, Commands::Serve { .. });
    let filter = match cli.verbose {
        0 if cli.quiet => "error",
        0 if is_serve => "info",
        0 => "warn",
        1 => "info,madchat=debug",
        _ => "trace",
    };
    let otel = matches!(cli.command, Commands::Serve { otel: true, .. });
    init_tracing(&TracingOptions::new(filter).json(cli.json && is_serve).otel(otel))
        .map_err(|e| anyhow::anyhow!("failed to initialize tracing: {e}"))?;

    // Shell completions don't need app state
    if let Commands::Completions { shell } = &cli.command {
        let mut cmd = <Cli as clap::CommandFactory>::command();
        generate(*shell, &mut cmd, "madchat", &mut std::io::stdout());
        return Ok(());
    }

    let state = AppState::init(cli.data_dir.clone()).await?;

    let result = match cli.command {
        Commands::Login { name, gender, age } => {
            cli::profile::login(&state, name, gender, age, cli.json)
        }
        Commands::Logout => cli::profile::logout(&state, cli.json),
        Commands::Whoami => cli::profile::whoami(&state, cli.json),

        Commands::Chat {
            title,
            gateway_url,
            mode,
        } => cli::chat::loop_runner::run_chat_loop(&state, title, gateway_url, mode).await,

        Commands::List => cli::conversation::list_conversations(&state, cli.json),
        Commands::Show { title } => cli::conversation::show_conversation(&state, &title, cli.json),
        Commands::Rename { old, new } => {
            cli::conversation::rename_conversation(&state, &old, &new, cli.json)
        }
        Commands::Delete { title, force } => {
            cli::conversation::delete_conversation(&state, &title, force, cli.json)
        }

        Commands::Levels { count } => cli::levels::show_levels(count, cli.json),
        Commands::Waitlist => cli::waitlist::run_waitlist(cli.json).await,

        Commands::Serve { port, host, otel: _ } => serve(&state, host, port).await,

        Commands::Completions { .. } => unreachable!("handled above"),
    };

    shutdown_tracing();
    result
}

/// Run the `/chat` generation server until Ctrl+C or SIGTERM.
async fn serve(state: &AppState, host: Option<String>, port: Option<u16>) -> anyhow::Result<()> {
    let server = &state.config.server;
    let backend = http::build_backend(server)?;

    let addr = format!(
        "{}:{}",
        host.as_deref().unwrap_or(&server.host),
        port.unwrap_or(server.port)
    );
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    println!(
        "  {} madchat backend listening on {}",
        console::style("⚡").bold(),
        console::style(format!("http://{addr}")).cyan()
    );
    println!(
        "  {}  {}",
        console::style("Model:").bold(),
        console::style(&server.model).dim()
    );
    println!("  {}", console::style("Press Ctrl+C to stop").dim());

    let router = http::router::build_router(backend);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    println!("\n  Server stopped.");
    Ok(())
}

/// Wait for Ctrl+C or SIGTERM for graceful shutdown.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
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
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
