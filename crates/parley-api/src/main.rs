//! Parley server entry point.
//!
//! Binary name: `parley`
//!
//! Parses CLI arguments, loads config, wires services for the chosen
//! deployment, and serves the router until Ctrl+C or SIGTERM.

mod cli;

use anyhow::Context;
use clap::Parser;
use secrecy::SecretString;

use cli::{Cli, Commands, Mode};
use parley_api::http::router::{build_ephemeral_router, build_persistent_router};
use parley_api::state::{AppState, EphemeralState};
use parley_infra::config::load_config;
use parley_infra::llm::create_provider;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => "info",
        1 => "info,parley=debug,parley_api=debug,parley_core=debug,parley_infra=debug",
        _ => "trace",
    };
    parley_observe::tracing_setup::init_tracing(cli.otel, filter)
        .map_err(|e| anyhow::anyhow!("failed to initialize tracing: {e}"))?;

    let result = run(cli).await;
    parley_observe::tracing_setup::shutdown_tracing();
    result
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let Commands::Serve {
        mode,
        port,
        host,
        config,
        database_url,
        model,
        gemini_base_url,
    } = cli.command;

    let mut config = load_config(config.as_deref()).await;
    if let Some(url) = database_url {
        config.database_url = url;
    }
    if let Some(model) = model {
        config.model = model;
    }

    let api_key = require_secret("GEMINI_API_KEY")?;
    let provider = create_provider(api_key, gemini_base_url.as_deref())?;

    let router = match mode {
        Mode::Ephemeral => build_ephemeral_router(EphemeralState::new(provider, &config)),
        Mode::Persistent => {
            let jwt_secret = require_secret("PARLEY_JWT_SECRET")?;
            let state = AppState::init(provider, &config, &jwt_secret).await?;
            build_persistent_router(state)
        }
    };

    let addr = format!("{host}:{port}");
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    tracing::info!(%addr, ?mode, model = %config.model, "Parley listening");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

/// Read a required secret from the environment.
fn require_secret(var: &str) -> anyhow::Result<SecretString> {
    match std::env::var(var) {
        Ok(value) if !value.trim().is_empty() => Ok(SecretString::from(value)),
        _ => anyhow::bail!("{var} must be set"),
    }
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
