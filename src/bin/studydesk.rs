//! Service binary for studydesk.
//!
//! A thin shim over the library crate: flags and environment → `AppConfig`
//! → router → serve. All behaviour lives in the library.

use anyhow::{Context, Result};
use clap::Parser;
use studydesk::server::AppState;
use studydesk::{server, AppConfig};
use std::net::SocketAddr;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "studydesk",
    version,
    about = "HTTP service turning lecture notes and research papers into study artifacts"
)]
struct Cli {
    /// Address to listen on.
    #[arg(long, env = "STUDYDESK_BIND", default_value = "127.0.0.1:8080")]
    bind: SocketAddr,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let config = AppConfig::from_env();

    // Start even with missing keys: extraction endpoints work without any,
    // and generation endpoints report configuration errors per-request.
    if config.groq_api_key.is_none() {
        tracing::warn!(
            "GROQ_API_KEY is not set; summary and quiz endpoints will return configuration errors"
        );
    }
    if config.perplexity_api_key.is_none() {
        tracing::info!(
            "PERPLEXITY_API_KEY is not set; quiz responses will skip the news-connection stage"
        );
    }

    let state = AppState::from_config(config).context("failed to initialise providers")?;
    let app = server::router(state);

    let listener = tokio::net::TcpListener::bind(cli.bind)
        .await
        .with_context(|| format!("failed to bind {}", cli.bind))?;
    tracing::info!("studydesk listening on {}", cli.bind);

    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}
