//! Binary that serves the chat proxy over HTTP.

use std::net::SocketAddr;
use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use scribe_llm::{ChatGateway, GatewayConfig};

#[derive(Parser)]
#[command(name = "scribe-proxy", version, about = "Chat proxy for OpenAI, Anthropic, and Gemini")]
struct Cli {
    /// Port to listen on
    #[arg(short, long, env = "PORT", default_value_t = 5050)]
    port: u16,

    /// Address to bind
    #[arg(long, env = "BIND_ADDR", default_value = "0.0.0.0")]
    host: std::net::IpAddr,

    /// Origin allowed by CORS (`*` for any)
    #[arg(long, env = "ALLOWED_ORIGIN", default_value = "http://localhost:3000")]
    allowed_origin: String,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Secrets usually live in a local .env during development.
    let dotenv = dotenvy::dotenv();
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .init();

    if let Ok(path) = dotenv {
        tracing::debug!(path = %path.display(), "loaded environment file");
    }

    let config = GatewayConfig::from_env()?;
    let enabled = config.enabled_providers();
    if enabled.is_empty() {
        tracing::warn!("no provider keys configured, every chat request will fail");
    }
    for provider in scribe_types::Provider::ALL {
        let settings = config.settings(provider);
        tracing::info!(
            %provider,
            enabled = settings.is_enabled(),
            model = %settings.model,
            "provider"
        );
    }

    let gateway = Arc::new(ChatGateway::new(&config));
    let app = scribe_proxy::router(gateway, &cli.allowed_origin)?;

    let addr = SocketAddr::new(cli.host, cli.port);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("AI proxy backend running on http://{}", addr);
    tracing::info!("CORS allowed origin: {}", cli.allowed_origin);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
    }
    tracing::info!("shutting down");
}
