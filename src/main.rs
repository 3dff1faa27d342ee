use std::sync::Arc;

use clap::Parser;
use secrecy::SecretString;

use miza_core::provider::LlmProvider;
use miza_engine::FallbackPicker;
use miza_llm::GeminiProvider;
use miza_server::{ChatOrchestrator, ServerConfig};
use miza_store::SessionStore;

/// MIZA — tourism chat backend for Manizales.
#[derive(Parser, Debug)]
#[command(name = "miza", version, about)]
struct Cli {
    /// Port to listen on.
    #[arg(long, default_value_t = 3001)]
    port: u16,

    /// Address to bind.
    #[arg(long, default_value = "0.0.0.0")]
    bind: String,

    /// Gemini model identifier (defaults to gemini-2.0-flash).
    #[arg(long)]
    model: Option<String>,

    /// Gemini API key.
    #[arg(long = "api-key", env = "GEMINI_API_KEY", hide_env_values = true)]
    api_key: String,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let provider = Arc::new(GeminiProvider::new(
        SecretString::from(cli.api_key),
        cli.model.as_deref(),
    ));
    let model = provider.model().to_string();

    let orchestrator = Arc::new(ChatOrchestrator::new(
        provider,
        Arc::new(SessionStore::new()),
        FallbackPicker::new(),
    ));

    let config = ServerConfig {
        bind: cli.bind,
        port: cli.port,
    };
    let handle = miza_server::start(config, orchestrator)
        .await
        .expect("failed to start server");

    tracing::info!(port = handle.port, model = %model, "MIZA backend ready");
    tracing::info!("endpoints: GET /api/test, POST /api/chat, POST /api/clear");

    tokio::signal::ctrl_c()
        .await
        .expect("failed to listen for ctrl+c");

    tracing::info!("shutting down");
}
