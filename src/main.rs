// src/main.rs

use clap::Parser;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use echo_muse::AppState;
use echo_muse::api::build_router;
use echo_muse::config::CONFIG;
use echo_muse::llm::{CompletionClient, GeminiClient, UnavailableCompletion};
use echo_muse::random::ThreadRandom;
use echo_muse::store::{SessionStore, create_pool};

/// Therapeutic storytelling companion
#[derive(Parser, Debug)]
#[command(name = "echo-muse", version, about)]
struct Cli {
    /// Listen address (overrides ECHO_MUSE_HOST)
    #[arg(long)]
    host: Option<String>,

    /// Listen port (overrides ECHO_MUSE_PORT)
    #[arg(long)]
    port: Option<u16>,

    /// SQLite database URL (overrides DATABASE_URL)
    #[arg(long)]
    database_url: Option<String>,

    /// Verbose logging
    #[arg(long)]
    debug: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = CONFIG.clone();
    if let Some(host) = cli.host {
        config.host = host;
    }
    if let Some(port) = cli.port {
        config.port = port;
    }
    if let Some(url) = cli.database_url {
        config.database_url = url;
    }
    config.debug |= cli.debug;

    // Initialize tracing
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(config.log_filter()));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    info!("Starting Echo-Muse v{}", env!("CARGO_PKG_VERSION"));

    if config.uses_default_secret() {
        warn!("SECRET_KEY not set; using the built-in development secret");
    }

    let client: Arc<dyn CompletionClient> = match &config.gemini_api_key {
        Some(key) => {
            info!("Completion API: Gemini ({})", config.gemini_model);
            Arc::new(
                GeminiClient::new(key.clone())
                    .with_model(config.gemini_model.clone())
                    .with_base_url(config.gemini_base_url.clone())
                    .with_timeout(config.gemini_timeout()),
            )
        }
        None => {
            warn!("GEMINI_API_KEY not set; every story will use fallback content");
            Arc::new(UnavailableCompletion::new("GEMINI_API_KEY not set"))
        }
    };

    let pool = create_pool(&config.database_url, config.sqlite_max_connections).await?;
    SessionStore::new(pool.clone()).init().await?;

    let app_state = Arc::new(AppState::new(
        pool,
        client,
        Arc::new(ThreadRandom),
        config.generation_settings(),
    )?);

    let app = build_router(app_state);

    let bind_address = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&bind_address).await?;
    info!("Listening on http://{}", bind_address);

    axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
