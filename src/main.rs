//! Nexus QA server entry point.

use mimalloc::MiMalloc;

/// Global allocator for improved performance (M-MIMALLOC-APPS).
#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

use std::sync::Arc;

use dotenvy::dotenv;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use nexus_qa::AppState;
use nexus_qa::config::{self, AppConfig};
use nexus_qa::engine::AnswerEngine;
use nexus_qa::server::start_server;
use nexus_qa::session::SessionStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing (M-LOG-STRUCTURED)
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true))
        .with(EnvFilter::from_default_env().add_directive("info".parse().unwrap()))
        .init();

    // Load .env (if present)
    let _ = dotenv();

    let app_config =
        AppConfig::load().map_err(|e| anyhow::anyhow!("configuration error: {e}"))?;

    let settings = match config::load_engine_settings() {
        Ok(s) => s,
        Err(msg) => {
            eprintln!("Configuration error: {msg}");
            std::process::exit(1);
        }
    };

    tracing::info!(
        name: "engine.config.loaded",
        base_url = %settings.base_url,
        model = %settings.model,
        "Engine configuration loaded"
    );

    let state = AppState {
        engine: Arc::new(AnswerEngine::new(settings)),
        sessions: SessionStore::new(),
    };

    start_server(&app_config, state).await
}
