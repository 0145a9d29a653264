//! Layered configuration.
//!
//! Server settings resolve as defaults < config file < `NEXUS_`-prefixed
//! environment variables < CLI flags. Engine settings come straight from the
//! environment (the API credential never lives in a config file).

use clap::Parser;
use config::{Config, Environment};
use serde::Deserialize;

use crate::engine::{DEFAULT_MODEL, EngineSettings, GEMINI_BASE_URL};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Config file path
    #[arg(short, long, env = "CONFIG_FILE")]
    pub config: Option<String>,

    /// Port to listen on
    #[arg(long, env = "PORT")]
    pub port: Option<u16>,

    /// Host interface to bind
    #[arg(long, env = "HOST")]
    pub host: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub port: u16,
    pub host: String,
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::load_from_args(std::env::args())
    }

    pub fn load_from_args<I, T>(args: I) -> Result<Self, config::ConfigError>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        let cli =
            Cli::try_parse_from(args).map_err(|e| config::ConfigError::Message(e.to_string()))?;

        let mut builder = Config::builder()
            .set_default("server.port", 3000)?
            .set_default("server.host", "127.0.0.1")?;

        if let Some(path) = &cli.config {
            builder = builder.add_source(config::File::with_name(path));
        }

        // E.g. NEXUS_SERVER__PORT=8000
        builder = builder.add_source(
            Environment::with_prefix("NEXUS")
                .separator("__")
                .try_parsing(true),
        );

        // CLI flags (and their env fallbacks, via clap) win over everything.
        if let Some(port) = cli.port {
            builder = builder.set_override("server.port", i64::from(port))?;
        }
        if let Some(host) = &cli.host {
            builder = builder.set_override("server.host", host.clone())?;
        }

        let cfg = builder.build()?;
        cfg.try_deserialize()
    }
}

/// Load engine settings from the environment.
pub fn load_engine_settings() -> Result<EngineSettings, String> {
    let api_key = std::env::var("GEMINI_API_KEY")
        .map_err(|_| "Missing required env var: GEMINI_API_KEY".to_string())?;
    if api_key.trim().is_empty() {
        return Err("GEMINI_API_KEY cannot be empty".to_string());
    }

    let model = std::env::var("NEXUS_MODEL")
        .ok()
        .filter(|s| !s.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_MODEL.to_string());

    let base_url = std::env::var("NEXUS_GEMINI_BASE_URL")
        .ok()
        .filter(|s| !s.trim().is_empty())
        .unwrap_or_else(|| GEMINI_BASE_URL.to_string());

    Ok(EngineSettings {
        api_key,
        model,
        base_url,
    })
}
