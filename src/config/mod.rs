// Configuration module entry point
// Loads application configuration and holds the shared runtime state

mod state;
mod types;

use std::net::SocketAddr;

// Re-export public types
pub use state::AppState;
pub use types::{Config, GenerationConfig, HealthConfig, MetadataConfig};

/// Environment variable that overrides `generation.api_key`
pub const API_KEY_ENV: &str = "OPENAI_API_KEY";

impl Config {
    /// Load configuration from specified file path (without extension)
    /// Default config file is "config.toml" when no path specified
    pub fn load_from(config_path: &str) -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(
                config::Environment::with_prefix("CREATOR")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 8080)?
            .set_default("logging.level", "info")?
            .set_default("logging.access_log", true)?
            .set_default("performance.keep_alive_timeout", 75)?
            .set_default("performance.read_timeout", 120)?
            .set_default("performance.shutdown_grace", 10)?
            .set_default("http.server_name", "creator-tools/0.1")?
            .set_default("http.max_body_size", 1_048_576)? // 1MB
            .set_default("routes.endpoint", "/api/ai-tools")?
            .set_default("generation.model", "gpt-4o-mini")?
            .set_default("generation.base_url", "https://api.openai.com/v1")?
            .set_default("metadata.oembed_url", "https://www.youtube.com/oembed")?
            .set_override_option("generation.api_key", std::env::var(API_KEY_ENV).ok())?
            .build()?;

        settings.try_deserialize()
    }

    pub fn get_socket_addr(&self) -> Result<SocketAddr, String> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|e| format!("Invalid address: {e}"))
    }
}
