// Application state module
// Holds the loaded configuration and the request dispatcher shared by all connections

use std::sync::Arc;

use super::types::Config;
use crate::tools::Dispatcher;
use crate::upstream::{OEmbedClient, OpenAiClient, UpstreamError};

/// Application state
pub struct AppState {
    pub config: Config,
    pub dispatcher: Dispatcher,
}

impl AppState {
    pub const fn new(config: Config, dispatcher: Dispatcher) -> Self {
        Self { config, dispatcher }
    }

    /// Build state with the HTTP-backed generation and metadata clients
    pub fn from_config(config: Config) -> Result<Self, UpstreamError> {
        let generator = OpenAiClient::from_config(&config.generation)?;
        let metadata = OEmbedClient::from_config(&config.metadata)?;
        let dispatcher = Dispatcher::new(
            Arc::new(generator),
            Arc::new(metadata),
            config.generation.model.clone(),
        );
        Ok(Self::new(config, dispatcher))
    }

    pub fn access_log_enabled(&self) -> bool {
        self.config.logging.access_log
    }
}
