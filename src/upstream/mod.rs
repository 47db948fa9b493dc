//! Upstream collaborators
//!
//! The dispatcher talks to two external services:
//! - a text generation provider (model identifier + prompt -> text)
//! - a video metadata lookup (public video id -> title)
//!
//! Both sit behind traits so the dispatcher can be driven by test doubles.

mod oembed;
mod openai;

pub use oembed::OEmbedClient;
pub use openai::OpenAiClient;

use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum UpstreamError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Api(String),
}

pub type Result<T> = std::result::Result<T, UpstreamError>;

/// Text generation capability
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Run `prompt` against `model` and return the generated text verbatim
    async fn generate(&self, model: &str, prompt: &str) -> Result<String>;
}

/// Public metadata of a video
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct VideoMetadata {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub author_name: Option<String>,
}

/// Result of a metadata lookup that reached the service
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupOutcome {
    Found(VideoMetadata),
    /// The service answered with a non-success status
    Unavailable(u16),
}

/// Video metadata lookup capability
#[async_trait]
pub trait VideoMetadataSource: Send + Sync {
    async fn lookup(&self, video_id: &str) -> Result<LookupOutcome>;
}
