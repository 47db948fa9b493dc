use hyper::StatusCode;
use thiserror::Error;

use crate::upstream::UpstreamError;

/// Failures inside the tag-extractor branch after the URL was accepted.
/// All of them surface to the caller as the same fixed message.
#[derive(Error, Debug)]
pub enum TagExtractionError {
    #[error("url parameter is missing")]
    MissingUrl,

    #[error("metadata lookup failed: {0}")]
    Lookup(UpstreamError),

    #[error("tag generation failed: {0}")]
    Generation(UpstreamError),
}

/// Every way a request to the tool endpoint can fail
#[derive(Error, Debug)]
pub enum DispatchError {
    #[error("Method not allowed")]
    MethodNotAllowed,

    #[error("Tool parameter is required")]
    MissingTool,

    #[error("Invalid tool request: {0:?}")]
    InvalidTool(String),

    #[error("Invalid YouTube URL")]
    InvalidYoutubeUrl,

    #[error("Input parameter is required")]
    MissingInput,

    #[error("{0}")]
    Generation(#[from] UpstreamError),

    #[error("Failed to extract tags: {0}")]
    TagExtraction(#[from] TagExtractionError),

    #[error("Request body too large")]
    PayloadTooLarge,

    #[error("Failed to read request body: {0}")]
    UnreadableBody(String),

    #[error("Invalid JSON: {0}")]
    InvalidBody(String),
}

impl DispatchError {
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            Self::MissingTool
            | Self::InvalidTool(_)
            | Self::InvalidYoutubeUrl
            | Self::UnreadableBody(_)
            | Self::InvalidBody(_) => StatusCode::BAD_REQUEST,
            Self::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            Self::MissingInput | Self::Generation(_) | Self::TagExtraction(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Text placed in the `error` field of the response body
    pub fn public_message(&self) -> String {
        match self {
            Self::InvalidTool(_) => "Invalid tool request".to_string(),
            Self::TagExtraction(_) => "Failed to extract tags".to_string(),
            Self::UnreadableBody(_) => "Failed to read request body".to_string(),
            other => other.to_string(),
        }
    }
}
