//! Request dispatcher
//!
//! Validates a decoded [`ToolRequest`], routes it on the `tool`
//! discriminator and produces the generated result. Each request is
//! independent; the dispatcher holds no mutable state.

use std::sync::Arc;

use super::error::{DispatchError, TagExtractionError};
use super::{input, prompt, tags, Tool, ToolOutput, ToolRequest};
use crate::logger;
use crate::upstream::{LookupOutcome, TextGenerator, VideoMetadataSource};

pub struct Dispatcher {
    generator: Arc<dyn TextGenerator>,
    metadata: Arc<dyn VideoMetadataSource>,
    model: String,
}

impl Dispatcher {
    pub fn new(
        generator: Arc<dyn TextGenerator>,
        metadata: Arc<dyn VideoMetadataSource>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            generator,
            metadata,
            model: model.into(),
        }
    }

    /// Run one tool request to completion
    pub async fn dispatch(&self, request: &ToolRequest) -> Result<ToolOutput, DispatchError> {
        let tool = resolve_tool(request.tool.as_deref())?;
        logger::log_debug(&format!("[Dispatch] tool={tool}"));

        let prompt = match tool {
            Tool::TagExtractor => return self.extract_tags(request.url.as_deref()).await,
            Tool::TitleGenerator => prompt::title_prompt(&input::parse_title(required_input(request)?)),
            Tool::DescriptionMaker => {
                prompt::description_prompt(&input::parse_description(required_input(request)?))
            }
            Tool::ShortsScript => {
                prompt::shorts_script_prompt(&input::parse_script(required_input(request)?))
            }
            Tool::ThumbnailIdeas => {
                prompt::thumbnail_prompt(&input::parse_script(required_input(request)?))
            }
            Tool::HashtagFinder => {
                prompt::hashtag_prompt(&input::parse_hashtag(required_input(request)?))
            }
        };

        let text = self.generator.generate(&self.model, &prompt).await?;
        Ok(ToolOutput::Text(text))
    }

    /// Tag-extractor branch. URL validation is reported as a bad request;
    /// every later failure collapses into [`DispatchError::TagExtraction`].
    async fn extract_tags(&self, url: Option<&str>) -> Result<ToolOutput, DispatchError> {
        let url = url.ok_or(TagExtractionError::MissingUrl)?;
        let video_id = tags::extract_video_id(url).ok_or(DispatchError::InvalidYoutubeUrl)?;

        let tags = self.tags_for_video(video_id).await?;
        Ok(ToolOutput::Tags(tags))
    }

    async fn tags_for_video(&self, video_id: &str) -> Result<Vec<String>, TagExtractionError> {
        let outcome = self
            .metadata
            .lookup(video_id)
            .await
            .map_err(TagExtractionError::Lookup)?;

        match outcome {
            LookupOutcome::Found(video) => {
                logger::log_debug(&format!(
                    "[Tags] video {video_id:?}: {:?} by {:?}",
                    video.title,
                    video.author_name.as_deref().unwrap_or("unknown")
                ));
                let prompt = prompt::video_tags_prompt(&video.title);
                let text = self
                    .generator
                    .generate(&self.model, &prompt)
                    .await
                    .map_err(TagExtractionError::Generation)?;
                Ok(tags::parse_generated_tags(&text))
            }
            LookupOutcome::Unavailable(status) => {
                logger::log_warning(&format!(
                    "Metadata lookup for video {video_id:?} returned {status}, using fallback tags"
                ));
                Ok(tags::fallback_tags())
            }
        }
    }
}

/// An absent or empty `tool` is missing; anything else must name a known tool.
fn resolve_tool(tool: Option<&str>) -> Result<Tool, DispatchError> {
    match tool {
        None | Some("") => Err(DispatchError::MissingTool),
        Some(name) => name.parse(),
    }
}

fn required_input(request: &ToolRequest) -> Result<&str, DispatchError> {
    request.input.as_deref().ok_or(DispatchError::MissingInput)
}

#[cfg(test)]
pub(crate) mod testing {
    //! Deterministic stand-ins for the upstream services

    use std::sync::Mutex;

    use async_trait::async_trait;

    use crate::upstream::{
        LookupOutcome, Result, TextGenerator, UpstreamError, VideoMetadata, VideoMetadataSource,
    };

    /// Records every prompt and answers with a canned reply
    pub struct RecordingGenerator {
        reply: std::result::Result<String, String>,
        pub calls: Mutex<Vec<(String, String)>>,
    }

    impl RecordingGenerator {
        pub fn replying(text: &str) -> Self {
            Self {
                reply: Ok(text.to_string()),
                calls: Mutex::new(Vec::new()),
            }
        }

        pub fn failing(message: &str) -> Self {
            Self {
                reply: Err(message.to_string()),
                calls: Mutex::new(Vec::new()),
            }
        }

        pub fn prompts(&self) -> Vec<String> {
            self.calls.lock().unwrap().iter().map(|(_, p)| p.clone()).collect()
        }
    }

    #[async_trait]
    impl TextGenerator for RecordingGenerator {
        async fn generate(&self, model: &str, prompt: &str) -> Result<String> {
            self.calls
                .lock()
                .unwrap()
                .push((model.to_string(), prompt.to_string()));
            self.reply.clone().map_err(UpstreamError::Api)
        }
    }

    pub enum StubLookup {
        Found(&'static str),
        Unavailable(u16),
        Broken,
    }

    #[async_trait]
    impl VideoMetadataSource for StubLookup {
        async fn lookup(&self, _video_id: &str) -> Result<LookupOutcome> {
            match self {
                Self::Found(title) => Ok(LookupOutcome::Found(VideoMetadata {
                    title: (*title).to_string(),
                    author_name: None,
                })),
                Self::Unavailable(status) => Ok(LookupOutcome::Unavailable(*status)),
                Self::Broken => Err(UpstreamError::Api("connection reset".to_string())),
            }
        }
    }
}
