use super::{LookupOutcome, Result, VideoMetadata, VideoMetadataSource};
use crate::config::MetadataConfig;
use async_trait::async_trait;
use reqwest::Client;

/// Unauthenticated YouTube oEmbed lookup
pub struct OEmbedClient {
    client: Client,
    endpoint: String,
}

impl OEmbedClient {
    pub fn new(client: Client, endpoint: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
        }
    }

    pub fn from_config(config: &MetadataConfig) -> Result<Self> {
        let client = Client::builder().build()?;
        Ok(Self::new(client, config.oembed_url.as_str()))
    }

    /// The watch URL is embedded unencoded, the way YouTube documents the call
    fn lookup_url(&self, video_id: &str) -> String {
        format!(
            "{}?url=https://www.youtube.com/watch?v={video_id}&format=json",
            self.endpoint
        )
    }
}

#[async_trait]
impl VideoMetadataSource for OEmbedClient {
    async fn lookup(&self, video_id: &str) -> Result<LookupOutcome> {
        let response = self.client.get(self.lookup_url(video_id)).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Ok(LookupOutcome::Unavailable(status.as_u16()));
        }

        let metadata: VideoMetadata = serde_json::from_slice(&response.bytes().await?)?;
        Ok(LookupOutcome::Found(metadata))
    }
}
