//! YouTube oEmbed metadata lookup

use super::{MetadataLookup, VideoMetadata};
use crate::error::{Error, Result};
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

/// Default public oEmbed endpoint
pub const DEFAULT_OEMBED_ENDPOINT: &str = "https://www.youtube.com/oembed";

/// Resolves video URLs through an oEmbed endpoint
#[derive(Debug, Clone)]
pub struct OembedClient {
    client: reqwest::Client,
    endpoint: String,
}

impl OembedClient {
    /// Create a client against `endpoint` with a whole-request timeout
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }
}

impl Default for OembedClient {
    fn default() -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: DEFAULT_OEMBED_ENDPOINT.to_string(),
        }
    }
}

#[async_trait]
impl MetadataLookup for OembedClient {
    async fn lookup(&self, url: &str) -> Result<Option<VideoMetadata>> {
        let response = self
            .client
            .get(&self.endpoint)
            .query(&[("url", url), ("format", "json")])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::backend(format!("oembed lookup returned {}", status)));
        }

        let body: OembedResponse = response.json().await?;
        let title = body.title.map(|t| t.trim().to_string()).unwrap_or_default();
        if title.is_empty() {
            debug!(url, "oembed response carried no title");
            return Ok(None);
        }

        Ok(Some(VideoMetadata {
            title,
            author_name: body.author_name.filter(|a| !a.trim().is_empty()),
        }))
    }
}

#[derive(Debug, Deserialize)]
struct OembedResponse {
    title: Option<String>,
    author_name: Option<String>,
}
