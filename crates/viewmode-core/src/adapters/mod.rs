//! External collaborators
//!
//! The classifier depends on two outside services: a chat-completion
//! backend that proposes a classification, and a metadata lookup that turns
//! a video URL into a human-readable title. Both sit behind traits so the
//! orchestrator can be driven by fakes in tests.

mod oembed;
mod openai;

pub use oembed::{OembedClient, DEFAULT_OEMBED_ENDPOINT};
pub use openai::{OpenAiBackend, OpenAiSettings};

use crate::error::Result;
use crate::types::ChatMessage;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use url::Url;

/// Chat-completion backend that answers a classification prompt
#[async_trait]
pub trait CompletionBackend: Send + Sync {
    /// Send the messages and return the raw assistant text
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String>;

    /// Backend name for logs
    fn name(&self) -> &str;
}

/// Resolves a video URL to metadata
#[async_trait]
pub trait MetadataLookup: Send + Sync {
    /// Look up the URL. `Ok(None)` means the service had no title for it.
    async fn lookup(&self, url: &str) -> Result<Option<VideoMetadata>>;
}

/// Metadata resolved for a video URL
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoMetadata {
    /// Video title
    pub title: String,

    /// Channel name, when the service reports one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author_name: Option<String>,
}

impl VideoMetadata {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            author_name: None,
        }
    }

    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author_name = Some(author.into());
        self
    }

    /// Text handed to the completion backend in place of the raw URL
    pub fn prompt_text(&self) -> String {
        match &self.author_name {
            Some(author) if !author.trim().is_empty() => {
                format!("TITLE: {}\nCHANNEL: {}", self.title, author)
            }
            _ => format!("TITLE: {}", self.title),
        }
    }
}

/// Whether the whole input is a YouTube video URL (scheme optional)
pub fn looks_like_youtube_url(text: &str) -> bool {
    let trimmed = text.trim();
    if trimmed.is_empty() || trimmed.chars().any(char::is_whitespace) {
        return false;
    }

    let candidate: Cow<'_, str> = if trimmed.contains("://") {
        Cow::Borrowed(trimmed)
    } else {
        Cow::Owned(format!("https://{}", trimmed))
    };

    let Ok(url) = Url::parse(&candidate) else {
        return false;
    };
    if !matches!(url.scheme(), "http" | "https") {
        return false;
    }

    let youtube_host = match url.host_str() {
        Some(host) => {
            host == "youtube.com" || host.ends_with(".youtube.com") || host == "youtu.be"
        }
        None => false,
    };

    youtube_host && url.path().len() > 1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_youtube_url_detection() {
        assert!(looks_like_youtube_url("https://www.youtube.com/watch?v=dQw4w9WgXcQ"));
        assert!(looks_like_youtube_url("https://youtu.be/dQw4w9WgXcQ?t=30"));
        assert!(looks_like_youtube_url("youtube.com/shorts/abc123def45"));
        assert!(looks_like_youtube_url("  https://m.youtube.com/watch?v=abc  "));
        assert!(looks_like_youtube_url("HTTPS://WWW.YOUTUBE.COM/watch?v=abc"));

        assert!(!looks_like_youtube_url("https://vimeo.com/123456789"));
        assert!(!looks_like_youtube_url("https://youtube.com"));
        assert!(!looks_like_youtube_url("Best of youtube.com/ 2024"));
        assert!(!looks_like_youtube_url("Lakers vs Warriors Highlights"));
        assert!(!looks_like_youtube_url("https://notyoutube.com/watch?v=abc"));
        assert!(!looks_like_youtube_url(""));
    }

    #[test]
    fn test_prompt_text() {
        let meta = VideoMetadata::new("UFC 310 Highlights").with_author("UFC");
        assert_eq!(meta.prompt_text(), "TITLE: UFC 310 Highlights\nCHANNEL: UFC");

        let meta = VideoMetadata::new("Untitled");
        assert_eq!(meta.prompt_text(), "TITLE: Untitled");
    }
}
