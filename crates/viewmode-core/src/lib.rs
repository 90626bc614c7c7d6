//! viewmode Core
//!
//! Core types, traits, and collaborators shared across viewmode components.
//!
//! This crate provides:
//! - The closed output vocabularies (viewing modes, picture modes, audio profiles)
//! - Error types and result handling
//! - The collaborator traits the classifier depends on (completion backend,
//!   metadata lookup) and their HTTP implementations

pub mod adapters;
pub mod error;
pub mod types;

pub use adapters::{
    looks_like_youtube_url, CompletionBackend, MetadataLookup, OembedClient, OpenAiBackend,
    OpenAiSettings, VideoMetadata,
};
pub use error::{Error, Result};
pub use types::{
    AudioProfile, ChatMessage, Classification, PictureMode, Revision, Source, ViewingMode,
    ViewingSettings,
};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::adapters::{CompletionBackend, MetadataLookup, VideoMetadata};
    pub use crate::error::{Error, Result};
    pub use crate::types::{
        AudioProfile, ChatMessage, Classification, PictureMode, Revision, Source, ViewingMode,
        ViewingSettings,
    };
}
