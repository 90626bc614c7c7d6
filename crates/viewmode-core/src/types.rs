//! Core types for viewmode
//!
//! The output vocabularies are closed enums. Parsing is an exact,
//! case-sensitive match against the variant names; there is no fuzzy or
//! closest-match recovery anywhere in the crate.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Single picture-only mode (vocabulary revision 1)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ViewingMode {
    Cinema,
    Sport,
    Vivid,
    Music,
    Gaming,
    #[default]
    Standard,
}

impl ViewingMode {
    /// Every legal value, in prompt order
    pub const ALL: [ViewingMode; 6] = [
        Self::Cinema,
        Self::Sport,
        Self::Vivid,
        Self::Music,
        Self::Gaming,
        Self::Standard,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Cinema => "Cinema",
            Self::Sport => "Sport",
            Self::Vivid => "Vivid",
            Self::Music => "Music",
            Self::Gaming => "Gaming",
            Self::Standard => "Standard",
        }
    }
}

impl fmt::Display for ViewingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ViewingMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|m| m.as_str() == s)
            .ok_or_else(|| format!("unknown viewing mode '{}'", s))
    }
}

/// TV picture mode (vocabulary revision 2)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum PictureMode {
    Movie,
    Sports,
    Graphics,
    Entertainment,
    Dynamic,
    Dynamic2,
    #[default]
    Expert,
}

impl PictureMode {
    /// Every legal value, in prompt order
    pub const ALL: [PictureMode; 7] = [
        Self::Movie,
        Self::Sports,
        Self::Graphics,
        Self::Entertainment,
        Self::Dynamic,
        Self::Dynamic2,
        Self::Expert,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Movie => "Movie",
            Self::Sports => "Sports",
            Self::Graphics => "Graphics",
            Self::Entertainment => "Entertainment",
            Self::Dynamic => "Dynamic",
            Self::Dynamic2 => "Dynamic2",
            Self::Expert => "Expert",
        }
    }

    /// Whether `audio` is a legal partner for this picture mode.
    ///
    /// Only `Entertainment` admits two profiles (music-dominant or not).
    pub fn admits(&self, audio: AudioProfile) -> bool {
        match self {
            Self::Entertainment => {
                matches!(audio, AudioProfile::Music | AudioProfile::Entertainment)
            }
            _ => AudioProfile::paired_with(*self, false) == audio,
        }
    }
}

impl fmt::Display for PictureMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PictureMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|m| m.as_str() == s)
            .ok_or_else(|| format!("unknown picture mode '{}'", s))
    }
}

/// TV audio profile (vocabulary revision 2)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AudioProfile {
    Movie,
    Sport,
    Music,
    Entertainment,
    Auto,
}

impl AudioProfile {
    /// Every legal value, in prompt order
    pub const ALL: [AudioProfile; 5] = [
        Self::Movie,
        Self::Sport,
        Self::Music,
        Self::Entertainment,
        Self::Auto,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Movie => "Movie",
            Self::Sport => "Sport",
            Self::Music => "Music",
            Self::Entertainment => "Entertainment",
            Self::Auto => "Auto",
        }
    }

    /// Fixed pairing table from picture mode to audio profile.
    ///
    /// `music_dominant` only matters for `PictureMode::Entertainment`.
    pub fn paired_with(picture: PictureMode, music_dominant: bool) -> Self {
        match picture {
            PictureMode::Movie => Self::Movie,
            PictureMode::Sports => Self::Sport,
            PictureMode::Entertainment if music_dominant => Self::Music,
            PictureMode::Entertainment => Self::Entertainment,
            PictureMode::Graphics => Self::Entertainment,
            PictureMode::Dynamic | PictureMode::Dynamic2 => Self::Auto,
            PictureMode::Expert => Self::Entertainment,
        }
    }
}

impl fmt::Display for AudioProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AudioProfile {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|m| m.as_str() == s)
            .ok_or_else(|| format!("unknown audio profile '{}'", s))
    }
}

/// Paired picture mode and audio profile (vocabulary revision 2)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ViewingSettings {
    pub picture_mode: PictureMode,
    pub audio_profile: AudioProfile,
}

impl ViewingSettings {
    /// Build settings from a picture mode using the fixed pairing table
    pub fn paired(picture_mode: PictureMode, music_dominant: bool) -> Self {
        Self {
            picture_mode,
            audio_profile: AudioProfile::paired_with(picture_mode, music_dominant),
        }
    }

    /// Whether the pair is one the pairing table can produce
    pub fn is_consistent(&self) -> bool {
        self.picture_mode.admits(self.audio_profile)
    }
}

impl Default for ViewingSettings {
    fn default() -> Self {
        Self::paired(PictureMode::Expert, false)
    }
}

impl fmt::Display for ViewingSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "picture_mode={} audio_profile={}",
            self.picture_mode, self.audio_profile
        )
    }
}

/// Which vocabulary the classifier speaks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Revision {
    /// Single viewing mode (revision 1)
    Legacy,
    /// Picture mode plus audio profile (revision 2)
    #[default]
    Paired,
}

impl FromStr for Revision {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "legacy" | "1" => Ok(Self::Legacy),
            "paired" | "2" => Ok(Self::Paired),
            other => Err(format!("unknown revision '{}', expected legacy or paired", other)),
        }
    }
}

impl fmt::Display for Revision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Legacy => f.write_str("legacy"),
            Self::Paired => f.write_str("paired"),
        }
    }
}

/// A validated classification in either vocabulary revision
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Classification {
    Mode { viewing_mode: ViewingMode },
    Settings(ViewingSettings),
}

impl Classification {
    pub fn revision(&self) -> Revision {
        match self {
            Self::Mode { .. } => Revision::Legacy,
            Self::Settings(_) => Revision::Paired,
        }
    }

    pub fn viewing_mode(&self) -> Option<ViewingMode> {
        match self {
            Self::Mode { viewing_mode } => Some(*viewing_mode),
            Self::Settings(_) => None,
        }
    }

    pub fn settings(&self) -> Option<ViewingSettings> {
        match self {
            Self::Mode { .. } => None,
            Self::Settings(settings) => Some(*settings),
        }
    }
}

impl From<ViewingMode> for Classification {
    fn from(viewing_mode: ViewingMode) -> Self {
        Self::Mode { viewing_mode }
    }
}

impl From<ViewingSettings> for Classification {
    fn from(settings: ViewingSettings) -> Self {
        Self::Settings(settings)
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Mode { viewing_mode } => viewing_mode.fmt(f),
            Self::Settings(settings) => settings.fmt(f),
        }
    }
}

/// Where a classification came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    /// Validated answer from the completion backend
    Model,
    /// Keyword-scoring fallback
    Heuristic,
}

impl Source {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Model => "model",
            Self::Heuristic => "heuristic",
        }
    }
}

/// A chat message sent to the completion backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Role of the message sender (system, user, assistant)
    pub role: String,

    /// Content of the message
    pub content: String,
}

impl ChatMessage {
    /// Create a new chat message
    pub fn new(role: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            role: role.into(),
            content: content.into(),
        }
    }

    /// Create a user message
    pub fn user(content: impl Into<String>) -> Self {
        Self::new("user", content)
    }

    /// Create a system message
    pub fn system(content: impl Into<String>) -> Self {
        Self::new("system", content)
    }
}
