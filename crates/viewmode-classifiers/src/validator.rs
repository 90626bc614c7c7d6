//! Strict validation of completion backend output
//!
//! The backend must answer with a bare JSON object holding exactly the keys
//! of the configured revision, each a case-sensitive member of its
//! vocabulary. Nothing is coerced: a near miss is a rejection, and the
//! orchestrator falls back to the heuristic.

use serde_json::{Map, Value};
use std::str::FromStr;
use thiserror::Error;
use viewmode_core::{AudioProfile, Classification, PictureMode, Revision, ViewingMode, ViewingSettings};

const VIEWING_MODE: &str = "viewing_mode";
const PICTURE_MODE: &str = "picture_mode";
const AUDIO_PROFILE: &str = "audio_profile";

/// Why a backend answer was rejected
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("response is not valid JSON: {0}")]
    NotJson(String),

    #[error("response is JSON but not an object")]
    NotAnObject,

    #[error("missing key '{0}'")]
    MissingKey(&'static str),

    #[error("unexpected key '{0}'")]
    UnexpectedKey(String),

    #[error("value of '{0}' is not a string")]
    NotAString(&'static str),

    #[error("'{value}' is not a legal {key}")]
    UnknownValue { key: &'static str, value: String },

    #[error("audio profile {audio} cannot pair with picture mode {picture}")]
    InconsistentPairing {
        picture: PictureMode,
        audio: AudioProfile,
    },
}

impl ValidationError {
    /// Short label for metrics
    pub fn label(&self) -> &'static str {
        match self {
            Self::NotJson(_) => "not_json",
            Self::NotAnObject => "not_an_object",
            Self::MissingKey(_) => "missing_key",
            Self::UnexpectedKey(_) => "unexpected_key",
            Self::NotAString(_) => "not_a_string",
            Self::UnknownValue { .. } => "unknown_value",
            Self::InconsistentPairing { .. } => "inconsistent_pairing",
        }
    }
}

/// Validate `raw` backend text against the vocabulary of `revision`
pub fn validate(raw: &str, revision: Revision) -> Result<Classification, ValidationError> {
    let value: Value =
        serde_json::from_str(raw.trim()).map_err(|e| ValidationError::NotJson(e.to_string()))?;
    let Value::Object(object) = value else {
        return Err(ValidationError::NotAnObject);
    };

    match revision {
        Revision::Legacy => {
            expect_keys(&object, &[VIEWING_MODE])?;
            let viewing_mode: ViewingMode = field(&object, VIEWING_MODE)?;
            Ok(Classification::from(viewing_mode))
        }
        Revision::Paired => {
            expect_keys(&object, &[PICTURE_MODE, AUDIO_PROFILE])?;
            let settings = ViewingSettings {
                picture_mode: field(&object, PICTURE_MODE)?,
                audio_profile: field(&object, AUDIO_PROFILE)?,
            };
            if !settings.is_consistent() {
                return Err(ValidationError::InconsistentPairing {
                    picture: settings.picture_mode,
                    audio: settings.audio_profile,
                });
            }
            Ok(Classification::from(settings))
        }
    }
}

fn expect_keys(object: &Map<String, Value>, keys: &[&'static str]) -> Result<(), ValidationError> {
    if let Some(extra) = object.keys().find(|k| !keys.contains(&k.as_str())) {
        return Err(ValidationError::UnexpectedKey(extra.clone()));
    }
    match keys.iter().copied().find(|k| !object.contains_key(*k)) {
        Some(missing) => Err(ValidationError::MissingKey(missing)),
        None => Ok(()),
    }
}

fn field<T: FromStr>(object: &Map<String, Value>, key: &'static str) -> Result<T, ValidationError> {
    let value = object
        .get(key)
        .ok_or(ValidationError::MissingKey(key))?
        .as_str()
        .ok_or(ValidationError::NotAString(key))?;

    value.parse().map_err(|_| ValidationError::UnknownValue {
        key,
        value: value.to_string(),
    })
}
