//! Classifier configuration

use crate::heuristic::HeuristicClassifier;
use crate::keywords::{KeywordTable, TierWeights};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use viewmode_core::adapters::DEFAULT_OEMBED_ENDPOINT;
use viewmode_core::{Error, OpenAiSettings, Result, Revision};

/// Settings for the classifier and its external collaborators
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifierConfig {
    /// Output vocabulary
    #[serde(default)]
    pub revision: Revision,

    /// Completion model identifier
    #[serde(default = "default_model")]
    pub model: String,

    /// OpenAI-compatible API base URL
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Sampling temperature; omitted from requests when unset
    #[serde(default)]
    pub temperature: Option<f32>,

    #[serde(default = "default_max_output_tokens")]
    pub max_output_tokens: u32,

    /// Deadline for one completion call
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,

    /// Maximum concurrent completion calls
    #[serde(default = "default_max_in_flight")]
    pub max_in_flight: usize,

    /// LRU cache entries (0 disables the cache)
    #[serde(default = "default_cache_capacity")]
    pub cache_capacity: usize,

    #[serde(default = "default_oembed_endpoint")]
    pub oembed_endpoint: String,

    #[serde(default = "default_oembed_timeout_ms")]
    pub oembed_timeout_ms: u64,

    /// YAML keyword table replacing the built-in one
    #[serde(default)]
    pub keywords_path: Option<PathBuf>,

    #[serde(default)]
    pub weights: TierWeights,

    /// Cinema points added for an episode marker (`S01E02`)
    #[serde(default = "default_series_bonus")]
    pub series_bonus: u32,

    /// Smallest score that may win; below it the default applies
    #[serde(default = "default_min_score")]
    pub min_score: u32,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            revision: Revision::default(),
            model: default_model(),
            base_url: default_base_url(),
            temperature: None,
            max_output_tokens: default_max_output_tokens(),
            request_timeout_ms: default_request_timeout_ms(),
            max_in_flight: default_max_in_flight(),
            cache_capacity: default_cache_capacity(),
            oembed_endpoint: default_oembed_endpoint(),
            oembed_timeout_ms: default_oembed_timeout_ms(),
            keywords_path: None,
            weights: TierWeights::default(),
            series_bonus: default_series_bonus(),
            min_score: default_min_score(),
        }
    }
}

/// File layout: settings either at the top level or under `classifier:`
#[derive(Deserialize)]
#[serde(untagged)]
enum ConfigFile {
    Sectioned { classifier: ClassifierConfig },
    Bare(ClassifierConfig),
}

impl ClassifierConfig {
    /// Load from YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config = match serde_yaml::from_str::<ConfigFile>(yaml)? {
            ConfigFile::Sectioned { classifier } => classifier,
            ConfigFile::Bare(config) => config,
        };
        config.validate()?;
        Ok(config)
    }

    /// Load from file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    pub fn validate(&self) -> Result<()> {
        self.weights.validate()?;

        if self.model.trim().is_empty() {
            return Err(Error::config("model must not be empty"));
        }
        if self.request_timeout_ms == 0 || self.oembed_timeout_ms == 0 {
            return Err(Error::config("timeouts must be greater than zero"));
        }
        if self.max_in_flight == 0 {
            return Err(Error::config("max_in_flight must be greater than zero"));
        }
        if self.max_output_tokens == 0 {
            return Err(Error::config("max_output_tokens must be greater than zero"));
        }
        if self.min_score == 0 {
            return Err(Error::config("min_score must be at least 1"));
        }
        if let Some(t) = self.temperature {
            if !(0.0..=2.0).contains(&t) {
                return Err(Error::config(format!(
                    "temperature must be within 0.0..=2.0 (got {})",
                    t
                )));
            }
        }

        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    pub fn oembed_timeout(&self) -> Duration {
        Duration::from_millis(self.oembed_timeout_ms)
    }

    /// The configured keyword table, or the built-in one
    pub fn keyword_table(&self) -> Result<KeywordTable> {
        match &self.keywords_path {
            Some(path) => KeywordTable::from_file(path),
            None => Ok(KeywordTable::default()),
        }
    }

    /// Build the heuristic classifier these settings describe
    pub fn heuristic(&self) -> Result<HeuristicClassifier> {
        let table = self.keyword_table()?;
        Ok(HeuristicClassifier::new(&table, self.weights)?
            .with_series_bonus(self.series_bonus)
            .with_min_score(self.min_score))
    }

    /// Completion backend settings for `api_key`
    pub fn openai_settings(&self, api_key: impl Into<String>) -> OpenAiSettings {
        let mut settings = OpenAiSettings::new(api_key, self.model.clone());
        settings.base_url = self.base_url.clone();
        settings.temperature = self.temperature;
        settings.max_output_tokens = self.max_output_tokens;
        settings.timeout = self.request_timeout();
        settings
    }
}

fn default_model() -> String {
    "gpt-4.1-mini".to_string()
}

fn default_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_max_output_tokens() -> u32 {
    64
}

fn default_request_timeout_ms() -> u64 {
    10_000
}

fn default_max_in_flight() -> usize {
    8
}

fn default_cache_capacity() -> usize {
    512
}

fn default_oembed_endpoint() -> String {
    DEFAULT_OEMBED_ENDPOINT.to_string()
}

fn default_oembed_timeout_ms() -> u64 {
    2_000
}

fn default_series_bonus() -> u32 {
    3
}

fn default_min_score() -> u32 {
    1
}
