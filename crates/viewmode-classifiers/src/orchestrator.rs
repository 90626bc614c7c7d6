//! Classification orchestrator
//!
//! Runs the model path with the heuristic as a safety net:
//!
//! 1. Normalize the input and consult the LRU cache
//! 2. Resolve YouTube URLs to a title through the metadata lookup
//! 3. Ask the completion backend, bounded by a semaphore and a timeout
//! 4. Validate the answer strictly
//! 5. On any failure, classify the resolved title with the heuristic
//!
//! `classify` only fails for empty input; every other path yields a
//! well-formed classification.

use crate::cache::LruCache;
use crate::config::ClassifierConfig;
use crate::heuristic::HeuristicClassifier;
use crate::normalize::normalize;
use crate::prompt::PromptBuilder;
use crate::validator::{validate, ValidationError};
use serde::Serialize;
use std::sync::Arc;
use std::time::{Duration, Instant};
use thiserror::Error;
use tokio::sync::Semaphore;
use tracing::{debug, info, warn};
use viewmode_core::{
    looks_like_youtube_url, Classification, CompletionBackend, Error, MetadataLookup,
    OembedClient, OpenAiBackend, Result, Revision, Source,
};

/// Classification plus where it came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Outcome {
    pub classification: Classification,
    pub source: Source,
}

/// The only error `classify` reports to callers
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InputError {
    #[error("input must be a non-empty video title or YouTube URL")]
    Empty,
}

/// Why the model path was abandoned for one request
#[derive(Error, Debug)]
pub enum FallbackReason {
    #[error("no completion backend configured")]
    Disabled,

    #[error("completion backend timed out after {0:?}")]
    Timeout(Duration),

    #[error("completion backend failed: {0}")]
    Backend(Error),

    #[error("completion rejected: {0}")]
    Invalid(ValidationError),
}

impl FallbackReason {
    /// Metric label
    pub fn label(&self) -> &'static str {
        match self {
            Self::Disabled => "disabled",
            Self::Timeout(_) => "timeout",
            Self::Backend(e) => e.kind(),
            Self::Invalid(_) => "invalid",
        }
    }
}

/// Text the model and the heuristic work from
struct ResolvedInput {
    /// Title scored by the heuristic
    title: String,
    /// User message for the backend
    prompt: String,
}

/// Viewing-mode classifier with model path, fallback and cache
pub struct ViewingClassifier {
    revision: Revision,
    heuristic: HeuristicClassifier,
    prompt: PromptBuilder,
    backend: Option<Arc<dyn CompletionBackend>>,
    metadata: Option<Arc<dyn MetadataLookup>>,
    cache: LruCache<Outcome>,
    permits: Semaphore,
    request_timeout: Duration,
}

impl ViewingClassifier {
    pub fn builder(heuristic: HeuristicClassifier) -> ClassifierBuilder {
        ClassifierBuilder::new(heuristic)
    }

    /// Build the full classifier from configuration.
    ///
    /// A missing or blank `api_key` disables the model path; the metadata
    /// lookup is still used so URLs resolve to titles for the heuristic.
    pub fn from_config(config: &ClassifierConfig, api_key: Option<&str>) -> Result<Self> {
        let mut builder = ClassifierBuilder::from_config(config)?;

        match api_key.map(str::trim).filter(|k| !k.is_empty()) {
            Some(key) => {
                let backend = OpenAiBackend::new(config.openai_settings(key))?;
                info!(model = %config.model, "Completion backend enabled");
                builder = builder.backend(Arc::new(backend));
            }
            None => info!("No API key configured, classifying with the keyword heuristic only"),
        }

        let oembed = OembedClient::new(config.oembed_endpoint.clone(), config.oembed_timeout())?;
        Ok(builder.metadata(Arc::new(oembed)).build())
    }

    pub fn revision(&self) -> Revision {
        self.revision
    }

    pub fn has_backend(&self) -> bool {
        self.backend.is_some()
    }

    pub fn cache_len(&self) -> usize {
        self.cache.len()
    }

    pub fn heuristic(&self) -> &HeuristicClassifier {
        &self.heuristic
    }

    /// Classify a title or YouTube URL
    pub async fn classify(&self, input: &str) -> std::result::Result<Outcome, InputError> {
        let key = normalize(input);
        if key.is_empty() {
            return Err(InputError::Empty);
        }

        let start = Instant::now();
        metrics::counter!("viewmode_requests_total").increment(1);

        if let Some(outcome) = self.cache.get(&key) {
            metrics::counter!("viewmode_cache_hits_total").increment(1);
            debug!(input = %key, result = %outcome.classification, "Cache hit");
            return Ok(outcome);
        }

        let resolved = self.resolve(input.trim()).await;

        let outcome = match self.ask_model(&resolved.prompt).await {
            Ok(classification) => Outcome {
                classification,
                source: Source::Model,
            },
            Err(reason) => {
                metrics::counter!("viewmode_fallbacks_total", "reason" => reason.label())
                    .increment(1);
                match reason {
                    FallbackReason::Disabled => debug!("Using keyword heuristic"),
                    _ => warn!(reason = reason.label(), "Falling back to keyword heuristic: {}", reason),
                }
                Outcome {
                    classification: self.heuristic.classify(&resolved.title, self.revision),
                    source: Source::Heuristic,
                }
            }
        };

        self.cache.insert(key, outcome);

        let latency = start.elapsed();
        metrics::histogram!("viewmode_classify_latency_us").record(latency.as_micros() as f64);
        debug!(
            title = %resolved.title,
            result = %outcome.classification,
            source = outcome.source.as_str(),
            latency_us = latency.as_micros() as u64,
            "Classified"
        );

        Ok(outcome)
    }

    async fn resolve(&self, input: &str) -> ResolvedInput {
        let raw = || ResolvedInput {
            title: input.to_string(),
            prompt: input.to_string(),
        };

        let Some(metadata) = &self.metadata else {
            return raw();
        };
        if !looks_like_youtube_url(input) {
            return raw();
        }

        match tokio::time::timeout(self.request_timeout, metadata.lookup(input)).await {
            Ok(Ok(Some(meta))) => {
                debug!(url = input, title = %meta.title, "Resolved video metadata");
                ResolvedInput {
                    prompt: meta.prompt_text(),
                    title: meta.title,
                }
            }
            Ok(Ok(None)) => {
                debug!(url = input, "No title for URL, using raw input");
                raw()
            }
            Ok(Err(e)) => {
                debug!(url = input, error = %e, "Metadata lookup failed, using raw input");
                raw()
            }
            Err(_) => {
                debug!(url = input, "Metadata lookup timed out, using raw input");
                raw()
            }
        }
    }

    async fn ask_model(&self, content: &str) -> std::result::Result<Classification, FallbackReason> {
        let backend = self.backend.as_ref().ok_or(FallbackReason::Disabled)?;
        let messages = self.prompt.messages(content);

        let call = async {
            let _permit = self
                .permits
                .acquire()
                .await
                .map_err(|_| Error::internal("completion semaphore closed"))?;
            backend.complete(&messages).await
        };

        let raw = match tokio::time::timeout(self.request_timeout, call).await {
            Ok(Ok(raw)) => raw,
            Ok(Err(e)) if e.kind() == "timeout" => {
                return Err(FallbackReason::Timeout(self.request_timeout))
            }
            Ok(Err(e)) => return Err(FallbackReason::Backend(e)),
            Err(_) => return Err(FallbackReason::Timeout(self.request_timeout)),
        };

        debug!(backend = backend.name(), response = %raw, "Completion received");
        validate(&raw, self.revision).map_err(FallbackReason::Invalid)
    }
}

/// Builder for [`ViewingClassifier`]
pub struct ClassifierBuilder {
    heuristic: HeuristicClassifier,
    revision: Revision,
    backend: Option<Arc<dyn CompletionBackend>>,
    metadata: Option<Arc<dyn MetadataLookup>>,
    cache_capacity: usize,
    max_in_flight: usize,
    request_timeout: Duration,
}

impl ClassifierBuilder {
    pub fn new(heuristic: HeuristicClassifier) -> Self {
        let defaults = ClassifierConfig::default();
        Self {
            heuristic,
            revision: defaults.revision,
            backend: None,
            metadata: None,
            cache_capacity: defaults.cache_capacity,
            max_in_flight: defaults.max_in_flight,
            request_timeout: defaults.request_timeout(),
        }
    }

    /// Heuristic and limits from configuration, without collaborators
    pub fn from_config(config: &ClassifierConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::new(config.heuristic()?)
            .revision(config.revision)
            .cache_capacity(config.cache_capacity)
            .max_in_flight(config.max_in_flight)
            .request_timeout(config.request_timeout()))
    }

    pub fn revision(mut self, revision: Revision) -> Self {
        self.revision = revision;
        self
    }

    pub fn backend(mut self, backend: Arc<dyn CompletionBackend>) -> Self {
        self.backend = Some(backend);
        self
    }

    pub fn metadata(mut self, metadata: Arc<dyn MetadataLookup>) -> Self {
        self.metadata = Some(metadata);
        self
    }

    pub fn cache_capacity(mut self, capacity: usize) -> Self {
        self.cache_capacity = capacity;
        self
    }

    /// Concurrent completion calls; clamped to at least one
    pub fn max_in_flight(mut self, max: usize) -> Self {
        self.max_in_flight = max.max(1);
        self
    }

    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn build(self) -> ViewingClassifier {
        ViewingClassifier {
            revision: self.revision,
            heuristic: self.heuristic,
            prompt: PromptBuilder::new(self.revision),
            backend: self.backend,
            metadata: self.metadata,
            cache: LruCache::new(self.cache_capacity),
            permits: Semaphore::new(self.max_in_flight),
            request_timeout: self.request_timeout,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keywords::{builtin_table, TierWeights};
    use viewmode_core::{PictureMode, ViewingMode};

    fn offline(revision: Revision) -> ViewingClassifier {
        let heuristic = HeuristicClassifier::new(&builtin_table(), TierWeights::default()).unwrap();
        ViewingClassifier::builder(heuristic).revision(revision).build()
    }

    #[tokio::test]
    async fn test_empty_input_is_rejected() {
        let classifier = offline(Revision::Paired);
        assert_eq!(classifier.classify("").await, Err(InputError::Empty));
        assert_eq!(classifier.classify(" \t\n").await, Err(InputError::Empty));
        assert_eq!(classifier.cache_len(), 0);
    }

    #[tokio::test]
    async fn test_offline_uses_heuristic() {
        let classifier = offline(Revision::Paired);
        assert!(!classifier.has_backend());

        let outcome = classifier.classify("Lakers vs Warriors Highlights").await.unwrap();
        assert_eq!(outcome.source, Source::Heuristic);
        assert_eq!(
            outcome.classification.settings().map(|s| s.picture_mode),
            Some(PictureMode::Sports)
        );
    }

    #[tokio::test]
    async fn test_offline_legacy_revision() {
        let classifier = offline(Revision::Legacy);
        let outcome = classifier.classify("Elden Ring Boss Guide").await.unwrap();
        assert_eq!(outcome.classification.viewing_mode(), Some(ViewingMode::Gaming));
    }

    #[tokio::test]
    async fn test_cache_keyed_by_normalized_input() {
        let classifier = offline(Revision::Paired);
        classifier.classify("8K HDR Nature Demo").await.unwrap();
        classifier.classify("  8k hdr nature demo ").await.unwrap();
        assert_eq!(classifier.cache_len(), 1);
    }

    #[test]
    fn test_fallback_labels() {
        assert_eq!(FallbackReason::Disabled.label(), "disabled");
        assert_eq!(
            FallbackReason::Timeout(Duration::from_secs(1)).label(),
            "timeout"
        );
        assert_eq!(
            FallbackReason::Backend(Error::backend("500")).label(),
            "backend"
        );
        assert_eq!(
            FallbackReason::Invalid(ValidationError::NotAnObject).label(),
            "invalid"
        );
    }
}
