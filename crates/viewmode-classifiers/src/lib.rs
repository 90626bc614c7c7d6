//! viewmode Classifiers
//!
//! Turns a video title or YouTube URL into TV display settings.
//!
//! The completion backend is asked first, its answer is validated strictly,
//! and a deterministic keyword heuristic takes over whenever that path fails:
//! - Keyword scorer: weighted strong/medium/weak keyword tables per category
//! - Series detector: `S01E02` episode markers bias toward cinema
//! - Validator: exact JSON shape and closed vocabularies, no coercion
//! - Orchestrator: cache, URL resolution, bounded and timed backend calls

pub mod cache;
pub mod config;
pub mod heuristic;
pub mod keywords;
pub mod normalize;
pub mod orchestrator;
pub mod prompt;
pub mod series;
pub mod validator;

pub use cache::LruCache;
pub use config::ClassifierConfig;
pub use heuristic::{Bucket, HeuristicClassifier, Verdict};
pub use keywords::{
    builtin_table, Category, KeywordScorer, KeywordTable, Scoreboard, Tier, TierKeywords,
    TierWeights,
};
pub use normalize::normalize;
pub use orchestrator::{
    ClassifierBuilder, FallbackReason, InputError, Outcome, ViewingClassifier,
};
pub use prompt::PromptBuilder;
pub use series::SeriesDetector;
pub use validator::{validate, ValidationError};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::config::ClassifierConfig;
    pub use crate::heuristic::HeuristicClassifier;
    pub use crate::keywords::{KeywordTable, TierWeights};
    pub use crate::orchestrator::{InputError, Outcome, ViewingClassifier};
    pub use crate::validator::ValidationError;
}
