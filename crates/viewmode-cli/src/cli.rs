use clap::Parser;
use serde_json::{Map, Value};
use std::path::Path;
use tracing::debug;
use viewmode_classifiers::{ClassifierConfig, Outcome};
use viewmode_core::Revision;

/// Configuration file read when `--config` is not given, if present
pub const DEFAULT_CONFIG_PATH: &str = "viewmode.yaml";

#[derive(Parser, Debug)]
#[command(name = "viewmode")]
#[command(
    author,
    version,
    about = "Classify a YouTube title or URL into TV display settings"
)]
pub struct Cli {
    /// Video title or YouTube URL
    pub input: String,

    /// Classifier configuration file (YAML)
    #[arg(short, long)]
    pub config: Option<String>,

    /// Completion model identifier
    #[arg(short, long)]
    pub model: Option<String>,

    /// Output vocabulary: legacy (viewing mode) or paired (picture + audio)
    #[arg(short, long, value_parser = parse_revision)]
    pub revision: Option<Revision>,

    /// Skip all network calls and use the keyword heuristic
    #[arg(long)]
    pub offline: bool,

    /// Print the result as JSON
    #[arg(long)]
    pub json: bool,

    /// Debug logging and provenance on stderr
    #[arg(short, long)]
    pub verbose: bool,

    /// API key for the completion backend
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,
}

fn parse_revision(s: &str) -> Result<Revision, String> {
    s.parse()
}

/// Classifier settings from `--config` (or the default file) plus flags
pub fn load_config(cli: &Cli) -> anyhow::Result<ClassifierConfig> {
    let mut config = match &cli.config {
        Some(path) => ClassifierConfig::from_file(path)?,
        None if Path::new(DEFAULT_CONFIG_PATH).exists() => {
            debug!("Using {}", DEFAULT_CONFIG_PATH);
            ClassifierConfig::from_file(DEFAULT_CONFIG_PATH)?
        }
        None => ClassifierConfig::default(),
    };

    if let Some(model) = &cli.model {
        config.model = model.clone();
    }
    if let Some(revision) = cli.revision {
        config.revision = revision;
    }

    config.validate()?;
    Ok(config)
}

/// Text printed for an outcome: the bare mode / `picture_mode=.. audio_profile=..`,
/// or a JSON object with the input echoed
pub fn render(outcome: &Outcome, input: &str, json: bool) -> anyhow::Result<String> {
    if !json {
        return Ok(outcome.classification.to_string());
    }

    let mut body = match serde_json::to_value(outcome.classification)? {
        Value::Object(fields) => fields,
        other => {
            let mut fields = Map::new();
            fields.insert("result".to_string(), other);
            fields
        }
    };
    body.insert("input".to_string(), Value::String(input.to_string()));
    Ok(serde_json::to_string(&Value::Object(body))?)
}
