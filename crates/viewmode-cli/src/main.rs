use clap::Parser;
use std::process::ExitCode;
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use viewmode_classifiers::{ClassifierBuilder, ViewingClassifier};
use viewmode_cli::{load_config, render, Cli};

/// Exit status for caller mistakes, matching clap's usage errors
const USAGE_ERROR: u8 = 2;

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    // .env must be loaded before clap reads OPENAI_API_KEY
    dotenv::dotenv().ok();
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let config = load_config(&cli)?;
    debug!(revision = %config.revision, model = %config.model, "Configuration loaded");

    let classifier = if cli.offline {
        ClassifierBuilder::from_config(&config)?.build()
    } else {
        ViewingClassifier::from_config(&config, cli.api_key.as_deref())?
    };

    let outcome = match classifier.classify(&cli.input).await {
        Ok(outcome) => outcome,
        Err(e) => {
            eprintln!("error: {}", e);
            eprintln!("usage: viewmode <title-or-url>");
            return Ok(ExitCode::from(USAGE_ERROR));
        }
    };

    if cli.verbose {
        eprintln!("source: {}", outcome.source.as_str());
    }
    println!("{}", render(&outcome, cli.input.trim(), cli.json)?);

    Ok(ExitCode::SUCCESS)
}

/// Initialize logging on stderr so stdout carries only the result
fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("viewmode=debug,viewmode_cli=debug,viewmode_classifiers=debug,viewmode_core=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
