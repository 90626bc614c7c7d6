//! viewmode Server
//!
//! HTTP service that classifies YouTube titles and URLs into TV display
//! settings. Without an API key it answers from the keyword heuristic alone.

use anyhow::Result;
use clap::Parser;
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::Arc;
use tokio::signal;
use tracing::{info, warn};

use viewmode_classifiers::ViewingClassifier;
use viewmode_server::{create_router, AppState, Overrides, ServiceConfig};

#[derive(Parser, Debug)]
#[command(name = "viewmode-server")]
#[command(about = "TV viewing-mode classification service", long_about = None)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "viewmode.yaml")]
    config: String,

    /// Listen address
    #[arg(short = 'l', long)]
    listen: Option<String>,

    /// Listen port
    #[arg(short = 'P', long)]
    port: Option<u16>,

    /// Completion model identifier
    #[arg(short, long)]
    model: Option<String>,

    /// API key for the completion backend
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // .env must be loaded before clap reads OPENAI_API_KEY
    dotenv::dotenv().ok();
    let cli = Cli::parse();

    init_tracing(cli.verbose);

    info!("Starting viewmode server v{}", env!("CARGO_PKG_VERSION"));

    let overrides = Overrides {
        listen: cli.listen.clone(),
        port: cli.port,
        model: cli.model.clone(),
    };
    let config = ServiceConfig::load(&cli.config, &overrides)?;
    info!("Configuration loaded successfully");
    info!("Revision: {}", config.classifier.revision);
    info!("Model: {}", config.classifier.model);

    let metrics_handle = init_metrics()?;

    let classifier = ViewingClassifier::from_config(&config.classifier, cli.api_key.as_deref())?;
    let state = AppState::new(Arc::new(classifier))
        .with_metrics(metrics_handle)
        .with_expose_source(config.server.expose_source);

    let app = create_router(state);

    let addr = config.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            shutdown_signal().await;
            warn!("Shutdown signal received, stopping server...");
        })
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

/// Listen for shutdown signals (SIGTERM, SIGINT)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

/// Initialize tracing/logging
fn init_tracing(verbose: bool) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = if verbose {
        EnvFilter::new(
            "viewmode_server=debug,viewmode_classifiers=debug,viewmode_core=debug,tower_http=debug",
        )
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new("viewmode_server=info,viewmode_classifiers=info,viewmode_core=info")
        })
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Initialize metrics exporter and return handle for rendering
fn init_metrics() -> Result<PrometheusHandle> {
    use metrics_exporter_prometheus::PrometheusBuilder;

    let handle = PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| anyhow::anyhow!("Failed to install metrics: {}", e))?;

    metrics::describe_counter!(
        "viewmode_requests_total",
        "Total number of classification requests"
    );
    metrics::describe_counter!(
        "viewmode_fallbacks_total",
        "Heuristic fallbacks by reason"
    );
    metrics::describe_counter!(
        "viewmode_cache_hits_total",
        "Requests answered from the cache"
    );
    metrics::describe_histogram!(
        "viewmode_classify_latency_us",
        metrics::Unit::Microseconds,
        "Classification latency in microseconds"
    );

    info!("Metrics exporter initialized");
    Ok(handle)
}
