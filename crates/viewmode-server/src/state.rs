//! Shared application state

use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::Arc;
use viewmode_classifiers::ViewingClassifier;

/// State handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub classifier: Arc<ViewingClassifier>,
    /// Renders `/metrics`; absent when no recorder is installed (tests)
    pub metrics: Option<PrometheusHandle>,
    /// Include provenance in classify responses
    pub expose_source: bool,
}

impl AppState {
    pub fn new(classifier: Arc<ViewingClassifier>) -> Self {
        Self {
            classifier,
            metrics: None,
            expose_source: false,
        }
    }

    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics = Some(handle);
        self
    }

    pub fn with_expose_source(mut self, expose: bool) -> Self {
        self.expose_source = expose;
        self
    }
}
