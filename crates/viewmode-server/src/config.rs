//! Service configuration
//!
//! Layered, later sources win:
//! 1. YAML file (optional; `viewmode.yaml` unless `--config` says otherwise)
//! 2. Environment variables, `VIEWMODE__SERVER__PORT=8080` style
//! 3. Command-line overrides

use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::Path;
use tracing::{debug, info};
use viewmode_classifiers::ClassifierConfig;

/// Full service configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ServiceConfig {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub classifier: ClassifierConfig,
}

/// HTTP listener settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Listen address
    #[serde(default = "default_listen")]
    pub listen: String,

    /// Listen port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Include `"source"` (model or heuristic) in classify responses
    #[serde(default)]
    pub expose_source: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen: default_listen(),
            port: default_port(),
            expose_source: false,
        }
    }
}

/// Values given on the command line
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub listen: Option<String>,
    pub port: Option<u16>,
    pub model: Option<String>,
}

impl ServiceConfig {
    /// Load configuration from file, environment and CLI overrides
    pub fn load(config_path: &str, overrides: &Overrides) -> anyhow::Result<Self> {
        if Path::new(config_path).exists() {
            info!("Loading configuration from {}", config_path);
        } else {
            debug!("No configuration file at {}, using defaults", config_path);
        }

        let layered = Config::builder()
            .add_source(
                File::new(config_path, FileFormat::Yaml).required(false),
            )
            .add_source(
                Environment::with_prefix("VIEWMODE")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let mut config: ServiceConfig = layered.try_deserialize()?;
        config.apply(overrides);
        config.classifier.validate()?;
        Ok(config)
    }

    /// Apply command-line overrides
    pub fn apply(&mut self, overrides: &Overrides) {
        if let Some(listen) = &overrides.listen {
            self.server.listen = listen.clone();
        }
        if let Some(port) = overrides.port {
            self.server.port = port;
        }
        if let Some(model) = &overrides.model {
            self.classifier.model = model.clone();
        }
    }

    pub fn socket_addr(&self) -> anyhow::Result<SocketAddr> {
        Ok(format!("{}:{}", self.server.listen, self.server.port).parse()?)
    }
}

fn default_listen() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5000
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use viewmode_core::Revision;

    #[test]
    fn test_defaults_without_file() {
        let config =
            ServiceConfig::load("/nonexistent/viewmode.yaml", &Overrides::default()).unwrap();
        assert_eq!(config.server.port, 5000);
        assert_eq!(config.server.listen, "0.0.0.0");
        assert!(!config.server.expose_source);
        assert_eq!(config.classifier.revision, Revision::Paired);
    }

    #[test]
    fn test_file_and_overrides() {
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        writeln!(
            file,
            "server:\n  port: 8081\n  expose_source: true\nclassifier:\n  revision: legacy\n  model: gpt-4o-mini\n  max_in_flight: 3"
        )
        .unwrap();

        let overrides = Overrides {
            port: Some(9000),
            model: Some("gpt-4.1".to_string()),
            ..Default::default()
        };
        let config = ServiceConfig::load(file.path().to_str().unwrap(), &overrides).unwrap();

        assert_eq!(config.server.port, 9000);
        assert!(config.server.expose_source);
        assert_eq!(config.classifier.revision, Revision::Legacy);
        assert_eq!(config.classifier.model, "gpt-4.1");
        assert_eq!(config.classifier.max_in_flight, 3);
        assert_eq!(config.socket_addr().unwrap().port(), 9000);
    }

    #[test]
    fn test_invalid_classifier_settings_rejected() {
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        writeln!(file, "classifier:\n  weights:\n    strong: 1\n    medium: 2\n    weak: 3").unwrap();

        assert!(ServiceConfig::load(file.path().to_str().unwrap(), &Overrides::default()).is_err());
    }
}
