//! Error types for viewmode

/// Result type alias using viewmode's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for viewmode operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Configuration errors (bad weights, bad keyword table, bad limits)
    #[error("configuration error: {0}")]
    Config(String),

    /// Completion backend answered with something other than success
    #[error("backend error: {0}")]
    Backend(String),

    /// Transport-level HTTP failures
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// Network/IO errors
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization errors
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// YAML parsing errors (keyword tables)
    #[error("yaml error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Generic internal errors
    #[error("internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Create a new configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a new backend error
    pub fn backend(msg: impl Into<String>) -> Self {
        Self::Backend(msg.into())
    }

    /// Create a new internal error
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Short label used for fallback metrics and logs
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Config(_) => "config",
            Self::Backend(_) => "backend",
            Self::Http(e) if e.is_timeout() => "timeout",
            Self::Http(_) => "transport",
            Self::Io(_) => "io",
            Self::Serialization(_) => "serialization",
            Self::Yaml(_) => "yaml",
            Self::Internal(_) => "internal",
        }
    }
}
