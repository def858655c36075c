use thiserror::Error;

/// Errors the probability engine can raise. Everything else falls back to
/// named defaults, so the only rejection is a malformed goal line.
#[derive(Debug, Error, PartialEq)]
pub enum EngineError {
    #[error("invalid goal threshold {0}: expected a non-negative half-integer (0.5, 1.5, ...)")]
    InvalidThreshold(f64),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid config value for {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}
