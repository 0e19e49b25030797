use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while loading or validating a [`crate::Config`]
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid config value `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

impl ConfigError {
    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            field,
            reason: reason.into(),
        }
    }
}

/// Errors raised by a [`crate::StatSink`] while persisting end-of-run statistics
#[derive(Error, Debug)]
pub enum StatError {
    #[error("Stat store I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Stat store backend failed: {0}")]
    Backend(String),
}
