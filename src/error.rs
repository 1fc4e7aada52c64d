use std::path::PathBuf;

use thiserror::Error;

use crate::contact::FormError;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Contact(#[from] FormError),
    #[error(transparent)]
    Script(#[from] ScriptError),
    #[error("no tokio runtime available to schedule notification timers")]
    Runtime(#[from] tokio::runtime::TryCurrentError),
    #[error("telemetry initialization failed: {0}")]
    Telemetry(String),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to parse configuration: {0}")]
    Parse(String),
    #[error("invalid configuration for {field}: {message}")]
    InvalidField {
        field: &'static str,
        message: String,
    },
    #[error("failed to load configuration sources: {0}")]
    Load(String),
}

#[derive(Debug, Error)]
pub enum ScriptError {
    #[error("failed to read script {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("line {line}: {message}")]
    Parse { line: usize, message: String },
}

impl Error {
    /// Errors that should not end an interactive session.
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Contact(_) | Self::Script(ScriptError::Parse { .. }))
    }
}
