//! Error type of the Tessera CLI.

use std::path::PathBuf;

use thiserror::Error;

use tessera::LayoutError;

use crate::config::ConfigError;

/// Errors that stop a CLI run
#[derive(Debug, Error)]
pub enum CliError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Invalid scene file {path}: {message}")]
    Scene { path: PathBuf, message: String },

    #[error(transparent)]
    Layout(#[from] LayoutError),

    #[error("Failed to serialize layout: {0}")]
    Serialize(#[from] toml::ser::Error),
}

impl CliError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        CliError::Io {
            path: path.into(),
            source,
        }
    }
}
