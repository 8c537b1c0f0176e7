//! Error adapter for converting [`CliError`] to miette diagnostics.
//!
//! This module provides the bridge between the CLI's standard error type and
//! miette's rich diagnostic formatting.

use std::fmt;

use miette::{Diagnostic as MietteDiagnostic, LabeledSpan};

use tessera::LayoutError;

use crate::{config::ConfigError, error::CliError};

/// Adapter giving a [`CliError`] a diagnostic code and help text.
pub struct ErrorAdapter<'a>(pub &'a CliError);

impl fmt::Debug for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

impl fmt::Display for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl std::error::Error for ErrorAdapter<'_> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        std::error::Error::source(self.0)
    }
}

impl MietteDiagnostic for ErrorAdapter<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let code = match self.0 {
            CliError::Io { .. } => "tessera::io",
            CliError::Config(_) => "tessera::config",
            CliError::Scene { .. } => "tessera::scene",
            CliError::Layout(_) => "tessera::graph",
            CliError::Serialize(_) => "tessera::output",
        };
        Some(Box::new(code))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let help = match self.0 {
            CliError::Config(ConfigError::Validation(_)) => {
                "check the [layout] and [resolver] sections of the configuration file"
            }
            CliError::Config(_) => "pass a readable TOML file with -c, or remove it to use defaults",
            CliError::Scene { .. } => {
                "a scene needs a `kind` and [[nodes]] tables with an `id`; edges use `source` and `target`"
            }
            CliError::Layout(LayoutError::InvalidGraph(_)) => {
                "fix the node ids and edge endpoints in the scene file"
            }
            CliError::Io { .. } | CliError::Serialize(_) => return None,
        };
        Some(Box::new(help))
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        None
    }
}
