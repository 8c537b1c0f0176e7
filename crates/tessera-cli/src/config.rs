//! Configuration file loading for the CLI
//!
//! This module handles finding, loading and validating TOML configuration
//! files from various locations (explicit path, local directory, system
//! directory).

use std::{
    fs,
    path::{Path, PathBuf},
};

use directories::ProjectDirs;
use log::{debug, info};
use thiserror::Error;

use tessera::config::AppConfig;

/// Configuration-related errors for CLI
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read configuration file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse TOML configuration: {0}")]
    Parse(String),

    #[error("Missing configuration file: {0}")]
    MissingFile(PathBuf),

    #[error("Validation error: {0}")]
    Validation(String),
}

/// Find and load configuration from various locations
///
/// Search order:
/// 1. Explicit path if provided
/// 2. Local project directory (tessera/config.toml)
/// 3. Platform-specific config directory
/// 4. Default config if none found
///
/// # Arguments
///
/// * `explicit_path` - Optional explicit path to config file
///
/// # Errors
///
/// Returns error if:
/// - Explicit path is provided but file doesn't exist
/// - Config file exists but cannot be parsed
/// - Config values are out of range
pub fn load_config(explicit_path: Option<impl AsRef<Path>>) -> Result<AppConfig, ConfigError> {
    if let Some(path) = explicit_path {
        let path = path.as_ref();
        info!(path = path.display().to_string(); "Loading configuration from explicit path");
        return load_config_file(path);
    }

    let local_config = Path::new("tessera/config.toml");
    if local_config.exists() {
        info!(path = local_config.display().to_string(); "Loading configuration from local path");
        return load_config_file(local_config);
    }

    if let Some(proj_dirs) = ProjectDirs::from("com", "tessera", "tessera") {
        let system_config = proj_dirs.config_dir().join("config.toml");

        if system_config.exists() {
            info!(path = system_config.display().to_string(); "Loading configuration from system path");
            return load_config_file(system_config);
        }

        debug!(path = system_config.display().to_string(); "System configuration file not found");
    } else {
        debug!("Could not determine platform-specific config directory");
    }

    debug!("No configuration file found, using default configuration");
    Ok(AppConfig::default())
}

/// Load and validate configuration from a TOML file
///
/// # Errors
///
/// Returns error if:
/// - File doesn't exist
/// - File cannot be read
/// - TOML parsing fails
/// - Validation fails
fn load_config_file(path: impl AsRef<Path>) -> Result<AppConfig, ConfigError> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(ConfigError::MissingFile(path.to_path_buf()));
    }

    let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let config = parse_config(&content)?;
    validate(&config)?;

    Ok(config)
}

fn parse_config(content: &str) -> Result<AppConfig, ConfigError> {
    toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))
}

/// Check numeric ranges the library assumes.
///
/// # Errors
///
/// Returns [`ConfigError::Validation`] naming the first offending field.
pub fn validate(config: &AppConfig) -> Result<(), ConfigError> {
    let layout = config.layout();

    let positive = [
        ("layout.width", layout.width()),
        ("layout.height", layout.height()),
        ("layout.node_width", layout.node_size().width()),
        ("layout.node_height", layout.node_size().height()),
    ];
    for (field, value) in positive {
        if !value.is_finite() || value <= 0.0 {
            return Err(ConfigError::Validation(format!(
                "{field} must be a positive number, got {value}"
            )));
        }
    }

    let non_negative = [
        ("layout.node_separation", layout.node_separation()),
        ("layout.edge_separation", layout.edge_separation()),
        ("layout.margin_x", layout.margin_x()),
        ("layout.margin_y", layout.margin_y()),
    ];
    for (field, value) in non_negative {
        if !value.is_finite() || value < 0.0 {
            return Err(ConfigError::Validation(format!(
                "{field} must not be negative, got {value}"
            )));
        }
    }

    if layout.usable_size().width() <= 0.0 || layout.usable_size().height() <= 0.0 {
        return Err(ConfigError::Validation(
            "margins leave no usable space on the canvas".to_string(),
        ));
    }

    let resolver = config.resolver();
    if resolver.max_time_per_strategy().is_zero() || resolver.max_total_time().is_zero() {
        return Err(ConfigError::Validation(
            "resolver time budgets must be greater than zero".to_string(),
        ));
    }
    if resolver.max_time_per_strategy() > resolver.max_total_time() {
        return Err(ConfigError::Validation(format!(
            "resolver.max_time_per_strategy_ms ({:?}) exceeds resolver.max_total_time_ms ({:?})",
            resolver.max_time_per_strategy(),
            resolver.max_total_time()
        )));
    }

    Ok(())
}
