//! Tessera CLI library
//!
//! This module contains the core CLI logic: read a scene file, lay it out,
//! write the positioned layout and its metrics.

pub mod error_adapter;

mod args;
mod config;
mod error;

pub use args::Args;
pub use config::ConfigError;
pub use error::CliError;

use std::{fs, path::Path};

use log::{info, warn};

use tessera::{Layouter, graph::Scene};

/// Run the Tessera CLI application
///
/// Reads the scene at `args.input`, lays it out with the loaded
/// configuration, and writes the layout with its metrics to `args.output`
/// as TOML.
///
/// # Arguments
///
/// * `args` - Command-line arguments
///
/// # Errors
///
/// Returns `CliError` for:
/// - File I/O errors
/// - Configuration loading or validation errors
/// - Malformed scene files
/// - Invalid scene graphs
pub fn run(args: &Args) -> Result<(), CliError> {
    info!(
        input_path = args.input,
        output_path = args.output;
        "Processing scene"
    );

    let app_config = config::load_config(args.config.as_ref())?;

    let scene = read_scene(Path::new(&args.input))?;

    let layouter = Layouter::new(app_config);
    let outcome = layouter.layout(&scene)?;

    let metrics = outcome.metrics();
    if !metrics.success() {
        warn!(
            overlaps = metrics.resolution().overlap_count();
            "Layout still has overlapping nodes"
        );
    }

    let output = toml::to_string(&outcome)?;
    fs::write(&args.output, output).map_err(|err| CliError::io(&args.output, err))?;

    info!(
        output_file = args.output,
        kind = metrics.kind().as_str(),
        engine = metrics.engine(),
        nodes = outcome.layout().nodes().len(),
        resolved_by = metrics.resolution().resolved_by(),
        elapsed:? = metrics.elapsed();
        "Layout written"
    );

    Ok(())
}

fn read_scene(path: &Path) -> Result<Scene, CliError> {
    let source = fs::read_to_string(path).map_err(|err| CliError::io(path, err))?;
    toml::from_str(&source).map_err(|err| CliError::Scene {
        path: path.to_path_buf(),
        message: err.to_string(),
    })
}
