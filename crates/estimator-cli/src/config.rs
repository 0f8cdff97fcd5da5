//! Configuration loading for the CLI.
//!
//! Settings are layered: defaults, then the TOML file, then environment
//! variables, then command-line flags.

use crate::cli::OverrideArgs;
use crate::error::{CliError, Result};
use estimator_ingest::IngestConfig;
use std::fs;
use std::path::Path;

/// Load the effective pipeline configuration.
pub fn load(path: Option<&Path>, overrides: &OverrideArgs) -> Result<IngestConfig> {
    let base = match path {
        Some(path) => from_file(path)?,
        None => IngestConfig::default(),
    };
    resolve(base.with_env_overrides(), overrides)
}

/// Read a configuration file; missing keys keep their defaults.
pub fn from_file(path: &Path) -> Result<IngestConfig> {
    let contents = fs::read_to_string(path)
        .map_err(|e| CliError::Config(format!("Cannot read {}: {}", path.display(), e)))?;
    let config: IngestConfig = toml::from_str(&contents)?;
    Ok(config)
}

/// Apply command-line overrides and validate the result.
pub fn resolve(mut config: IngestConfig, overrides: &OverrideArgs) -> Result<IngestConfig> {
    if let Some(tokens) = overrides.max_tokens_per_chunk {
        config.max_tokens_per_chunk = tokens;
    }
    if let Some(tokens) = overrides.max_tokens_per_part {
        config.max_tokens_per_document_part = tokens;
    }
    if let Some(threshold) = overrides.min_confidence {
        if !(0.0..=1.0).contains(&threshold) {
            return Err(CliError::InvalidInput(
                "Confidence must be between 0.0 and 1.0".to_string(),
            ));
        }
        config.min_confidence_threshold = threshold;
    }

    config.validate()?;
    Ok(config)
}
