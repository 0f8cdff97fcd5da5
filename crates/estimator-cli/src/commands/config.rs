//! Config command implementation.

use crate::error::Result;
use estimator_ingest::IngestConfig;

/// Execute the config command.
pub fn execute_config(config: &IngestConfig) -> Result<()> {
    print!("{}", config.to_toml()?);
    Ok(())
}
