pub mod asset;
pub mod generate;
pub mod manifest;
pub mod repair;
pub mod verify;

use anyhow::Result;
use mend_gen::{create_pipeline, GenerationPipeline, MendConfig};

/// Resolve the pipeline to use: an explicit override wins, otherwise the
/// configured default.
pub fn resolve_pipeline(
    config: &MendConfig,
    override_name: Option<&str>,
) -> Result<Box<dyn GenerationPipeline>> {
    let name = override_name.unwrap_or_else(|| config.pipeline_name());
    create_pipeline(name, config).map_err(|e| anyhow::anyhow!("{}", e))
}
