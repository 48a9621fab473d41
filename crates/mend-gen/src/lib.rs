//! Mend Gen - asset generation with deterministic fallback
//!
//! Turns asset specs into generation parameters, invokes an external
//! generation pipeline over HTTP, and falls back to deterministic
//! procedural synthesis when the pipeline fails, so repair runs always
//! terminate with *something* on disk.

pub mod config;
pub mod generator;
pub mod http;
pub mod mock;
pub mod params;
pub mod pipeline;
pub mod procedural;

pub use config::MendConfig;
pub use generator::{GenerationResult, Generator};
pub use http::HttpPipeline;
pub use mock::MockPipeline;
pub use params::{to_generation_params, AnimationAction, PipelineParams, RenderConstraints};
pub use pipeline::{
    AssetMetadata, AssetPayload, GenerationPipeline, PipelineConfig, PipelineOutput,
    PipelineStandards,
};
pub use procedural::{generate_procedurally, SyntheticAsset};

use mend_core::{MendError, Result};

/// Build a pipeline by name: `remote` (the HTTP pipeline from config) or
/// `mock` (local placeholder generation, no network).
pub fn create_pipeline(name: &str, config: &MendConfig) -> Result<Box<dyn GenerationPipeline>> {
    match name {
        "remote" => Ok(Box::new(HttpPipeline::from_config(config)?)),
        "mock" => Ok(Box::new(MockPipeline::new())),
        other => Err(MendError::PipelineError(format!(
            "unknown pipeline '{}'",
            other
        ))),
    }
}
