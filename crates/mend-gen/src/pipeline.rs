//! Generation pipeline contract
//!
//! The pipeline that actually produces pixel data is an external
//! collaborator. This module pins down the request/response types and the
//! fixed validation constraints every invocation carries.

use mend_core::Result;
use serde::{Deserialize, Serialize};

use crate::params::PipelineParams;

/// Output standards the pipeline is asked to honor.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineStandards {
    pub allowed_formats: Vec<String>,
    pub min_dimensions: [u32; 2],
    pub max_dimensions: [u32; 2],
    pub required_metadata: Vec<String>,
}

impl Default for PipelineStandards {
    fn default() -> Self {
        Self {
            allowed_formats: vec!["png".to_string(), "webp".to_string()],
            min_dimensions: [16, 16],
            max_dimensions: [2048, 2048],
            required_metadata: vec![
                "id".to_string(),
                "name".to_string(),
                "dimensions".to_string(),
                "format".to_string(),
            ],
        }
    }
}

/// Fixed per-invocation pipeline configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineConfig {
    pub generation_source: String,
    pub validation_enabled: bool,
    pub code_binding_enabled: bool,
    pub target_framework: String,
    pub standards: PipelineStandards,
    pub auto_integrate: bool,
}

impl PipelineConfig {
    /// The standard configuration: AI-sourced, validated, no code binding.
    pub fn standard(target_framework: &str) -> Self {
        Self {
            generation_source: "ai".to_string(),
            validation_enabled: true,
            code_binding_enabled: false,
            target_framework: target_framework.to_string(),
            standards: PipelineStandards::default(),
            auto_integrate: true,
        }
    }
}

/// Metadata attached to a generated asset.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetMetadata {
    pub id: String,
    pub name: String,
    pub dimensions: [u32; 2],
    pub format: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_hash: Option<String>,
}

/// A generated asset: encoded bytes plus metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetPayload {
    #[serde(rename = "type")]
    pub kind: String,
    pub data: Vec<u8>,
    pub metadata: AssetMetadata,
}

/// Everything a pipeline invocation returns.
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    pub asset: AssetPayload,
    pub integration_path: Option<String>,
    pub errors: Vec<String>,
}

/// The external generation pipeline.
///
/// Implementations must be synchronous; callers that need a timeout impose
/// one externally.
pub trait GenerationPipeline {
    /// Pipeline name for logs and provenance metadata
    fn name(&self) -> &str;

    /// Produce an asset for the given parameters, or fail.
    fn generate(&self, params: &PipelineParams, config: &PipelineConfig) -> Result<PipelineOutput>;
}
