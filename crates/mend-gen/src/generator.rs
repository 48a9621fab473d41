//! Generation orchestration
//!
//! Drives one spec through the pipeline, falls back to procedural
//! synthesis on failure, and persists whatever was produced under the
//! type-conventioned asset directory. Each stage returns a `Result` and
//! the orchestrator composes them; nothing here relies on panics for
//! control flow.

use crate::params::to_generation_params;
use crate::pipeline::{AssetMetadata, AssetPayload, GenerationPipeline, PipelineConfig};
use crate::procedural::{generate_procedurally, SyntheticAsset};
use mend_core::{ContentHash, MendError, Result};
use mend_spec::{AssetSpec, AssetType};
use std::io::Cursor;
use std::path::{Path, PathBuf};

/// Outcome of generating one asset. `success` is false only when both the
/// pipeline and the procedural fallback failed; the payload is then a
/// zero-length error asset.
#[derive(Debug, Clone)]
pub struct GenerationResult {
    pub asset: Option<AssetPayload>,
    /// Project-relative path of the persisted file
    pub path: Option<String>,
    pub success: bool,
    pub errors: Vec<String>,
}

/// Generates assets for one project through a pipeline.
pub struct Generator<'a> {
    pipeline: &'a dyn GenerationPipeline,
    project_path: PathBuf,
}

impl<'a> Generator<'a> {
    pub fn new<P: AsRef<Path>>(pipeline: &'a dyn GenerationPipeline, project_path: P) -> Self {
        Self {
            pipeline,
            project_path: project_path.as_ref().to_path_buf(),
        }
    }

    /// Generate an asset for `spec` via the pipeline, falling back to
    /// procedural synthesis on any pipeline failure.
    pub fn generate(&self, spec: &AssetSpec, config: &PipelineConfig) -> GenerationResult {
        let params = to_generation_params(spec);

        let output = match self.pipeline.generate(&params, config) {
            Ok(output) => output,
            Err(e) => return self.generate_with_fallback(spec, &e.to_string()),
        };

        if let Err(reason) = meets_standards(&output.asset, config) {
            return self.generate_with_fallback(spec, &reason);
        }

        match self.persist_bytes(spec, &output.asset.data, &output.asset.metadata.format) {
            Ok(path) => {
                let mut asset = output.asset;
                asset.metadata.content_hash =
                    Some(ContentHash::from_bytes(&asset.data).to_prefixed_hex());
                GenerationResult {
                    asset: Some(asset),
                    path: Some(path),
                    success: true,
                    errors: output.errors,
                }
            }
            Err(e) => self.generate_with_fallback(spec, &e.to_string()),
        }
    }

    /// Procedural fallback, carrying the primary failure reason. Returns a
    /// failed result with an error asset only when the fallback itself
    /// cannot be persisted.
    pub fn generate_with_fallback(&self, spec: &AssetSpec, primary_error: &str) -> GenerationResult {
        let mut errors = vec![format!("pipeline generation failed: {}", primary_error)];

        let synthetic = generate_procedurally(spec);
        match self.persist_synthetic(spec, &synthetic) {
            Ok((path, data)) => {
                let mut metadata = synthetic.metadata;
                metadata.content_hash = Some(ContentHash::from_bytes(&data).to_prefixed_hex());
                GenerationResult {
                    asset: Some(AssetPayload {
                        kind: spec.kind.to_string(),
                        data,
                        metadata,
                    }),
                    path: Some(path),
                    success: true,
                    errors,
                }
            }
            Err(e) => {
                errors.push(format!("procedural fallback failed: {}", e));
                GenerationResult {
                    asset: Some(error_asset(spec)),
                    path: None,
                    success: false,
                    errors,
                }
            }
        }
    }

    /// Generate a batch of specs strictly one at a time; the external
    /// pipeline is not built for concurrent load. One spec's failure never
    /// aborts the rest.
    pub fn batch_generate(
        &self,
        specs: &[AssetSpec],
        config: &PipelineConfig,
    ) -> Vec<GenerationResult> {
        specs.iter().map(|spec| self.generate(spec, config)).collect()
    }

    /// Write encoded bytes under the type-conventioned directory and
    /// return the project-relative path.
    fn persist_bytes(&self, spec: &AssetSpec, data: &[u8], format: &str) -> Result<String> {
        let dir = asset_subdirectory(spec.kind);
        let relative = format!("{}/{}.{}", dir, spec.asset_id, format);

        let full = self.project_path.join(&relative);
        if let Some(parent) = full.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&full, data)?;

        Ok(relative)
    }

    /// Encode a synthetic asset's raw RGBA buffer as PNG and persist it.
    fn persist_synthetic(
        &self,
        spec: &AssetSpec,
        synthetic: &SyntheticAsset,
    ) -> Result<(String, Vec<u8>)> {
        let img = image::RgbaImage::from_raw(
            synthetic.width,
            synthetic.height,
            synthetic.data.clone(),
        )
        .ok_or_else(|| {
            MendError::GenerationError("procedural buffer has wrong length".to_string())
        })?;

        let mut encoded = Vec::new();
        img.write_to(&mut Cursor::new(&mut encoded), image::ImageFormat::Png)
            .map_err(|e| MendError::GenerationError(format!("PNG encode failed: {}", e)))?;

        let path = self.persist_bytes(spec, &encoded, "png")?;
        Ok((path, encoded))
    }
}

/// Directory convention for generated files.
fn asset_subdirectory(kind: AssetType) -> &'static str {
    match kind {
        AssetType::Sprite | AssetType::SpriteSheet => "assets/sprites",
        AssetType::Background => "assets/backgrounds",
        AssetType::Ui | AssetType::Icon => "assets/ui",
        _ => "assets",
    }
}

/// Check pipeline output against the configured standards.
fn meets_standards(asset: &AssetPayload, config: &PipelineConfig) -> std::result::Result<(), String> {
    let standards = &config.standards;

    if !standards
        .allowed_formats
        .iter()
        .any(|f| f == &asset.metadata.format)
    {
        return Err(format!(
            "pipeline returned disallowed format '{}'",
            asset.metadata.format
        ));
    }

    let [w, h] = asset.metadata.dimensions;
    let [min_w, min_h] = standards.min_dimensions;
    let [max_w, max_h] = standards.max_dimensions;
    if w < min_w || h < min_h || w > max_w || h > max_h {
        return Err(format!("pipeline returned out-of-bounds dimensions {}x{}", w, h));
    }

    Ok(())
}

/// Terminal placeholder when both generation stages failed.
fn error_asset(spec: &AssetSpec) -> AssetPayload {
    AssetPayload {
        kind: spec.kind.to_string(),
        data: Vec::new(),
        metadata: AssetMetadata {
            id: spec.asset_id.clone(),
            name: spec.asset_id.replace('_', " "),
            dimensions: [0, 0],
            format: "png".to_string(),
            tags: vec!["error".to_string(), "missing".to_string()],
            content_hash: None,
        },
    }
}
