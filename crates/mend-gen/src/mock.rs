//! Mock pipeline for tests and offline use
//!
//! Generates a solid-color PNG in memory without any network calls. Can be
//! configured to fail so fallback paths are exercisable.

use crate::params::PipelineParams;
use crate::pipeline::{
    AssetMetadata, AssetPayload, GenerationPipeline, PipelineConfig, PipelineOutput,
};
use mend_core::{MendError, Result};
use std::io::Cursor;

/// A pipeline that produces placeholder PNGs locally.
#[derive(Default)]
pub struct MockPipeline {
    fail: bool,
}

impl MockPipeline {
    pub fn new() -> Self {
        Self { fail: false }
    }

    /// A mock that fails every request, for driving fallback paths.
    pub fn failing() -> Self {
        Self { fail: true }
    }
}

impl GenerationPipeline for MockPipeline {
    fn name(&self) -> &str {
        "mock"
    }

    fn generate(&self, params: &PipelineParams, _config: &PipelineConfig) -> Result<PipelineOutput> {
        if self.fail {
            return Err(MendError::PipelineError(
                "mock pipeline configured to fail".to_string(),
            ));
        }

        let [width, height] = params.resolution;

        // Color derived from the entity name so distinct assets are
        // distinguishable at a glance
        let seed = params
            .entity
            .bytes()
            .fold(0u32, |acc, b| acc.wrapping_mul(31).wrapping_add(b as u32));
        let pixel = [
            ((seed >> 16) & 0xFF) as u8,
            ((seed >> 8) & 0xFF) as u8,
            (seed & 0xFF) as u8,
            255,
        ];

        let mut raw = Vec::with_capacity((width * height * 4) as usize);
        for _ in 0..width * height {
            raw.extend_from_slice(&pixel);
        }

        let img = image::RgbaImage::from_raw(width, height, raw).ok_or_else(|| {
            MendError::PipelineError("failed to build image buffer".to_string())
        })?;
        let mut data = Vec::new();
        img.write_to(&mut Cursor::new(&mut data), image::ImageFormat::Png)
            .map_err(|e| MendError::PipelineError(format!("PNG encode failed: {}", e)))?;

        let metadata = AssetMetadata {
            id: params.entity.clone(),
            name: params.entity.replace('_', " "),
            dimensions: [width, height],
            format: "png".to_string(),
            tags: vec!["mock".to_string()],
            content_hash: None,
        };

        Ok(PipelineOutput {
            asset: AssetPayload {
                kind: "image".to_string(),
                data,
                metadata,
            },
            integration_path: None,
            errors: Vec::new(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::to_generation_params;
    use mend_spec::{AssetSpec, AssetType};

    #[test]
    fn test_mock_generates_valid_png() {
        let mut spec = AssetSpec::new("hero_idle", AssetType::Sprite);
        spec.resolution = Some("32x32".to_string());
        let params = to_generation_params(&spec);

        let output = MockPipeline::new()
            .generate(&params, &PipelineConfig::standard("phaser"))
            .unwrap();

        assert_eq!(output.asset.metadata.id, "hero_idle");
        assert_eq!(output.asset.metadata.format, "png");
        assert!(output.errors.is_empty());

        let img = image::load_from_memory(&output.asset.data).unwrap();
        assert_eq!(img.width(), 32);
        assert_eq!(img.height(), 32);
    }

    #[test]
    fn test_failing_mock_errors() {
        let params = to_generation_params(&AssetSpec::new("hero", AssetType::Sprite));
        let result = MockPipeline::failing().generate(&params, &PipelineConfig::standard("phaser"));
        assert!(matches!(result, Err(MendError::PipelineError(_))));
    }

    #[test]
    fn test_distinct_ids_distinct_pixels() {
        let config = PipelineConfig::standard("phaser");
        let a = MockPipeline::new()
            .generate(
                &to_generation_params(&AssetSpec::new("hero", AssetType::Sprite)),
                &config,
            )
            .unwrap();
        let b = MockPipeline::new()
            .generate(
                &to_generation_params(&AssetSpec::new("slime", AssetType::Sprite)),
                &config,
            )
            .unwrap();
        assert_ne!(a.asset.data, b.asset.data);
    }
}
