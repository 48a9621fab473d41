//! Deterministic procedural fallback
//!
//! Produces a flat-color placeholder so the repair pipeline always
//! terminates, even with the external pipeline down. No I/O, no
//! randomness.

use crate::params::{DEFAULT_HEIGHT, DEFAULT_WIDTH};
use crate::pipeline::AssetMetadata;
use mend_spec::{AssetSpec, AssetType};

/// Fill color for placeholder assets (muted slate, RGBA).
pub const PLACEHOLDER_COLOR: [u8; 4] = [96, 112, 128, 255];

/// A procedurally synthesized placeholder: raw RGBA pixels plus metadata.
#[derive(Debug, Clone)]
pub struct SyntheticAsset {
    pub kind: AssetType,
    pub width: u32,
    pub height: u32,
    /// Flat RGBA buffer, `width * height * 4` bytes
    pub data: Vec<u8>,
    pub metadata: AssetMetadata,
}

/// Synthesize a placeholder for a spec. Always succeeds.
pub fn generate_procedurally(spec: &AssetSpec) -> SyntheticAsset {
    let (width, height) = spec
        .parse_resolution()
        .unwrap_or((DEFAULT_WIDTH, DEFAULT_HEIGHT));

    let mut data = Vec::with_capacity((width * height * 4) as usize);
    for _ in 0..width * height {
        data.extend_from_slice(&PLACEHOLDER_COLOR);
    }

    let metadata = AssetMetadata {
        id: spec.asset_id.clone(),
        name: spec.asset_id.replace('_', " "),
        dimensions: [width, height],
        format: "png".to_string(),
        tags: vec![
            spec.kind.to_string(),
            "procedural".to_string(),
            "placeholder".to_string(),
        ],
        content_hash: None,
    };

    SyntheticAsset {
        kind: spec.kind,
        width,
        height,
        data,
        metadata,
    }
}
