//! Semantic validation of asset specifications
//!
//! Checks go beyond what the type system enforces at the parse boundary:
//! required per-type fields, resolution format, palette sanity. Failures are
//! returned as a structured result, never as an error.

use crate::model::AssetSpec;
use regex::Regex;
use std::sync::OnceLock;

fn resolution_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\d+x\d+$").expect("valid pattern"))
}

/// Outcome of validating a spec
#[derive(Debug, Clone, Default)]
pub struct SpecValidation {
    pub valid: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
    /// Required or recommended fields the spec does not carry
    pub missing_fields: Vec<String>,
}

/// Validate a spec against the per-type field rules.
///
/// `assetId` must be non-empty. Animated types require `frames >= 1`.
/// Sprite-like types should declare a resolution (warning if absent).
/// A present `resolution` must match `WxH`.
pub fn validate(spec: &AssetSpec) -> SpecValidation {
    let mut result = SpecValidation::default();

    if spec.asset_id.trim().is_empty() {
        result.errors.push("assetId must not be empty".to_string());
        result.missing_fields.push("assetId".to_string());
    }

    if spec.kind.is_animated() {
        match spec.frames {
            None => {
                result
                    .errors
                    .push(format!("{} specs require a frame count", spec.kind));
                result.missing_fields.push("frames".to_string());
            }
            Some(0) => {
                result.errors.push("frames must be at least 1".to_string());
            }
            Some(_) => {}
        }
    }

    match spec.resolution.as_deref() {
        Some(res) => {
            if !resolution_re().is_match(res) {
                result
                    .errors
                    .push(format!("resolution '{}' is not in WxH form", res));
            }
        }
        None => {
            if spec.kind.wants_resolution() {
                result
                    .warnings
                    .push(format!("{} '{}' has no resolution", spec.kind, spec.asset_id));
                result.missing_fields.push("resolution".to_string());
            }
        }
    }

    if let Some(palette) = &spec.palette {
        if palette.is_empty() {
            result
                .warnings
                .push(format!("palette for '{}' is empty", spec.asset_id));
        }
    }

    result.valid = result.errors.is_empty();
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::AssetType;

    #[test]
    fn test_minimal_sprite_is_valid() {
        let spec = AssetSpec::new("hero_idle", AssetType::Sprite);
        let result = validate(&spec);
        assert!(result.valid);
        assert!(result.errors.is_empty());
        // No resolution on a sprite is a warning, not an error
        assert_eq!(result.warnings.len(), 1);
        assert!(result.missing_fields.contains(&"resolution".to_string()));
    }

    #[test]
    fn test_empty_id_is_error() {
        let spec = AssetSpec::new("", AssetType::Icon);
        let result = validate(&spec);
        assert!(!result.valid);
        assert!(result.missing_fields.contains(&"assetId".to_string()));
    }

    #[test]
    fn test_sprite_sheet_without_frames() {
        let spec = AssetSpec::new("hero_walk", AssetType::SpriteSheet);
        let result = validate(&spec);
        assert!(!result.valid);
        assert!(result.missing_fields.contains(&"frames".to_string()));
    }

    #[test]
    fn test_animation_without_frames() {
        let spec = AssetSpec::new("door_open", AssetType::Animation);
        let result = validate(&spec);
        assert!(result.missing_fields.contains(&"frames".to_string()));
    }

    #[test]
    fn test_zero_frames_rejected() {
        let mut spec = AssetSpec::new("hero_walk", AssetType::SpriteSheet);
        spec.frames = Some(0);
        let result = validate(&spec);
        assert!(!result.valid);
        // Present but invalid, so not listed as missing
        assert!(!result.missing_fields.contains(&"frames".to_string()));
    }

    #[test]
    fn test_bad_resolution_rejected() {
        for bad in ["64", "64x", "x64", "64by64", "64x64x64", "wide"] {
            let mut spec = AssetSpec::new("tile", AssetType::Tileset);
            spec.resolution = Some(bad.to_string());
            let result = validate(&spec);
            assert!(!result.valid, "expected '{}' to be rejected", bad);
        }
    }

    #[test]
    fn test_good_resolution_accepted() {
        let mut spec = AssetSpec::new("coin_icon", AssetType::Icon);
        spec.resolution = Some("32x32".to_string());
        let result = validate(&spec);
        assert!(result.valid);
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_audio_needs_no_resolution() {
        let spec = AssetSpec::new("door_creak", AssetType::Audio);
        let result = validate(&spec);
        assert!(result.valid);
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_empty_palette_warns() {
        let mut spec = AssetSpec::new("hero", AssetType::Sprite);
        spec.resolution = Some("64x64".to_string());
        spec.palette = Some(vec![]);
        let result = validate(&spec);
        assert!(result.valid);
        assert_eq!(result.warnings.len(), 1);
    }
}
