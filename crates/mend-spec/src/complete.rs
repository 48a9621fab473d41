//! Spec completion
//!
//! Fills in type-conditioned defaults so downstream components always see a
//! fully-populated spec. Completion is idempotent.

use crate::model::{AssetSpec, BackgroundMode};

const DEFAULT_ASSET_ID: &str = "unnamed_asset";
const DEFAULT_RESOLUTION: &str = "64x64";

/// Complete a partial spec with defaults.
///
/// - empty `assetId` becomes `unnamed_asset`
/// - `background` defaults to transparent for visual types, solid otherwise
/// - `resolution` defaults to `64x64` for sprite-like types
/// - `loop` defaults to true for animated types
pub fn complete(mut spec: AssetSpec) -> AssetSpec {
    if spec.asset_id.trim().is_empty() {
        spec.asset_id = DEFAULT_ASSET_ID.to_string();
    }

    if spec.background.is_none() {
        spec.background = Some(if spec.kind.defaults_transparent() {
            BackgroundMode::Transparent
        } else {
            BackgroundMode::Solid
        });
    }

    if spec.resolution.is_none() && spec.kind.wants_resolution() {
        spec.resolution = Some(DEFAULT_RESOLUTION.to_string());
    }

    if spec.loop_animation.is_none() && spec.kind.is_animated() {
        spec.loop_animation = Some(true);
    }

    spec
}
