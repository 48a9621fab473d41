//! Spec to generation parameters
//!
//! Builds the natural-language prompt and structured parameters the
//! external pipeline consumes.

use mend_spec::{AssetSpec, AssetType, BackgroundMode};
use serde::{Deserialize, Serialize};

pub const DEFAULT_WIDTH: u32 = 64;
pub const DEFAULT_HEIGHT: u32 = 64;

/// A named animation the pipeline should produce frames for.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnimationAction {
    pub name: String,
    pub frames: u32,
    #[serde(rename = "loop")]
    pub loop_animation: bool,
}

/// Rendering constraints forwarded with every request.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderConstraints {
    pub pixel_style: bool,
    pub animation_smoothness: f64,
    pub color_depth: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_colors: Option<u32>,
}

impl Default for RenderConstraints {
    fn default() -> Self {
        Self {
            pixel_style: true,
            animation_smoothness: 0.5,
            color_depth: 32,
            max_colors: None,
        }
    }
}

/// Parameters for one pipeline invocation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineParams {
    pub prompt: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<String>,
    pub resolution: [u32; 2],
    /// The asset id the request is for
    pub entity: String,
    pub theme: String,
    pub actions: Vec<AnimationAction>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frame_count: Option<u32>,
    pub constraints: RenderConstraints,
}

/// Turn a spec into pipeline parameters.
///
/// The prompt concatenates a type-derived phrase, the description (or the
/// humanized id), the style, a palette clause, and a transparency clause.
/// An unparseable or absent resolution falls back to 64x64.
pub fn to_generation_params(spec: &AssetSpec) -> PipelineParams {
    let (width, height) = spec
        .parse_resolution()
        .unwrap_or((DEFAULT_WIDTH, DEFAULT_HEIGHT));

    let mut parts = vec![kind_phrase(spec.kind).to_string()];

    let subject = spec
        .description
        .clone()
        .unwrap_or_else(|| humanize(&spec.asset_id));
    parts.push(subject);

    if let Some(style) = &spec.style {
        parts.push(format!("{} style", style));
    }

    if let Some(palette) = spec.palette.as_ref().filter(|p| !p.is_empty()) {
        parts.push(format!("limited palette: {}", palette.join(", ")));
    }

    if spec.background == Some(BackgroundMode::Transparent) {
        parts.push("transparent background".to_string());
    }

    let actions = match spec.frames {
        Some(frames) => vec![AnimationAction {
            name: "default".to_string(),
            frames,
            loop_animation: spec.loop_animation.unwrap_or(false),
        }],
        None => Vec::new(),
    };

    let constraints = RenderConstraints {
        max_colors: spec.palette.as_ref().map(|p| p.len() as u32),
        ..Default::default()
    };

    PipelineParams {
        prompt: parts.join(", "),
        style: spec.style.clone(),
        resolution: [width, height],
        entity: spec.asset_id.clone(),
        theme: spec.style.clone().unwrap_or_else(|| "pixel art".to_string()),
        actions,
        frame_count: spec.frames,
        constraints,
    }
}

fn kind_phrase(kind: AssetType) -> &'static str {
    match kind {
        AssetType::Sprite | AssetType::SpriteSheet | AssetType::Animation => "pixel art sprite",
        AssetType::Background => "pixel art background",
        AssetType::Icon => "pixel art icon",
        AssetType::Ui => "pixel art UI element",
        AssetType::Tileset => "pixel art tileset",
        AssetType::Effect => "pixel art effect",
        AssetType::Audio => "game audio",
    }
}

/// `hero_idle` -> `hero idle`
fn humanize(asset_id: &str) -> String {
    asset_id.replace('_', " ")
}
