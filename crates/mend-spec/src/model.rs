//! Asset specification types

use serde::{Deserialize, Serialize};
use std::fmt;

/// Kinds of assets the pipeline can track and regenerate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssetType {
    SpriteSheet,
    Sprite,
    Background,
    Tileset,
    Ui,
    Icon,
    Audio,
    Animation,
    Effect,
}

impl AssetType {
    /// Types whose specs carry a frame count (and loop flag)
    pub fn is_animated(&self) -> bool {
        matches!(self, AssetType::SpriteSheet | AssetType::Animation)
    }

    /// Types that should declare a pixel resolution
    pub fn wants_resolution(&self) -> bool {
        matches!(self, AssetType::Sprite | AssetType::SpriteSheet | AssetType::Icon)
    }

    /// Types rendered over transparency by default; backgrounds and audio
    /// default to solid instead.
    pub fn defaults_transparent(&self) -> bool {
        !matches!(self, AssetType::Background | AssetType::Audio)
    }
}

impl fmt::Display for AssetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            AssetType::SpriteSheet => "sprite_sheet",
            AssetType::Sprite => "sprite",
            AssetType::Background => "background",
            AssetType::Tileset => "tileset",
            AssetType::Ui => "ui",
            AssetType::Icon => "icon",
            AssetType::Audio => "audio",
            AssetType::Animation => "animation",
            AssetType::Effect => "effect",
        };
        write!(f, "{}", s)
    }
}

impl std::str::FromStr for AssetType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sprite_sheet" => Ok(AssetType::SpriteSheet),
            "sprite" => Ok(AssetType::Sprite),
            "background" => Ok(AssetType::Background),
            "tileset" => Ok(AssetType::Tileset),
            "ui" => Ok(AssetType::Ui),
            "icon" => Ok(AssetType::Icon),
            "audio" => Ok(AssetType::Audio),
            "animation" => Ok(AssetType::Animation),
            "effect" => Ok(AssetType::Effect),
            other => Err(format!("unknown asset type '{}'", other)),
        }
    }
}

/// How an asset treats its background.
///
/// `transparent` and `solid` are the recognized modes; anything else is
/// carried through verbatim as `Other` so hand-authored specs round-trip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum BackgroundMode {
    Transparent,
    Solid,
    Other(String),
}

impl From<String> for BackgroundMode {
    fn from(s: String) -> Self {
        match s.as_str() {
            "transparent" => BackgroundMode::Transparent,
            "solid" => BackgroundMode::Solid,
            _ => BackgroundMode::Other(s),
        }
    }
}

impl From<BackgroundMode> for String {
    fn from(mode: BackgroundMode) -> Self {
        match mode {
            BackgroundMode::Transparent => "transparent".to_string(),
            BackgroundMode::Solid => "solid".to_string(),
            BackgroundMode::Other(s) => s,
        }
    }
}

impl fmt::Display for BackgroundMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackgroundMode::Transparent => write!(f, "transparent"),
            BackgroundMode::Solid => write!(f, "solid"),
            BackgroundMode::Other(s) => write!(f, "{}", s),
        }
    }
}

fn default_kind() -> AssetType {
    AssetType::Sprite
}

/// A declarative asset specification.
///
/// The camelCase wire format matches the registry document; `type` defaults
/// to `sprite` at the parse boundary so partial specs deserialize.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetSpec {
    pub asset_id: String,
    #[serde(rename = "type", default = "default_kind")]
    pub kind: AssetType,
    /// Pixel resolution as a `WxH` string (e.g. `64x64`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolution: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frames: Option<u32>,
    /// Ordered color list, as color strings
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub palette: Option<Vec<String>>,
    #[serde(rename = "loop", default, skip_serializing_if = "Option::is_none")]
    pub loop_animation: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background: Option<BackgroundMode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub engine: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl AssetSpec {
    /// Create a minimal spec with just an id and type
    pub fn new(asset_id: impl Into<String>, kind: AssetType) -> Self {
        Self {
            asset_id: asset_id.into(),
            kind,
            resolution: None,
            frames: None,
            palette: None,
            loop_animation: None,
            background: None,
            style: None,
            usage: None,
            engine: None,
            description: None,
        }
    }

    /// Parse the `WxH` resolution string into numeric dimensions
    pub fn parse_resolution(&self) -> Option<(u32, u32)> {
        let res = self.resolution.as_deref()?;
        let (w, h) = res.split_once('x')?;
        Some((w.parse().ok()?, h.parse().ok()?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_asset_type_wire_names() {
        let json = serde_json::to_string(&AssetType::SpriteSheet).unwrap();
        assert_eq!(json, "\"sprite_sheet\"");
        let parsed: AssetType = serde_json::from_str("\"ui\"").unwrap();
        assert_eq!(parsed, AssetType::Ui);
    }

    #[test]
    fn test_background_mode_roundtrip() {
        for raw in ["transparent", "solid", "checker"] {
            let mode: BackgroundMode = serde_json::from_str(&format!("\"{}\"", raw)).unwrap();
            let back = serde_json::to_string(&mode).unwrap();
            assert_eq!(back, format!("\"{}\"", raw));
        }
        let custom: BackgroundMode = serde_json::from_str("\"gradient\"").unwrap();
        assert_eq!(custom, BackgroundMode::Other("gradient".to_string()));
    }

    #[test]
    fn test_spec_kind_defaults_to_sprite() {
        let spec: AssetSpec = serde_json::from_str(r#"{"assetId": "hero_idle"}"#).unwrap();
        assert_eq!(spec.kind, AssetType::Sprite);
    }

    #[test]
    fn test_spec_loop_wire_name() {
        let spec: AssetSpec =
            serde_json::from_str(r#"{"assetId": "walk", "type": "animation", "loop": false}"#)
                .unwrap();
        assert_eq!(spec.loop_animation, Some(false));
        let json = serde_json::to_string(&spec).unwrap();
        assert!(json.contains("\"loop\":false"));
        assert!(!json.contains("loop_animation"));
    }

    #[test]
    fn test_parse_resolution() {
        let mut spec = AssetSpec::new("hero", AssetType::Sprite);
        assert_eq!(spec.parse_resolution(), None);

        spec.resolution = Some("32x48".to_string());
        assert_eq!(spec.parse_resolution(), Some((32, 48)));

        spec.resolution = Some("wide".to_string());
        assert_eq!(spec.parse_resolution(), None);
    }

    #[test]
    fn test_animated_and_resolution_hints() {
        assert!(AssetType::SpriteSheet.is_animated());
        assert!(AssetType::Animation.is_animated());
        assert!(!AssetType::Icon.is_animated());

        assert!(AssetType::Icon.wants_resolution());
        assert!(!AssetType::Audio.wants_resolution());

        assert!(AssetType::Sprite.defaults_transparent());
        assert!(!AssetType::Background.defaults_transparent());
        assert!(!AssetType::Audio.defaults_transparent());
    }
}
