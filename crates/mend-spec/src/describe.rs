//! Spec synthesis from free-text descriptions
//!
//! Best-effort keyword classifier: overlapping keywords resolve by a fixed
//! first-match order (sheet/animation, background, tileset, icon, ui,
//! effect, then sprite), so unusual phrasings can misclassify. Callers that
//! need exact types should author specs directly.

use crate::model::{AssetSpec, AssetType, BackgroundMode};
use regex::Regex;
use std::sync::OnceLock;

const MAX_ID_LEN: usize = 50;

/// Style keywords recognized in descriptions, checked in order
const STYLE_KEYWORDS: &[&str] = &[
    "pixel", "retro", "flat", "cartoon", "realistic", "minimal", "fantasy", "cyberpunk",
];

fn resolution_scan_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\d+x\d+").expect("valid pattern"))
}

fn frames_scan_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(\d+)\s*frames?").expect("valid pattern"))
}

/// Derive an asset spec from a natural-language description.
///
/// The id is the lowercased description with non-alphanumeric runs collapsed
/// to `_`, capped at 50 characters. Type, resolution, frame count, and style
/// are inferred by scanning the text; defaults are then applied per type.
pub fn from_description(text: &str, engine_hint: Option<&str>) -> AssetSpec {
    let lowered = text.to_lowercase();
    let kind = infer_kind(&lowered);

    let mut spec = AssetSpec::new(slugify(&lowered), kind);
    spec.description = Some(text.trim().to_string());
    spec.engine = engine_hint.map(|e| e.to_string());

    if let Some(m) = resolution_scan_re().find(&lowered) {
        spec.resolution = Some(m.as_str().to_string());
    }

    if let Some(caps) = frames_scan_re().captures(&lowered) {
        spec.frames = caps[1].parse().ok();
    }

    spec.style = STYLE_KEYWORDS
        .iter()
        .find(|kw| lowered.contains(*kw))
        .map(|kw| kw.to_string());

    if kind.is_animated() {
        spec.loop_animation = Some(true);
    }
    spec.background = Some(if kind.defaults_transparent() {
        BackgroundMode::Transparent
    } else {
        BackgroundMode::Solid
    });

    spec
}

fn infer_kind(lowered: &str) -> AssetType {
    let has = |kw: &str| lowered.contains(kw);

    if has("sheet") || has("animation") {
        AssetType::SpriteSheet
    } else if has("background") || has("bg") {
        AssetType::Background
    } else if has("tileset") || has("tile") {
        AssetType::Tileset
    } else if has("icon") {
        AssetType::Icon
    } else if has("ui") || has("interface") {
        AssetType::Ui
    } else if has("effect") || has("particle") {
        AssetType::Effect
    } else {
        AssetType::Sprite
    }
}

/// Collapse a lowercased description into an id: non-alphanumeric runs
/// become single underscores, trimmed and capped at 50 chars.
fn slugify(lowered: &str) -> String {
    let mut id = String::new();
    let mut gap = false;
    for ch in lowered.chars() {
        if ch.is_ascii_alphanumeric() {
            if gap && !id.is_empty() {
                id.push('_');
            }
            gap = false;
            id.push(ch);
        } else {
            gap = true;
        }
        if id.len() >= MAX_ID_LEN {
            break;
        }
    }
    id.truncate(MAX_ID_LEN);
    id
}
