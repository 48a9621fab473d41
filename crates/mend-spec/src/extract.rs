//! Spec and reference extraction from project source files
//!
//! Three independent passes over one source text, merged without
//! deduplication:
//!
//! 1. inline comment markers: `// ASSET: id, type, 32x32, style:flat`
//! 2. fenced `ASSET_SPEC: { ...json... }` blocks
//! 3. loader call sites: `this.load.image('id', ...)` and friends
//!
//! The matching strategy is regex-based and intentionally hidden behind
//! this module's narrow interface so it can be swapped for a real
//! tokenizer without touching callers.

use crate::model::{AssetSpec, AssetType, BackgroundMode};
use regex::Regex;
use std::sync::OnceLock;

/// How far around a loader call to look for resolution/frame hints
const CONTEXT_WINDOW: usize = 200;

/// A reference to an asset id found in source text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetReference {
    pub asset_id: String,
}

fn marker_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?m)//\s*ASSET:\s*(.+)$").expect("valid pattern"))
}

fn loader_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"\.load\.(image|spritesheet|atlas)\s*\(\s*['"]([A-Za-z0-9_\-]+)['"]"#)
            .expect("valid pattern")
    })
}

fn resolution_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\d+x\d+").expect("valid pattern"))
}

fn frames_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(\d+)\s*frames?").expect("valid pattern"))
}

/// Extract every asset spec declared in a source text.
pub fn extract_from_source(code: &str) -> Vec<AssetSpec> {
    let mut specs = extract_markers(code);
    specs.extend(extract_spec_blocks(code));
    specs.extend(extract_loader_calls(code));
    specs
}

/// Extract just the referenced asset ids, one record per occurrence.
pub fn extract_references(code: &str) -> Vec<AssetReference> {
    extract_from_source(code)
        .into_iter()
        .map(|spec| AssetReference {
            asset_id: spec.asset_id,
        })
        .collect()
}

/// Pass 1: `// ASSET: id, type, extras...` comment markers.
///
/// Extras are positional or prefixed: a `WxH` token sets resolution,
/// `frames:N` and `style:S` are prefixed, bare `loop` and `transparent`
/// are flags.
fn extract_markers(code: &str) -> Vec<AssetSpec> {
    let mut specs = Vec::new();

    for caps in marker_re().captures_iter(code) {
        let fields: Vec<&str> = caps[1].split(',').map(str::trim).collect();
        let id = match fields.first() {
            Some(id) if !id.is_empty() => *id,
            _ => continue,
        };

        let (kind, extras) = match fields.get(1).and_then(|t| t.parse::<AssetType>().ok()) {
            Some(kind) => (kind, &fields[2..]),
            None => (AssetType::Sprite, &fields[1..]),
        };

        let mut spec = AssetSpec::new(id, kind);
        for extra in extras {
            if let Some(frames) = extra.strip_prefix("frames:") {
                spec.frames = frames.trim().parse().ok();
            } else if let Some(style) = extra.strip_prefix("style:") {
                spec.style = Some(style.trim().to_string());
            } else if *extra == "loop" {
                spec.loop_animation = Some(true);
            } else if *extra == "transparent" {
                spec.background = Some(BackgroundMode::Transparent);
            } else if resolution_re().is_match(extra) {
                spec.resolution = Some(extra.to_string());
            }
        }
        specs.push(spec);
    }

    specs
}

/// Pass 2: `ASSET_SPEC: { ... }` JSON blocks.
///
/// The block must parse as a JSON object carrying a string `assetId` and
/// `type`; anything else is silently skipped.
fn extract_spec_blocks(code: &str) -> Vec<AssetSpec> {
    let mut specs = Vec::new();
    let mut search = 0;

    while let Some(found) = code[search..].find("ASSET_SPEC:") {
        let after = search + found + "ASSET_SPEC:".len();
        search = after;

        let Some(json) = balanced_json_object(&code[after..]) else {
            continue;
        };
        let Ok(value) = serde_json::from_str::<serde_json::Value>(json) else {
            continue;
        };
        let has_required = value.get("assetId").map(|v| v.is_string()).unwrap_or(false)
            && value.get("type").map(|v| v.is_string()).unwrap_or(false);
        if !has_required {
            continue;
        }
        if let Ok(spec) = serde_json::from_value::<AssetSpec>(value) {
            specs.push(spec);
        }
    }

    specs
}

/// Find the first balanced `{...}` object in `text`, skipping leading
/// whitespace. String contents are respected so braces inside values
/// don't unbalance the scan.
fn balanced_json_object(text: &str) -> Option<&str> {
    let trimmed_start = text.len() - text.trim_start().len();
    let body = &text[trimmed_start..];
    if !body.starts_with('{') {
        return None;
    }

    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;
    for (idx, ch) in body.char_indices() {
        if in_string {
            match ch {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match ch {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&body[..=idx]);
                }
            }
            _ => {}
        }
    }
    None
}

/// Pass 3: loader call sites (`*.load.image('id', ...)` et al).
///
/// The call name gives the type; resolution and frame hints are scanned
/// from the surrounding text window.
fn extract_loader_calls(code: &str) -> Vec<AssetSpec> {
    let mut specs = Vec::new();

    for caps in loader_re().captures_iter(code) {
        let call = caps.get(1).map(|m| m.as_str()).unwrap_or("image");
        let id = &caps[2];

        let kind = match call {
            "spritesheet" | "atlas" => AssetType::SpriteSheet,
            _ => AssetType::Sprite,
        };

        let mut spec = AssetSpec::new(id, kind);

        let full = caps.get(0).map(|m| (m.start(), m.end())).unwrap_or((0, 0));
        let window = window_around(code, full.0, full.1);
        if let Some(m) = resolution_re().find(window) {
            spec.resolution = Some(m.as_str().to_string());
        }
        if let Some(frame_caps) = frames_re().captures(window) {
            spec.frames = frame_caps[1].parse().ok();
        }

        specs.push(spec);
    }

    specs
}

fn window_around(code: &str, start: usize, end: usize) -> &str {
    let mut lo = start.saturating_sub(CONTEXT_WINDOW);
    while !code.is_char_boundary(lo) {
        lo -= 1;
    }
    let mut hi = (end + CONTEXT_WINDOW).min(code.len());
    while !code.is_char_boundary(hi) {
        hi += 1;
    }
    &code[lo..hi]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_marker_basic() {
        let code = "// ASSET: coin_icon, icon, 32x32, style:flat\nconst x = 1;";
        let specs = extract_from_source(code);
        assert_eq!(specs.len(), 1);
        assert_eq!(specs[0].asset_id, "coin_icon");
        assert_eq!(specs[0].kind, AssetType::Icon);
        assert_eq!(specs[0].resolution.as_deref(), Some("32x32"));
        assert_eq!(specs[0].style.as_deref(), Some("flat"));
    }

    #[test]
    fn test_marker_flags() {
        let code = "// ASSET: hero_walk, sprite_sheet, frames:8, loop, transparent";
        let specs = extract_from_source(code);
        assert_eq!(specs.len(), 1);
        assert_eq!(specs[0].frames, Some(8));
        assert_eq!(specs[0].loop_animation, Some(true));
        assert_eq!(specs[0].background, Some(BackgroundMode::Transparent));
    }

    #[test]
    fn test_marker_unknown_type_defaults_sprite() {
        let code = "// ASSET: mystery, 16x16";
        let specs = extract_from_source(code);
        assert_eq!(specs[0].kind, AssetType::Sprite);
        assert_eq!(specs[0].resolution.as_deref(), Some("16x16"));
    }

    #[test]
    fn test_spec_block() {
        let code = r#"
/*
ASSET_SPEC: {"assetId": "boss_dragon", "type": "sprite_sheet", "frames": 12, "resolution": "128x128"}
*/
"#;
        let specs = extract_from_source(code);
        assert_eq!(specs.len(), 1);
        assert_eq!(specs[0].asset_id, "boss_dragon");
        assert_eq!(specs[0].frames, Some(12));
    }

    #[test]
    fn test_spec_block_missing_type_skipped() {
        let code = r#"ASSET_SPEC: {"assetId": "half_done"}"#;
        assert!(extract_from_source(code).is_empty());
    }

    #[test]
    fn test_spec_block_nested_braces_in_strings() {
        let code = r#"ASSET_SPEC: {"assetId": "odd", "type": "sprite", "description": "curly } brace"}"#;
        let specs = extract_from_source(code);
        assert_eq!(specs.len(), 1);
        assert_eq!(specs[0].description.as_deref(), Some("curly } brace"));
    }

    #[test]
    fn test_spec_block_invalid_json_skipped() {
        let code = "ASSET_SPEC: {not json at all}";
        assert!(extract_from_source(code).is_empty());
    }

    #[test]
    fn test_loader_image_call() {
        let code = "this.load.image('hero_idle', 'assets/sprites/hero_idle.png');";
        let specs = extract_from_source(code);
        assert_eq!(specs.len(), 1);
        assert_eq!(specs[0].asset_id, "hero_idle");
        assert_eq!(specs[0].kind, AssetType::Sprite);
    }

    #[test]
    fn test_loader_spritesheet_with_hints() {
        let code = r#"
// hero walk, 8 frames
this.load.spritesheet('hero_walk', 'assets/sprites/hero_walk.png', {
  frameWidth: 64, frameHeight: 64 // 64x64
});
"#;
        let specs = extract_from_source(code);
        assert_eq!(specs.len(), 1);
        assert_eq!(specs[0].kind, AssetType::SpriteSheet);
        assert_eq!(specs[0].resolution.as_deref(), Some("64x64"));
        assert_eq!(specs[0].frames, Some(8));
    }

    #[test]
    fn test_loader_atlas_call() {
        let code = r#"scene.load.atlas("world_tiles", "tiles.png", "tiles.json");"#;
        let specs = extract_from_source(code);
        assert_eq!(specs[0].asset_id, "world_tiles");
        assert_eq!(specs[0].kind, AssetType::SpriteSheet);
    }

    #[test]
    fn test_passes_merge_without_dedup() {
        let code = r#"
// ASSET: hero_idle, sprite, 64x64
this.load.image('hero_idle', 'assets/sprites/hero_idle.png');
"#;
        let specs = extract_from_source(code);
        assert_eq!(specs.len(), 2);

        let refs = extract_references(code);
        assert_eq!(refs.len(), 2);
        assert!(refs.iter().all(|r| r.asset_id == "hero_idle"));
    }

    #[test]
    fn test_empty_source() {
        assert!(extract_from_source("").is_empty());
        assert!(extract_references("const a = 1;").is_empty());
    }
}
