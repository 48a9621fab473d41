//! Registry wire document
//!
//! The registry is persisted as a single JSON document:
//!
//! ```json
//! {
//!   "version": 1,
//!   "projectPath": "/home/dev/my-game",
//!   "generated": "2024-01-15T10:30:00Z",
//!   "assets": {
//!     "hero_idle": {
//!       "id": "hero_idle",
//!       "path": "assets/sprites/hero_idle.png",
//!       "type": "sprite",
//!       "spec": { "assetId": "hero_idle", "type": "sprite" },
//!       "validated": true,
//!       "lastValidated": "2024-01-15T10:30:00Z",
//!       "generated": false,
//!       "references": ["src/scenes/Game.ts"]
//!     }
//!   }
//! }
//! ```

use mend_core::now_iso8601;
use mend_spec::{AssetSpec, AssetType};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Current registry document format version.
pub const REGISTRY_VERSION: u32 = 1;

/// Default registry filename inside a project.
pub const REGISTRY_FILENAME: &str = "asset_registry.json";

/// A registered asset and its last-known on-disk state.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetEntry {
    pub id: String,
    /// Project-relative path to the asset file
    pub path: String,
    #[serde(rename = "type")]
    pub kind: AssetType,
    pub spec: AssetSpec,
    /// Last-known existence state; flipped by verification, never by a
    /// missing file alone
    #[serde(default)]
    pub validated: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_validated: Option<String>,
    /// Provenance: synthesized by the pipeline vs hand-authored
    #[serde(default)]
    pub generated: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<serde_json::Value>,
    /// Project-relative source files known to reference this asset
    #[serde(default)]
    pub references: Vec<String>,
}

impl AssetEntry {
    /// Create an entry for a hand-authored asset.
    pub fn new(path: impl Into<String>, spec: AssetSpec) -> Self {
        Self {
            id: spec.asset_id.clone(),
            path: path.into(),
            kind: spec.kind,
            spec,
            validated: false,
            last_validated: None,
            generated: false,
            metadata: None,
            references: Vec::new(),
        }
    }

    /// Create an entry for a pipeline-generated asset, already verified.
    pub fn generated(
        path: impl Into<String>,
        spec: AssetSpec,
        metadata: Option<serde_json::Value>,
        references: Vec<String>,
    ) -> Self {
        Self {
            id: spec.asset_id.clone(),
            path: path.into(),
            kind: spec.kind,
            spec,
            validated: true,
            last_validated: Some(now_iso8601()),
            generated: true,
            metadata,
            references,
        }
    }
}

/// The persisted registry document.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistryDocument {
    pub version: u32,
    pub project_path: String,
    pub generated: String,
    /// Keyed by asset id; a BTreeMap keeps serialization deterministic
    pub assets: BTreeMap<String, AssetEntry>,
}

impl RegistryDocument {
    pub fn empty(project_path: impl Into<String>) -> Self {
        Self {
            version: REGISTRY_VERSION,
            project_path: project_path.into(),
            generated: now_iso8601(),
            assets: BTreeMap::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mend_spec::AssetType;

    #[test]
    fn test_entry_wire_format() {
        let spec = AssetSpec::new("hero_idle", AssetType::Sprite);
        let entry = AssetEntry::new("assets/sprites/hero_idle.png", spec);
        let json = serde_json::to_string(&entry).unwrap();

        assert!(json.contains("\"id\":\"hero_idle\""));
        assert!(json.contains("\"type\":\"sprite\""));
        assert!(json.contains("\"validated\":false"));
        // Absent timestamp is omitted, not null
        assert!(!json.contains("lastValidated"));
    }

    #[test]
    fn test_entry_references_default() {
        let json = r#"{
            "id": "coin",
            "path": "assets/ui/coin.png",
            "type": "icon",
            "spec": {"assetId": "coin", "type": "icon"},
            "validated": true,
            "generated": false
        }"#;
        let entry: AssetEntry = serde_json::from_str(json).unwrap();
        assert!(entry.references.is_empty());
        assert!(entry.last_validated.is_none());
    }

    #[test]
    fn test_generated_entry_is_validated() {
        let spec = AssetSpec::new("boss", AssetType::Sprite);
        let entry = AssetEntry::generated("assets/sprites/boss.png", spec, None, vec![]);
        assert!(entry.generated);
        assert!(entry.validated);
        assert!(entry.last_validated.is_some());
    }

    #[test]
    fn test_document_camel_case() {
        let doc = RegistryDocument::empty("/tmp/project");
        let json = serde_json::to_string(&doc).unwrap();
        assert!(json.contains("\"projectPath\""));
        assert!(json.contains("\"version\":1"));
    }
}
