//! Asset manifest snapshots
//!
//! An independent, externally-consumable JSON summary derived from the
//! registry plus a live verification pass. Build tooling can check it, and
//! `verify_manifest` re-checks the filesystem without needing registry
//! access at all.

use mend_core::{now_iso8601, Result};
use mend_registry::Registry;
use mend_spec::AssetType;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

/// Manifest filename, written beside the registry file.
pub const MANIFEST_FILENAME: &str = "asset_manifest.json";

/// Current manifest format version.
pub const MANIFEST_VERSION: u32 = 1;

/// Per-asset manifest record: a flattened subset of the registry entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManifestAsset {
    pub id: String,
    pub path: String,
    #[serde(rename = "type")]
    pub kind: AssetType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolution: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frames: Option<u32>,
    pub validated: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_validated: Option<String>,
    pub generated: bool,
    #[serde(default)]
    pub references: Vec<String>,
}

/// Derived counts over the full asset list.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManifestSummary {
    pub total: usize,
    pub validated: usize,
    pub missing: usize,
    pub by_type: BTreeMap<String, usize>,
}

/// The manifest document.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Manifest {
    pub project: String,
    pub generated: String,
    pub version: u32,
    pub assets: Vec<ManifestAsset>,
    pub summary: ManifestSummary,
}

/// Result of an independent manifest check.
#[derive(Debug, Clone, Default)]
pub struct ManifestCheck {
    pub valid: Vec<String>,
    pub missing: Vec<String>,
    pub errors: Vec<String>,
}

/// Build a manifest from the registry plus a live verification pass.
pub fn build_manifest<P: AsRef<Path>>(project_path: P) -> Result<Manifest> {
    let project = project_path.as_ref();
    let mut registry = Registry::open(project)?;
    let outcome = registry.verify_all()?;
    let verified: BTreeSet<&String> = outcome.valid.iter().collect();

    let mut assets = Vec::new();
    let mut summary = ManifestSummary::default();

    for entry in registry.entries() {
        let validated = entry.validated && verified.contains(&entry.id);
        assets.push(ManifestAsset {
            id: entry.id.clone(),
            path: entry.path.clone(),
            kind: entry.kind,
            resolution: entry.spec.resolution.clone(),
            frames: entry.spec.frames,
            validated,
            last_validated: entry.last_validated.clone(),
            generated: entry.generated,
            references: entry.references.clone(),
        });

        summary.total += 1;
        if validated {
            summary.validated += 1;
        } else {
            summary.missing += 1;
        }
        *summary.by_type.entry(entry.kind.to_string()).or_insert(0) += 1;
    }

    Ok(Manifest {
        project: project.to_string_lossy().to_string(),
        generated: now_iso8601(),
        version: MANIFEST_VERSION,
        assets,
        summary,
    })
}

/// Write the manifest beside the registry file.
pub fn save_manifest<P: AsRef<Path>>(manifest: &Manifest, project_path: P) -> Result<PathBuf> {
    let path = project_path.as_ref().join(MANIFEST_FILENAME);
    let json = serde_json::to_string_pretty(manifest)?;
    std::fs::write(&path, json)?;
    Ok(path)
}

/// Load a previously saved manifest. Absent or unparseable files yield
/// `None`, never an error; consumers treat both as "no manifest yet".
pub fn load_manifest<P: AsRef<Path>>(project_path: P) -> Option<Manifest> {
    let path = project_path.as_ref().join(MANIFEST_FILENAME);
    let content = std::fs::read_to_string(path).ok()?;
    serde_json::from_str(&content).ok()
}

/// Check each manifest asset directly against the filesystem. No registry
/// involved, so external tooling can run this with just the manifest.
pub fn verify_manifest<P: AsRef<Path>>(manifest: &Manifest, project_path: P) -> ManifestCheck {
    let project = project_path.as_ref();
    let mut check = ManifestCheck::default();

    if !project.exists() {
        check
            .errors
            .push(format!("project path {} does not exist", project.display()));
    }

    for asset in &manifest.assets {
        if project.join(&asset.path).exists() {
            check.valid.push(asset.id.clone());
        } else {
            check.missing.push(asset.id.clone());
        }
    }

    check
}
