//! Project asset verification
//!
//! Walks the source tree, extracts asset-id references, and cross-checks
//! them against the registry and the filesystem. The walk is tolerant:
//! unreadable directories are skipped, unreadable files become warnings,
//! and a failure anywhere still yields a partial report.

use mend_core::Result;
use mend_registry::Registry;
use mend_spec::extract_references;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

/// Directories never descended into during the walk.
pub const IGNORED_DIRS: &[&str] = &["node_modules", "dist", "build", ".git", ".next", ".vite"];

/// Source extensions scanned for asset references.
const SOURCE_EXTENSIONS: &[&str] = &["ts", "tsx", "js", "jsx"];

/// One reference to an asset the project cannot satisfy.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct BrokenReference {
    pub asset_id: String,
    pub file_path: String,
    pub context: String,
}

/// Structured drift report for one project.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationReport {
    /// Source files scanned
    pub scanned: usize,
    /// Distinct asset ids referenced anywhere
    pub assets_found: usize,
    pub assets_valid: usize,
    pub assets_missing: usize,
    pub broken_references: Vec<BrokenReference>,
    /// Registered paths absent on disk
    pub missing_files: Vec<String>,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

/// Verify a project's assets end to end. Never fails: a top-level error is
/// recorded in the report, which is returned as far as it got.
pub fn verify_project_assets<P: AsRef<Path>>(project_path: P) -> VerificationReport {
    let mut report = VerificationReport::default();
    if let Err(e) = run_verification(project_path.as_ref(), &mut report) {
        report.errors.push(e.to_string());
    }
    report
}

fn run_verification(project: &Path, report: &mut VerificationReport) -> Result<()> {
    let mut registry = Registry::open(project)?;

    let mut files = Vec::new();
    collect_source_files(project, &mut files);
    files.sort();
    report.scanned = files.len();

    // id -> set of referencing files (project-relative)
    let mut referenced: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
    for file in &files {
        let content = match std::fs::read_to_string(file) {
            Ok(content) => content,
            Err(e) => {
                report
                    .warnings
                    .push(format!("could not read {}: {}", file.display(), e));
                continue;
            }
        };

        let relative = relative_to(project, file);
        for reference in extract_references(&content) {
            referenced
                .entry(reference.asset_id)
                .or_default()
                .insert(relative.clone());
        }
    }
    report.assets_found = referenced.len();

    let outcome = registry.verify_all()?;
    let valid: BTreeSet<&String> = outcome.valid.iter().collect();

    for (asset_id, referencing_files) in &referenced {
        if !registry.has(asset_id) {
            report.assets_missing += 1;
            for file in referencing_files {
                report.broken_references.push(BrokenReference {
                    asset_id: asset_id.clone(),
                    file_path: file.clone(),
                    context: "not in registry".to_string(),
                });
            }
        } else if !valid.contains(asset_id) {
            report.assets_missing += 1;
            if let Some(entry) = registry.get(asset_id) {
                report.missing_files.push(entry.path.clone());
            }
            for file in referencing_files {
                report.broken_references.push(BrokenReference {
                    asset_id: asset_id.clone(),
                    file_path: file.clone(),
                    context: "file missing".to_string(),
                });
            }
        } else {
            report.assets_valid += 1;
        }
    }

    Ok(())
}

/// Depth-first walk collecting source files. A directory that cannot be
/// read is skipped.
fn collect_source_files(dir: &Path, files: &mut Vec<PathBuf>) {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return;
    };

    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            let name = entry.file_name();
            let name = name.to_string_lossy();
            if IGNORED_DIRS.iter().any(|ignored| *ignored == name) {
                continue;
            }
            collect_source_files(&path, files);
        } else if is_source_file(&path) {
            files.push(path);
        }
    }
}

fn is_source_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|ext| SOURCE_EXTENSIONS.contains(&ext))
        .unwrap_or(false)
}

fn relative_to(project: &Path, file: &Path) -> String {
    file.strip_prefix(project)
        .unwrap_or(file)
        .to_string_lossy()
        .replace('\\', "/")
}

/// Render a report as markdown. Sections with no items are omitted.
pub fn to_markdown(report: &VerificationReport) -> String {
    let mut out = String::new();
    out.push_str("# Asset Verification Report\n\n");
    out.push_str(&format!("- Files scanned: {}\n", report.scanned));
    out.push_str(&format!("- Assets referenced: {}\n", report.assets_found));
    out.push_str(&format!("- Valid: {}\n", report.assets_valid));
    out.push_str(&format!("- Missing: {}\n", report.assets_missing));

    if !report.broken_references.is_empty() {
        out.push_str("\n## Broken References\n\n");
        for broken in &report.broken_references {
            out.push_str(&format!(
                "- `{}` in `{}` ({})\n",
                broken.asset_id, broken.file_path, broken.context
            ));
        }
    }

    if !report.missing_files.is_empty() {
        out.push_str("\n## Missing Files\n\n");
        for file in &report.missing_files {
            out.push_str(&format!("- `{}`\n", file));
        }
    }

    if !report.errors.is_empty() {
        out.push_str("\n## Errors\n\n");
        for error in &report.errors {
            out.push_str(&format!("- {}\n", error));
        }
    }

    if !report.warnings.is_empty() {
        out.push_str("\n## Warnings\n\n");
        for warning in &report.warnings {
            out.push_str(&format!("- {}\n", warning));
        }
    }

    out
}
