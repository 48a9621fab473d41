//! Mend Verify - drift detection and self-healing
//!
//! Walks a project's source tree, cross-checks referenced asset ids
//! against the registry and the filesystem, repairs missing assets through
//! the generation pipeline, and emits an externally-consumable manifest
//! snapshot for build-time checks.

pub mod manifest;
pub mod repair;
pub mod verifier;

pub use manifest::{
    build_manifest, load_manifest, save_manifest, verify_manifest, Manifest, ManifestAsset,
    ManifestCheck, ManifestSummary, MANIFEST_FILENAME,
};
pub use repair::{repair_missing_assets, RepairConfig, RepairResult};
pub use verifier::{to_markdown, verify_project_assets, BrokenReference, VerificationReport};
