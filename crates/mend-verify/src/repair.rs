//! Asset repair
//!
//! Feeds a verification report's missing ids back through spec synthesis
//! and generation, re-registering everything that was successfully
//! produced. One id's failure never aborts the rest of the loop.

use crate::verifier::VerificationReport;
use mend_core::Result;
use mend_gen::{GenerationPipeline, Generator, PipelineConfig};
use mend_registry::{AssetEntry, Registry};
use mend_spec::from_description;
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

/// Settings for a repair run.
#[derive(Debug, Clone)]
pub struct RepairConfig {
    /// Target framework forwarded to the generation pipeline
    pub framework: String,
}

impl Default for RepairConfig {
    fn default() -> Self {
        Self {
            framework: "phaser".to_string(),
        }
    }
}

/// Outcome of a repair run. `success` is true iff no id failed.
#[derive(Debug, Clone, Default)]
pub struct RepairResult {
    pub success: bool,
    /// Ids for which an asset file was produced
    pub generated: Vec<String>,
    /// Ids re-registered into the registry
    pub fixed: Vec<String>,
    pub failed: Vec<String>,
    pub errors: Vec<String>,
}

/// Repair every missing asset named in `report`.
///
/// Missing ids are repaired strictly one at a time; the generation
/// pipeline is not built for concurrent load.
pub fn repair_missing_assets<P: AsRef<Path>>(
    project_path: P,
    report: &VerificationReport,
    pipeline: &dyn GenerationPipeline,
    config: &RepairConfig,
) -> Result<RepairResult> {
    let project = project_path.as_ref();
    let mut registry = Registry::open(project)?;
    let generator = Generator::new(pipeline, project);
    let pipeline_config = PipelineConfig::standard(&config.framework);

    // Distinct missing ids, each with the files that referenced it
    let mut missing: BTreeMap<&str, BTreeSet<&str>> = BTreeMap::new();
    for broken in &report.broken_references {
        missing
            .entry(broken.asset_id.as_str())
            .or_default()
            .insert(broken.file_path.as_str());
    }

    let mut result = RepairResult::default();

    for (asset_id, referencing_files) in missing {
        match repair_one(
            asset_id,
            &referencing_files,
            &mut registry,
            &generator,
            &pipeline_config,
            config,
        ) {
            Ok(()) => {
                result.generated.push(asset_id.to_string());
                result.fixed.push(asset_id.to_string());
            }
            Err(message) => {
                result.failed.push(asset_id.to_string());
                result.errors.push(format!("{}: {}", asset_id, message));
            }
        }
    }

    result.success = result.failed.is_empty();
    Ok(result)
}

fn repair_one(
    asset_id: &str,
    referencing_files: &BTreeSet<&str>,
    registry: &mut Registry,
    generator: &Generator<'_>,
    pipeline_config: &PipelineConfig,
    config: &RepairConfig,
) -> std::result::Result<(), String> {
    let mut spec = from_description(asset_id, Some(&config.framework));
    // The entry must be keyed by the id the sources actually reference
    spec.asset_id = asset_id.to_string();

    let generation = generator.generate(&spec, pipeline_config);
    if !generation.success {
        return Err(generation.errors.join("; "));
    }

    let path = generation
        .path
        .ok_or_else(|| "generation reported success without a path".to_string())?;
    let metadata = generation
        .asset
        .map(|asset| serde_json::to_value(asset.metadata))
        .transpose()
        .map_err(|e| e.to_string())?;

    let references = referencing_files
        .iter()
        .map(|f| f.to_string())
        .collect::<Vec<_>>();

    let entry = AssetEntry::generated(path, spec, metadata, references);
    registry.register(entry).map_err(|e| e.to_string())?;
    Ok(())
}
