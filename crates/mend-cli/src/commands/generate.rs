//! `mend generate` - one-off asset generation from a description

use super::resolve_pipeline;
use anyhow::Result;
use mend_gen::{Generator, MendConfig, PipelineConfig};
use mend_registry::{AssetEntry, Registry};
use mend_spec::{complete, from_description, validate};

pub fn run(
    description: &str,
    project: &str,
    pipeline_override: Option<&str>,
    register: bool,
) -> Result<()> {
    let config = MendConfig::load().unwrap_or_default();
    let pipeline = resolve_pipeline(&config, pipeline_override)?;

    let spec = complete(from_description(
        description,
        Some(config.target_framework()),
    ));
    let validation = validate(&spec);
    for warning in &validation.warnings {
        eprintln!("warning: {}", warning);
    }
    if !validation.valid {
        anyhow::bail!("derived spec is invalid: {}", validation.errors.join("; "));
    }

    println!(
        "Generating {} '{}' via {}...",
        spec.kind,
        spec.asset_id,
        pipeline.name()
    );

    let generator = Generator::new(pipeline.as_ref(), project);
    let result = generator.generate(&spec, &PipelineConfig::standard(config.target_framework()));

    for error in &result.errors {
        eprintln!("  note: {}", error);
    }
    if !result.success {
        anyhow::bail!("generation failed for '{}'", spec.asset_id);
    }

    let path = result.path.clone().unwrap_or_default();
    println!("  Written: {}", path);

    if register {
        let metadata = result
            .asset
            .map(|asset| serde_json::to_value(asset.metadata))
            .transpose()?;
        let mut registry = Registry::open(project).map_err(|e| anyhow::anyhow!("{}", e))?;
        registry
            .register(AssetEntry::generated(path, spec, metadata, vec![]))
            .map_err(|e| anyhow::anyhow!("{}", e))?;
        println!("  Registered");
    }

    Ok(())
}
