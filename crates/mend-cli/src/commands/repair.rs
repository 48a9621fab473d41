//! `mend repair` - regenerate missing assets

use super::resolve_pipeline;
use anyhow::Result;
use mend_gen::MendConfig;
use mend_verify::{repair_missing_assets, verify_project_assets, RepairConfig};

pub fn run(project: &str, pipeline_override: Option<&str>) -> Result<()> {
    let config = MendConfig::load().unwrap_or_default();
    let pipeline = resolve_pipeline(&config, pipeline_override)?;

    println!("Scanning {} for missing assets...", project);
    let report = verify_project_assets(project);
    println!(
        "Found {} referenced assets, {} missing",
        report.assets_found, report.assets_missing
    );

    if report.assets_missing == 0 {
        println!("Nothing to repair");
        return Ok(());
    }

    let repair_config = RepairConfig {
        framework: config.target_framework().to_string(),
    };
    let result = repair_missing_assets(project, &report, pipeline.as_ref(), &repair_config)
        .map_err(|e| anyhow::anyhow!("{}", e))?;

    for id in &result.fixed {
        println!("  repaired {}", id);
    }
    for error in &result.errors {
        eprintln!("  FAILED {}", error);
    }
    println!(
        "Repair: {} fixed, {} failed",
        result.fixed.len(),
        result.failed.len()
    );

    if !result.success {
        std::process::exit(1);
    }
    Ok(())
}
