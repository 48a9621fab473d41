//! `mend verify` - drift detection

use anyhow::Result;
use mend_verify::{to_markdown, verify_project_assets};

pub fn run(project: &str, format: &str) -> Result<()> {
    let report = verify_project_assets(project);

    match format {
        "json" => println!("{}", serde_json::to_string_pretty(&report)?),
        "markdown" => print!("{}", to_markdown(&report)),
        _ => {
            println!(
                "Scanned {} files, {} assets referenced: {} valid, {} missing",
                report.scanned, report.assets_found, report.assets_valid, report.assets_missing
            );
            for broken in &report.broken_references {
                println!(
                    "  MISSING {} <- {} ({})",
                    broken.asset_id, broken.file_path, broken.context
                );
            }
            for warning in &report.warnings {
                println!("  warning: {}", warning);
            }
            for error in &report.errors {
                eprintln!("  error: {}", error);
            }
        }
    }

    if !report.errors.is_empty() || report.assets_missing > 0 {
        std::process::exit(1);
    }
    Ok(())
}
