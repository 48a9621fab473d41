//! `mend manifest` - build and verify manifest snapshots

use anyhow::Result;
use clap::Subcommand;
use mend_verify::{build_manifest, load_manifest, save_manifest, verify_manifest};

#[derive(Subcommand)]
pub enum ManifestCommands {
    /// Build `asset_manifest.json` from the registry and a live check
    Build {
        /// Project directory
        #[arg(default_value = ".")]
        project: String,
    },

    /// Verify a saved manifest directly against the filesystem
    Verify {
        /// Project directory
        #[arg(default_value = ".")]
        project: String,
    },
}

pub fn run(cmd: ManifestCommands) -> Result<()> {
    match cmd {
        ManifestCommands::Build { project } => run_build(&project),
        ManifestCommands::Verify { project } => run_verify(&project),
    }
}

fn run_build(project: &str) -> Result<()> {
    let manifest = build_manifest(project).map_err(|e| anyhow::anyhow!("{}", e))?;
    let path = save_manifest(&manifest, project).map_err(|e| anyhow::anyhow!("{}", e))?;

    println!(
        "Manifest: {} assets ({} validated, {} missing) -> {}",
        manifest.summary.total,
        manifest.summary.validated,
        manifest.summary.missing,
        path.display()
    );
    for (kind, count) in &manifest.summary.by_type {
        println!("  {}: {}", kind, count);
    }
    Ok(())
}

fn run_verify(project: &str) -> Result<()> {
    let Some(manifest) = load_manifest(project) else {
        anyhow::bail!("no manifest found in {}; run `mend manifest build` first", project);
    };

    let check = verify_manifest(&manifest, project);
    println!(
        "Manifest check: {} valid, {} missing",
        check.valid.len(),
        check.missing.len()
    );
    for id in &check.missing {
        println!("  MISSING {}", id);
    }
    for error in &check.errors {
        eprintln!("  error: {}", error);
    }

    if !check.missing.is_empty() || !check.errors.is_empty() {
        std::process::exit(1);
    }
    Ok(())
}
