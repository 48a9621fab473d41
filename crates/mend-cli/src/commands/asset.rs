//! `mend asset` - registry operations

use anyhow::Result;
use clap::Subcommand;
use mend_registry::{AssetEntry, Registry};
use mend_spec::{complete, validate, AssetSpec, AssetType};

#[derive(Subcommand)]
pub enum AssetCommands {
    /// Register a hand-authored asset
    Register {
        /// Asset id
        id: String,

        /// Project-relative path to the asset file
        #[arg(long)]
        path: String,

        /// Asset type (sprite, sprite_sheet, background, tileset, ui,
        /// icon, audio, animation, effect)
        #[arg(long, default_value = "sprite")]
        r#type: String,

        /// Resolution as WxH
        #[arg(long)]
        resolution: Option<String>,

        /// Frame count for animated types
        #[arg(long)]
        frames: Option<u32>,

        /// Project directory
        #[arg(long, default_value = ".")]
        project: String,
    },

    /// List registered assets
    List {
        /// Filter by asset type
        #[arg(long)]
        r#type: Option<String>,

        /// Project directory
        #[arg(long, default_value = ".")]
        project: String,
    },

    /// Show one asset's entry
    Info {
        /// Asset id
        id: String,

        /// Project directory
        #[arg(long, default_value = ".")]
        project: String,
    },

    /// Remove an asset from the registry
    Unregister {
        /// Asset id
        id: String,

        /// Project directory
        #[arg(long, default_value = ".")]
        project: String,
    },

    /// Print registry statistics
    Stats {
        /// Project directory
        #[arg(long, default_value = ".")]
        project: String,
    },
}

pub fn run(cmd: AssetCommands) -> Result<()> {
    match cmd {
        AssetCommands::Register {
            id,
            path,
            r#type,
            resolution,
            frames,
            project,
        } => run_register(&id, &path, &r#type, resolution, frames, &project),
        AssetCommands::List { r#type, project } => run_list(r#type.as_deref(), &project),
        AssetCommands::Info { id, project } => run_info(&id, &project),
        AssetCommands::Unregister { id, project } => run_unregister(&id, &project),
        AssetCommands::Stats { project } => run_stats(&project),
    }
}

fn parse_kind(raw: &str) -> Result<AssetType> {
    raw.parse()
        .map_err(|e: String| anyhow::anyhow!("{}; see `mend asset register --help`", e))
}

fn run_register(
    id: &str,
    path: &str,
    kind_raw: &str,
    resolution: Option<String>,
    frames: Option<u32>,
    project: &str,
) -> Result<()> {
    let mut spec = AssetSpec::new(id, parse_kind(kind_raw)?);
    spec.resolution = resolution;
    spec.frames = frames;
    let spec = complete(spec);

    let validation = validate(&spec);
    for warning in &validation.warnings {
        eprintln!("warning: {}", warning);
    }
    if !validation.valid {
        anyhow::bail!("invalid spec: {}", validation.errors.join("; "));
    }

    let mut registry = Registry::open(project).map_err(|e| anyhow::anyhow!("{}", e))?;
    let mut entry = AssetEntry::new(path, spec);
    entry.validated = registry.project_path().join(path).exists();
    if !entry.validated {
        eprintln!("warning: {} does not exist yet", path);
    }
    registry
        .register(entry)
        .map_err(|e| anyhow::anyhow!("{}", e))?;

    println!("Registered '{}' -> {}", id, path);
    Ok(())
}

fn run_list(kind_filter: Option<&str>, project: &str) -> Result<()> {
    let registry = Registry::open(project).map_err(|e| anyhow::anyhow!("{}", e))?;

    let entries: Vec<&AssetEntry> = match kind_filter {
        Some(raw) => registry.find_by_type(parse_kind(raw)?),
        None => registry.entries().collect(),
    };

    for entry in &entries {
        let state = if entry.validated { "ok" } else { "missing" };
        let origin = if entry.generated { "generated" } else { "authored" };
        println!(
            "{:<24} {:<12} {:<8} {:<9} {}",
            entry.id, entry.kind, state, origin, entry.path
        );
    }
    println!("{} assets", entries.len());
    Ok(())
}

fn run_info(id: &str, project: &str) -> Result<()> {
    let registry = Registry::open(project).map_err(|e| anyhow::anyhow!("{}", e))?;
    let entry = registry
        .get(id)
        .ok_or_else(|| anyhow::anyhow!("asset '{}' not found", id))?;

    println!("{}", serde_json::to_string_pretty(entry)?);
    Ok(())
}

fn run_unregister(id: &str, project: &str) -> Result<()> {
    let mut registry = Registry::open(project).map_err(|e| anyhow::anyhow!("{}", e))?;
    registry
        .unregister(id)
        .map_err(|e| anyhow::anyhow!("{}", e))?;
    println!("Unregistered '{}'", id);
    Ok(())
}

fn run_stats(project: &str) -> Result<()> {
    let registry = Registry::open(project).map_err(|e| anyhow::anyhow!("{}", e))?;
    let stats = registry.stats();

    println!("Assets: {}", stats.total_assets);
    println!("  validated: {}", stats.validated_assets);
    println!("  generated: {}", stats.generated_assets);
    println!("  references: {}", stats.total_references);
    for (kind, count) in &stats.assets_by_type {
        println!("  {}: {}", kind, count);
    }
    Ok(())
}
