//! Mend CLI - self-healing asset pipeline for game projects

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::{asset, generate, manifest, repair, verify};

#[derive(Parser)]
#[command(name = "mend")]
#[command(about = "Self-healing asset metadata pipeline", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scan the project for asset drift and print a report
    Verify {
        /// Project directory
        #[arg(default_value = ".")]
        project: String,

        /// Output format (text, markdown, or json)
        #[arg(long, default_value = "text")]
        format: String,
    },

    /// Regenerate every missing asset found by verification
    Repair {
        /// Project directory
        #[arg(default_value = ".")]
        project: String,

        /// Pipeline to use (remote or mock); defaults to the configured one
        #[arg(long)]
        pipeline: Option<String>,
    },

    /// Manifest operations
    #[command(subcommand)]
    Manifest(manifest::ManifestCommands),

    /// Generate a single asset from a description
    Generate {
        /// Description of the asset (e.g. "coin icon 32x32")
        description: String,

        /// Project directory
        #[arg(long, default_value = ".")]
        project: String,

        /// Pipeline to use (remote or mock); defaults to the configured one
        #[arg(long)]
        pipeline: Option<String>,

        /// Register the generated asset in the registry
        #[arg(long)]
        register: bool,
    },

    /// Registry operations
    #[command(subcommand)]
    Asset(asset::AssetCommands),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Verify { project, format } => verify::run(&project, &format),
        Commands::Repair { project, pipeline } => repair::run(&project, pipeline.as_deref()),
        Commands::Manifest(cmd) => manifest::run(cmd),
        Commands::Generate {
            description,
            project,
            pipeline,
            register,
        } => generate::run(&description, &project, pipeline.as_deref(), register),
        Commands::Asset(cmd) => asset::run(cmd),
    }
}
