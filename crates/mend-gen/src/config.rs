//! Layered configuration
//!
//! Config is loaded with three layers of precedence (highest wins):
//! 1. Environment variables: `MEND_PIPELINE_API_KEY`, `MEND_PIPELINE_URL`
//! 2. Project-local: `.mend/config.toml`
//! 3. Global: `~/.mend/config.toml`

use mend_core::{MendError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const ENV_API_KEY: &str = "MEND_PIPELINE_API_KEY";
const ENV_API_URL: &str = "MEND_PIPELINE_URL";

/// Remote pipeline settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PipelineSection {
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default)]
    pub api_url: Option<String>,
}

/// Generation defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationSection {
    #[serde(default = "default_framework")]
    pub target_framework: String,
    #[serde(default = "default_pipeline")]
    pub pipeline: String,
}

impl Default for GenerationSection {
    fn default() -> Self {
        Self {
            target_framework: default_framework(),
            pipeline: default_pipeline(),
        }
    }
}

fn default_framework() -> String {
    "phaser".to_string()
}

fn default_pipeline() -> String {
    "remote".to_string()
}

/// Top-level config file structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MendConfigFile {
    #[serde(default)]
    pub pipeline: PipelineSection,
    #[serde(default)]
    pub generation: GenerationSection,
}

/// Resolved configuration with environment overrides applied
#[derive(Debug, Clone, Default)]
pub struct MendConfig {
    pub pipeline: PipelineSection,
    pub generation: GenerationSection,
}

impl MendConfig {
    /// Load config with layered precedence: global < project < env vars
    pub fn load() -> Result<Self> {
        let mut file = MendConfigFile::default();

        if let Some(global) = Self::global_config_path() {
            if global.exists() {
                Self::merge_into(&mut file, Self::load_file(&global)?);
            }
        }

        let local = PathBuf::from(".mend/config.toml");
        if local.exists() {
            Self::merge_into(&mut file, Self::load_file(&local)?);
        }

        Self::apply_env_overrides(&mut file);

        Ok(Self {
            pipeline: file.pipeline,
            generation: file.generation,
        })
    }

    /// Load config from a specific file only (for testing)
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let mut file = Self::load_file(path)?;
        Self::apply_env_overrides(&mut file);
        Ok(Self {
            pipeline: file.pipeline,
            generation: file.generation,
        })
    }

    pub fn api_key(&self) -> Option<&str> {
        self.pipeline.api_key.as_deref()
    }

    pub fn api_url(&self) -> Option<&str> {
        self.pipeline.api_url.as_deref()
    }

    pub fn target_framework(&self) -> &str {
        &self.generation.target_framework
    }

    /// Name of the pipeline to build by default (`remote` or `mock`)
    pub fn pipeline_name(&self) -> &str {
        &self.generation.pipeline
    }

    fn global_config_path() -> Option<PathBuf> {
        dirs::home_dir().map(|h| h.join(".mend").join("config.toml"))
    }

    fn load_file(path: &Path) -> Result<MendConfigFile> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| {
            MendError::GenerationError(format!("Failed to parse config {}: {}", path.display(), e))
        })
    }

    fn merge_into(base: &mut MendConfigFile, overlay: MendConfigFile) {
        if overlay.pipeline.api_key.is_some() {
            base.pipeline.api_key = overlay.pipeline.api_key;
        }
        if overlay.pipeline.api_url.is_some() {
            base.pipeline.api_url = overlay.pipeline.api_url;
        }
        if overlay.generation.target_framework != default_framework() {
            base.generation.target_framework = overlay.generation.target_framework;
        }
        if overlay.generation.pipeline != default_pipeline() {
            base.generation.pipeline = overlay.generation.pipeline;
        }
    }

    fn apply_env_overrides(file: &mut MendConfigFile) {
        if let Ok(key) = std::env::var(ENV_API_KEY) {
            file.pipeline.api_key = Some(key);
        }
        if let Ok(url) = std::env::var(ENV_API_URL) {
            file.pipeline.api_url = Some(url);
        }
    }
}
