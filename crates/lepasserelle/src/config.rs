// Pipeline Configuration
//
// *La Configuration* (The Configuration) - Scoring, generation, and storage settings for LeParcours

use anyhow::{bail, Context, Result};
use lefeuille::{PromptBuilder, RetryPolicy, DEFAULT_GEMINI_ENDPOINT, DEFAULT_GEMINI_MODEL};
use leprofil::DEFAULT_TOP_K;
use lestockage::StorageConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default configuration file name
pub const DEFAULT_CONFIG_FILE: &str = ".leparcours/config.toml";

/// Environment variable holding the generative model API key
pub const ENV_API_KEY: &str = "GENAI_API_KEY";

/// Environment variable overriding the generative model name
pub const ENV_GEN_MODEL: &str = "LEPARCOURS_GEN_MODEL";

/// Environment variable overriding the graph database path
pub const ENV_DB_PATH: &str = "LEPARCOURS_DB_PATH";

/// Environment variable overriding the classifier artifact path
pub const ENV_MODEL_PATH: &str = "LEPARCOURS_MODEL_PATH";

/// Full pipeline configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct PipelineConfig {
    /// Scoring and ranking settings
    pub scoring: ScoringConfig,

    /// Generative model settings
    pub generation: GenerationConfig,

    /// Graph store settings
    pub storage: StorageConfig,
}

impl PipelineConfig {
    /// Load configuration from a directory
    ///
    /// Looks for `.leparcours/config.toml` under `base_dir`.
    /// If not found, returns default configuration.
    pub fn load<P: AsRef<Path>>(base_dir: P) -> Result<Self> {
        let config_path = base_dir.as_ref().join(DEFAULT_CONFIG_FILE);

        if !config_path.exists() {
            return Ok(PipelineConfig::default());
        }

        Self::from_file(&config_path)
    }

    /// Load configuration from an explicit TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;

        let config: PipelineConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {:?}", path))?;

        Ok(config)
    }

    /// Save configuration under `base_dir`
    ///
    /// Creates the `.leparcours` directory if it doesn't exist.
    pub fn save<P: AsRef<Path>>(&self, base_dir: P) -> Result<()> {
        let config_path = base_dir.as_ref().join(DEFAULT_CONFIG_FILE);
        if let Some(config_dir) = config_path.parent() {
            fs::create_dir_all(config_dir)
                .with_context(|| format!("Failed to create config directory: {:?}", config_dir))?;
        }

        let toml_string =
            toml::to_string_pretty(self).context("Failed to serialize configuration")?;

        fs::write(&config_path, toml_string)
            .with_context(|| format!("Failed to write config file: {:?}", config_path))?;

        Ok(())
    }

    /// Apply overrides from the process environment
    pub fn apply_env(&mut self) {
        self.apply_env_from(|key| std::env::var(key).ok());
    }

    /// Apply overrides from an arbitrary variable lookup
    ///
    /// Empty values are ignored.
    pub fn apply_env_from<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        if let Some(key) = get(ENV_API_KEY) {
            self.generation.api_key = Some(key);
        }
        if let Some(model) = get(ENV_GEN_MODEL) {
            self.generation.model = model;
        }
        if let Some(db_path) = get(ENV_DB_PATH) {
            self.storage.db_path = db_path;
        }
        if let Some(model_path) = get(ENV_MODEL_PATH) {
            self.scoring.model_path = Some(PathBuf::from(model_path));
        }
    }

    /// Reject settings the pipeline cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.scoring.top_k == 0 {
            bail!("scoring.top_k must be greater than zero");
        }
        if self.generation.timeout_secs == 0 {
            bail!("generation.timeout_secs must be greater than zero");
        }
        if self.generation.model.trim().is_empty() {
            bail!("generation.model cannot be empty");
        }
        if self.generation.endpoint.trim().is_empty() {
            bail!("generation.endpoint cannot be empty");
        }
        if self.generation.min_edges > self.generation.max_edges {
            bail!(
                "generation.min_edges ({}) exceeds generation.max_edges ({})",
                self.generation.min_edges,
                self.generation.max_edges
            );
        }
        if self.storage.db_path.trim().is_empty() {
            bail!("storage.db_path cannot be empty");
        }
        Ok(())
    }
}

/// Scoring settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    /// Classifier artifact; the built-in rule model is used when unset
    pub model_path: Option<PathBuf>,

    /// Number of labels handed to generation
    pub top_k: usize,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            model_path: None,
            top_k: DEFAULT_TOP_K,
        }
    }
}

/// Generative model settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    /// REST endpoint root
    pub endpoint: String,

    /// Model name
    pub model: String,

    /// API key; usually supplied through `GENAI_API_KEY`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Request timeout in seconds
    pub timeout_secs: u64,

    /// Lower bound on requested graph edges
    pub min_edges: usize,

    /// Upper bound on requested graph edges
    pub max_edges: usize,

    /// Retry policy for retryable generation failures
    pub retry: RetryPolicy,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        let prompts = PromptBuilder::default();
        Self {
            endpoint: DEFAULT_GEMINI_ENDPOINT.to_string(),
            model: DEFAULT_GEMINI_MODEL.to_string(),
            api_key: None,
            timeout_secs: 30,
            min_edges: prompts.min_edges(),
            max_edges: prompts.max_edges(),
            retry: RetryPolicy::default(),
        }
    }
}

impl GenerationConfig {
    /// Timeout as a duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Prompt builder for the configured edge range
    pub fn prompt_builder(&self) -> PromptBuilder {
        PromptBuilder::new().with_edge_range(self.min_edges, self.max_edges)
    }
}
