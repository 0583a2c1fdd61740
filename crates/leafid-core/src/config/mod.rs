//! Configuration loading.
//!
//! One YAML file holds every tunable: gate policy, decision thresholds, model
//! settings and ranking size. Loading never fails; problems become warnings
//! on the returned [`ConfigHandle`] and built-in defaults fill the gaps.


use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::classifier::ModelConfig;
use crate::decision::DecisionPolicy;
use crate::error::{LeafError, Result};
use crate::gate::LeafPolicy;
use crate::ranking::DEFAULT_TOP_K;

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV_VAR: &str = "LEAFID_CONFIG";

const CONFIG_FILENAMES: &[&str] = &["leafid.yml", "leafid.yaml"];
const CONFIG_DIR_NAME: &str = "leafid";

/// Ranked-list settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RankingConfig {
    pub top_k: usize,
}

impl Default for RankingConfig {
    fn default() -> Self {
        Self {
            top_k: DEFAULT_TOP_K,
        }
    }
}

/// Complete configuration.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LeafIdConfig {
    pub gate: LeafPolicy,
    pub decision: DecisionPolicy,
    pub model: ModelConfig,
    pub ranking: RankingConfig,
}

impl LeafIdConfig {
    /// Parse and sanitize YAML.
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: LeafIdConfig = serde_yaml::from_str(yaml)
            .map_err(|e| LeafError::Configuration(e.to_string()))?;
        Ok(config.sanitize())
    }

    /// Serialized defaults, as written by `leafid init`.
    pub fn default_yaml() -> Result<String> {
        serde_yaml::to_string(&LeafIdConfig::default())
            .map_err(|e| LeafError::Configuration(e.to_string()))
    }

    fn sanitize(mut self) -> Self {
        self.gate.sanitize();
        self.decision.sanitize();
        self.model.sanitize();
        self.ranking.top_k = self.ranking.top_k.max(1);
        self
    }
}

/// A loaded configuration and where it came from.
#[derive(Debug, Clone)]
pub struct ConfigHandle {
    pub config: LeafIdConfig,
    pub source: Option<PathBuf>,
    pub warnings: Vec<String>,
}

impl ConfigHandle {
    fn with_config(config: LeafIdConfig, source: Option<PathBuf>, warnings: Vec<String>) -> Self {
        Self {
            config,
            source,
            warnings,
        }
    }

    /// Report the source and any warnings through `tracing`.
    pub fn log_usage(&self) {
        match &self.source {
            Some(source) => info!("Loaded config from {}", source.display()),
            None => info!("Using built-in defaults"),
        }
        for warning in &self.warnings {
            warn!("Config warning: {}", warning);
        }
    }
}

/// Load the first readable, parseable config among the candidates.
pub fn load_config(custom_path: Option<&Path>) -> ConfigHandle {
    let mut warnings = Vec::new();

    if let Some(path) = custom_path {
        if !path.is_file() {
            warnings.push(format!("Config file {} not found", path.display()));
        }
    }

    for candidate in config_candidates(custom_path) {
        if !candidate.is_file() {
            continue;
        }

        match fs::read_to_string(&candidate) {
            Ok(contents) => match LeafIdConfig::from_yaml_str(&contents) {
                Ok(config) => {
                    let source = fs::canonicalize(&candidate).unwrap_or(candidate);
                    return ConfigHandle::with_config(config, Some(source), warnings);
                }
                Err(err) => warnings.push(format!(
                    "Failed to parse config {}: {}",
                    candidate.display(),
                    err
                )),
            },
            Err(err) => warnings.push(format!(
                "Failed to read config {}: {}",
                candidate.display(),
                err
            )),
        }
    }

    ConfigHandle::with_config(LeafIdConfig::default(), None, warnings)
}

/// Search order: explicit path, `LEAFID_CONFIG`, `./config/`, `./`, `~/leafid/`.
pub fn config_candidates(custom_path: Option<&Path>) -> Vec<PathBuf> {
    let mut candidates = Vec::new();

    if let Some(path) = custom_path {
        candidates.push(path.to_path_buf());
    }

    if let Ok(env_path) = std::env::var(CONFIG_ENV_VAR) {
        candidates.push(PathBuf::from(env_path));
    }

    if let Ok(cwd) = std::env::current_dir() {
        for name in CONFIG_FILENAMES {
            candidates.push(cwd.join("config").join(name));
            candidates.push(cwd.join(name));
        }
    }

    if let Some(home) = dirs::home_dir() {
        for name in CONFIG_FILENAMES {
            candidates.push(home.join(CONFIG_DIR_NAME).join(name));
        }
    }

    candidates
}

/// `~/leafid/leafid.yml`, if a home directory is known.
pub fn default_user_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(CONFIG_DIR_NAME).join(CONFIG_FILENAMES[0]))
}

/// Write the default configuration to `path`, creating parent directories.
///
/// An existing file is kept unless `force` is set.
pub fn write_default_config(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        return Err(LeafError::Configuration(format!(
            "{} already exists (use --force to overwrite)",
            path.display()
        )));
    }
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    fs::write(path, LeafIdConfig::default_yaml()?)?;
    Ok(())
}
