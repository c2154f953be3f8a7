//! YAML configuration

use std::fs;
use std::path::{Path, PathBuf};

use mimizuku_formats::builtin_registry;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

#[cfg(feature = "mimizuku-compare")]
use mimizuku_compare::config::{DEFAULT_MAX_REFINEMENT_ROUNDS, DEFAULT_SEARCH_BUDGET};

// mirrors mimizuku_compare::config for builds without the comparator
#[cfg(not(feature = "mimizuku-compare"))]
const DEFAULT_MAX_REFINEMENT_ROUNDS: usize = 32;
#[cfg(not(feature = "mimizuku-compare"))]
const DEFAULT_SEARCH_BUDGET: u64 = 100_000;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Error reading configuration {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid configuration YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Cannot install the log subscriber: {0}")]
    Logging(String),
}

/// Top-level configuration; every section falls back to its defaults
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MimizukuConfig {
    pub logging: LoggingConfig,
    pub comparison: ComparisonConfig,
    pub formats: FormatsConfig,
    pub reasoning: ReasoningConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default level when neither `filter` nor `RUST_LOG` is set
    pub level: String,
    /// Full `EnvFilter` directive, e.g. `mimizuku_formats=debug,info`
    pub filter: Option<String>,
    pub ansi: bool,
    pub with_target: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            filter: None,
            ansi: true,
            with_target: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComparisonConfig {
    pub max_refinement_rounds: usize,
    pub search_budget: u64,
}

impl Default for ComparisonConfig {
    fn default() -> Self {
        Self {
            max_refinement_rounds: DEFAULT_MAX_REFINEMENT_ROUNDS,
            search_budget: DEFAULT_SEARCH_BUDGET,
        }
    }
}

#[cfg(feature = "mimizuku-compare")]
impl From<&ComparisonConfig> for mimizuku_compare::ComparatorConfig {
    fn from(config: &ComparisonConfig) -> Self {
        Self {
            max_refinement_rounds: config.max_refinement_rounds,
            search_budget: config.search_budget,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormatsConfig {
    /// Format used when a caller does not name one
    pub default_format: String,
}

impl Default for FormatsConfig {
    fn default() -> Self {
        Self {
            default_format: "json-ld".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReasoningConfig {
    /// External reasoner; without one, reasoning reports a failure
    pub command: Option<CommandConfig>,
    pub infer_property_values: bool,
    pub infer_data_property_values: bool,
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandConfig {
    pub program: String,
    #[serde(default)]
    pub args: Vec<String>,
    #[serde(default = "default_input_format")]
    pub input_format: String,
    #[serde(default)]
    pub output_format: Option<String>,
}

fn default_input_format() -> String {
    "rdfxml".to_string()
}

impl MimizukuConfig {
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        let config: MimizukuConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_yaml_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let yaml = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        debug!("Read configuration from {}", path.display());
        Self::from_yaml_str(&yaml)
    }

    pub fn to_yaml_string(&self) -> Result<String, ConfigError> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Reject values that would only fail later
    pub fn validate(&self) -> Result<(), ConfigError> {
        let registry = builtin_registry();
        if !registry.is_supported(&self.formats.default_format) {
            return Err(ConfigError::Invalid(format!(
                "formats.default_format: unsupported format {}",
                self.formats.default_format
            )));
        }
        if self.comparison.search_budget == 0 {
            return Err(ConfigError::Invalid(
                "comparison.search_budget must be positive".to_string(),
            ));
        }
        if let Some(command) = &self.reasoning.command {
            if command.program.trim().is_empty() {
                return Err(ConfigError::Invalid(
                    "reasoning.command.program is empty".to_string(),
                ));
            }
            let formats = std::iter::once(&command.input_format).chain(command.output_format.as_ref());
            for format in formats {
                if !registry.is_supported(format) {
                    return Err(ConfigError::Invalid(format!(
                        "reasoning.command: unsupported format {}",
                        format
                    )));
                }
            }
        }
        Ok(())
    }
}
