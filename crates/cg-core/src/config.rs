//! Resolver configuration (contextgraph.yml)

use crate::error::{CoreError, CoreResult};
use crate::resolver::{DEFAULT_MAX_MULTI_DEPTH, DEFAULT_MAX_PATH_DEPTH, DEFAULT_MAX_SUGGESTIONS};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// File names searched by [`ResolverConfig::load_from_dir`], in order
pub const CONFIG_FILE_NAMES: [&str; 2] = ["contextgraph.yml", "contextgraph.yaml"];

/// Limits applied to join path discovery
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ResolverConfig {
    /// Edge limit for point-to-point search
    #[serde(default = "default_max_path_depth")]
    pub max_path_depth: usize,

    /// Edge limit for each expansion step of multi-dataset search
    #[serde(default = "default_max_multi_depth")]
    pub max_multi_depth: usize,

    /// Number of ranked strategies returned by join suggestions
    #[serde(default = "default_max_suggestions")]
    pub max_suggestions: usize,
}

fn default_max_path_depth() -> usize {
    DEFAULT_MAX_PATH_DEPTH
}

fn default_max_multi_depth() -> usize {
    DEFAULT_MAX_MULTI_DEPTH
}

fn default_max_suggestions() -> usize {
    DEFAULT_MAX_SUGGESTIONS
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            max_path_depth: DEFAULT_MAX_PATH_DEPTH,
            max_multi_depth: DEFAULT_MAX_MULTI_DEPTH,
            max_suggestions: DEFAULT_MAX_SUGGESTIONS,
        }
    }
}

impl ResolverConfig {
    /// Load configuration from a file
    pub fn load(path: &Path) -> CoreResult<Self> {
        if !path.exists() {
            return Err(CoreError::ConfigNotFound {
                path: path.display().to_string(),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|e| CoreError::IoWithPath {
            path: path.display().to_string(),
            source: e,
        })?;
        let config = Self::from_yaml(&content)?;
        log::debug!("Loaded resolver config from {}", path.display());
        Ok(config)
    }

    /// Parse and validate configuration text; an empty document yields defaults
    pub fn from_yaml(content: &str) -> CoreResult<Self> {
        let config: Self = if content.trim().is_empty() {
            Self::default()
        } else {
            serde_yaml::from_str(content).map_err(|e| CoreError::ConfigParseError {
                message: e.to_string(),
            })?
        };
        config.validate()?;
        Ok(config)
    }

    /// Load from `contextgraph.yml` or `contextgraph.yaml` in a directory,
    /// falling back to defaults when neither exists
    pub fn load_from_dir(dir: &Path) -> CoreResult<Self> {
        for name in CONFIG_FILE_NAMES {
            let candidate = dir.join(name);
            if candidate.exists() {
                return Self::load(&candidate);
            }
        }
        log::debug!("No resolver config in {}, using defaults", dir.display());
        Ok(Self::default())
    }

    fn validate(&self) -> CoreResult<()> {
        if self.max_path_depth == 0 {
            return Err(CoreError::ConfigInvalid {
                message: "max_path_depth must be at least 1".to_string(),
            });
        }
        if self.max_multi_depth == 0 {
            return Err(CoreError::ConfigInvalid {
                message: "max_multi_depth must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
