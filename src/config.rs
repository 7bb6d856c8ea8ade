use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Tunables for revelation pacing and board acceptance.
///
/// Every field has a default, so an empty TOML document is a valid configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Minimum [`FuzzyRatio`](crate::FuzzyRatio) score, out of 100, for a guess or reference to match.
    #[serde(default = "default_similarity_threshold")]
    pub similarity_threshold: u8,
    /// Upper bound on cells revealed by a single solve when a relationship graph is present.
    /// `None` lets the graph ripple freely.
    #[serde(default)]
    pub reveal_cap: Option<usize>,
    /// Upper bound on reference-matched reveals per solve when there is no graph.
    #[serde(default = "default_fallback_reveal_cap")]
    pub fallback_reveal_cap: usize,
    /// Reachability percentage a board must meet before it is accepted for play.
    #[serde(default = "default_reachability_threshold")]
    pub reachability_threshold: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            similarity_threshold: default_similarity_threshold(),
            reveal_cap: None,
            fallback_reveal_cap: default_fallback_reveal_cap(),
            reachability_threshold: default_reachability_threshold(),
        }
    }
}

impl EngineConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// Check every value is in range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.similarity_threshold > 100 {
            return Err(ConfigError::Invalid(format!(
                "similarity_threshold {} exceeds 100",
                self.similarity_threshold
            )));
        }
        if self.fallback_reveal_cap == 0 {
            return Err(ConfigError::Invalid("fallback_reveal_cap must be at least 1".into()));
        }
        if self.reveal_cap == Some(0) {
            return Err(ConfigError::Invalid("reveal_cap must be at least 1 when set".into()));
        }
        if !(0.0..=100.0).contains(&self.reachability_threshold) {
            return Err(ConfigError::Invalid(format!(
                "reachability_threshold {} is outside [0, 100]",
                self.reachability_threshold
            )));
        }
        Ok(())
    }
}

fn default_similarity_threshold() -> u8 {
    85
}

fn default_fallback_reveal_cap() -> usize {
    2
}

fn default_reachability_threshold() -> f64 {
    80.0
}
