//! Reasoning configuration: the shared defaults for confidence and propagation.
//!
//! The default confidence of freshly created nodes and edges, the propagation
//! step size, and the thresholds used by the epistemic consistency heuristic all
//! live here, so entity constructors and reasoning services never re-derive them.
//! A [`ReasoningConfig`] can be loaded from TOML; every key is optional.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::confidence::Confidence;
use crate::error::ConfigError;

/// Confidence assigned to nodes and edges created without an explicit value.
pub const DEFAULT_CONFIDENCE: f64 = 0.5;

/// Amount by which propagation strengthens or weakens a target's confidence.
pub const DEFAULT_PROPAGATION_FACTOR: f64 = 0.1;

/// Above this, a node whose evidence is mostly weakening is flagged.
pub const HIGH_CONFIDENCE_THRESHOLD: f64 = 0.7;

/// Below this, a node whose evidence is mostly supporting is flagged.
pub const LOW_CONFIDENCE_THRESHOLD: f64 = 0.3;

/// Tunables consumed by entity construction, validation and propagation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReasoningConfig {
    /// Confidence for new nodes and edges (default: 0.5).
    pub default_confidence: f64,
    /// Step applied per traversed edge during propagation (default: 0.1).
    pub propagation_factor: f64,
    /// Upper bound of the "plausible" confidence band (default: 0.7).
    pub high_confidence_threshold: f64,
    /// Lower bound of the "plausible" confidence band (default: 0.3).
    pub low_confidence_threshold: f64,
}

impl Default for ReasoningConfig {
    fn default() -> Self {
        Self {
            default_confidence: DEFAULT_CONFIDENCE,
            propagation_factor: DEFAULT_PROPAGATION_FACTOR,
            high_confidence_threshold: HIGH_CONFIDENCE_THRESHOLD,
            low_confidence_threshold: LOW_CONFIDENCE_THRESHOLD,
        }
    }
}

/// Reject a propagation step outside [0, 1]; a negative step would invert
/// every polarity.
pub fn check_propagation_factor(factor: f64) -> Result<f64, ConfigError> {
    if (0.0..=1.0).contains(&factor) {
        Ok(factor)
    } else {
        Err(ConfigError::Invalid {
            message: format!("propagation_factor must be in [0.0, 1.0], got {factor}"),
        })
    }
}

impl ReasoningConfig {
    /// Parse a config from TOML text and validate it.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content).map_err(|e| ConfigError::Parse {
            message: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a TOML config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// Serialize to pretty TOML.
    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::Parse {
            message: e.to_string(),
        })
    }

    /// Confidence for records that don't specify one.
    pub fn initial_confidence(&self) -> Confidence {
        Confidence::saturating(self.default_confidence)
    }

    /// Check that every value lies in [0, 1] and the thresholds are ordered.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let fields = [
            ("default_confidence", self.default_confidence),
            ("propagation_factor", self.propagation_factor),
            ("high_confidence_threshold", self.high_confidence_threshold),
            ("low_confidence_threshold", self.low_confidence_threshold),
        ];
        for (name, value) in fields {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::Invalid {
                    message: format!("{name} must be in [0.0, 1.0], got {value}"),
                });
            }
        }
        if self.low_confidence_threshold > self.high_confidence_threshold {
            return Err(ConfigError::Invalid {
                message: format!(
                    "low_confidence_threshold ({}) exceeds high_confidence_threshold ({})",
                    self.low_confidence_threshold, self.high_confidence_threshold
                ),
            });
        }
        Ok(())
    }
}
