//! Reasoning pipeline: validate a graph, then propagate confidence from seeds.

use serde::Serialize;

use crate::config::ReasoningConfig;
use crate::error::ConfigError;
use crate::graph::Graph;
use crate::node::NodeId;
use crate::propagate::PropagationService;
use crate::validate::{ValidationResult, Validator};

/// Which propagators a pipeline run uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PropagationScope {
    /// Epistemic propagation only.
    Epistemic,
    /// Epistemic, then causal.
    All,
}

impl PropagationScope {
    pub fn from_causal_flag(include_causal: bool) -> Self {
        if include_causal {
            PropagationScope::All
        } else {
            PropagationScope::Epistemic
        }
    }
}

/// Result of one pipeline run. The graph itself is mutated in place.
#[derive(Debug, Clone, Serialize)]
pub struct Outcome {
    /// Findings from before propagation.
    pub validation: ValidationResult,
    pub scope: PropagationScope,
}

/// Validate-then-propagate use case.
///
/// Propagation runs even when validation finds violations; the findings are
/// returned so the caller can decide what to trust.
#[derive(Debug, Clone, Default)]
pub struct ValidateAndPropagate {
    validator: Validator,
    propagation: PropagationService,
}

impl ValidateAndPropagate {
    pub fn new(validator: Validator, propagation: PropagationService) -> Self {
        Self {
            validator,
            propagation,
        }
    }

    /// Fails if the configured propagation factor is out of range.
    pub fn from_config(config: &ReasoningConfig) -> Result<Self, ConfigError> {
        Ok(Self::new(
            Validator::with_config(config),
            PropagationService::from_config(config)?,
        ))
    }

    pub fn execute(&self, graph: &mut Graph, seeds: &[NodeId], scope: PropagationScope) -> Outcome {
        let validation = self.validator.validate(graph);
        if !validation.is_valid() {
            tracing::warn!(
                violations = validation.violations().len(),
                "propagating over an invalid graph"
            );
        }

        match scope {
            PropagationScope::Epistemic => self.propagation.propagate_epistemic(graph, seeds),
            PropagationScope::All => self.propagation.propagate_all(graph, seeds),
        }

        Outcome { validation, scope }
    }
}
