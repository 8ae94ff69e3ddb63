//! Epistemic propagation: belief strength flows along evidence and support.

use crate::config::{DEFAULT_PROPAGATION_FACTOR, check_propagation_factor};
use crate::error::ConfigError;
use crate::relation::{Layer, RelationType};

use super::{Polarity, Propagator};

/// Spreads confidence along epistemic edges.
///
/// `implies` and `blocks` carry a polarity here but are logical-layer
/// relations, so the layer filter never reaches them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EpistemicPropagator {
    factor: f64,
}

impl EpistemicPropagator {
    pub fn new() -> Self {
        Self {
            factor: DEFAULT_PROPAGATION_FACTOR,
        }
    }

    /// Fails unless `factor` lies in [0, 1].
    pub fn with_factor(factor: f64) -> Result<Self, ConfigError> {
        Ok(Self {
            factor: check_propagation_factor(factor)?,
        })
    }
}

impl Default for EpistemicPropagator {
    fn default() -> Self {
        Self::new()
    }
}

impl Propagator for EpistemicPropagator {
    fn layer(&self) -> Layer {
        Layer::Epistemic
    }

    fn factor(&self) -> f64 {
        self.factor
    }

    fn polarity(&self, relation: RelationType) -> Option<Polarity> {
        use RelationType::*;
        match relation {
            Strengthens | Supports | EvidenceFor | Implies | Explains => Some(Polarity::Strengthen),
            Weakens | EvidenceAgainst | Contradicts | Blocks => Some(Polarity::Weaken),
            _ => None,
        }
    }
}
