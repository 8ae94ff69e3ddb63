//! Causal propagation: causes make their effects more likely.

use crate::config::{DEFAULT_PROPAGATION_FACTOR, check_propagation_factor};
use crate::error::ConfigError;
use crate::relation::{Layer, RelationType};

use super::{Polarity, Propagator};

/// Spreads confidence along causal edges. Only `prevents` weakens.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CausalPropagator {
    factor: f64,
}

impl CausalPropagator {
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

impl Default for CausalPropagator {
    fn default() -> Self {
        Self::new()
    }
}

impl Propagator for CausalPropagator {
    fn layer(&self) -> Layer {
        Layer::Causal
    }

    fn factor(&self) -> f64 {
        self.factor
    }

    fn polarity(&self, relation: RelationType) -> Option<Polarity> {
        use RelationType::*;
        match relation {
            Causes | Requires | DependsOn | Enables => Some(Polarity::Strengthen),
            Prevents => Some(Polarity::Weaken),
            _ => None,
        }
    }
}
