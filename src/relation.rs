//! Relation taxonomy and reasoning layers.
//!
//! Every [`RelationType`] belongs to exactly one primary [`Layer`]. When a
//! relation could plausibly sit in several buckets the first match in the
//! order causal > epistemic > structural > temporal > logical wins, which is
//! why `supports` and `contradicts` are epistemic rather than logical.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ModelError;

/// A reasoning dimension used to scope validators and propagators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Layer {
    Causal,
    Epistemic,
    Structural,
    Temporal,
    Logical,
}

impl Layer {
    /// All layers in classification precedence order.
    pub const ALL: [Layer; 5] = [
        Layer::Causal,
        Layer::Epistemic,
        Layer::Structural,
        Layer::Temporal,
        Layer::Logical,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Layer::Causal => "causal",
            Layer::Epistemic => "epistemic",
            Layer::Structural => "structural",
            Layer::Temporal => "temporal",
            Layer::Logical => "logical",
        }
    }
}

impl std::fmt::Display for Layer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Layer {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Layer::ALL
            .into_iter()
            .find(|layer| layer.as_str() == s)
            .ok_or_else(|| ModelError::InvalidLayer { name: s.to_string() })
    }
}

/// Semantic relation between two concepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationType {
    // Causal
    Causes,
    Requires,
    DependsOn,
    Enables,
    Prevents,
    // Epistemic
    Supports,
    Contradicts,
    Weakens,
    Strengthens,
    EvidenceFor,
    EvidenceAgainst,
    Explains,
    // Structural
    Contains,
    PartOf,
    SimilarTo,
    InstanceOf,
    TypeOf,
    Implements,
    // Temporal
    Precedes,
    Follows,
    // Logical
    Implies,
    Blocks,
}

use RelationType::*;

impl RelationType {
    /// Every relation type, grouped by layer.
    pub const ALL: [RelationType; 22] = [
        Causes,
        Requires,
        DependsOn,
        Enables,
        Prevents,
        Supports,
        Contradicts,
        Weakens,
        Strengthens,
        EvidenceFor,
        EvidenceAgainst,
        Explains,
        Contains,
        PartOf,
        SimilarTo,
        InstanceOf,
        TypeOf,
        Implements,
        Precedes,
        Follows,
        Implies,
        Blocks,
    ];

    /// Relations that form containment or type hierarchies.
    pub const HIERARCHICAL: [RelationType; 4] = [Contains, PartOf, InstanceOf, TypeOf];

    pub fn as_str(self) -> &'static str {
        match self {
            Causes => "causes",
            Requires => "requires",
            DependsOn => "depends_on",
            Enables => "enables",
            Prevents => "prevents",
            Supports => "supports",
            Contradicts => "contradicts",
            Weakens => "weakens",
            Strengthens => "strengthens",
            EvidenceFor => "evidence_for",
            EvidenceAgainst => "evidence_against",
            Explains => "explains",
            Contains => "contains",
            PartOf => "part_of",
            SimilarTo => "similar_to",
            InstanceOf => "instance_of",
            TypeOf => "type_of",
            Implements => "implements",
            Precedes => "precedes",
            Follows => "follows",
            Implies => "implies",
            Blocks => "blocks",
        }
    }

    pub fn is_causal(self) -> bool {
        matches!(self, Causes | Requires | DependsOn | Enables | Prevents)
    }

    pub fn is_epistemic(self) -> bool {
        matches!(
            self,
            Supports
                | Contradicts
                | Weakens
                | Strengthens
                | EvidenceFor
                | EvidenceAgainst
                | Explains
        )
    }

    pub fn is_structural(self) -> bool {
        matches!(
            self,
            Contains | PartOf | SimilarTo | InstanceOf | TypeOf | Implements
        )
    }

    pub fn is_temporal(self) -> bool {
        matches!(self, Precedes | Follows)
    }

    /// Membership in the logical family. Unlike [`layer`](Self::layer) this
    /// also covers `supports` and `contradicts`.
    pub fn is_logical(self) -> bool {
        matches!(self, Implies | Supports | Contradicts | Blocks)
    }

    pub fn is_contradictory(self) -> bool {
        self == Contradicts
    }

    pub fn is_hierarchical(self) -> bool {
        Self::HIERARCHICAL.contains(&self)
    }

    /// The single primary layer, first match in precedence order.
    pub fn layer(self) -> Layer {
        if self.is_causal() {
            Layer::Causal
        } else if self.is_epistemic() {
            Layer::Epistemic
        } else if self.is_structural() {
            Layer::Structural
        } else if self.is_temporal() {
            Layer::Temporal
        } else {
            Layer::Logical
        }
    }

    /// Expected inverse for paired hierarchical relations.
    pub fn inverse(self) -> Option<RelationType> {
        match self {
            Contains => Some(PartOf),
            PartOf => Some(Contains),
            InstanceOf => Some(TypeOf),
            TypeOf => Some(InstanceOf),
            _ => None,
        }
    }
}

impl std::fmt::Display for RelationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RelationType {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RelationType::ALL
            .into_iter()
            .find(|r| r.as_str() == s)
            .ok_or_else(|| ModelError::UnknownRelation { name: s.to_string() })
    }
}
