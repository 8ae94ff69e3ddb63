//! Reasoning graph: typed concepts connected by layered relations.
//!
//! - **Edges** ([`Edge`]): directed, typed relations identified by the
//!   `(source, target, relation)` triple ([`EdgeKey`])
//! - **Aggregate** ([`Graph`]): owns every node and edge, enforces referential
//!   and duplication invariants, and answers layer/type filtered queries
//! - **Traversal** (`traverse`): cycle detection over layer-filtered adjacency
//! - **Documents** ([`GraphDocument`]): serde snapshot used to load graphs from JSON

pub mod document;
pub mod index;
pub mod traverse;

pub use document::{EdgeRecord, GraphDocument, NodeRecord};
pub use index::{Graph, GraphResult};

use serde::{Deserialize, Serialize};

use crate::confidence::Confidence;
use crate::error::GraphError;
use crate::node::{Metadata, NodeId};
use crate::relation::{Layer, RelationType};

/// Identity of an edge: no two edges in a graph share all three parts.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EdgeKey {
    pub source: NodeId,
    pub target: NodeId,
    pub relation: RelationType,
}

impl EdgeKey {
    pub fn new(
        source: impl Into<NodeId>,
        target: impl Into<NodeId>,
        relation: RelationType,
    ) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            relation,
        }
    }
}

impl std::fmt::Display for EdgeKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} --[{}]--> {}", self.source, self.relation, self.target)
    }
}

/// A semantic relation between two nodes.
///
/// The edge's confidence may evolve while its identity stays fixed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Edge {
    pub source: NodeId,
    pub target: NodeId,
    pub relation: RelationType,
    pub confidence: Confidence,
    /// Seconds since UNIX epoch.
    pub created_at: u64,
    pub updated_at: u64,
    #[serde(default)]
    pub metadata: Metadata,
}

impl Edge {
    /// Create an edge with default confidence. Fails on self-loops.
    pub fn new(
        source: impl Into<NodeId>,
        target: impl Into<NodeId>,
        relation: RelationType,
    ) -> Result<Self, GraphError> {
        let source = source.into();
        let target = target.into();
        if source == target {
            return Err(GraphError::SelfLoop {
                node_id: source.to_string(),
            });
        }
        let now = crate::unix_now();
        Ok(Self {
            source,
            target,
            relation,
            confidence: Confidence::default(),
            created_at: now,
            updated_at: now,
            metadata: Metadata::new(),
        })
    }

    /// Set the initial confidence.
    pub fn with_confidence(mut self, confidence: Confidence) -> Self {
        self.confidence = confidence;
        self
    }

    pub fn key(&self) -> EdgeKey {
        EdgeKey {
            source: self.source.clone(),
            target: self.target.clone(),
            relation: self.relation,
        }
    }

    pub(crate) fn matches(&self, source: &NodeId, target: &NodeId, relation: RelationType) -> bool {
        self.relation == relation && &self.source == source && &self.target == target
    }

    pub fn layer(&self) -> Layer {
        self.relation.layer()
    }

    /// True if the edge links the two nodes in either direction.
    pub fn connects(&self, a: &NodeId, b: &NodeId) -> bool {
        (&self.source == a && &self.target == b) || (&self.source == b && &self.target == a)
    }

    pub fn connects_to(&self, node: &NodeId) -> bool {
        &self.source == node || &self.target == node
    }

    /// The endpoint opposite `node`, or `None` if the edge doesn't touch it.
    pub fn other_end(&self, node: &NodeId) -> Option<&NodeId> {
        if &self.source == node {
            Some(&self.target)
        } else if &self.target == node {
            Some(&self.source)
        } else {
            None
        }
    }

    pub fn update_confidence(&mut self, confidence: Confidence) {
        self.confidence = confidence;
        self.updated_at = crate::unix_now();
    }

    pub fn strengthen(&mut self, factor: f64) {
        self.update_confidence(self.confidence.strengthen(factor));
    }

    pub fn weaken(&mut self, factor: f64) {
        self.update_confidence(self.confidence.weaken(factor));
    }

    pub fn set_metadata(&mut self, key: impl Into<String>, value: serde_json::Value) {
        self.metadata.insert(key.into(), value);
        self.updated_at = crate::unix_now();
    }
}

impl PartialEq for Edge {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source
            && self.target == other.target
            && self.relation == other.relation
    }
}

impl Eq for Edge {}
