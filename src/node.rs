//! Nodes: the atomic units of thought in a reasoning graph.
//!
//! Every concept, hypothesis, fact or goal is a [`Node`] identified by a
//! [`NodeId`]. Fresh ids come from the process-wide [`NodeIdAllocator`];
//! callers that already have stable identifiers can supply their own.

use std::collections::BTreeMap;
use std::str::FromStr;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

use crate::confidence::Confidence;
use crate::error::ModelError;

/// Free-form metadata attached to nodes, edges and graphs.
///
/// Ordered so that serialized output is reproducible.
pub type Metadata = BTreeMap<String, serde_json::Value>;

/// Unique identifier of a node within a graph.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(String);

impl NodeId {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Allocate a fresh, process-unique id.
    pub fn generate() -> Self {
        GLOBAL_ALLOCATOR.next_id()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NodeId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for NodeId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl std::borrow::Borrow<str> for NodeId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

static GLOBAL_ALLOCATOR: NodeIdAllocator = NodeIdAllocator::new();

/// Thread-safe node id allocator producing `node-1`, `node-2`, ...
#[derive(Debug)]
pub struct NodeIdAllocator {
    next: AtomicU64,
}

impl NodeIdAllocator {
    pub const fn new() -> Self {
        Self {
            next: AtomicU64::new(1),
        }
    }

    pub fn next_id(&self) -> NodeId {
        let raw = self.next.fetch_add(1, Ordering::Relaxed);
        NodeId(format!("node-{raw}"))
    }
}

impl Default for NodeIdAllocator {
    fn default() -> Self {
        Self::new()
    }
}

/// Kind of cognitive content a node represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeType {
    /// General concept.
    #[default]
    Concept,
    /// Hypothesis awaiting validation.
    Hypothesis,
    /// Established fact.
    Fact,
    /// Goal to achieve.
    Goal,
    /// System state.
    State,
    /// Identified problem.
    Problem,
    /// Proposed solution.
    Solution,
    Constraint,
}

impl NodeType {
    pub const ALL: [NodeType; 8] = [
        NodeType::Concept,
        NodeType::Hypothesis,
        NodeType::Fact,
        NodeType::Goal,
        NodeType::State,
        NodeType::Problem,
        NodeType::Solution,
        NodeType::Constraint,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            NodeType::Concept => "concept",
            NodeType::Hypothesis => "hypothesis",
            NodeType::Fact => "fact",
            NodeType::Goal => "goal",
            NodeType::State => "state",
            NodeType::Problem => "problem",
            NodeType::Solution => "solution",
            NodeType::Constraint => "constraint",
        }
    }
}

impl std::fmt::Display for NodeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NodeType {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NodeType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| ModelError::UnknownNodeType { name: s.to_string() })
    }
}

/// A concept in the reasoning graph. Identity is the id alone.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Node {
    pub id: NodeId,
    /// Textual representation of the concept. Never blank.
    pub concept: String,
    pub node_type: NodeType,
    pub confidence: Confidence,
    /// Seconds since UNIX epoch.
    pub created_at: u64,
    #[serde(default)]
    pub metadata: Metadata,
}

impl Node {
    /// Create a node with a freshly allocated id and default confidence.
    pub fn new(concept: impl Into<String>, node_type: NodeType) -> Result<Self, ModelError> {
        Self::with_id(NodeId::generate(), concept, node_type)
    }

    /// Create a node with a caller-supplied id.
    pub fn with_id(
        id: impl Into<NodeId>,
        concept: impl Into<String>,
        node_type: NodeType,
    ) -> Result<Self, ModelError> {
        let concept = concept.into();
        if concept.trim().is_empty() {
            return Err(ModelError::EmptyConcept);
        }
        Ok(Self {
            id: id.into(),
            concept,
            node_type,
            confidence: Confidence::default(),
            created_at: crate::unix_now(),
            metadata: Metadata::new(),
        })
    }

    /// Set the initial confidence.
    pub fn with_confidence(mut self, confidence: Confidence) -> Self {
        self.confidence = confidence;
        self
    }

    /// Attach a metadata entry.
    pub fn with_metadata(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.metadata.insert(key.into(), value);
        self
    }

    pub fn update_confidence(&mut self, confidence: Confidence) {
        self.confidence = confidence;
    }

    pub fn strengthen(&mut self, factor: f64) {
        self.confidence = self.confidence.strengthen(factor);
    }

    pub fn weaken(&mut self, factor: f64) {
        self.confidence = self.confidence.weaken(factor);
    }

    pub fn is_hypothesis(&self) -> bool {
        self.node_type == NodeType::Hypothesis
    }

    pub fn is_fact(&self) -> bool {
        self.node_type == NodeType::Fact
    }
}

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Node {}

impl std::hash::Hash for Node {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allocator_produces_sequential_ids() {
        let alloc = NodeIdAllocator::new();
        assert_eq!(alloc.next_id().as_str(), "node-1");
        assert_eq!(alloc.next_id().as_str(), "node-2");
    }

    #[test]
    fn generated_ids_are_unique() {
        let a = NodeId::generate();
        let b = NodeId::generate();
        assert_ne!(a, b);
    }

    #[test]
    fn blank_concept_rejected() {
        assert_eq!(
            Node::new("   ", NodeType::Concept).unwrap_err(),
            ModelError::EmptyConcept
        );
        assert!(Node::new("", NodeType::Fact).is_err());
    }

    #[test]
    fn new_node_uses_default_confidence() {
        let node = Node::with_id("a", "Rain", NodeType::Fact).unwrap();
        assert_eq!(node.confidence.value(), crate::config::DEFAULT_CONFIDENCE);
        assert!(node.is_fact());
        assert!(!node.is_hypothesis());
        assert!(node.metadata.is_empty());
    }

    #[test]
    fn identity_is_id_only() {
        let a = Node::with_id("x", "One", NodeType::Concept).unwrap();
        let b = Node::with_id("x", "Two", NodeType::Goal).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn node_type_parse_and_display() {
        for t in NodeType::ALL {
            assert_eq!(t.to_string().parse::<NodeType>().unwrap(), t);
        }
        assert!("opinion".parse::<NodeType>().is_err());
        assert_eq!(NodeType::default(), NodeType::Concept);
    }

    #[test]
    fn strengthen_and_weaken_mutate_in_place() {
        let mut node = Node::with_id("a", "Rain", NodeType::Fact).unwrap();
        node.strengthen(0.2);
        assert!((node.confidence.value() - 0.7).abs() < 1e-12);
        node.weaken(1.0);
        assert_eq!(node.confidence, Confidence::MIN);
    }
}
