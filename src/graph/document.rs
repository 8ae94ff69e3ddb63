//! Serde snapshot of a graph, used to load input graphs from JSON.
//!
//! Records are plain data; building a [`Graph`] from a document replays them
//! through the checked mutators so every invariant is enforced on load.

use serde::{Deserialize, Serialize};

use crate::confidence::Confidence;
use crate::node::{Metadata, Node, NodeId, NodeType};
use crate::relation::RelationType;

use super::Edge;
use super::index::{Graph, GraphResult};

/// A node as it appears in a document. Omitted fields take their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeRecord {
    pub id: NodeId,
    pub concept: String,
    #[serde(default)]
    pub node_type: NodeType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<Confidence>,
    #[serde(default, skip_serializing_if = "Metadata::is_empty")]
    pub metadata: Metadata,
}

/// An edge as it appears in a document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeRecord {
    pub source: NodeId,
    pub target: NodeId,
    pub relation: RelationType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<Confidence>,
    #[serde(default, skip_serializing_if = "Metadata::is_empty")]
    pub metadata: Metadata,
}

/// Nodes and edges in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphDocument {
    #[serde(default)]
    pub nodes: Vec<NodeRecord>,
    #[serde(default)]
    pub edges: Vec<EdgeRecord>,
}

impl GraphDocument {
    /// Build a graph, failing on the first record that breaks an invariant.
    pub fn into_graph(self, default_confidence: Confidence) -> GraphResult<Graph> {
        let mut graph = Graph::new();
        for record in self.nodes {
            let mut node = Node::with_id(record.id, record.concept, record.node_type)?
                .with_confidence(record.confidence.unwrap_or(default_confidence));
            node.metadata = record.metadata;
            graph.add_node(node)?;
        }
        for record in self.edges {
            let mut edge = Edge::new(record.source, record.target, record.relation)?
                .with_confidence(record.confidence.unwrap_or(default_confidence));
            edge.metadata = record.metadata;
            graph.add_edge(edge)?;
        }
        Ok(graph)
    }

    /// Parse a JSON document.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

impl Graph {
    /// Snapshot the current nodes and edges.
    pub fn to_document(&self) -> GraphDocument {
        GraphDocument {
            nodes: self
                .nodes()
                .iter()
                .map(|n| NodeRecord {
                    id: n.id.clone(),
                    concept: n.concept.clone(),
                    node_type: n.node_type,
                    confidence: Some(n.confidence),
                    metadata: n.metadata.clone(),
                })
                .collect(),
            edges: self
                .edges()
                .iter()
                .map(|e| EdgeRecord {
                    source: e.source.clone(),
                    target: e.target.clone(),
                    relation: e.relation,
                    confidence: Some(e.confidence),
                    metadata: e.metadata.clone(),
                })
                .collect(),
        }
    }
}
