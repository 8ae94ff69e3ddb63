//! Notification records describing a completed mutation.
//!
//! Each record is built from the graph's post-mutation state (or from the
//! entity a removal handed back), so it reflects exactly what was applied.

use serde::{Deserialize, Serialize};

use crate::confidence::Confidence;
use crate::graph::{Edge, EdgeKey, Graph};
use crate::node::{Node, NodeId, NodeType};
use crate::relation::RelationType;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeCreated {
    pub node_id: NodeId,
    pub concept: String,
    pub node_type: NodeType,
    pub confidence: Confidence,
    pub timestamp: u64,
}

impl NodeCreated {
    pub fn from_node(node: &Node) -> Self {
        Self {
            node_id: node.id.clone(),
            concept: node.concept.clone(),
            node_type: node.node_type,
            confidence: node.confidence,
            timestamp: crate::unix_now(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeAdded {
    pub source: NodeId,
    pub target: NodeId,
    pub relation: RelationType,
    pub confidence: Confidence,
    pub timestamp: u64,
}

impl EdgeAdded {
    pub fn from_edge(edge: &Edge) -> Self {
        Self {
            source: edge.source.clone(),
            target: edge.target.clone(),
            relation: edge.relation,
            confidence: edge.confidence,
            timestamp: crate::unix_now(),
        }
    }
}

/// A node removal, including the edges that went with it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeRemoved {
    pub node_id: NodeId,
    pub concept: String,
    pub node_type: NodeType,
    pub removed_edges: Vec<EdgeKey>,
    pub timestamp: u64,
}

impl NodeRemoved {
    pub fn new(node: &Node, removed_edges: &[Edge]) -> Self {
        Self {
            node_id: node.id.clone(),
            concept: node.concept.clone(),
            node_type: node.node_type,
            removed_edges: removed_edges.iter().map(Edge::key).collect(),
            timestamp: crate::unix_now(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeRemoved {
    pub source: NodeId,
    pub target: NodeId,
    pub relation: RelationType,
    pub timestamp: u64,
}

impl EdgeRemoved {
    pub fn from_edge(edge: &Edge) -> Self {
        Self {
            source: edge.source.clone(),
            target: edge.target.clone(),
            relation: edge.relation,
            timestamp: crate::unix_now(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeConfidenceUpdated {
    pub node_id: NodeId,
    pub old_confidence: Confidence,
    pub new_confidence: Confidence,
    pub timestamp: u64,
}

impl NodeConfidenceUpdated {
    pub fn new(node_id: NodeId, old_confidence: Confidence, new_confidence: Confidence) -> Self {
        Self {
            node_id,
            old_confidence,
            new_confidence,
            timestamp: crate::unix_now(),
        }
    }

    /// Signed change in confidence.
    pub fn delta(&self) -> f64 {
        self.new_confidence.value() - self.old_confidence.value()
    }
}

/// Snapshot of the graph's version bookkeeping after a change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphUpdated {
    pub version: u64,
    pub node_count: usize,
    pub edge_count: usize,
    /// The graph's `updated_at`, seconds since UNIX epoch.
    pub timestamp: u64,
}

impl GraphUpdated {
    pub fn from_graph(graph: &Graph) -> Self {
        Self {
            version: graph.version(),
            node_count: graph.node_count(),
            edge_count: graph.edge_count(),
            timestamp: graph.updated_at(),
        }
    }
}

/// Any notification produced by a mutation operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GraphNotification {
    NodeCreated(NodeCreated),
    EdgeAdded(EdgeAdded),
    NodeRemoved(NodeRemoved),
    EdgeRemoved(EdgeRemoved),
    NodeConfidenceUpdated(NodeConfidenceUpdated),
    GraphUpdated(GraphUpdated),
}

macro_rules! into_notification {
    ($($variant:ident),* $(,)?) => {
        $(
            impl From<$variant> for GraphNotification {
                fn from(n: $variant) -> Self {
                    GraphNotification::$variant(n)
                }
            }
        )*
    };
}

into_notification!(
    NodeCreated,
    EdgeAdded,
    NodeRemoved,
    EdgeRemoved,
    NodeConfidenceUpdated,
    GraphUpdated,
);
