//! Atomic mutation operations.
//!
//! Each operation applies one checked change through the graph's own mutator
//! and returns a notification record describing what happened. A failing
//! operation leaves the graph untouched.

use crate::confidence::Confidence;
use crate::error::GotResult;
use crate::events::{EdgeAdded, EdgeRemoved, NodeConfidenceUpdated, NodeCreated, NodeRemoved};
use crate::graph::{Edge, Graph};
use crate::node::{Node, NodeId, NodeType};
use crate::relation::RelationType;

/// A single mutation that reports what it did.
pub trait GraphOp {
    type Notice;

    fn apply(self, graph: &mut Graph) -> GotResult<Self::Notice>;
}

/// Insert a node.
#[derive(Debug, Clone)]
pub struct AddNode {
    pub node: Node,
}

impl AddNode {
    /// A fresh node with a generated id.
    pub fn new(
        concept: impl Into<String>,
        node_type: NodeType,
        confidence: Option<Confidence>,
    ) -> GotResult<Self> {
        let node = Node::new(concept, node_type)?;
        Ok(Self {
            node: node.with_confidence(confidence.unwrap_or_default()),
        })
    }
}

impl GraphOp for AddNode {
    type Notice = NodeCreated;

    fn apply(self, graph: &mut Graph) -> GotResult<NodeCreated> {
        let notice = NodeCreated::from_node(&self.node);
        graph.add_node(self.node)?;
        Ok(notice)
    }
}

/// Insert an edge between two existing nodes.
#[derive(Debug, Clone)]
pub struct AddEdge {
    pub edge: Edge,
}

impl AddEdge {
    pub fn new(
        source: impl Into<NodeId>,
        target: impl Into<NodeId>,
        relation: RelationType,
        confidence: Option<Confidence>,
    ) -> GotResult<Self> {
        let edge = Edge::new(source, target, relation)?;
        Ok(Self {
            edge: edge.with_confidence(confidence.unwrap_or_default()),
        })
    }
}

impl GraphOp for AddEdge {
    type Notice = EdgeAdded;

    fn apply(self, graph: &mut Graph) -> GotResult<EdgeAdded> {
        let notice = EdgeAdded::from_edge(&self.edge);
        graph.add_edge(self.edge)?;
        Ok(notice)
    }
}

/// Remove a node and every edge touching it.
#[derive(Debug, Clone)]
pub struct RemoveNode {
    pub node_id: NodeId,
}

impl GraphOp for RemoveNode {
    type Notice = NodeRemoved;

    fn apply(self, graph: &mut Graph) -> GotResult<NodeRemoved> {
        let (node, edges) = graph.remove_node(&self.node_id)?;
        Ok(NodeRemoved::new(&node, &edges))
    }
}

/// Remove one edge by its identity triple.
#[derive(Debug, Clone)]
pub struct RemoveEdge {
    pub source: NodeId,
    pub target: NodeId,
    pub relation: RelationType,
}

impl GraphOp for RemoveEdge {
    type Notice = EdgeRemoved;

    fn apply(self, graph: &mut Graph) -> GotResult<EdgeRemoved> {
        let edge = graph.remove_edge(&self.source, &self.target, self.relation)?;
        Ok(EdgeRemoved::from_edge(&edge))
    }
}

/// Replace a node's confidence.
#[derive(Debug, Clone)]
pub struct UpdateNodeConfidence {
    pub node_id: NodeId,
    pub confidence: Confidence,
}

impl GraphOp for UpdateNodeConfidence {
    type Notice = NodeConfidenceUpdated;

    fn apply(self, graph: &mut Graph) -> GotResult<NodeConfidenceUpdated> {
        let old = graph.update_node_confidence(&self.node_id, self.confidence)?;
        Ok(NodeConfidenceUpdated::new(self.node_id, old, self.confidence))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{GotError, GraphError};

    fn seeded() -> Graph {
        let mut g = Graph::new();
        for id in ["a", "b", "c"] {
            g.add_node(Node::with_id(id, id.to_uppercase(), NodeType::Concept).unwrap())
                .unwrap();
        }
        g
    }

    #[test]
    fn add_node_reports_created() {
        let mut g = Graph::new();
        let op = AddNode::new("Rain", NodeType::Fact, Some(Confidence::new(0.9).unwrap())).unwrap();
        let id = op.node.id.clone();
        let notice = op.apply(&mut g).unwrap();
        assert_eq!(notice.node_id, id);
        assert_eq!(notice.concept, "Rain");
        assert_eq!(notice.confidence.value(), 0.9);
        assert!(g.has_node(&id));
    }

    #[test]
    fn add_node_rejects_blank_concept() {
        assert!(matches!(
            AddNode::new(" ", NodeType::Goal, None),
            Err(GotError::Model(_))
        ));
    }

    #[test]
    fn add_edge_failure_leaves_graph_untouched() {
        let mut g = seeded();
        AddEdge::new("a", "b", RelationType::Causes, None)
            .unwrap()
            .apply(&mut g)
            .unwrap();
        let err = AddEdge::new("a", "b", RelationType::Causes, None)
            .unwrap()
            .apply(&mut g)
            .unwrap_err();
        assert!(matches!(err, GotError::Graph(GraphError::DuplicateEdge { .. })));
        assert_eq!(g.edge_count(), 1);
        assert!(AddEdge::new("a", "a", RelationType::Causes, None).is_err());
    }

    #[test]
    fn remove_node_reports_cascade() {
        let mut g = seeded();
        for (s, t) in [("a", "b"), ("b", "c"), ("c", "a")] {
            AddEdge::new(s, t, RelationType::Supports, None)
                .unwrap()
                .apply(&mut g)
                .unwrap();
        }
        let notice = RemoveNode { node_id: "b".into() }.apply(&mut g).unwrap();
        assert_eq!(notice.removed_edges.len(), 2);
        assert_eq!(notice.concept, "B");
        assert_eq!(g.edge_count(), 1);

        let err = RemoveNode { node_id: "b".into() }.apply(&mut g).unwrap_err();
        assert!(matches!(err, GotError::Graph(GraphError::UnknownNode { .. })));
    }

    #[test]
    fn remove_edge_reports_triple() {
        let mut g = seeded();
        AddEdge::new("a", "c", RelationType::PartOf, None)
            .unwrap()
            .apply(&mut g)
            .unwrap();
        let op = RemoveEdge {
            source: "a".into(),
            target: "c".into(),
            relation: RelationType::PartOf,
        };
        let notice = op.clone().apply(&mut g).unwrap();
        assert_eq!(notice.relation, RelationType::PartOf);
        assert!(op.apply(&mut g).is_err());
    }

    #[test]
    fn update_confidence_reports_old_and_new() {
        let mut g = seeded();
        let notice = UpdateNodeConfidence {
            node_id: "a".into(),
            confidence: Confidence::new(0.2).unwrap(),
        }
        .apply(&mut g)
        .unwrap();
        assert_eq!(notice.old_confidence.value(), 0.5);
        assert_eq!(notice.new_confidence.value(), 0.2);
        assert_eq!(g.node(&"a".into()).unwrap().confidence.value(), 0.2);
    }
}
