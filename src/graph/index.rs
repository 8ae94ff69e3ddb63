//! The reasoning graph aggregate root.
//!
//! Nodes live in an insertion-ordered arena addressed by [`NodeId`]; edges are
//! an ordered sequence plus a key index for O(1) duplicate and existence
//! checks and per-node adjacency lists of edge positions. All cross-references
//! are id lookups into the arena, so the graph is the sole owner of every
//! entity and iteration order is reproducible.
//!
//! Node identity and concept text are fixed once a node is inserted; only the
//! checked mutators below change a stored node.

use std::collections::{HashMap, HashSet};

use crate::confidence::Confidence;
use crate::error::{GraphError, ModelError};
use crate::node::{Metadata, Node, NodeId, NodeType};
use crate::relation::{Layer, RelationType};

use super::{Edge, EdgeKey};

/// Result type for graph operations.
pub type GraphResult<T> = std::result::Result<T, GraphError>;

/// Reasoning graph: concepts (nodes) and relations (edges).
///
/// Every structural mutation refreshes `updated_at`. The `version` counter is
/// bumped only by [`increment_version`](Self::increment_version), so callers
/// decide where semantic version boundaries fall.
///
/// Stored nodes are only reachable immutably from outside the crate, so an
/// id or concept cannot be rewritten behind the index:
///
/// ```compile_fail
/// use got_reason::graph::Graph;
/// use got_reason::node::{Node, NodeId, NodeType};
///
/// let mut g = Graph::new();
/// g.add_node(Node::with_id("a", "A", NodeType::Concept).unwrap()).unwrap();
/// g.node_mut(&NodeId::new("a")).unwrap().id = NodeId::new("b");
/// ```
#[derive(Clone)]
pub struct Graph {
    nodes: Vec<Node>,
    /// NodeId → position in `nodes`.
    positions: HashMap<NodeId, usize>,
    edges: Vec<Edge>,
    edge_keys: HashSet<EdgeKey>,
    /// Source id → ascending positions in `edges`.
    outgoing: HashMap<NodeId, Vec<usize>>,
    /// Target id → ascending positions in `edges`.
    incoming: HashMap<NodeId, Vec<usize>>,
    version: u64,
    created_at: u64,
    updated_at: u64,
    metadata: Metadata,
}

impl Graph {
    /// Create a new empty graph.
    pub fn new() -> Self {
        let now = crate::unix_now();
        Self {
            nodes: Vec::new(),
            positions: HashMap::new(),
            edges: Vec::new(),
            edge_keys: HashSet::new(),
            outgoing: HashMap::new(),
            incoming: HashMap::new(),
            version: 0,
            created_at: now,
            updated_at: now,
            metadata: Metadata::new(),
        }
    }

    fn touch(&mut self) {
        self.updated_at = crate::unix_now();
    }

    /// Rebuild the adjacency lists after edge positions shifted.
    fn reindex_edges(&mut self) {
        self.outgoing.clear();
        self.incoming.clear();
        for (i, edge) in self.edges.iter().enumerate() {
            self.outgoing.entry(edge.source.clone()).or_default().push(i);
            self.incoming.entry(edge.target.clone()).or_default().push(i);
        }
    }

    fn edges_at<'g>(&'g self, index: &HashMap<NodeId, Vec<usize>>, id: &NodeId) -> Vec<&'g Edge> {
        index
            .get(id)
            .map(|positions| positions.iter().map(|&i| &self.edges[i]).collect())
            .unwrap_or_default()
    }

    // -----------------------------------------------------------------------
    // Nodes
    // -----------------------------------------------------------------------

    /// Add a node. Fails if a node with the same id already exists.
    pub fn add_node(&mut self, node: Node) -> GraphResult<()> {
        if node.concept.trim().is_empty() {
            return Err(ModelError::EmptyConcept.into());
        }
        if self.positions.contains_key(&node.id) {
            return Err(GraphError::DuplicateNode {
                node_id: node.id.to_string(),
            });
        }
        self.positions.insert(node.id.clone(), self.nodes.len());
        self.nodes.push(node);
        self.touch();
        Ok(())
    }

    /// Remove a node together with every edge touching it.
    ///
    /// Returns the removed node and its edges (in edge order). Nothing is
    /// modified when the node is unknown.
    pub fn remove_node(&mut self, id: &NodeId) -> GraphResult<(Node, Vec<Edge>)> {
        let pos = self
            .positions
            .get(id)
            .copied()
            .ok_or_else(|| GraphError::UnknownNode {
                node_id: id.to_string(),
            })?;

        let (touching, kept): (Vec<Edge>, Vec<Edge>) = std::mem::take(&mut self.edges)
            .into_iter()
            .partition(|e| e.connects_to(id));
        for edge in &touching {
            self.edge_keys.remove(&edge.key());
        }
        self.edges = kept;
        self.reindex_edges();

        let node = self.nodes.remove(pos);
        self.positions.remove(id);
        for (i, n) in self.nodes.iter().enumerate().skip(pos) {
            self.positions.insert(n.id.clone(), i);
        }
        self.touch();
        Ok((node, touching))
    }

    pub fn node(&self, id: &NodeId) -> Option<&Node> {
        self.positions.get(id).map(|&i| &self.nodes[i])
    }

    /// Mutable access for propagation. Callers inside the crate never change
    /// the id or concept.
    pub(crate) fn node_mut(&mut self, id: &NodeId) -> Option<&mut Node> {
        let i = *self.positions.get(id)?;
        self.updated_at = crate::unix_now();
        Some(&mut self.nodes[i])
    }

    pub fn has_node(&self, id: &NodeId) -> bool {
        self.positions.contains_key(id)
    }

    /// All nodes in insertion order.
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Replace a node's confidence, returning the previous value.
    pub fn update_node_confidence(
        &mut self,
        id: &NodeId,
        confidence: Confidence,
    ) -> GraphResult<Confidence> {
        let i = *self.positions.get(id).ok_or_else(|| GraphError::UnknownNode {
            node_id: id.to_string(),
        })?;
        let previous = self.nodes[i].confidence;
        self.nodes[i].update_confidence(confidence);
        self.touch();
        Ok(previous)
    }

    /// Attach or replace a metadata entry on a node.
    pub fn set_node_metadata(
        &mut self,
        id: &NodeId,
        key: impl Into<String>,
        value: serde_json::Value,
    ) -> GraphResult<()> {
        let i = *self.positions.get(id).ok_or_else(|| GraphError::UnknownNode {
            node_id: id.to_string(),
        })?;
        self.nodes[i].metadata.insert(key.into(), value);
        self.touch();
        Ok(())
    }

    pub fn nodes_by_type(&self, node_type: NodeType) -> Vec<&Node> {
        self.nodes.iter().filter(|n| n.node_type == node_type).collect()
    }

    pub fn hypotheses(&self) -> Vec<&Node> {
        self.nodes_by_type(NodeType::Hypothesis)
    }

    // -----------------------------------------------------------------------
    // Edges
    // -----------------------------------------------------------------------

    /// Add an edge between two existing nodes.
    pub fn add_edge(&mut self, edge: Edge) -> GraphResult<()> {
        if !self.has_node(&edge.source) {
            return Err(GraphError::MissingEndpoint {
                role: "source",
                node_id: edge.source.to_string(),
            });
        }
        if !self.has_node(&edge.target) {
            return Err(GraphError::MissingEndpoint {
                role: "target",
                node_id: edge.target.to_string(),
            });
        }
        if edge.source == edge.target {
            return Err(GraphError::SelfLoop {
                node_id: edge.source.to_string(),
            });
        }
        let key = edge.key();
        if self.edge_keys.contains(&key) {
            return Err(GraphError::DuplicateEdge {
                source_id: key.source.to_string(),
                target_id: key.target.to_string(),
                relation: key.relation.to_string(),
            });
        }
        self.edge_keys.insert(key);
        let i = self.edges.len();
        self.outgoing.entry(edge.source.clone()).or_default().push(i);
        self.incoming.entry(edge.target.clone()).or_default().push(i);
        self.edges.push(edge);
        self.touch();
        Ok(())
    }

    /// Remove the edge identified by `(source, target, relation)`.
    pub fn remove_edge(
        &mut self,
        source: &NodeId,
        target: &NodeId,
        relation: RelationType,
    ) -> GraphResult<Edge> {
        let pos = self
            .edges
            .iter()
            .position(|e| e.matches(source, target, relation))
            .ok_or_else(|| GraphError::UnknownEdge {
                source_id: source.to_string(),
                target_id: target.to_string(),
                relation: relation.to_string(),
            })?;
        let edge = self.edges.remove(pos);
        self.edge_keys.remove(&edge.key());
        self.reindex_edges();
        self.touch();
        Ok(edge)
    }

    /// Replace an edge's confidence, returning the previous value.
    pub fn update_edge_confidence(
        &mut self,
        key: &EdgeKey,
        confidence: Confidence,
    ) -> GraphResult<Confidence> {
        let edge = self
            .edges
            .iter_mut()
            .find(|e| e.matches(&key.source, &key.target, key.relation))
            .ok_or_else(|| GraphError::UnknownEdge {
                source_id: key.source.to_string(),
                target_id: key.target.to_string(),
                relation: key.relation.to_string(),
            })?;
        let previous = edge.confidence;
        edge.update_confidence(confidence);
        self.touch();
        Ok(previous)
    }

    /// All edges in insertion order.
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn edge(&self, source: &NodeId, target: &NodeId, relation: RelationType) -> Option<&Edge> {
        self.edges.iter().find(|e| e.matches(source, target, relation))
    }

    /// O(1) existence check for an edge triple.
    pub fn has_edge(&self, source: &NodeId, target: &NodeId, relation: RelationType) -> bool {
        // EdgeKey owns its ids, so look up with an owned copy of the triple.
        self.edge_keys.contains(&EdgeKey {
            source: source.clone(),
            target: target.clone(),
            relation,
        })
    }

    /// Outgoing edges of `id` in insertion order.
    pub fn edges_from(&self, id: &NodeId) -> Vec<&Edge> {
        self.edges_at(&self.outgoing, id)
    }

    /// Incoming edges of `id` in insertion order.
    pub fn edges_to(&self, id: &NodeId) -> Vec<&Edge> {
        self.edges_at(&self.incoming, id)
    }

    pub fn edges_connected_to(&self, id: &NodeId) -> Vec<&Edge> {
        self.edges.iter().filter(|e| e.connects_to(id)).collect()
    }

    /// Ids adjacent to `id` in either direction, deduplicated, first-seen order.
    pub fn neighbors(&self, id: &NodeId) -> Vec<&NodeId> {
        let mut seen = HashSet::new();
        self.edges
            .iter()
            .filter_map(|e| e.other_end(id))
            .filter(|other| seen.insert(*other))
            .collect()
    }

    pub fn edges_by_layer(&self, layer: Layer) -> Vec<&Edge> {
        self.edges.iter().filter(|e| e.layer() == layer).collect()
    }

    /// Like [`edges_by_layer`](Self::edges_by_layer) but takes a layer name.
    pub fn edges_by_layer_name(&self, layer: &str) -> GraphResult<Vec<&Edge>> {
        let layer: Layer = layer.parse()?;
        Ok(self.edges_by_layer(layer))
    }

    pub fn causal_edges(&self) -> Vec<&Edge> {
        self.edges_by_layer(Layer::Causal)
    }

    pub fn epistemic_edges(&self) -> Vec<&Edge> {
        self.edges_by_layer(Layer::Epistemic)
    }

    pub fn structural_edges(&self) -> Vec<&Edge> {
        self.edges_by_layer(Layer::Structural)
    }

    pub fn temporal_edges(&self) -> Vec<&Edge> {
        self.edges_by_layer(Layer::Temporal)
    }

    pub fn contradictory_edges(&self) -> Vec<&Edge> {
        self.edges.iter().filter(|e| e.relation.is_contradictory()).collect()
    }

    // -----------------------------------------------------------------------
    // Versioning and bookkeeping
    // -----------------------------------------------------------------------

    pub fn increment_version(&mut self) {
        self.version += 1;
        self.touch();
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn created_at(&self) -> u64 {
        self.created_at
    }

    pub fn updated_at(&self) -> u64 {
        self.updated_at
    }

    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    pub fn set_metadata(&mut self, key: impl Into<String>, value: serde_json::Value) {
        self.metadata.insert(key.into(), value);
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// A graph with no nodes (and therefore no edges).
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

impl Default for Graph {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Graph {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Graph")
            .field("nodes", &self.node_count())
            .field("edges", &self.edge_count())
            .field("version", &self.version)
            .finish()
    }
}
