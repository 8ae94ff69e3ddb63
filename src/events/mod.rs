//! Domain events.
//!
//! Structural events ([`StructuralEvent`]) are produced by validators when a
//! cycle or contradiction is found. Notifications ([`GraphNotification`]) are
//! produced by the mutation operations in [`ops`](crate::ops) and describe
//! what changed. Timestamps are informational and excluded from equality, so
//! two validation runs over the same graph compare equal.

pub mod notification;

pub use notification::{
    EdgeAdded, EdgeRemoved, GraphNotification, GraphUpdated, NodeConfidenceUpdated, NodeCreated,
    NodeRemoved,
};

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::EventError;
use crate::graph::EdgeKey;
use crate::node::NodeId;
use crate::relation::Layer;

/// Which family of relations closed a cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CycleKind {
    Causal,
    Hierarchical,
}

impl std::fmt::Display for CycleKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CycleKind::Causal => f.write_str("causal"),
            CycleKind::Hierarchical => f.write_str("hierarchical"),
        }
    }
}

/// A cycle found in one layer.
///
/// The path is closed (`[A, B, C, A]`): at least two entries, first equals
/// last, and no other id repeats. The invariant is checked on construction
/// and on deserialization.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "RawCycle")]
pub struct CycleDetected {
    layer: Layer,
    cycle_path: Vec<NodeId>,
    cycle_type: CycleKind,
    timestamp: u64,
}

#[derive(Deserialize)]
struct RawCycle {
    layer: Layer,
    cycle_path: Vec<NodeId>,
    cycle_type: CycleKind,
    #[serde(default)]
    timestamp: Option<u64>,
}

impl TryFrom<RawCycle> for CycleDetected {
    type Error = EventError;

    fn try_from(raw: RawCycle) -> Result<Self, Self::Error> {
        let mut event = Self::new(raw.layer, raw.cycle_path, raw.cycle_type)?;
        if let Some(ts) = raw.timestamp {
            event.timestamp = ts;
        }
        Ok(event)
    }
}

impl CycleDetected {
    pub fn new(
        layer: Layer,
        cycle_path: Vec<NodeId>,
        cycle_type: CycleKind,
    ) -> Result<Self, EventError> {
        check_cycle_path(&cycle_path)?;
        Ok(Self {
            layer,
            cycle_path,
            cycle_type,
            timestamp: crate::unix_now(),
        })
    }

    pub fn layer(&self) -> Layer {
        self.layer
    }

    pub fn cycle_path(&self) -> &[NodeId] {
        &self.cycle_path
    }

    pub fn cycle_type(&self) -> CycleKind {
        self.cycle_type
    }

    /// Seconds since UNIX epoch.
    pub fn timestamp(&self) -> u64 {
        self.timestamp
    }

    /// Distinct nodes on the cycle.
    pub fn node_count(&self) -> usize {
        self.cycle_path.len() - 1
    }

    /// The path rendered as `a -> b -> a`.
    pub fn render_path(&self) -> String {
        self.cycle_path
            .iter()
            .map(NodeId::as_str)
            .collect::<Vec<_>>()
            .join(" -> ")
    }
}

impl PartialEq for CycleDetected {
    fn eq(&self, other: &Self) -> bool {
        self.layer == other.layer
            && self.cycle_type == other.cycle_type
            && self.cycle_path == other.cycle_path
    }
}

fn check_cycle_path(path: &[NodeId]) -> Result<(), EventError> {
    let malformed = |reason: String| EventError::MalformedCycle {
        path: path.iter().map(ToString::to_string).collect(),
        reason,
    };

    let (Some(first), Some(last)) = (path.first(), path.last()) else {
        return Err(malformed("path is empty".into()));
    };
    if path.len() < 2 {
        return Err(malformed(format!("need at least 2 entries, got {}", path.len())));
    }
    if first != last {
        return Err(malformed(format!("starts with {first} but ends with {last}")));
    }
    let distinct: HashSet<&NodeId> = path.iter().collect();
    if distinct.len() < 2 {
        return Err(malformed("a cycle needs at least 2 distinct nodes".into()));
    }
    if distinct.len() != path.len() - 1 {
        return Err(malformed(format!(
            "expected {} entries for {} distinct nodes, got {}",
            distinct.len() + 1,
            distinct.len(),
            path.len()
        )));
    }
    Ok(())
}

/// Two nodes found in conflict. `node1 == node2` marks an internal conflict
/// on a single node (e.g. evidence both for and against it).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContradictionDetected {
    pub node1: NodeId,
    pub node2: NodeId,
    /// The edge that expresses the contradiction, when there is exactly one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub edge: Option<EdgeKey>,
    /// Seconds since UNIX epoch.
    pub timestamp: u64,
}

impl ContradictionDetected {
    pub fn new(node1: NodeId, node2: NodeId) -> Self {
        Self {
            node1,
            node2,
            edge: None,
            timestamp: crate::unix_now(),
        }
    }

    pub fn with_edge(mut self, edge: EdgeKey) -> Self {
        self.edge = Some(edge);
        self
    }

    pub fn is_internal(&self) -> bool {
        self.node1 == self.node2
    }
}

impl PartialEq for ContradictionDetected {
    fn eq(&self, other: &Self) -> bool {
        self.node1 == other.node1 && self.node2 == other.node2 && self.edge == other.edge
    }
}

/// Event emitted by a validator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StructuralEvent {
    CycleDetected(CycleDetected),
    ContradictionDetected(ContradictionDetected),
}

impl StructuralEvent {
    pub fn as_cycle(&self) -> Option<&CycleDetected> {
        match self {
            StructuralEvent::CycleDetected(c) => Some(c),
            StructuralEvent::ContradictionDetected(_) => None,
        }
    }

    pub fn as_contradiction(&self) -> Option<&ContradictionDetected> {
        match self {
            StructuralEvent::ContradictionDetected(c) => Some(c),
            StructuralEvent::CycleDetected(_) => None,
        }
    }
}

impl From<CycleDetected> for StructuralEvent {
    fn from(e: CycleDetected) -> Self {
        StructuralEvent::CycleDetected(e)
    }
}

impl From<ContradictionDetected> for StructuralEvent {
    fn from(e: ContradictionDetected) -> Self {
        StructuralEvent::ContradictionDetected(e)
    }
}
