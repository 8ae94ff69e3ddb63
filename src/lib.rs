// thiserror's #[error("...{field}...")] format strings reference struct fields,
// but the compiler doesn't see through the derive macro and reports false positives.
#![allow(unused_assignments)]

//! # got-reason
//!
//! A typed reasoning graph with multi-layer validation and confidence
//! propagation.
//!
//! ## Architecture
//!
//! - **Model** (`confidence`, `node`, `relation`): bounded confidence, typed
//!   concepts, and a relation taxonomy where every relation has one layer
//! - **Graph** (`graph`): arena-backed aggregate enforcing identity and
//!   referential invariants, with layer-filtered queries
//! - **Validation** (`validate`): causal, epistemic and structural validators
//!   reporting violations, warnings and structural events
//! - **Propagation** (`propagate`): layer-scoped BFS that strengthens or
//!   weakens reachable nodes
//! - **Operations** (`ops`, `pipeline`): checked mutations that return
//!   notifications, and the validate-then-propagate use case
//!
//! ## Library usage
//!
//! ```
//! use got_reason::confidence::Confidence;
//! use got_reason::graph::{Edge, Graph};
//! use got_reason::node::{Node, NodeType};
//! use got_reason::propagate::PropagationService;
//! use got_reason::relation::RelationType;
//! use got_reason::validate::Validator;
//!
//! let mut graph = Graph::new();
//! let rain = Node::new("Rain", NodeType::Fact)?.with_confidence(Confidence::new(0.9)?);
//! let wet = Node::new("Wet grass", NodeType::Concept)?;
//! let (rain_id, wet_id) = (rain.id.clone(), wet.id.clone());
//! graph.add_node(rain)?;
//! graph.add_node(wet)?;
//! graph.add_edge(Edge::new(rain_id.clone(), wet_id.clone(), RelationType::Supports)?)?;
//!
//! assert!(Validator::new().validate(&graph).is_valid());
//! PropagationService::new().propagate_epistemic(&mut graph, &[rain_id]);
//! assert!((graph.node(&wet_id).unwrap().confidence.value() - 0.6).abs() < 1e-9);
//! # Ok::<(), got_reason::error::GotError>(())
//! ```

pub mod confidence;
pub mod config;
pub mod error;
pub mod events;
pub mod graph;
pub mod node;
pub mod ops;
pub mod pipeline;
pub mod propagate;
pub mod relation;
pub mod validate;

/// Seconds since UNIX epoch; 0 if the clock is before the epoch.
pub(crate) fn unix_now() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}
