//! Confidence propagation along directed edges.
//!
//! Each propagator walks the graph breadth-first from a set of start nodes,
//! following outgoing edges of its own layer. Every traversed edge whose
//! relation has a [`Polarity`] strengthens or weakens its target by a fixed
//! factor; a target is enqueued only the first time it is discovered, so each
//! call terminates after visiting every reachable node once.

pub mod causal;
pub mod epistemic;

pub use causal::CausalPropagator;
pub use epistemic::EpistemicPropagator;

use std::collections::{HashSet, VecDeque};

use crate::config::ReasoningConfig;
use crate::error::ConfigError;
use crate::graph::Graph;
use crate::node::NodeId;
use crate::relation::{Layer, RelationType};

/// Effect of traversing an edge on its target's confidence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Polarity {
    Strengthen,
    Weaken,
}

/// What a single propagation call did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PropagationReport {
    /// Nodes dequeued, start nodes included.
    pub visited: usize,
    /// Confidence adjustments applied.
    pub adjustments: usize,
}

/// Layer-scoped BFS confidence spreading.
pub trait Propagator {
    /// Only outgoing edges whose relation belongs to this layer are followed.
    fn layer(&self) -> Layer;

    /// Step applied per adjustment.
    fn factor(&self) -> f64;

    /// Polarity of a relation within this propagator, `None` if it has no effect.
    fn polarity(&self, relation: RelationType) -> Option<Polarity>;

    /// Spread confidence from `start`. Unknown and repeated ids are ignored.
    fn propagate(&self, graph: &mut Graph, start: &[NodeId]) -> PropagationReport {
        let layer = self.layer();
        let factor = self.factor();
        let mut report = PropagationReport::default();

        let mut visited: HashSet<NodeId> = HashSet::new();
        let mut queue: VecDeque<NodeId> = VecDeque::new();
        for id in start {
            if graph.has_node(id) && visited.insert(id.clone()) {
                queue.push_back(id.clone());
            }
        }

        while let Some(current) = queue.pop_front() {
            report.visited += 1;

            // Collect first: adjusting targets needs the graph mutably.
            let steps: Vec<(NodeId, Polarity)> = graph
                .edges_from(&current)
                .into_iter()
                .filter(|e| e.layer() == layer)
                .filter_map(|e| self.polarity(e.relation).map(|p| (e.target.clone(), p)))
                .collect();

            for (target, polarity) in steps {
                let Some(node) = graph.node_mut(&target) else {
                    continue;
                };
                let before = node.confidence;
                match polarity {
                    Polarity::Strengthen => node.strengthen(factor),
                    Polarity::Weaken => node.weaken(factor),
                }
                report.adjustments += 1;
                tracing::trace!(
                    %layer,
                    from = %current,
                    to = %target,
                    ?polarity,
                    before = before.value(),
                    after = node.confidence.value(),
                    "confidence adjusted"
                );

                if visited.insert(target.clone()) {
                    queue.push_back(target);
                }
            }
        }

        report
    }
}

/// Composes the epistemic and causal propagators.
#[derive(Debug, Clone, Default)]
pub struct PropagationService {
    epistemic: EpistemicPropagator,
    causal: CausalPropagator,
}

impl PropagationService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Both propagators with the same step size, which must lie in [0, 1].
    pub fn with_factor(factor: f64) -> Result<Self, ConfigError> {
        Ok(Self {
            epistemic: EpistemicPropagator::with_factor(factor)?,
            causal: CausalPropagator::with_factor(factor)?,
        })
    }

    pub fn from_config(config: &ReasoningConfig) -> Result<Self, ConfigError> {
        Self::with_factor(config.propagation_factor)
    }

    /// Custom propagators.
    pub fn with_propagators(epistemic: EpistemicPropagator, causal: CausalPropagator) -> Self {
        Self { epistemic, causal }
    }

    pub fn propagate_epistemic(&self, graph: &mut Graph, start: &[NodeId]) {
        run(&self.epistemic, graph, start);
    }

    pub fn propagate_causal(&self, graph: &mut Graph, start: &[NodeId]) {
        run(&self.causal, graph, start);
    }

    /// Epistemic, then causal.
    pub fn propagate_all(&self, graph: &mut Graph, start: &[NodeId]) {
        self.propagate_epistemic(graph, start);
        self.propagate_causal(graph, start);
    }
}

fn run(propagator: &impl Propagator, graph: &mut Graph, start: &[NodeId]) {
    let report = propagator.propagate(graph, start);
    tracing::info!(
        layer = %propagator.layer(),
        seeds = start.len(),
        visited = report.visited,
        adjustments = report.adjustments,
        "confidence propagated"
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::confidence::Confidence;
    use crate::graph::Edge;
    use crate::node::{Node, NodeType};

    fn graph(nodes: &[(&str, f64)], edges: &[(&str, &str, RelationType)]) -> Graph {
        let mut g = Graph::new();
        for &(id, c) in nodes {
            g.add_node(
                Node::with_id(id, id, NodeType::Concept)
                    .unwrap()
                    .with_confidence(Confidence::new(c).unwrap()),
            )
            .unwrap();
        }
        for &(s, t, r) in edges {
            g.add_edge(Edge::new(s, t, r).unwrap()).unwrap();
        }
        g
    }

    fn conf(g: &Graph, id: &str) -> f64 {
        g.node(&NodeId::new(id)).unwrap().confidence.value()
    }

    fn ids(raw: &[&str]) -> Vec<NodeId> {
        raw.iter().map(|s| NodeId::new(*s)).collect()
    }

    #[test]
    fn supports_strengthens_target_only() {
        let mut g = graph(
            &[("rain", 0.9), ("wet", 0.5)],
            &[("rain", "wet", RelationType::Supports)],
        );
        PropagationService::new().propagate_epistemic(&mut g, &ids(&["rain"]));
        assert!((conf(&g, "wet") - 0.6).abs() < 1e-9);
        assert_eq!(conf(&g, "rain"), 0.9);
    }

    #[test]
    fn chain_is_followed_breadth_first() {
        use RelationType::*;
        let mut g = graph(
            &[("a", 0.5), ("b", 0.5), ("c", 0.5)],
            &[("a", "b", Supports), ("b", "c", Weakens)],
        );
        let report = EpistemicPropagator::new().propagate(&mut g, &ids(&["a"]));
        assert!((conf(&g, "b") - 0.6).abs() < 1e-9);
        assert!((conf(&g, "c") - 0.4).abs() < 1e-9);
        assert_eq!(report, PropagationReport { visited: 3, adjustments: 2 });
    }

    #[test]
    fn every_traversed_edge_adjusts_but_target_enqueued_once() {
        use RelationType::*;
        let mut g = graph(
            &[("a", 0.5), ("b", 0.5), ("t", 0.5), ("u", 0.5)],
            &[("a", "t", Supports), ("b", "t", Supports), ("t", "u", Supports)],
        );
        let report = EpistemicPropagator::new().propagate(&mut g, &ids(&["a", "b"]));
        assert!((conf(&g, "t") - 0.7).abs() < 1e-9);
        assert!((conf(&g, "u") - 0.6).abs() < 1e-9);
        assert_eq!(report.visited, 4);
    }

    #[test]
    fn cycles_terminate() {
        use RelationType::*;
        let mut g = graph(&[("a", 0.5), ("b", 0.5)], &[("a", "b", Supports), ("b", "a", Supports)]);
        let report = EpistemicPropagator::new().propagate(&mut g, &ids(&["a"]));
        // b is adjusted from a, then a is adjusted from b but never re-enqueued
        assert!((conf(&g, "a") - 0.6).abs() < 1e-9);
        assert!((conf(&g, "b") - 0.6).abs() < 1e-9);
        assert_eq!(report.visited, 2);
    }

    #[test]
    fn unknown_and_duplicate_seeds_are_ignored() {
        let mut g = graph(&[("a", 0.5), ("b", 0.5)], &[("a", "b", RelationType::Supports)]);
        let report = EpistemicPropagator::new().propagate(&mut g, &ids(&["ghost", "a", "a"]));
        assert!((conf(&g, "b") - 0.6).abs() < 1e-9);
        assert_eq!(report.visited, 2);

        let mut empty = g.clone();
        let report = EpistemicPropagator::new().propagate(&mut empty, &ids(&["ghost"]));
        assert_eq!(report, PropagationReport::default());
    }

    #[test]
    fn layers_do_not_leak() {
        use RelationType::*;
        let mut g = graph(
            &[("a", 0.5), ("b", 0.5), ("c", 0.5)],
            &[("a", "b", Causes), ("a", "c", Supports)],
        );
        let service = PropagationService::new();
        service.propagate_epistemic(&mut g, &ids(&["a"]));
        assert_eq!(conf(&g, "b"), 0.5);
        assert!((conf(&g, "c") - 0.6).abs() < 1e-9);

        service.propagate_causal(&mut g, &ids(&["a"]));
        assert!((conf(&g, "b") - 0.6).abs() < 1e-9);
        assert!((conf(&g, "c") - 0.6).abs() < 1e-9);
    }

    #[test]
    fn propagate_all_runs_both() {
        use RelationType::*;
        let mut g = graph(
            &[("a", 0.5), ("b", 0.5), ("c", 0.5)],
            &[("a", "b", Prevents), ("a", "c", EvidenceAgainst)],
        );
        PropagationService::new().propagate_all(&mut g, &ids(&["a"]));
        assert!((conf(&g, "b") - 0.4).abs() < 1e-9);
        assert!((conf(&g, "c") - 0.4).abs() < 1e-9);
    }

    #[test]
    fn custom_factor_and_saturation() {
        let mut g = graph(&[("a", 0.5), ("b", 0.95)], &[("a", "b", RelationType::Strengthens)]);
        PropagationService::with_factor(0.25)
            .unwrap()
            .propagate_epistemic(&mut g, &ids(&["a"]));
        assert_eq!(conf(&g, "b"), 1.0);
    }

    #[test]
    fn out_of_range_factor_rejected() {
        for factor in [-0.1, 1.5, f64::NAN, f64::INFINITY] {
            assert!(matches!(
                PropagationService::with_factor(factor),
                Err(ConfigError::Invalid { .. })
            ));
            assert!(EpistemicPropagator::with_factor(factor).is_err());
            assert!(CausalPropagator::with_factor(factor).is_err());
        }
        let config = ReasoningConfig {
            propagation_factor: -0.2,
            ..ReasoningConfig::default()
        };
        assert!(PropagationService::from_config(&config).is_err());

        // the bounds themselves are usable
        let mut g = graph(&[("a", 0.5), ("b", 0.5)], &[("a", "b", RelationType::Weakens)]);
        PropagationService::with_factor(0.0)
            .unwrap()
            .propagate_epistemic(&mut g, &ids(&["a"]));
        assert_eq!(conf(&g, "b"), 0.5);
        PropagationService::with_factor(1.0)
            .unwrap()
            .propagate_epistemic(&mut g, &ids(&["a"]));
        assert_eq!(conf(&g, "b"), 0.0);
    }

    #[test]
    fn propagation_never_changes_structure() {
        use RelationType::*;
        let mut g = graph(
            &[("a", 0.5), ("b", 0.5), ("c", 0.5)],
            &[("a", "b", Supports), ("b", "c", Causes), ("c", "a", Contradicts)],
        );
        let before = g.to_document();
        PropagationService::new().propagate_all(&mut g, &ids(&["a", "b", "c"]));
        let after = g.to_document();
        assert_eq!(before.nodes.len(), after.nodes.len());
        assert_eq!(before.edges, after.edges);
        assert_eq!(g.version(), 0);
    }
}
