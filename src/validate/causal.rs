//! Causal layer validation.
//!
//! Cycles are tolerated in causal reasoning (feedback loops exist), so every
//! finding here is a warning.

use std::sync::Arc;

use crate::events::{CycleDetected, CycleKind, StructuralEvent};
use crate::graph::Graph;
use crate::graph::traverse::find_cycles;
use crate::node::NodeId;
use crate::relation::{Layer, RelationType};

use super::{EventSink, Findings, LayerValidator, NoopSink, ValidationResult};

/// Detects causal cycles and causes/follows conflicts.
#[derive(Clone)]
pub struct CausalValidator {
    sink: Arc<dyn EventSink>,
}

impl CausalValidator {
    pub fn new() -> Self {
        Self::with_sink(Arc::new(NoopSink))
    }

    pub fn with_sink(sink: Arc<dyn EventSink>) -> Self {
        Self { sink }
    }

    fn check_cycles(&self, graph: &Graph, findings: &mut Findings<'_>) {
        for path in find_cycles(graph, RelationType::is_causal) {
            let event = cycle_event(Layer::Causal, path, CycleKind::Causal);
            let message = match &event {
                Some(StructuralEvent::CycleDetected(c)) => {
                    format!("Causal cycle detected: {}", c.render_path())
                }
                _ => "Causal cycle detected".to_string(),
            };
            findings.warning(message, event);
        }
    }

    fn check_temporal_consistency(&self, graph: &Graph, findings: &mut Findings<'_>) {
        for edge in graph.causal_edges() {
            if graph.has_edge(&edge.source, &edge.target, RelationType::Follows) {
                findings.warning(
                    format!(
                        "Temporal conflict: {s} {r} {t} but {s} also follows {t}; \
                         a cause must precede its effect",
                        s = edge.source,
                        r = edge.relation,
                        t = edge.target,
                    ),
                    None,
                );
            }
        }
    }
}

/// Wrap a reconstructed path in an event. A path that fails the cycle
/// invariant is logged and reported without an event.
pub(super) fn cycle_event(
    layer: Layer,
    path: Vec<NodeId>,
    kind: CycleKind,
) -> Option<StructuralEvent> {
    match CycleDetected::new(layer, path, kind) {
        Ok(event) => Some(event.into()),
        Err(err) => {
            tracing::warn!(%layer, error = %err, "discarding malformed cycle");
            None
        }
    }
}

impl Default for CausalValidator {
    fn default() -> Self {
        Self::new()
    }
}

impl LayerValidator for CausalValidator {
    fn layer(&self) -> Layer {
        Layer::Causal
    }

    fn validate(&self, graph: &Graph) -> ValidationResult {
        let mut findings = Findings::new(self.sink.as_ref());
        self.check_cycles(graph, &mut findings);
        self.check_temporal_consistency(graph, &mut findings);
        let result = findings.finish();

        tracing::debug!(
            layer = "causal",
            warnings = result.warnings().len(),
            cycles = result.cycles().count(),
            "layer validated"
        );
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::Edge;
    use crate::node::{Node, NodeType};

    fn build(ids: &[&str], edges: &[(&str, &str, RelationType)]) -> Graph {
        let mut g = Graph::new();
        for &id in ids {
            g.add_node(Node::with_id(id, id, NodeType::Concept).unwrap()).unwrap();
        }
        for &(s, t, r) in edges {
            g.add_edge(Edge::new(s, t, r).unwrap()).unwrap();
        }
        g
    }

    #[test]
    fn two_node_cycle_is_single_warning() {
        use RelationType::Causes;
        let g = build(&["a", "b"], &[("a", "b", Causes), ("b", "a", Causes)]);
        let r = CausalValidator::new().validate(&g);
        assert!(r.is_valid());
        assert_eq!(r.warnings(), ["Causal cycle detected: a -> b -> a"]);
        let cycles: Vec<_> = r.cycles().collect();
        assert_eq!(cycles.len(), 1);
        assert_eq!(cycles[0].layer(), Layer::Causal);
        assert_eq!(cycles[0].cycle_type(), CycleKind::Causal);
    }

    #[test]
    fn mixed_causal_relations_close_a_cycle() {
        use RelationType::*;
        let g = build(
            &["a", "b", "c"],
            &[("a", "b", Enables), ("b", "c", DependsOn), ("c", "a", Prevents)],
        );
        let r = CausalValidator::new().validate(&g);
        assert_eq!(r.cycles().count(), 1);
    }

    #[test]
    fn non_causal_loops_are_ignored() {
        use RelationType::*;
        let g = build(&["a", "b"], &[("a", "b", Causes), ("b", "a", Supports)]);
        let r = CausalValidator::new().validate(&g);
        assert!(!r.has_issues());
    }

    #[test]
    fn cause_that_follows_its_effect_warns() {
        use RelationType::*;
        let g = build(&["a", "b"], &[("a", "b", Causes), ("a", "b", Follows)]);
        let r = CausalValidator::new().validate(&g);
        assert!(r.is_valid());
        assert_eq!(r.warnings().len(), 1);
        assert!(r.warnings()[0].starts_with("Temporal conflict: a causes b"));
        assert!(r.events().is_empty());
    }

    #[test]
    fn precedes_is_consistent() {
        use RelationType::*;
        let g = build(
            &["a", "b"],
            &[("a", "b", Causes), ("a", "b", Precedes), ("b", "a", Follows)],
        );
        assert!(!CausalValidator::new().validate(&g).has_issues());
    }
}
