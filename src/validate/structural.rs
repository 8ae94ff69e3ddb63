//! Structural layer validation: composition, type hierarchies and similarity.
//!
//! Hierarchical relations (`contains`, `part_of`, `instance_of`, `type_of`)
//! must form a DAG and be anti-symmetric; missing transitive or inverse edges
//! and one-sided similarity are only advisory.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use crate::events::{CycleKind, StructuralEvent};
use crate::graph::traverse::find_cycles;
use crate::graph::{Edge, Graph};
use crate::node::NodeId;
use crate::relation::{Layer, RelationType};

use super::causal::cycle_event;
use super::{EventSink, Findings, LayerValidator, NoopSink, ValidationResult};

/// Relations where a mutual pair is a circular type relationship.
const TYPE_RELATIONS: [RelationType; 2] = [RelationType::InstanceOf, RelationType::TypeOf];

/// Validates hierarchy shape and relation symmetry.
#[derive(Clone)]
pub struct StructuralValidator {
    sink: Arc<dyn EventSink>,
}

impl StructuralValidator {
    pub fn new() -> Self {
        Self::with_sink(Arc::new(NoopSink))
    }

    pub fn with_sink(sink: Arc<dyn EventSink>) -> Self {
        Self { sink }
    }

    fn check_hierarchical_cycles(&self, graph: &Graph, findings: &mut Findings<'_>) {
        for path in find_cycles(graph, RelationType::is_hierarchical) {
            let event = cycle_event(Layer::Structural, path, CycleKind::Hierarchical);
            let message = match &event {
                Some(StructuralEvent::CycleDetected(c)) => {
                    format!("Hierarchical cycle detected: {}", c.render_path())
                }
                _ => "Hierarchical cycle detected".to_string(),
            };
            findings.violation(message, event);
        }
    }

    fn check_anti_symmetry(&self, graph: &Graph, edges: &[&Edge], findings: &mut Findings<'_>) {
        for relation in RelationType::HIERARCHICAL {
            for (a, b) in mutual_pairs(graph, edges, relation) {
                findings.violation(
                    format!("Anti-symmetry violation: {a} {relation} {b} and {b} {relation} {a}"),
                    None,
                );
            }
        }
    }

    fn check_transitivity(&self, graph: &Graph, edges: &[&Edge], findings: &mut Findings<'_>) {
        for relation in RelationType::HIERARCHICAL {
            let of_kind: Vec<&Edge> =
                edges.iter().copied().filter(|e| e.relation == relation).collect();
            let mut successors: HashMap<&NodeId, Vec<&NodeId>> = HashMap::new();
            for edge in &of_kind {
                successors.entry(&edge.source).or_default().push(&edge.target);
            }

            for first in &of_kind {
                let (a, b) = (&first.source, &first.target);
                let Some(next) = successors.get(b) else {
                    continue;
                };
                for &c in next {
                    if c == a || graph.has_edge(a, c, relation) {
                        continue;
                    }
                    findings.warning(
                        format!(
                            "Transitivity gap: {a} {relation} {b} and {b} {relation} {c}, \
                             but {a} {relation} {c} is missing"
                        ),
                        None,
                    );
                }
            }
        }
    }

    fn check_missing_inverses(&self, graph: &Graph, edges: &[&Edge], findings: &mut Findings<'_>) {
        for relation in RelationType::HIERARCHICAL {
            let Some(inverse) = relation.inverse() else {
                continue;
            };
            for edge in edges.iter().filter(|e| e.relation == relation) {
                if !graph.has_edge(&edge.target, &edge.source, inverse) {
                    findings.warning(
                        format!(
                            "Missing inverse: {s} {relation} {t}, but {t} {inverse} {s} is missing",
                            s = edge.source,
                            t = edge.target,
                        ),
                        None,
                    );
                }
            }
        }
    }

    fn check_type_cycles(&self, graph: &Graph, edges: &[&Edge], findings: &mut Findings<'_>) {
        for relation in TYPE_RELATIONS {
            for (a, b) in mutual_pairs(graph, edges, relation) {
                findings.violation(
                    format!(
                        "Type inconsistency: {a} {relation} {b} and {b} {relation} {a} \
                         (circular type relationship)"
                    ),
                    None,
                );
            }
        }
    }

    fn check_similarity_symmetry(
        &self,
        graph: &Graph,
        edges: &[&Edge],
        findings: &mut Findings<'_>,
    ) {
        for edge in edges.iter().filter(|e| e.relation == RelationType::SimilarTo) {
            if !graph.has_edge(&edge.target, &edge.source, RelationType::SimilarTo) {
                findings.warning(
                    format!(
                        "Similarity asymmetry: {s} similar_to {t}, \
                         but {t} similar_to {s} is missing",
                        s = edge.source,
                        t = edge.target,
                    ),
                    None,
                );
            }
        }
    }
}

/// Pairs linked both ways by `relation`, each reported once, in the order
/// the first edge of the pair was added.
fn mutual_pairs<'g>(
    graph: &Graph,
    edges: &[&'g Edge],
    relation: RelationType,
) -> Vec<(&'g NodeId, &'g NodeId)> {
    let mut reported: HashSet<(&NodeId, &NodeId)> = HashSet::new();
    let mut pairs = Vec::new();
    for edge in edges.iter().filter(|e| e.relation == relation) {
        let (a, b) = (&edge.source, &edge.target);
        if reported.contains(&(b, a)) {
            continue;
        }
        if graph.has_edge(b, a, relation) {
            reported.insert((a, b));
            pairs.push((a, b));
        }
    }
    pairs
}

impl Default for StructuralValidator {
    fn default() -> Self {
        Self::new()
    }
}

impl LayerValidator for StructuralValidator {
    fn layer(&self) -> Layer {
        Layer::Structural
    }

    fn validate(&self, graph: &Graph) -> ValidationResult {
        let edges = graph.structural_edges();
        let mut findings = Findings::new(self.sink.as_ref());

        self.check_hierarchical_cycles(graph, &mut findings);
        self.check_anti_symmetry(graph, &edges, &mut findings);
        self.check_transitivity(graph, &edges, &mut findings);
        self.check_missing_inverses(graph, &edges, &mut findings);
        self.check_type_cycles(graph, &edges, &mut findings);
        self.check_similarity_symmetry(graph, &edges, &mut findings);

        let result = findings.finish();
        tracing::debug!(
            layer = "structural",
            violations = result.violations().len(),
            warnings = result.warnings().len(),
            cycles = result.cycles().count(),
            "layer validated"
        );
        result
    }
}
