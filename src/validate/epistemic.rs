//! Epistemic layer validation: beliefs, evidence and their consistency.

use std::collections::HashMap;
use std::sync::Arc;

use crate::config::{HIGH_CONFIDENCE_THRESHOLD, LOW_CONFIDENCE_THRESHOLD, ReasoningConfig};
use crate::events::ContradictionDetected;
use crate::graph::{Edge, Graph};
use crate::node::NodeId;
use crate::relation::{Layer, RelationType};

use super::{EventSink, Findings, LayerValidator, NoopSink, ValidationResult};

/// Relation pairs that cannot both hold from one source to one target.
const OPPOSING: [(RelationType, RelationType); 3] = [
    (RelationType::Supports, RelationType::Contradicts),
    (RelationType::Strengthens, RelationType::Weakens),
    (RelationType::EvidenceFor, RelationType::EvidenceAgainst),
];

/// Incoming epistemic edges of one node, by polarity.
#[derive(Debug, Default, Clone, Copy)]
struct Tally {
    supporting: usize,
    weakening: usize,
    evidence_for: usize,
    evidence_against: usize,
}

/// Detects contradictions and implausible confidence in the epistemic layer.
#[derive(Clone)]
pub struct EpistemicValidator {
    sink: Arc<dyn EventSink>,
    high_threshold: f64,
    low_threshold: f64,
}

impl EpistemicValidator {
    pub fn new() -> Self {
        Self::with_sink(Arc::new(NoopSink))
    }

    pub fn with_sink(sink: Arc<dyn EventSink>) -> Self {
        Self {
            sink,
            high_threshold: HIGH_CONFIDENCE_THRESHOLD,
            low_threshold: LOW_CONFIDENCE_THRESHOLD,
        }
    }

    pub fn from_config(config: &ReasoningConfig, sink: Arc<dyn EventSink>) -> Self {
        Self {
            sink,
            high_threshold: config.high_confidence_threshold,
            low_threshold: config.low_confidence_threshold,
        }
    }

    fn check_direct_contradictions(&self, edges: &[&Edge], findings: &mut Findings<'_>) {
        for edge in edges.iter().filter(|e| e.relation == RelationType::Contradicts) {
            let event = ContradictionDetected::new(edge.source.clone(), edge.target.clone())
                .with_edge(edge.key());
            findings.violation(
                format!("Direct contradiction: {} contradicts {}", edge.source, edge.target),
                Some(event.into()),
            );
        }
    }

    fn check_belief_conflicts(&self, edges: &[&Edge], findings: &mut Findings<'_>) {
        // (source, target) pairs in first-seen order
        let mut order: Vec<(&NodeId, &NodeId)> = Vec::new();
        let mut relations: HashMap<(&NodeId, &NodeId), Vec<RelationType>> = HashMap::new();
        for edge in edges {
            let pair = (&edge.source, &edge.target);
            let entry = relations.entry(pair).or_default();
            if entry.is_empty() {
                order.push(pair);
            }
            entry.push(edge.relation);
        }

        for pair in order {
            let rels = &relations[&pair];
            if rels.len() < 2 {
                continue;
            }
            let (source, target) = pair;
            for (pro, con) in OPPOSING {
                if rels.contains(&pro) && rels.contains(&con) {
                    let event = ContradictionDetected::new(source.clone(), target.clone());
                    findings.warning(
                        format!("Belief conflict: {source} both {pro} and {con} {target}"),
                        Some(event.into()),
                    );
                }
            }
        }
    }

    fn check_evidence_conflicts(
        &self,
        graph: &Graph,
        tallies: &HashMap<&NodeId, Tally>,
        findings: &mut Findings<'_>,
    ) {
        for node in graph.nodes() {
            let Some(t) = tallies.get(&node.id) else {
                continue;
            };
            if t.evidence_for > 0 && t.evidence_against > 0 {
                let event = ContradictionDetected::new(node.id.clone(), node.id.clone());
                findings.warning(
                    format!(
                        "Evidence conflict on {}: {} evidence for, {} evidence against",
                        node.id, t.evidence_for, t.evidence_against
                    ),
                    Some(event.into()),
                );
            }
        }
    }

    fn check_confidence_consistency(
        &self,
        graph: &Graph,
        tallies: &HashMap<&NodeId, Tally>,
        findings: &mut Findings<'_>,
    ) {
        for node in graph.nodes() {
            let t = tallies.get(&node.id).copied().unwrap_or_default();
            let confidence = node.confidence.value();
            if confidence > self.high_threshold && t.weakening > t.supporting && t.weakening > 0 {
                findings.warning(
                    format!(
                        "Confidence inconsistency: {} has high confidence ({:.2}) but \
                         {} weakening vs {} supporting relation(s)",
                        node.id, confidence, t.weakening, t.supporting
                    ),
                    None,
                );
            } else if confidence < self.low_threshold
                && t.supporting > t.weakening
                && t.supporting > 0
            {
                findings.warning(
                    format!(
                        "Confidence inconsistency: {} has low confidence ({:.2}) but \
                         {} supporting vs {} weakening relation(s)",
                        node.id, confidence, t.supporting, t.weakening
                    ),
                    None,
                );
            }
        }
    }
}

fn tally_incoming<'g>(edges: &[&'g Edge]) -> HashMap<&'g NodeId, Tally> {
    let mut tallies: HashMap<&NodeId, Tally> = HashMap::new();
    for edge in edges {
        let t = tallies.entry(&edge.target).or_default();
        match edge.relation {
            RelationType::Supports | RelationType::Strengthens => t.supporting += 1,
            RelationType::EvidenceFor => {
                t.supporting += 1;
                t.evidence_for += 1;
            }
            RelationType::Weakens => t.weakening += 1,
            RelationType::EvidenceAgainst => {
                t.weakening += 1;
                t.evidence_against += 1;
            }
            _ => {}
        }
    }
    tallies
}

impl Default for EpistemicValidator {
    fn default() -> Self {
        Self::new()
    }
}

impl LayerValidator for EpistemicValidator {
    fn layer(&self) -> Layer {
        Layer::Epistemic
    }

    fn validate(&self, graph: &Graph) -> ValidationResult {
        let edges = graph.epistemic_edges();
        let tallies = tally_incoming(&edges);
        let mut findings = Findings::new(self.sink.as_ref());

        self.check_direct_contradictions(&edges, &mut findings);
        self.check_belief_conflicts(&edges, &mut findings);
        self.check_evidence_conflicts(graph, &tallies, &mut findings);
        self.check_confidence_consistency(graph, &tallies, &mut findings);

        let result = findings.finish();
        tracing::debug!(
            layer = "epistemic",
            violations = result.violations().len(),
            warnings = result.warnings().len(),
            contradictions = result.contradictions().count(),
            "layer validated"
        );
        result
    }
}
