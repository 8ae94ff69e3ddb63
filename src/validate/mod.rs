//! Multi-layer structural validation.
//!
//! Three layer validators inspect a [`Graph`] without mutating it:
//!
//! - [`CausalValidator`]: causal cycles and cause/follows conflicts
//! - [`EpistemicValidator`]: contradictions, belief and evidence conflicts,
//!   confidence plausibility
//! - [`StructuralValidator`]: hierarchy cycles, anti-symmetry, transitivity,
//!   inverses, type cycles, similarity symmetry
//!
//! Findings are data, not errors: each is a *violation* (the graph is
//! invalid) or a *warning* (advisory). Cycle and contradiction findings also
//! carry a [`StructuralEvent`], which is recorded in the result and handed to
//! the [`EventSink`] the validator was built with, in the same order.

pub mod causal;
pub mod epistemic;
pub mod structural;

pub use causal::CausalValidator;
pub use epistemic::EpistemicValidator;
pub use structural::StructuralValidator;

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::config::ReasoningConfig;
use crate::error::ValidationError;
use crate::events::{ContradictionDetected, CycleDetected, StructuralEvent};
use crate::graph::Graph;
use crate::relation::Layer;

/// Warning carried by the result of validating an empty graph.
pub const EMPTY_GRAPH_WARNING: &str = "graph is empty - nothing to validate";

// ---------------------------------------------------------------------------
// Result
// ---------------------------------------------------------------------------

/// Outcome of validating a graph or one of its layers.
///
/// `is_valid` is true iff there are no violations. Deserialization
/// recomputes it and rejects blank messages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawValidationResult")]
pub struct ValidationResult {
    is_valid: bool,
    violations: Vec<String>,
    warnings: Vec<String>,
    events: Vec<StructuralEvent>,
}

#[derive(Deserialize)]
struct RawValidationResult {
    #[serde(default)]
    violations: Vec<String>,
    #[serde(default)]
    warnings: Vec<String>,
    #[serde(default)]
    events: Vec<StructuralEvent>,
}

impl TryFrom<RawValidationResult> for ValidationResult {
    type Error = ValidationError;

    fn try_from(raw: RawValidationResult) -> Result<Self, Self::Error> {
        let violations = raw
            .violations
            .into_iter()
            .map(|m| non_blank(m, "violation"))
            .collect::<Result<Vec<_>, _>>()?;
        let warnings = raw
            .warnings
            .into_iter()
            .map(|m| non_blank(m, "warning"))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            is_valid: violations.is_empty(),
            violations,
            warnings,
            events: raw.events,
        })
    }
}

/// Counts derived from a [`ValidationResult`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationSummary {
    pub is_valid: bool,
    pub violation_count: usize,
    pub warning_count: usize,
    pub event_count: usize,
    pub cycle_count: usize,
    pub contradiction_count: usize,
}

impl ValidationResult {
    pub fn new() -> Self {
        Self {
            is_valid: true,
            violations: Vec::new(),
            warnings: Vec::new(),
            events: Vec::new(),
        }
    }

    /// Record a violation. Blank messages are rejected.
    pub fn add_violation(
        &mut self,
        message: impl Into<String>,
        event: Option<StructuralEvent>,
    ) -> Result<(), ValidationError> {
        let message = non_blank(message.into(), "violation")?;
        self.push_violation(message, event);
        Ok(())
    }

    /// Record a warning. Blank messages are rejected.
    pub fn add_warning(
        &mut self,
        message: impl Into<String>,
        event: Option<StructuralEvent>,
    ) -> Result<(), ValidationError> {
        let message = non_blank(message.into(), "warning")?;
        self.push_warning(message, event);
        Ok(())
    }

    fn push_violation(&mut self, message: String, event: Option<StructuralEvent>) {
        self.is_valid = false;
        self.violations.push(message);
        self.events.extend(event);
    }

    fn push_warning(&mut self, message: String, event: Option<StructuralEvent>) {
        self.warnings.push(message);
        self.events.extend(event);
    }

    /// Append another result's findings after this one's.
    pub fn merge(&mut self, other: ValidationResult) {
        self.violations.extend(other.violations);
        self.warnings.extend(other.warnings);
        self.events.extend(other.events);
        self.is_valid = self.violations.is_empty();
    }

    pub fn is_valid(&self) -> bool {
        self.is_valid
    }

    pub fn violations(&self) -> &[String] {
        &self.violations
    }

    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    pub fn events(&self) -> &[StructuralEvent] {
        &self.events
    }

    pub fn has_issues(&self) -> bool {
        !self.violations.is_empty() || !self.warnings.is_empty()
    }

    pub fn cycles(&self) -> impl Iterator<Item = &CycleDetected> {
        self.events.iter().filter_map(StructuralEvent::as_cycle)
    }

    pub fn contradictions(&self) -> impl Iterator<Item = &ContradictionDetected> {
        self.events.iter().filter_map(StructuralEvent::as_contradiction)
    }

    pub fn has_cycles(&self) -> bool {
        self.cycles().next().is_some()
    }

    pub fn has_contradictions(&self) -> bool {
        self.contradictions().next().is_some()
    }

    pub fn summary(&self) -> ValidationSummary {
        ValidationSummary {
            is_valid: self.is_valid,
            violation_count: self.violations.len(),
            warning_count: self.warnings.len(),
            event_count: self.events.len(),
            cycle_count: self.cycles().count(),
            contradiction_count: self.contradictions().count(),
        }
    }
}

impl Default for ValidationResult {
    fn default() -> Self {
        Self::new()
    }
}

fn non_blank(message: String, kind: &'static str) -> Result<String, ValidationError> {
    if message.trim().is_empty() {
        Err(ValidationError::EmptyMessage { kind })
    } else {
        Ok(message)
    }
}

// ---------------------------------------------------------------------------
// Event sinks
// ---------------------------------------------------------------------------

/// Observer that receives each structural event as it is produced.
pub trait EventSink: Send + Sync {
    fn emit(&self, event: &StructuralEvent);
}

impl<F> EventSink for F
where
    F: Fn(&StructuralEvent) + Send + Sync,
{
    fn emit(&self, event: &StructuralEvent) {
        self(event)
    }
}

/// Sink that discards every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopSink;

impl EventSink for NoopSink {
    fn emit(&self, _event: &StructuralEvent) {}
}

/// Records findings into a result and forwards events to the sink.
pub(crate) struct Findings<'a> {
    result: ValidationResult,
    sink: &'a dyn EventSink,
}

impl<'a> Findings<'a> {
    pub(crate) fn new(sink: &'a dyn EventSink) -> Self {
        Self {
            result: ValidationResult::new(),
            sink,
        }
    }

    pub(crate) fn violation(&mut self, message: String, event: Option<StructuralEvent>) {
        if let Some(e) = &event {
            self.sink.emit(e);
        }
        self.result.push_violation(message, event);
    }

    pub(crate) fn warning(&mut self, message: String, event: Option<StructuralEvent>) {
        if let Some(e) = &event {
            self.sink.emit(e);
        }
        self.result.push_warning(message, event);
    }

    pub(crate) fn finish(self) -> ValidationResult {
        self.result
    }
}

// ---------------------------------------------------------------------------
// Validators
// ---------------------------------------------------------------------------

/// Contract shared by the per-layer validators.
pub trait LayerValidator {
    /// The layer this validator covers.
    fn layer(&self) -> Layer;

    /// Inspect the graph. Never mutates it.
    fn validate(&self, graph: &Graph) -> ValidationResult;
}

/// The closed set of layer validators run by [`Validator`].
#[derive(Clone)]
pub enum LayerCheck {
    Causal(CausalValidator),
    Epistemic(EpistemicValidator),
    Structural(StructuralValidator),
}

impl LayerValidator for LayerCheck {
    fn layer(&self) -> Layer {
        match self {
            LayerCheck::Causal(v) => v.layer(),
            LayerCheck::Epistemic(v) => v.layer(),
            LayerCheck::Structural(v) => v.layer(),
        }
    }

    fn validate(&self, graph: &Graph) -> ValidationResult {
        match self {
            LayerCheck::Causal(v) => v.validate(graph),
            LayerCheck::Epistemic(v) => v.validate(graph),
            LayerCheck::Structural(v) => v.validate(graph),
        }
    }
}

/// Runs every layer validator in a fixed order and aggregates the findings.
#[derive(Clone)]
pub struct Validator {
    checks: Vec<LayerCheck>,
}

impl Validator {
    /// Default thresholds, events recorded in the result only.
    pub fn new() -> Self {
        Self::with_config(&ReasoningConfig::default())
    }

    pub fn with_config(config: &ReasoningConfig) -> Self {
        Self::build(config, Arc::new(NoopSink))
    }

    /// Default thresholds, each event also delivered to `sink`.
    pub fn with_observer(sink: Arc<dyn EventSink>) -> Self {
        Self::build(&ReasoningConfig::default(), sink)
    }

    pub fn build(config: &ReasoningConfig, sink: Arc<dyn EventSink>) -> Self {
        Self {
            checks: vec![
                LayerCheck::Causal(CausalValidator::with_sink(Arc::clone(&sink))),
                LayerCheck::Epistemic(EpistemicValidator::from_config(config, Arc::clone(&sink))),
                LayerCheck::Structural(StructuralValidator::with_sink(sink)),
            ],
        }
    }

    /// Layers with a registered validator, in run order.
    pub fn layers(&self) -> Vec<Layer> {
        self.checks.iter().map(LayerValidator::layer).collect()
    }

    /// Validate every layer: causal, then epistemic, then structural.
    pub fn validate(&self, graph: &Graph) -> ValidationResult {
        let mut result = ValidationResult::new();
        if graph.is_empty() {
            result.push_warning(EMPTY_GRAPH_WARNING.to_string(), None);
            return result;
        }

        for check in &self.checks {
            result.merge(check.validate(graph));
        }

        let summary = result.summary();
        tracing::info!(
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            is_valid = summary.is_valid,
            violations = summary.violation_count,
            warnings = summary.warning_count,
            events = summary.event_count,
            "graph validated"
        );
        result
    }

    /// Validate one layer by name.
    pub fn validate_layer(
        &self,
        graph: &Graph,
        layer: &str,
    ) -> Result<ValidationResult, ValidationError> {
        self.checks
            .iter()
            .find(|check| check.layer().as_str() == layer)
            .map(|check| check.validate(graph))
            .ok_or_else(|| ValidationError::UnknownLayer {
                layer: layer.to_string(),
                available: self
                    .layers()
                    .iter()
                    .map(|l| l.as_str())
                    .collect::<Vec<_>>()
                    .join(", "),
            })
    }
}

impl Default for Validator {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Validator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Validator").field("layers", &self.layers()).finish()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::graph::Edge;
    use crate::node::{Node, NodeType};
    use crate::relation::RelationType;

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
    fn blank_messages_rejected() {
        let mut r = ValidationResult::new();
        assert_eq!(
            r.add_violation("  ", None),
            Err(ValidationError::EmptyMessage { kind: "violation" })
        );
        assert!(r.add_warning("", None).is_err());
        assert!(r.is_valid());
        assert!(!r.has_issues());
    }

    #[test]
    fn violation_invalidates() {
        let mut r = ValidationResult::new();
        r.add_warning("heads up", None).unwrap();
        assert!(r.is_valid());
        r.add_violation("broken", None).unwrap();
        assert!(!r.is_valid());
        assert_eq!(r.summary().violation_count, 1);
        assert_eq!(r.summary().warning_count, 1);
    }

    #[test]
    fn deserialized_validity_follows_violations() {
        let r: ValidationResult = serde_json::from_str(
            r#"{"is_valid": true, "violations": ["broken"], "warnings": [], "events": []}"#,
        )
        .unwrap();
        assert!(!r.is_valid());
        assert_eq!(r.violations(), ["broken"]);

        let r: ValidationResult =
            serde_json::from_str(r#"{"is_valid": false, "warnings": ["heads up"]}"#).unwrap();
        assert!(r.is_valid());

        let blank = r#"{"is_valid": false, "violations": ["  "], "warnings": [], "events": []}"#;
        assert!(serde_json::from_str::<ValidationResult>(blank).is_err());
        let blank = r#"{"violations": [], "warnings": [""], "events": []}"#;
        assert!(serde_json::from_str::<ValidationResult>(blank).is_err());
    }

    #[test]
    fn serialized_result_reads_back_equal() {
        let g = build(
            &["a", "b"],
            &[
                ("a", "b", RelationType::Causes),
                ("b", "a", RelationType::Causes),
                ("a", "b", RelationType::Contradicts),
            ],
        );
        let r = Validator::new().validate(&g);
        let json = serde_json::to_string(&r).unwrap();
        let back: ValidationResult = serde_json::from_str(&json).unwrap();
        assert_eq!(back, r);
        assert!(!back.is_valid());
    }

    #[test]
    fn empty_graph_short_circuits() {
        let r = Validator::new().validate(&Graph::new());
        assert!(r.is_valid());
        assert_eq!(r.warnings(), [EMPTY_GRAPH_WARNING]);
        assert!(r.events().is_empty());
    }

    #[test]
    fn aggregates_in_layer_order() {
        use RelationType::*;
        let g = build(
            &["a", "b"],
            &[
                ("a", "b", Causes),
                ("b", "a", Causes),
                ("a", "b", Contradicts),
                ("a", "b", SimilarTo),
            ],
        );
        let r = Validator::new().validate(&g);
        assert!(!r.is_valid());
        // causal cycle warning precedes the structural similarity warning
        assert!(r.warnings()[0].starts_with("Causal cycle"));
        assert!(r.warnings().last().unwrap().starts_with("Similarity asymmetry"));
        assert!(r.events()[0].as_cycle().is_some());
        assert!(r.events()[1].as_contradiction().is_some());
        let s = r.summary();
        assert_eq!(s.cycle_count, 1);
        assert_eq!(s.contradiction_count, 1);
    }

    #[test]
    fn validate_layer_dispatches_by_name() {
        let g = build(&["a", "b"], &[("a", "b", RelationType::Contradicts)]);
        let v = Validator::new();
        assert!(!v.validate_layer(&g, "epistemic").unwrap().is_valid());
        assert!(v.validate_layer(&g, "causal").unwrap().is_valid());
        let err = v.validate_layer(&g, "temporal").unwrap_err();
        assert_eq!(
            err,
            ValidationError::UnknownLayer {
                layer: "temporal".into(),
                available: "causal, epistemic, structural".into(),
            }
        );
    }

    #[test]
    fn observer_sees_the_same_events() {
        let seen: Arc<Mutex<Vec<StructuralEvent>>> = Arc::default();
        let sink = {
            let seen = Arc::clone(&seen);
            move |e: &StructuralEvent| seen.lock().unwrap().push(e.clone())
        };
        let g = build(
            &["a", "b", "c"],
            &[
                ("a", "b", RelationType::PartOf),
                ("b", "a", RelationType::PartOf),
                ("b", "c", RelationType::Contradicts),
            ],
        );
        let r = Validator::with_observer(Arc::new(sink)).validate(&g);
        assert_eq!(seen.lock().unwrap().as_slice(), r.events());
        assert_eq!(r.events().len(), 2);
    }

    #[test]
    fn validation_is_idempotent() {
        use RelationType::*;
        let g = build(
            &["a", "b", "c"],
            &[("a", "b", Contains), ("b", "c", Contains), ("c", "a", Causes), ("a", "c", Follows)],
        );
        let v = Validator::new();
        let first = v.validate(&g);
        let second = v.validate(&g);
        assert_eq!(first, second);
        assert_eq!(
            serde_json::to_value(first.violations()).unwrap(),
            serde_json::to_value(second.violations()).unwrap()
        );
    }
}
