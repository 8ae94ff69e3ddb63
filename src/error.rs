//! Rich diagnostic error types for the reasoning core.
//!
//! Each subsystem defines its own error type with miette `#[diagnostic]` derives,
//! providing error codes and help text so callers know exactly which invariant
//! was broken and how to fix the offending input.
//!
//! Validation findings are *not* errors: they are returned as data inside
//! [`ValidationResult`](crate::validate::ValidationResult). The types here cover
//! invariant failures only (programmer or data errors that abort one operation).

use miette::Diagnostic;
use thiserror::Error;

/// Top-level error type for the reasoning core.
///
/// Each variant wraps a subsystem-specific error, preserving the full diagnostic
/// chain (error codes, help text) through to the user.
#[derive(Debug, Error, Diagnostic)]
pub enum GotError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Model(#[from] ModelError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Graph(#[from] GraphError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Event(#[from] EventError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Config(#[from] ConfigError),
}

// ---------------------------------------------------------------------------
// Model (value object / entity) errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic, PartialEq)]
pub enum ModelError {
    #[error("confidence must be between 0.0 and 1.0, got {value}")]
    #[diagnostic(
        code(got::model::invalid_confidence),
        help(
            "Confidence is a bounded scalar. Clamp the value into [0.0, 1.0] \
             before constructing it, or use `strengthen`/`weaken` which saturate."
        )
    )]
    InvalidConfidence { value: f64 },

    #[error("node concept cannot be empty")]
    #[diagnostic(
        code(got::model::empty_concept),
        help("Every node needs a non-blank textual concept, e.g. \"Rain\".")
    )]
    EmptyConcept,

    #[error("unknown node type: {name}")]
    #[diagnostic(
        code(got::model::unknown_node_type),
        help(
            "Valid node types are: concept, hypothesis, fact, goal, state, \
             problem, solution, constraint."
        )
    )]
    UnknownNodeType { name: String },

    #[error("unknown relation type: {name}")]
    #[diagnostic(
        code(got::model::unknown_relation),
        help(
            "Relation types are snake_case names such as `causes`, `supports`, \
             `part_of` or `evidence_against`."
        )
    )]
    UnknownRelation { name: String },

    #[error("invalid layer: {name}")]
    #[diagnostic(
        code(got::model::invalid_layer),
        help("Valid layers are: causal, epistemic, structural, temporal, logical.")
    )]
    InvalidLayer { name: String },
}

// ---------------------------------------------------------------------------
// Graph errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic, PartialEq)]
pub enum GraphError {
    #[error("node {node_id} already exists in graph")]
    #[diagnostic(
        code(got::graph::duplicate_node),
        help("Node ids are unique within a graph. Generate a fresh id or reuse the existing node.")
    )]
    DuplicateNode { node_id: String },

    #[error("{role} node {node_id} does not exist")]
    #[diagnostic(
        code(got::graph::missing_endpoint),
        help("Both endpoints of an edge must be added to the graph before the edge itself.")
    )]
    MissingEndpoint { role: &'static str, node_id: String },

    #[error("edge cannot connect node {node_id} to itself")]
    #[diagnostic(
        code(got::graph::self_loop),
        help("Self-loops are not allowed. Relate the concept to a different node.")
    )]
    SelfLoop { node_id: String },

    #[error("edge already exists: {source_id} --[{relation}]--> {target_id}")]
    #[diagnostic(
        code(got::graph::duplicate_edge),
        help(
            "An edge is identified by (source, target, relation). Update the \
             existing edge's confidence instead of adding it twice."
        )
    )]
    DuplicateEdge {
        source_id: String,
        target_id: String,
        relation: String,
    },

    #[error("node {node_id} does not exist")]
    #[diagnostic(
        code(got::graph::unknown_node),
        help("Check the node id; it may already have been removed.")
    )]
    UnknownNode { node_id: String },

    #[error("edge does not exist: {source_id} --[{relation}]--> {target_id}")]
    #[diagnostic(
        code(got::graph::unknown_edge),
        help("No edge matches this (source, target, relation) triple.")
    )]
    UnknownEdge {
        source_id: String,
        target_id: String,
        relation: String,
    },

    #[error(transparent)]
    #[diagnostic(transparent)]
    Model(#[from] ModelError),
}

// ---------------------------------------------------------------------------
// Event errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic, PartialEq)]
pub enum EventError {
    #[error("malformed cycle path {path:?}: {reason}")]
    #[diagnostic(
        code(got::event::malformed_cycle),
        help(
            "A cycle path lists at least two distinct node ids, starts and ends \
             with the same id, and repeats no other id, e.g. [A, B, C, A]."
        )
    )]
    MalformedCycle { path: Vec<String>, reason: String },
}

// ---------------------------------------------------------------------------
// Validation errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic, PartialEq)]
pub enum ValidationError {
    #[error("unknown layer: {layer}. Available layers: {available}")]
    #[diagnostic(
        code(got::validate::unknown_layer),
        help("Only layers with a registered validator can be validated individually.")
    )]
    UnknownLayer { layer: String, available: String },

    #[error("{kind} message cannot be empty")]
    #[diagnostic(
        code(got::validate::empty_message),
        help("Every violation and warning must carry a human-readable message.")
    )]
    EmptyMessage { kind: &'static str },
}

// ---------------------------------------------------------------------------
// Configuration errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    #[error("failed to read config: {path}")]
    #[diagnostic(
        code(got::config::read),
        help("Ensure the config file exists and is readable.")
    )]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {message}")]
    #[diagnostic(
        code(got::config::parse),
        help("Check the TOML syntax. All keys are optional and fall back to defaults.")
    )]
    Parse { message: String },

    #[error("invalid configuration: {message}")]
    #[diagnostic(
        code(got::config::invalid),
        help(
            "Confidence defaults, factors and thresholds must lie in [0.0, 1.0], \
             and the low threshold may not exceed the high threshold."
        )
    )]
    Invalid { message: String },
}

/// Convenience alias for functions returning reasoning-core results.
pub type GotResult<T> = std::result::Result<T, GotError>;
