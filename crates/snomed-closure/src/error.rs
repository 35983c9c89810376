//! Errors raised by the subsumption engine.

use snomed_types::SctId;
use thiserror::Error;

/// Errors that can occur while building a closure.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ClosureError {
    /// A configured id is not a well-formed concept id.
    #[error("Invalid configuration: {field} = {id} is not a valid concept id")]
    InvalidConfiguration {
        /// Name of the offending configuration field.
        field: &'static str,
        /// The rejected id.
        id: SctId,
    },

    /// The graph has a cycle and cycles are rejected.
    #[error("Cycle detected: concept {concept_id} is its own ancestor")]
    CycleDetected {
        /// Lowest concept id found in its own closure.
        concept_id: SctId,
    },

    /// The traversal for one source concept failed.
    #[error("Closure task for concept {concept_id} failed: {reason}")]
    TaskFailure {
        /// The source concept whose traversal failed.
        concept_id: SctId,
        /// Panic message or bound that was exceeded.
        reason: String,
    },

    /// The computation was cancelled before it finished.
    #[error("Closure computation cancelled")]
    Cancelled,
}

/// Result type for engine operations.
pub type ClosureResult<T> = Result<T, ClosureError>;
