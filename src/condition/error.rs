//! Error types for building condition trees.

use crate::condition::kind::OperationKind;
use thiserror::Error;

/// Errors raised while constructing or mutating an operation.
///
/// All of these signal caller misuse; none are transient.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OperationError {
    #[error("Unknown operation kind: {slug}")]
    UnknownKind { slug: String },

    #[error("Invalid operand: {reason}")]
    InvalidOperand { reason: String },

    #[error("{kind} operation accepts at most {max} operand(s), got {actual}")]
    Arity {
        kind: OperationKind,
        max: usize,
        actual: usize,
    },

    #[error("{kind} operation is immutable")]
    Immutable { kind: OperationKind },
}

/// Result type for operation building.
pub type OperationResult<T> = Result<T, OperationError>;
