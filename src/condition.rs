//! Boolean condition trees.
//!
//! This module provides:
//! - Operation nodes (AND, OR, NOT and the NULL tautology) over leaf predicates
//! - Flattening of nested same-kind AND/OR nodes and deduplication of operands
//! - Evaluation and validity checks against in-memory records
//! - Order-independent structural equality and hashing
//! - Negation polarity derived from the ancestor chain

pub mod error;
pub mod factory;
mod flatten;
pub mod kind;
pub mod operand;
pub mod operation;
mod variant;

pub use error::{OperationError, OperationResult};
pub use factory::OperationFactory;
pub use kind::OperationKind;
pub use operand::{Operand, Predicate, Validity};
pub use operation::Operation;
