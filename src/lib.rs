//! Composable boolean condition trees for query filters.
//!
//! A query-building layer assembles nested AND/OR/NOT filters with
//! [`OperationFactory`] or the [`Operation`] constructors. Trees stay in a
//! canonical shape (same-kind children flattened, duplicate operands
//! collapsed), can be evaluated against a [`Record`], and compare and hash
//! structurally so equivalent filters can share cached query plans.

pub mod comparison;
pub mod condition;
pub mod record;
pub mod value;

pub use comparison::{Comparison, ComparisonOperator};
pub use condition::{
    Operand, Operation, OperationError, OperationFactory, OperationKind, OperationResult,
    Predicate, Validity,
};
pub use record::Record;
pub use value::{DataType, Value};
