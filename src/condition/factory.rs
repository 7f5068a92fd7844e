//! Construction of operation nodes by kind or slug.

use crate::condition::error::OperationResult;
use crate::condition::kind::OperationKind;
use crate::condition::operand::Operand;
use crate::condition::operation::Operation;
use std::hash::Hash;

/// Builds operation nodes from the closed set of kinds.
pub struct OperationFactory;

impl OperationFactory {
    /// Create an operation from its slug (`"and"`, `"or"`, `"not"` or `"null"`).
    ///
    /// Initial operands go through the same checks as [`Operation::merge`].
    pub fn create<C, I>(slug: &str, operands: I) -> OperationResult<Operation<C>>
    where
        C: Clone + Hash + Eq,
        I: IntoIterator,
        I::Item: Into<Option<Operand<C>>>,
    {
        let kind: OperationKind = slug.parse()?;
        Self::build(kind, operands)
    }

    /// Create an operation of a known kind.
    pub fn build<C, I>(kind: OperationKind, operands: I) -> OperationResult<Operation<C>>
    where
        C: Clone + Hash + Eq,
        I: IntoIterator,
        I::Item: Into<Option<Operand<C>>>,
    {
        let operation = Operation::empty(kind);

        let operands: Vec<Operand<C>> = operands.into_iter().filter_map(Into::into).collect();
        if !operands.is_empty() {
            operation.merge(operands)?;
        }
        Ok(operation)
    }
}
