//! Per-kind behavior of operation nodes.
//!
//! Each kind is a zero-sized type implementing [`Variant`]; `OperationKind`
//! dispatches to them through a fixed match.

use crate::condition::error::{OperationError, OperationResult};
use crate::condition::kind::OperationKind;
use std::convert;

pub(crate) trait Variant {
    /// Check whether `incoming` more operands may join `current` existing ones
    fn admit(&self, _current: usize, _incoming: usize) -> OperationResult<()> {
        Ok(())
    }

    fn clear(&self) -> OperationResult<()> {
        Ok(())
    }

    /// Whether appending a same-kind operation splices its children in
    fn flattens(&self) -> bool {
        false
    }

    /// Fold the operands' match results
    fn combine<I>(&self, results: I) -> bool
    where
        I: Iterator<Item = bool>;

    /// Fold the operands' validity. Non-empty and all valid by default.
    fn validate<I>(&self, validities: I) -> bool
    where
        I: Iterator<Item = bool>,
    {
        let mut validities = validities.peekable();
        validities.peek().is_some() && validities.all(convert::identity)
    }

    /// Derive this node's polarity from its parent's, `None` at a root
    fn negate(&self, parent: Option<bool>) -> bool {
        parent.unwrap_or(false)
    }
}

/// Fail when `actual` operands exceed the limit `kind` allows
fn check_arity(kind: OperationKind, actual: usize) -> OperationResult<()> {
    match kind.max_operands() {
        Some(max) if actual > max => Err(OperationError::Arity { kind, max, actual }),
        _ => Ok(()),
    }
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct And;

impl Variant for And {
    fn flattens(&self) -> bool {
        true
    }

    #[inline]
    fn combine<I>(&self, mut results: I) -> bool
    where
        I: Iterator<Item = bool>,
    {
        results.all(convert::identity)
    }
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct Or;

impl Variant for Or {
    fn flattens(&self) -> bool {
        true
    }

    #[inline]
    fn combine<I>(&self, mut results: I) -> bool
    where
        I: Iterator<Item = bool>,
    {
        results.any(convert::identity)
    }

    // `any` is false on an empty set, so non-emptiness comes for free
    fn validate<I>(&self, mut validities: I) -> bool
    where
        I: Iterator<Item = bool>,
    {
        validities.any(convert::identity)
    }
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct Not;

impl Variant for Not {
    fn admit(&self, current: usize, incoming: usize) -> OperationResult<()> {
        check_arity(OperationKind::Not, current + incoming)
    }

    // An empty NOT negates the vacuous truth of its missing operand
    #[inline]
    fn combine<I>(&self, mut results: I) -> bool
    where
        I: Iterator<Item = bool>,
    {
        !results.all(convert::identity)
    }

    fn negate(&self, parent: Option<bool>) -> bool {
        parent.map_or(true, |negated| !negated)
    }
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct Null;

impl Variant for Null {
    // Holds nothing, so any mutation is misuse rather than an arity overflow
    fn admit(&self, _current: usize, _incoming: usize) -> OperationResult<()> {
        Err(OperationError::Immutable {
            kind: OperationKind::Null,
        })
    }

    fn clear(&self) -> OperationResult<()> {
        Err(OperationError::Immutable {
            kind: OperationKind::Null,
        })
    }

    #[inline]
    fn combine<I>(&self, _results: I) -> bool
    where
        I: Iterator<Item = bool>,
    {
        true
    }

    fn validate<I>(&self, _validities: I) -> bool
    where
        I: Iterator<Item = bool>,
    {
        true
    }
}

impl Variant for OperationKind {
    fn admit(&self, current: usize, incoming: usize) -> OperationResult<()> {
        match self {
            OperationKind::And => And.admit(current, incoming),
            OperationKind::Or => Or.admit(current, incoming),
            OperationKind::Not => Not.admit(current, incoming),
            OperationKind::Null => Null.admit(current, incoming),
        }
    }

    fn clear(&self) -> OperationResult<()> {
        match self {
            OperationKind::And => And.clear(),
            OperationKind::Or => Or.clear(),
            OperationKind::Not => Not.clear(),
            OperationKind::Null => Null.clear(),
        }
    }

    fn flattens(&self) -> bool {
        match self {
            OperationKind::And => And.flattens(),
            OperationKind::Or => Or.flattens(),
            OperationKind::Not => Not.flattens(),
            OperationKind::Null => Null.flattens(),
        }
    }

    fn combine<I>(&self, results: I) -> bool
    where
        I: Iterator<Item = bool>,
    {
        match self {
            OperationKind::And => And.combine(results),
            OperationKind::Or => Or.combine(results),
            OperationKind::Not => Not.combine(results),
            OperationKind::Null => Null.combine(results),
        }
    }

    fn validate<I>(&self, validities: I) -> bool
    where
        I: Iterator<Item = bool>,
    {
        match self {
            OperationKind::And => And.validate(validities),
            OperationKind::Or => Or.validate(validities),
            OperationKind::Not => Not.validate(validities),
            OperationKind::Null => Null.validate(validities),
        }
    }

    fn negate(&self, parent: Option<bool>) -> bool {
        match self {
            OperationKind::And => And.negate(parent),
            OperationKind::Or => Or.negate(parent),
            OperationKind::Not => Not.negate(parent),
            OperationKind::Null => Null.negate(parent),
        }
    }
}
