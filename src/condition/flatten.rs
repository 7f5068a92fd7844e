//! Associative flattening shared by AND and OR.

use crate::condition::kind::OperationKind;
use crate::condition::operand::Operand;

/// Expand `operand` into the operands a `receiver` node should hold.
///
/// A nested operation of the receiver's own kind is replaced by copies of
/// its children, so `And(And(a, b), c)` is stored as `And(a, b, c)`. The
/// nested node may still belong to another tree and is left untouched.
/// Anything else passes through as a single operand.
pub(crate) fn flatten<C>(receiver: OperationKind, operand: Operand<C>) -> Vec<Operand<C>>
where
    C: Clone,
{
    match operand {
        Operand::Operation(child) if child.kind() == receiver => {
            log::trace!("flattening nested {} operation", receiver);
            let children = child.operands().iter().cloned().collect();
            children
        }
        operand => vec![operand],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::condition::operation::Operation;

    #[test]
    fn test_flatten_same_kind() {
        let inner: Operation<u8> =
            Operation::and([Operand::condition(1), Operand::condition(2)]).unwrap();

        let flattened = flatten(OperationKind::And, Operand::from(inner));
        assert_eq!(flattened.len(), 2);
        assert!(flattened.iter().all(|operand| operand.as_condition().is_some()));
    }

    #[test]
    fn test_flatten_other_kind_passes_through() {
        let inner: Operation<u8> =
            Operation::or([Operand::condition(1), Operand::condition(2)]).unwrap();

        let flattened = flatten(OperationKind::And, Operand::from(inner));
        assert_eq!(flattened.len(), 1);
        assert_eq!(flattened[0].kind(), Some(OperationKind::Or));
    }

    #[test]
    fn test_flatten_leaf_passes_through() {
        let flattened = flatten(OperationKind::Or, Operand::condition(7u8));
        assert_eq!(flattened.len(), 1);
        assert_eq!(flattened[0].as_condition(), Some(&7));
    }
}
