//! Operation nodes: operand storage, normalization, evaluation and
//! structural comparison shared by every kind.

use crate::condition::error::{OperationError, OperationResult};
use crate::condition::factory::OperationFactory;
use crate::condition::flatten::flatten;
use crate::condition::kind::OperationKind;
use crate::condition::operand::{hash_of, Operand, Predicate, Validity};
use crate::condition::variant::Variant;
use once_cell::sync::OnceCell;
use parking_lot::{MappedRwLockReadGuard, RwLock, RwLockReadGuard};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::{Arc, Weak};

/// A node of a condition tree.
///
/// Operands form a set: structurally equal operands collapse to one, and
/// they are placed by [`Operand::structural_hash`] so iteration is
/// deterministic regardless of insertion order. Mutating a child in place
/// can leave that placement out of date; deduplication and equality do not
/// depend on it.
///
/// `Clone` is a deep copy. The copy is detached from any parent, and
/// mutating it never affects the original.
pub struct Operation<C> {
    node: Arc<Node<C>>,
}

struct Node<C> {
    kind: OperationKind,
    operands: RwLock<Vec<Operand<C>>>,
    /// Enclosing operation, used only to resolve negation
    parent: RwLock<Weak<Node<C>>>,
    /// Memoized on first read and never invalidated
    negated: OnceCell<bool>,
}

impl<C> Operation<C> {
    pub(crate) fn empty(kind: OperationKind) -> Self {
        Self {
            node: Arc::new(Node {
                kind,
                operands: RwLock::new(Vec::new()),
                parent: RwLock::new(Weak::new()),
                negated: OnceCell::new(),
            }),
        }
    }

    /// The NULL operation: no condition at all
    pub fn null() -> Self {
        Self::empty(OperationKind::Null)
    }

    pub fn kind(&self) -> OperationKind {
        self.node.kind
    }

    pub fn slug(&self) -> &'static str {
        self.node.kind.slug()
    }

    /// Whether this is the NULL operation, which composing code may drop
    pub fn is_null(&self) -> bool {
        self.node.kind == OperationKind::Null
    }

    pub fn len(&self) -> usize {
        self.node.operands.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.node.operands.read().is_empty()
    }

    /// Immediate children, in structural-hash order
    pub fn operands(&self) -> MappedRwLockReadGuard<'_, [Operand<C>]> {
        RwLockReadGuard::map(self.node.operands.read(), |operands| operands.as_slice())
    }

    /// The single child of a NOT operation
    pub fn operand(&self) -> Option<MappedRwLockReadGuard<'_, Operand<C>>> {
        if self.node.kind != OperationKind::Not {
            return None;
        }
        RwLockReadGuard::try_map(self.node.operands.read(), |operands| operands.first()).ok()
    }

    /// The enclosing operation, if this node has been appended to one
    pub fn parent(&self) -> Option<Operation<C>> {
        self.node
            .parent
            .read()
            .upgrade()
            .map(|node| Operation { node })
    }

    /// Whether this node sits under an odd number of NOTs, counting itself.
    ///
    /// Computed once on first read. Re-parenting a node after that point
    /// leaves the cached value stale.
    pub fn negated(&self) -> bool {
        *self.node.negated.get_or_init(|| {
            let parent = self.parent().map(|parent| parent.negated());
            self.node.kind.negate(parent)
        })
    }

    /// Evaluate this operation against a record
    pub fn matches<R>(&self, record: &R) -> bool
    where
        C: Predicate<R>,
        R: ?Sized,
    {
        let operands = self.node.operands.read();
        self.node
            .kind
            .combine(operands.iter().map(|operand| operand.matches(record)))
    }

    pub fn is_valid(&self) -> bool
    where
        C: Validity,
    {
        let operands = self.node.operands.read();
        self.node
            .kind
            .validate(operands.iter().map(Operand::is_valid))
    }

    /// Remove every operand
    pub fn clear(&self) -> OperationResult<&Self> {
        if let Err(err) = self.node.kind.clear() {
            log::debug!("rejected clear: {}", err);
            return Err(err);
        }
        self.node.operands.write().clear();
        Ok(self)
    }

    fn set_parent(&self, parent: &Arc<Node<C>>) {
        *self.node.parent.write() = Arc::downgrade(parent);
    }

    /// Whether `node` is this operation or one of its ancestors
    fn is_self_or_ancestor(&self, node: &Arc<Node<C>>) -> bool {
        let mut current = Some(Arc::clone(&self.node));
        while let Some(candidate) = current {
            if Arc::ptr_eq(&candidate, node) {
                return true;
            }
            current = candidate.parent.read().upgrade();
        }
        false
    }

    fn check(&self, incoming: &[Operand<C>]) -> OperationResult<()> {
        let current = self.node.operands.read().len();
        self.node.kind.admit(current, incoming.len())?;

        for operand in incoming {
            if let Operand::Operation(operation) = operand {
                if self.is_self_or_ancestor(&operation.node) {
                    return Err(OperationError::InvalidOperand {
                        reason: format!(
                            "{} operation cannot contain itself or an ancestor",
                            self.node.kind
                        ),
                    });
                }
            }
        }
        Ok(())
    }
}

impl<C> Operation<C>
where
    C: Clone + Hash + Eq,
{
    /// Build an AND operation over `operands`
    pub fn and<I>(operands: I) -> OperationResult<Self>
    where
        I: IntoIterator,
        I::Item: Into<Option<Operand<C>>>,
    {
        OperationFactory::build(OperationKind::And, operands)
    }

    /// Build an OR operation over `operands`
    pub fn or<I>(operands: I) -> OperationResult<Self>
    where
        I: IntoIterator,
        I::Item: Into<Option<Operand<C>>>,
    {
        OperationFactory::build(OperationKind::Or, operands)
    }

    /// Build a NOT operation around a single operand
    pub fn not(operand: impl Into<Option<Operand<C>>>) -> OperationResult<Self> {
        OperationFactory::build(OperationKind::Not, [operand])
    }

    /// Add one operand.
    ///
    /// `None` is ignored. Appending an AND to an AND (or an OR to an OR)
    /// merges its children instead of nesting it.
    pub fn append(&self, operand: impl Into<Option<Operand<C>>>) -> OperationResult<&Self> {
        let Some(operand) = operand.into() else {
            return Ok(self);
        };
        self.merge([operand])
    }

    /// Add many operands. If any of them is rejected, none are added.
    pub fn merge<I>(&self, operands: I) -> OperationResult<&Self>
    where
        I: IntoIterator,
        I::Item: Into<Option<Operand<C>>>,
    {
        let operands: Vec<Operand<C>> = operands.into_iter().filter_map(Into::into).collect();

        if let Err(err) = self.check(&operands) {
            log::debug!(
                "rejected {} operand(s) for {} operation: {}",
                operands.len(),
                self.node.kind,
                err
            );
            return Err(err);
        }

        for operand in operands {
            if self.node.kind.flattens() {
                for operand in flatten(self.node.kind, operand) {
                    self.insert(operand);
                }
            } else {
                self.insert(operand);
            }
        }
        Ok(self)
    }

    fn insert(&self, operand: Operand<C>) {
        let key = operand.structural_hash();
        let mut operands = self.node.operands.write();

        // Children mutated in place may have moved their hash, so the order
        // is only a placement hint and duplicates are looked up linearly
        if operands.iter().any(|existing| *existing == operand) {
            log::trace!("skipping duplicate operand in {} operation", self.node.kind);
            return;
        }

        if let Operand::Operation(operation) = &operand {
            operation.set_parent(&self.node);
        }
        let position = operands.partition_point(|existing| existing.structural_hash() < key);
        operands.insert(position, operand);
    }
}

impl<C> Operation<C>
where
    C: Hash,
{
    /// Hash of the kind and the sorted hashes of the operands
    pub fn structural_hash(&self) -> u64 {
        let mut keys: Vec<u64> = self
            .node
            .operands
            .read()
            .iter()
            .map(Operand::structural_hash)
            .collect();
        keys.sort_unstable();
        hash_of(&(0u8, self.node.kind, keys))
    }
}

impl<C> PartialEq for Operation<C>
where
    C: Hash + Eq,
{
    fn eq(&self, other: &Self) -> bool {
        if Arc::ptr_eq(&self.node, &other.node) {
            return true;
        }
        if self.node.kind != other.node.kind {
            return false;
        }

        let ours = self.node.operands.read();
        let theirs = other.node.operands.read();
        ours.len() == theirs.len() && ours.iter().all(|operand| theirs.contains(operand))
    }
}

impl<C> Eq for Operation<C> where C: Hash + Eq {}

impl<C> Hash for Operation<C>
where
    C: Hash + Eq,
{
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(self.structural_hash());
    }
}

impl<C> Clone for Operation<C>
where
    C: Clone,
{
    fn clone(&self) -> Self {
        let copy = Operation::empty(self.node.kind);
        {
            let source = self.node.operands.read();
            let mut target = copy.node.operands.write();
            target.reserve(source.len());
            for operand in source.iter() {
                let operand = operand.clone();
                if let Operand::Operation(operation) = &operand {
                    operation.set_parent(&copy.node);
                }
                target.push(operand);
            }
        }
        copy
    }
}

impl<C> fmt::Debug for Operation<C>
where
    C: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Operation")
            .field("kind", &self.node.kind)
            .field("operands", &*self.node.operands.read())
            .finish()
    }
}

impl<C> fmt::Display for Operation<C>
where
    C: fmt::Display,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let operands = self.node.operands.read();

        let join = match self.node.kind {
            OperationKind::Null => return f.write_str("true"),
            OperationKind::Not => {
                return match operands.first() {
                    Some(operand) => write!(f, "!({})", operand),
                    None => f.write_str("false"),
                };
            }
            OperationKind::And => " && ",
            OperationKind::Or => " || ",
        };

        let mut operands = operands.iter();
        let Some(first) = operands.next() else {
            return match self.node.kind {
                OperationKind::Or => f.write_str("false"),
                _ => f.write_str("true"),
            };
        };

        f.write_str("(")?;
        fmt::Display::fmt(first, f)?;
        for operand in operands {
            f.write_str(join)?;
            fmt::Display::fmt(operand, f)?;
        }
        f.write_str(")")
    }
}
