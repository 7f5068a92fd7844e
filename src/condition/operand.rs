//! Operands that can be placed into an operation, and the capabilities
//! leaves may expose.

use crate::condition::kind::OperationKind;
use crate::condition::operation::Operation;
use crate::value::Value;
use std::collections::hash_map::DefaultHasher;
use std::fmt;
use std::hash::{Hash, Hasher};

/// Evaluation capability of a leaf.
///
/// Leaves that cannot check themselves against a record keep the default,
/// which treats them as satisfied.
pub trait Predicate<Record: ?Sized> {
    #[inline]
    fn matches(&self, _record: &Record) -> bool {
        true
    }
}

/// Validity capability of a leaf. Defaults to valid.
pub trait Validity {
    #[inline]
    fn is_valid(&self) -> bool {
        true
    }
}

impl<T, Record> Predicate<Record> for &T
where
    T: Predicate<Record>,
    Record: ?Sized,
{
    #[inline]
    fn matches(&self, record: &Record) -> bool {
        T::matches(self, record)
    }
}

impl<T> Validity for &T
where
    T: Validity,
{
    #[inline]
    fn is_valid(&self) -> bool {
        T::is_valid(self)
    }
}

/// A child of an operation node
#[derive(Debug, Clone)]
pub enum Operand<C> {
    /// A nested operation
    Operation(Operation<C>),
    /// A leaf predicate
    Condition(C),
    /// A raw ordered collection of values, carried through untouched
    Values(Vec<Value>),
}

impl<C> Operand<C> {
    pub fn condition(condition: C) -> Self {
        Operand::Condition(condition)
    }

    pub fn values(values: impl IntoIterator<Item = impl Into<Value>>) -> Self {
        Operand::Values(values.into_iter().map(Into::into).collect())
    }

    pub fn as_operation(&self) -> Option<&Operation<C>> {
        match self {
            Operand::Operation(operation) => Some(operation),
            _ => None,
        }
    }

    pub fn as_condition(&self) -> Option<&C> {
        match self {
            Operand::Condition(condition) => Some(condition),
            _ => None,
        }
    }

    /// Kind of the nested operation, if this operand is one
    pub fn kind(&self) -> Option<OperationKind> {
        self.as_operation().map(Operation::kind)
    }

    /// Check this operand against a record.
    ///
    /// Raw collections have no evaluation capability and always match.
    pub fn matches<R>(&self, record: &R) -> bool
    where
        C: Predicate<R>,
        R: ?Sized,
    {
        match self {
            Operand::Operation(operation) => operation.matches(record),
            Operand::Condition(condition) => condition.matches(record),
            Operand::Values(_) => true,
        }
    }

    pub fn is_valid(&self) -> bool
    where
        C: Validity,
    {
        match self {
            Operand::Operation(operation) => operation.is_valid(),
            Operand::Condition(condition) => condition.is_valid(),
            Operand::Values(_) => true,
        }
    }
}

impl<C> Operand<C>
where
    C: Hash,
{
    /// Hash key used to order and compare operand sets
    pub fn structural_hash(&self) -> u64 {
        match self {
            Operand::Operation(operation) => operation.structural_hash(),
            Operand::Condition(condition) => hash_of(&(1u8, condition)),
            Operand::Values(values) => hash_of(&(2u8, values)),
        }
    }
}

pub(crate) fn hash_of<T>(value: &T) -> u64
where
    T: Hash + ?Sized,
{
    let mut hasher = DefaultHasher::new();
    value.hash(&mut hasher);
    hasher.finish()
}

impl<C> From<Operation<C>> for Operand<C> {
    fn from(operation: Operation<C>) -> Self {
        Operand::Operation(operation)
    }
}

impl<C> From<Vec<Value>> for Operand<C> {
    fn from(values: Vec<Value>) -> Self {
        Operand::Values(values)
    }
}

impl<C> PartialEq for Operand<C>
where
    C: Hash + Eq,
{
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Operand::Operation(a), Operand::Operation(b)) => a == b,
            (Operand::Condition(a), Operand::Condition(b)) => a == b,
            (Operand::Values(a), Operand::Values(b)) => a == b,
            _ => false,
        }
    }
}

impl<C> Eq for Operand<C> where C: Hash + Eq {}

impl<C> Hash for Operand<C>
where
    C: Hash,
{
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(self.structural_hash());
    }
}

impl<C> fmt::Display for Operand<C>
where
    C: fmt::Display,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operand::Operation(operation) => fmt::Display::fmt(operation, f),
            Operand::Condition(condition) => fmt::Display::fmt(condition, f),
            Operand::Values(values) => {
                f.write_str("[")?;
                for (i, value) in values.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    fmt::Display::fmt(value, f)?;
                }
                f.write_str("]")
            }
        }
    }
}
