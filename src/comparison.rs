//! Field comparisons: the leaf predicates of a condition tree.

use crate::condition::{Predicate, Validity};
use crate::record::Record;
use crate::value::Value;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ComparisonError {
    #[error("Unknown comparison operator: {0}")]
    UnknownOperator(String),
}

/// Comparison operators supported by leaf predicates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComparisonOperator {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

impl ComparisonOperator {
    pub const ALL: [ComparisonOperator; 6] = [
        ComparisonOperator::Eq,
        ComparisonOperator::Ne,
        ComparisonOperator::Lt,
        ComparisonOperator::Le,
        ComparisonOperator::Gt,
        ComparisonOperator::Ge,
    ];

    /// Get the display string for this operator
    pub fn as_str(&self) -> &'static str {
        match self {
            ComparisonOperator::Eq => "=",
            ComparisonOperator::Ne => "!=",
            ComparisonOperator::Lt => "<",
            ComparisonOperator::Le => "<=",
            ComparisonOperator::Gt => ">",
            ComparisonOperator::Ge => ">=",
        }
    }

    /// Whether this operator orders values rather than testing equality
    pub fn is_ordering(&self) -> bool {
        !matches!(self, ComparisonOperator::Eq | ComparisonOperator::Ne)
    }

    fn holds(&self, ordering: Ordering) -> bool {
        match self {
            ComparisonOperator::Eq => ordering == Ordering::Equal,
            ComparisonOperator::Ne => ordering != Ordering::Equal,
            ComparisonOperator::Lt => ordering == Ordering::Less,
            ComparisonOperator::Le => ordering != Ordering::Greater,
            ComparisonOperator::Gt => ordering == Ordering::Greater,
            ComparisonOperator::Ge => ordering != Ordering::Less,
        }
    }
}

impl FromStr for ComparisonOperator {
    type Err = ComparisonError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "=" | "==" | "eq" => Ok(ComparisonOperator::Eq),
            "!=" | "<>" | "ne" => Ok(ComparisonOperator::Ne),
            "<" | "lt" => Ok(ComparisonOperator::Lt),
            "<=" | "le" => Ok(ComparisonOperator::Le),
            ">" | "gt" => Ok(ComparisonOperator::Gt),
            ">=" | "ge" => Ok(ComparisonOperator::Ge),
            other => Err(ComparisonError::UnknownOperator(other.to_string())),
        }
    }
}

impl fmt::Display for ComparisonOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Compares one record field against a fixed value
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Comparison {
    pub field: String,
    pub operator: ComparisonOperator,
    pub value: Value,
}

impl Comparison {
    pub fn new(
        field: impl Into<String>,
        operator: ComparisonOperator,
        value: impl Into<Value>,
    ) -> Self {
        Self {
            field: field.into(),
            operator,
            value: value.into(),
        }
    }

    pub fn eq(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::new(field, ComparisonOperator::Eq, value)
    }

    pub fn ne(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::new(field, ComparisonOperator::Ne, value)
    }

    pub fn lt(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::new(field, ComparisonOperator::Lt, value)
    }

    pub fn le(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::new(field, ComparisonOperator::Le, value)
    }

    pub fn gt(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::new(field, ComparisonOperator::Gt, value)
    }

    pub fn ge(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::new(field, ComparisonOperator::Ge, value)
    }
}

impl Predicate<Record> for Comparison {
    fn matches(&self, record: &Record) -> bool {
        let actual = record.get(&self.field);
        match self.operator {
            // NULL equals NULL here, so `status = NULL` finds missing fields
            ComparisonOperator::Eq => *actual == self.value,
            ComparisonOperator::Ne => *actual != self.value,
            operator => actual
                .compare(&self.value)
                .is_some_and(|ordering| operator.holds(ordering)),
        }
    }
}

impl Validity for Comparison {
    /// A comparison needs a field name, and ordering needs a non-NULL bound
    fn is_valid(&self) -> bool {
        !self.field.is_empty() && !(self.operator.is_ordering() && self.value.is_null())
    }
}

impl fmt::Display for Comparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.field, self.operator, self.value)
    }
}
