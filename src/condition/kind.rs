//! The closed set of operation kinds and their slugs.

use crate::condition::error::OperationError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Which boolean operation a node performs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OperationKind {
    And,
    Or,
    Not,
    Null,
}

impl OperationKind {
    pub const ALL: [OperationKind; 4] = [
        OperationKind::And,
        OperationKind::Or,
        OperationKind::Not,
        OperationKind::Null,
    ];

    /// Get the slug this kind is registered under
    pub fn slug(&self) -> &'static str {
        match self {
            OperationKind::And => "and",
            OperationKind::Or => "or",
            OperationKind::Not => "not",
            OperationKind::Null => "null",
        }
    }

    /// Maximum number of operands a node of this kind may hold
    pub fn max_operands(&self) -> Option<usize> {
        match self {
            OperationKind::And | OperationKind::Or => None,
            OperationKind::Not => Some(1),
            OperationKind::Null => Some(0),
        }
    }
}

impl FromStr for OperationKind {
    type Err = OperationError;

    fn from_str(slug: &str) -> Result<Self, Self::Err> {
        OperationKind::ALL
            .into_iter()
            .find(|kind| kind.slug() == slug)
            .ok_or_else(|| OperationError::UnknownKind {
                slug: slug.to_string(),
            })
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}
