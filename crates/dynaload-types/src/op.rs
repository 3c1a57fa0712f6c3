//! Write operations handed to a table store.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::key::PrimaryKey;
use crate::value::TypedItem;

/// Whether a run writes items or deletes them by key.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadMode {
    #[default]
    Insert,
    Delete,
}

impl LoadMode {
    /// Verb used in run summaries ("inserted" / "deleted").
    #[must_use]
    pub fn past_tense(self) -> &'static str {
        match self {
            Self::Insert => "inserted",
            Self::Delete => "deleted",
        }
    }
}

impl fmt::Display for LoadMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Insert => f.write_str("insert"),
            Self::Delete => f.write_str("delete"),
        }
    }
}

/// A single put or delete request.
#[derive(Debug, Clone, PartialEq)]
pub enum WriteOp {
    Put(TypedItem),
    Delete(PrimaryKey),
}

impl WriteOp {
    #[must_use]
    pub fn is_delete(&self) -> bool {
        matches!(self, Self::Delete(_))
    }
}
