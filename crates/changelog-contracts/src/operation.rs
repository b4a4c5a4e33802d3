//! Operation labels and the configured allow-list.
//!
//! `Operation` is the canonical audit label assigned to a classified
//! lifecycle event. `OperationSet` is the allow-list that decides which
//! labels may be written.

use std::{collections::BTreeSet, fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::ChangelogError;

/// One of the nine canonical audit labels.
///
/// Stored as the lowercase label in the `operation` column and written the
/// same way in TOML configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    Added,
    Moved,
    Edited,
    Trashed,
    Renamed,
    Deleted,
    Restored,
    Published,
    Unpublished,
}

impl Operation {
    /// Every label, in the order they appear in configuration defaults.
    pub const ALL: [Operation; 9] = [
        Operation::Added,
        Operation::Moved,
        Operation::Edited,
        Operation::Trashed,
        Operation::Renamed,
        Operation::Deleted,
        Operation::Restored,
        Operation::Published,
        Operation::Unpublished,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Added => "added",
            Operation::Moved => "moved",
            Operation::Edited => "edited",
            Operation::Trashed => "trashed",
            Operation::Renamed => "renamed",
            Operation::Deleted => "deleted",
            Operation::Restored => "restored",
            Operation::Published => "published",
            Operation::Unpublished => "unpublished",
        }
    }

    /// The status transition label for a publish-state change.
    pub fn for_status(published: bool) -> Self {
        if published {
            Operation::Published
        } else {
            Operation::Unpublished
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Operation {
    type Err = ChangelogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Operation::ALL
            .into_iter()
            .find(|op| op.as_str() == s)
            .ok_or_else(|| ChangelogError::UnknownOperation {
                operation: s.to_string(),
            })
    }
}

/// The set of operations that may be written.
///
/// Disabling an operation only stops new records of that label; rows already
/// stored are untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OperationSet(BTreeSet<Operation>);

impl OperationSet {
    /// An allow-list with nothing enabled.
    pub fn empty() -> Self {
        Self(BTreeSet::new())
    }

    pub fn enable(&mut self, operation: Operation) {
        self.0.insert(operation);
    }

    pub fn disable(&mut self, operation: Operation) {
        self.0.remove(&operation);
    }

    pub fn contains(&self, operation: Operation) -> bool {
        self.0.contains(&operation)
    }

    pub fn iter(&self) -> impl Iterator<Item = Operation> + '_ {
        self.0.iter().copied()
    }
}

impl Default for OperationSet {
    /// All nine operations enabled.
    fn default() -> Self {
        Operation::ALL.into_iter().collect()
    }
}

impl FromIterator<Operation> for OperationSet {
    fn from_iter<I: IntoIterator<Item = Operation>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
