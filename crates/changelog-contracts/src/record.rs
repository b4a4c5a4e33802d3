//! Audit records: what the writer hands to storage and what storage returns.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{details::Details, operation::Operation};

/// Storage-assigned surrogate key of a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(pub i64);

/// Whoever triggered the event.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    pub id: u64,
    pub name: String,
}

impl Actor {
    pub fn new(id: u64, name: impl Into<String>) -> Self {
        Self { id, name: name.into() }
    }

    /// The actor for system-triggered events: id 0, empty name.
    pub fn system() -> Self {
        Self::default()
    }
}

/// A record ready to be inserted.
///
/// Carries no id and no timestamp: both are assigned by the store.
/// `details` is already encoded; `None` is stored as SQL `NULL`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRecord {
    pub actor: Actor,
    pub subject_id: u64,
    pub subject_type_id: u64,
    pub operation: Operation,
    pub details: Option<String>,
}

/// A persisted audit record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditRecord {
    pub id: RecordId,
    pub actor_id: u64,
    pub actor_name: String,
    pub subject_id: u64,
    /// Zero for rows written before the template column existed.
    pub subject_type_id: u64,
    pub operation: Operation,
    /// Encoded details payload; `None` when no details were collected.
    pub details: Option<String>,
    pub timestamp: DateTime<Utc>,
}

impl AuditRecord {
    /// Decode the stored details payload.
    pub fn details(&self) -> crate::error::ChangelogResult<Details> {
        Details::decode(self.details.as_deref())
    }
}

/// Summary of a subject's history, as shown by an edit-history panel.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubjectHistory {
    pub count: u64,
    /// Timestamp of the earliest stored record, if any.
    pub first_seen: Option<DateTime<Utc>>,
}
