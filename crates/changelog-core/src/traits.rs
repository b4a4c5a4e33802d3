//! Collaborator traits for the changelog pipeline.
//!
//! - `ChangelogStore`: the single relational table records land in
//! - `Sanitizer`: strips unsafe characters from free text
//! - `Clock`: the store's source of insert and sweep times
//!
//! The recorder and sweeper hold these behind `Arc<dyn _>` so one store can
//! be shared between the write path and the retention sweep.

use chrono::{DateTime, Utc};

use changelog_contracts::{
    error::ChangelogResult,
    record::{AuditRecord, NewRecord, RecordId, SubjectHistory},
};

/// Persistent storage for audit records.
///
/// Implementations assign `id` and `timestamp` themselves; callers never
/// supply either. Every statement must bind user-influenced values as
/// parameters.
pub trait ChangelogStore: Send + Sync {
    /// Append one record and return its storage-assigned id.
    fn insert(&self, record: &NewRecord) -> ChangelogResult<RecordId>;

    /// Delete every record with a timestamp strictly before `cutoff`.
    ///
    /// Returns the number of records deleted.
    fn delete_older_than(&self, cutoff: DateTime<Utc>) -> ChangelogResult<usize>;

    /// Count and earliest timestamp for one subject.
    ///
    /// Not filtered by the operation allow-list.
    fn history(&self, subject_id: u64) -> ChangelogResult<SubjectHistory>;

    /// All records for one subject, oldest first.
    fn records_for_subject(&self, subject_id: u64) -> ChangelogResult<Vec<AuditRecord>>;

    /// The `limit` most recent records, newest first.
    fn recent(&self, limit: usize) -> ChangelogResult<Vec<AuditRecord>>;
}

/// Cleans free text before it enters a details payload.
pub trait Sanitizer: Send + Sync {
    fn sanitize(&self, value: &str) -> String;
}

/// Source of the current time.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}
