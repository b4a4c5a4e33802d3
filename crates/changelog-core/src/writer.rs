//! The record writer: validates, encodes, and persists one audit record.

use std::sync::Arc;

use tracing::info;

use changelog_contracts::{
    details::Details,
    error::{ChangelogError, ChangelogResult},
    operation::{Operation, OperationSet},
    record::{Actor, NewRecord, RecordId},
};

use crate::traits::ChangelogStore;

pub struct RecordWriter {
    store: Arc<dyn ChangelogStore>,
    operations: OperationSet,
}

impl RecordWriter {
    pub fn new(store: Arc<dyn ChangelogStore>, operations: OperationSet) -> Self {
        Self { store, operations }
    }

    /// Persist one record.
    ///
    /// Rejected before any storage access when `operation` is not in the
    /// allow-list (`UnknownOperation`) or `subject_id` is 0
    /// (`InvalidRecord`). Storage failures come back as `Storage`; the
    /// caller decides whether they are fatal.
    pub fn write(
        &self,
        operation: Operation,
        subject_id: u64,
        subject_type_id: u64,
        actor: &Actor,
        details: &Details,
    ) -> ChangelogResult<RecordId> {
        if !self.operations.contains(operation) {
            return Err(ChangelogError::UnknownOperation {
                operation: operation.to_string(),
            });
        }
        if subject_id == 0 {
            return Err(ChangelogError::InvalidRecord {
                reason: format!("'{}' record has no subject id", operation),
            });
        }

        let record = NewRecord {
            actor: actor.clone(),
            subject_id,
            subject_type_id,
            operation,
            details: details.encode()?,
        };

        let id = self.store.insert(&record)?;

        info!(
            record_id = id.0,
            page_id = subject_id,
            operation = %operation,
            user_id = actor.id,
            "changelog record written"
        );

        Ok(id)
    }
}
