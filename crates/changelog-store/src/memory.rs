//! In-memory implementation of `ChangelogStore`.
//!
//! `InMemoryStore` keeps all records in a `Vec` protected by a `Mutex`,
//! making it safe to share between the recorder and the sweeper. It behaves
//! like `SqliteStore` (ids start at 1 and only grow, timestamps come from
//! the store's clock at second precision) and is meant for tests and
//! embedding hosts that keep their own persistence.

use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{DateTime, SubsecRound, Utc};

use changelog_contracts::{
    error::{ChangelogError, ChangelogResult},
    record::{AuditRecord, NewRecord, RecordId, SubjectHistory},
};
use changelog_core::{
    traits::{ChangelogStore, Clock},
    SystemClock,
};

// ── Internal mutable state ────────────────────────────────────────────────────

struct InMemoryState {
    /// All records still stored, in insert order.
    records: Vec<AuditRecord>,

    /// The next id to assign (starts at 1, never reused).
    next_id: i64,
}

// ── Public store ──────────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct InMemoryStore {
    state: Arc<Mutex<InMemoryState>>,
    clock: Arc<dyn Clock>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        let state = InMemoryState {
            records: Vec::new(),
            next_id: 1,
        };
        Self {
            state: Arc::new(Mutex::new(state)),
            clock,
        }
    }

    pub fn len(&self) -> usize {
        self.lock().map(|state| state.records.len()).unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> ChangelogResult<MutexGuard<'_, InMemoryState>> {
        self.state.lock().map_err(|e| ChangelogError::Storage {
            reason: format!("changelog state lock poisoned: {}", e),
        })
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

// ── ChangelogStore impl ───────────────────────────────────────────────────────

impl ChangelogStore for InMemoryStore {
    fn insert(&self, record: &NewRecord) -> ChangelogResult<RecordId> {
        let timestamp = self.clock.now().trunc_subsecs(0);
        let mut state = self.lock()?;

        let id = RecordId(state.next_id);
        state.next_id += 1;
        state.records.push(AuditRecord {
            id,
            actor_id: record.actor.id,
            actor_name: record.actor.name.clone(),
            subject_id: record.subject_id,
            subject_type_id: record.subject_type_id,
            operation: record.operation,
            details: record.details.clone(),
            timestamp,
        });

        Ok(id)
    }

    fn delete_older_than(&self, cutoff: DateTime<Utc>) -> ChangelogResult<usize> {
        let cutoff = cutoff.trunc_subsecs(0);
        let mut state = self.lock()?;
        let before = state.records.len();
        state.records.retain(|record| record.timestamp >= cutoff);
        Ok(before - state.records.len())
    }

    fn history(&self, subject_id: u64) -> ChangelogResult<SubjectHistory> {
        let state = self.lock()?;
        let mut history = SubjectHistory::default();
        for record in state.records.iter().filter(|r| r.subject_id == subject_id) {
            history.count += 1;
            history.first_seen = Some(match history.first_seen {
                Some(first) => first.min(record.timestamp),
                None => record.timestamp,
            });
        }
        Ok(history)
    }

    fn records_for_subject(&self, subject_id: u64) -> ChangelogResult<Vec<AuditRecord>> {
        let state = self.lock()?;
        let mut records: Vec<AuditRecord> = state
            .records
            .iter()
            .filter(|r| r.subject_id == subject_id)
            .cloned()
            .collect();
        records.sort_by_key(|r| (r.timestamp, r.id));
        Ok(records)
    }

    fn recent(&self, limit: usize) -> ChangelogResult<Vec<AuditRecord>> {
        let state = self.lock()?;
        Ok(state.records.iter().rev().take(limit).cloned().collect())
    }
}
