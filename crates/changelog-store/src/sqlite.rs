//! SQLite-backed `ChangelogStore`.
//!
//! One connection behind a `Mutex`, so the store can be shared between the
//! recorder and the sweeper. Every statement binds its values as
//! parameters. Timestamps are stored as `YYYY-MM-DD HH:MM:SS` UTC text, the
//! same format as the column default, so they compare correctly as strings.

use std::{
    path::Path,
    sync::{Arc, Mutex, MutexGuard},
};

use chrono::{DateTime, NaiveDateTime, Utc};
use rusqlite::{params, Connection, Row};
use tracing::{debug, info};

use changelog_contracts::{
    error::{ChangelogError, ChangelogResult},
    record::{AuditRecord, NewRecord, RecordId, SubjectHistory},
};
use changelog_core::{
    traits::{ChangelogStore, Clock},
    SystemClock,
};

use crate::schema;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

const SELECT_RECORD: &str = "
SELECT id, user_id, username, pages_id, templates_id, operation, data, timestamp
FROM process_changelog";

fn storage_err(e: rusqlite::Error) -> ChangelogError {
    ChangelogError::Storage {
        reason: e.to_string(),
    }
}

pub(crate) fn format_timestamp(ts: DateTime<Utc>) -> String {
    ts.format(TIMESTAMP_FORMAT).to_string()
}

pub(crate) fn parse_timestamp(text: &str) -> ChangelogResult<DateTime<Utc>> {
    NaiveDateTime::parse_from_str(text, TIMESTAMP_FORMAT)
        .map(|naive| naive.and_utc())
        .map_err(|e| ChangelogError::Storage {
            reason: format!("unreadable timestamp '{}': {}", text, e),
        })
}

fn to_sql_id(value: u64, column: &str) -> ChangelogResult<i64> {
    i64::try_from(value).map_err(|_| ChangelogError::InvalidRecord {
        reason: format!("{} {} is out of range", column, value),
    })
}

/// A row as SQLite returns it, before type checks.
struct RawRecord {
    id: i64,
    user_id: i64,
    username: String,
    pages_id: i64,
    templates_id: i64,
    operation: String,
    data: Option<String>,
    timestamp: String,
}

impl RawRecord {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            user_id: row.get(1)?,
            username: row.get(2)?,
            pages_id: row.get(3)?,
            templates_id: row.get(4)?,
            operation: row.get(5)?,
            data: row.get(6)?,
            timestamp: row.get(7)?,
        })
    }

    fn into_record(self) -> ChangelogResult<AuditRecord> {
        let unsigned = |value: i64, column: &str| {
            u64::try_from(value).map_err(|_| ChangelogError::Storage {
                reason: format!("row {} has negative {}", self.id, column),
            })
        };

        Ok(AuditRecord {
            id: RecordId(self.id),
            actor_id: unsigned(self.user_id, "user_id")?,
            actor_name: self.username,
            subject_id: unsigned(self.pages_id, "pages_id")?,
            subject_type_id: unsigned(self.templates_id, "templates_id")?,
            operation: self.operation.parse()?,
            details: self.data,
            timestamp: parse_timestamp(&self.timestamp)?,
        })
    }
}

pub struct SqliteStore {
    conn: Mutex<Connection>,
    clock: Arc<dyn Clock>,
}

impl SqliteStore {
    /// Open (or create) the database at `path` and migrate it to the latest
    /// schema version.
    pub fn open(path: &Path) -> ChangelogResult<Self> {
        let store = Self::open_unmigrated(path)?;
        store.migrate()?;
        Ok(store)
    }

    /// Open an in-memory database at the latest schema version.
    pub fn open_in_memory() -> ChangelogResult<Self> {
        let conn = Connection::open_in_memory().map_err(storage_err)?;
        let store = Self::from_connection(conn);
        store.migrate()?;
        Ok(store)
    }

    /// Open the database at `path` without touching its schema.
    pub fn open_unmigrated(path: &Path) -> ChangelogResult<Self> {
        let conn = Connection::open(path).map_err(storage_err)?;
        conn.execute_batch("PRAGMA journal_mode = WAL;")
            .map_err(storage_err)?;
        debug!(path = %path.display(), "changelog database opened");
        Ok(Self::from_connection(conn))
    }

    fn from_connection(conn: Connection) -> Self {
        Self {
            conn: Mutex::new(conn),
            clock: Arc::new(SystemClock),
        }
    }

    /// Replace the clock used to stamp inserted records.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    fn lock(&self) -> ChangelogResult<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|e| ChangelogError::Storage {
            reason: format!("changelog connection lock poisoned: {}", e),
        })
    }

    pub fn schema_version(&self) -> ChangelogResult<u32> {
        let conn = self.lock()?;
        schema::current_version(&conn)
    }

    /// Apply all pending migrations. Returns the resulting version.
    pub fn migrate(&self) -> ChangelogResult<u32> {
        let mut conn = self.lock()?;
        schema::run_migrations(&mut conn)
    }

    /// Apply pending migrations up to `target`.
    pub fn migrate_to(&self, target: u32) -> ChangelogResult<u32> {
        let mut conn = self.lock()?;
        schema::migrate_to(&mut conn, target)
    }

    fn query_records(
        &self,
        sql: &str,
        params: impl rusqlite::Params,
    ) -> ChangelogResult<Vec<AuditRecord>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(sql).map_err(storage_err)?;
        let rows = stmt
            .query_map(params, RawRecord::from_row)
            .map_err(storage_err)?;

        let mut records = Vec::new();
        for row in rows {
            records.push(row.map_err(storage_err)?.into_record()?);
        }
        Ok(records)
    }
}

impl ChangelogStore for SqliteStore {
    fn insert(&self, record: &NewRecord) -> ChangelogResult<RecordId> {
        let timestamp = format_timestamp(self.clock.now());
        let conn = self.lock()?;

        conn.execute(
            "INSERT INTO process_changelog
                 (user_id, username, pages_id, templates_id, operation, data, timestamp)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                to_sql_id(record.actor.id, "user_id")?,
                record.actor.name,
                to_sql_id(record.subject_id, "pages_id")?,
                to_sql_id(record.subject_type_id, "templates_id")?,
                record.operation.as_str(),
                record.details,
                timestamp,
            ],
        )
        .map_err(storage_err)?;

        Ok(RecordId(conn.last_insert_rowid()))
    }

    fn delete_older_than(&self, cutoff: DateTime<Utc>) -> ChangelogResult<usize> {
        let conn = self.lock()?;
        let deleted = conn
            .execute(
                "DELETE FROM process_changelog WHERE timestamp < ?1",
                params![format_timestamp(cutoff)],
            )
            .map_err(storage_err)?;

        info!(cutoff = %cutoff, deleted, "expired changelog records deleted");
        Ok(deleted)
    }

    fn history(&self, subject_id: u64) -> ChangelogResult<SubjectHistory> {
        let conn = self.lock()?;
        let (count, first): (i64, Option<String>) = conn
            .query_row(
                "SELECT COUNT(*), MIN(timestamp) FROM process_changelog WHERE pages_id = ?1",
                params![to_sql_id(subject_id, "pages_id")?],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .map_err(storage_err)?;

        Ok(SubjectHistory {
            count: u64::try_from(count).unwrap_or_default(),
            first_seen: first.as_deref().map(parse_timestamp).transpose()?,
        })
    }

    fn records_for_subject(&self, subject_id: u64) -> ChangelogResult<Vec<AuditRecord>> {
        self.query_records(
            &format!("{} WHERE pages_id = ?1 ORDER BY timestamp ASC, id ASC", SELECT_RECORD),
            params![to_sql_id(subject_id, "pages_id")?],
        )
    }

    fn recent(&self, limit: usize) -> ChangelogResult<Vec<AuditRecord>> {
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        self.query_records(
            &format!("{} ORDER BY id DESC LIMIT ?1", SELECT_RECORD),
            params![limit],
        )
    }
}
