//! Schema definitions and migration runner for the changelog table.
//!
//! Migrations are additive and numbered. Each step runs in its own
//! transaction together with the row that records it in
//! `process_changelog_schema`, so a failing step leaves the schema at the
//! last completed version and is attempted again on the next open.

use rusqlite::{params, Connection};
use tracing::info;

use changelog_contracts::error::{ChangelogError, ChangelogResult};

const MIGRATION_TABLE_DDL: &str = "
CREATE TABLE IF NOT EXISTS process_changelog_schema (
    version     INTEGER PRIMARY KEY,
    name        TEXT NOT NULL,
    applied_at  TEXT NOT NULL DEFAULT (datetime('now'))
);
";

struct Migration {
    version: u32,
    name: &'static str,
    sql: &'static str,
}

static MIGRATIONS: &[Migration] = &[
    Migration {
        version: 1,
        name: "create_changelog_table",
        sql: SCHEMA_V1,
    },
    Migration {
        version: 2,
        name: "add_templates_id",
        sql: SCHEMA_V2,
    },
    Migration {
        version: 3,
        name: "add_timestamp_and_operation_indexes",
        sql: SCHEMA_V3,
    },
];

/// The version a fully migrated database is at.
pub const LATEST_VERSION: u32 = 3;

const SCHEMA_V1: &str = "
CREATE TABLE IF NOT EXISTS process_changelog (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id     INTEGER NOT NULL DEFAULT 0,
    username    TEXT    NOT NULL DEFAULT '',
    pages_id    INTEGER NOT NULL,
    operation   TEXT    NOT NULL,
    data        TEXT,
    timestamp   TEXT    NOT NULL DEFAULT (datetime('now'))
);

CREATE INDEX IF NOT EXISTS idx_changelog_pages_id ON process_changelog(pages_id);
";

const SCHEMA_V2: &str = "
ALTER TABLE process_changelog ADD COLUMN templates_id INTEGER NOT NULL DEFAULT 0;
";

const SCHEMA_V3: &str = "
CREATE INDEX IF NOT EXISTS idx_changelog_timestamp ON process_changelog(timestamp);
CREATE INDEX IF NOT EXISTS idx_changelog_operation ON process_changelog(operation);
";

/// The highest applied version, or 0 for a fresh database.
pub fn current_version(conn: &Connection) -> ChangelogResult<u32> {
    conn.execute_batch(MIGRATION_TABLE_DDL)
        .map_err(|e| ChangelogError::Migration {
            reason: format!("failed to create schema table: {}", e),
        })?;

    conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM process_changelog_schema",
        [],
        |row| row.get(0),
    )
    .map_err(|e| ChangelogError::Migration {
        reason: format!("failed to read schema version: {}", e),
    })
}

/// Bring the schema up to `LATEST_VERSION`.
pub fn run_migrations(conn: &mut Connection) -> ChangelogResult<u32> {
    migrate_to(conn, LATEST_VERSION)
}

/// Apply every pending step up to and including `target`.
///
/// A `target` at or below the current version is a no-op; schemas are never
/// downgraded. A `target` above `LATEST_VERSION` is rejected before anything
/// runs. Returns the version the schema ends at.
pub fn migrate_to(conn: &mut Connection, target: u32) -> ChangelogResult<u32> {
    if target > LATEST_VERSION {
        return Err(ChangelogError::Migration {
            reason: format!(
                "unrecognized schema version {} (latest is {})",
                target, LATEST_VERSION
            ),
        });
    }

    let current = current_version(conn)?;

    for migration in MIGRATIONS
        .iter()
        .filter(|m| m.version > current && m.version <= target)
    {
        info!(
            version = migration.version,
            name = migration.name,
            "applying changelog migration"
        );

        let failed = |e: rusqlite::Error| ChangelogError::Migration {
            reason: format!(
                "migration v{} '{}' failed: {}",
                migration.version, migration.name, e
            ),
        };

        let tx = conn.transaction().map_err(failed)?;
        tx.execute_batch(migration.sql).map_err(failed)?;
        tx.execute(
            "INSERT INTO process_changelog_schema (version, name) VALUES (?1, ?2)",
            params![migration.version, migration.name],
        )
        .map_err(failed)?;
        tx.commit().map_err(failed)?;

        info!(version = migration.version, "changelog migration applied");
    }

    current_version(conn)
}
