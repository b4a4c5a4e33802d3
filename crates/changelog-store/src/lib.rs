//! # changelog-store
//!
//! Storage for page changelog records.
//!
//! ## Overview
//!
//! Records land in a single `process_changelog` table. `SqliteStore` is the
//! production implementation; it migrates the schema on open and binds every
//! value as a statement parameter. `InMemoryStore` implements the same
//! `ChangelogStore` trait for tests and embedding.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use std::{path::Path, sync::Arc};
//! use changelog_core::{Recorder, RetentionSweeper, TextSanitizer};
//! use changelog_store::SqliteStore;
//!
//! let store = Arc::new(SqliteStore::open(Path::new("changelog.db"))?);
//! let recorder = Recorder::new(&config, store.clone(), Arc::new(TextSanitizer::default()));
//! let mut sweeper = RetentionSweeper::from_config(store, &config)?;
//! ```

pub mod memory;
pub mod schema;
pub mod sqlite;

pub use memory::InMemoryStore;
pub use schema::LATEST_VERSION;
pub use sqlite::SqliteStore;

// ── Tests ─────────────────────────────────────────────────────────────────────
