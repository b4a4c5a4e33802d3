//! Error types for the changelog pipeline.
//!
//! All fallible operations in the changelog crates return
//! `ChangelogResult<T>`. Variants carry enough context to produce an
//! actionable warning for an administrator.

use thiserror::Error;

/// The unified error type for the changelog crates.
#[derive(Debug, Error)]
pub enum ChangelogError {
    /// An operation label is not one of the nine known labels, or is not in
    /// the configured allow-list at write time.
    #[error("unknown operation '{operation}'")]
    UnknownOperation { operation: String },

    /// A lifecycle event could not be interpreted (e.g. an unknown method).
    #[error("invalid lifecycle event: {reason}")]
    InvalidEvent { reason: String },

    /// A record was rejected before reaching storage.
    #[error("invalid record: {reason}")]
    InvalidRecord { reason: String },

    /// The store failed to insert, delete, or read records.
    ///
    /// Non-fatal on the write path: the recorder logs it as a warning and the
    /// triggering lifecycle action proceeds.
    #[error("storage error: {reason}")]
    Storage { reason: String },

    /// A schema migration step failed or an unknown version was requested.
    ///
    /// Fatal: the schema stays at its last completed version.
    #[error("schema migration failed: {reason}")]
    Migration { reason: String },

    /// The details payload could not be encoded or decoded.
    #[error("details encoding error: {reason}")]
    Encoding { reason: String },

    /// A configuration value is missing or invalid.
    #[error("configuration error: {reason}")]
    ConfigError { reason: String },
}

/// Convenience alias used throughout the changelog crates.
pub type ChangelogResult<T> = Result<T, ChangelogError>;
