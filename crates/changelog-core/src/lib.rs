//! # changelog-core
//!
//! Classification, detail extraction, and record writing for the page
//! changelog.
//!
//! This crate provides:
//! - The collaborator traits (`ChangelogStore`, `Sanitizer`, `Clock`)
//! - The `Classifier`, `DetailExtractor`, and `RecordWriter`
//! - The `Recorder` that wires them together for one lifecycle event
//! - The `RetentionSweeper`
//!
//! ## Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use changelog_core::{Recorder, TextSanitizer};
//!
//! let recorder = Recorder::new(&config, store.clone(), Arc::new(TextSanitizer::default()));
//! let outcome = recorder.record(&event, &RequestContext::new(actor));
//! ```

pub mod classifier;
pub mod clock;
pub mod extractor;
pub mod recorder;
pub mod sanitize;
pub mod sweeper;
pub mod traits;
pub mod writer;

pub use classifier::{Classification, Classifier, Suppression, Verdict};
pub use clock::{ManualClock, SystemClock};
pub use extractor::DetailExtractor;
pub use recorder::{RecordOutcome, Recorder};
pub use sanitize::TextSanitizer;
pub use sweeper::RetentionSweeper;
pub use writer::RecordWriter;

// ── Tests ─────────────────────────────────────────────────────────────────────
