//! The recorder: the changelog's write path.
//!
//! The recorder runs the full pipeline for one lifecycle event:
//!
//!   Event → Classify → [Extract → Write] per recorded verdict
//!
//! It runs inside the host's own save/move/delete control flow and never
//! fails that flow: storage errors become warnings on the returned
//! `RecordOutcome` (and in the log), and nothing is retried.

use std::sync::Arc;

use tracing::{debug, warn};

use changelog_contracts::{
    config::ChangelogConfig,
    context::RequestContext,
    event::LifecycleEvent,
    operation::Operation,
    record::RecordId,
};

use crate::{
    classifier::{Classification, Classifier, Suppression, Verdict},
    extractor::DetailExtractor,
    traits::{ChangelogStore, Sanitizer},
    writer::RecordWriter,
};

/// What happened to one lifecycle event.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RecordOutcome {
    /// Records written, in verdict order (primary first).
    pub written: Vec<(Operation, RecordId)>,
    /// Verdicts that produced no record.
    pub suppressed: Vec<Suppression>,
    /// Non-fatal failures, phrased for an administrator.
    pub warnings: Vec<String>,
}

impl RecordOutcome {
    pub fn operations(&self) -> Vec<Operation> {
        self.written.iter().map(|(op, _)| *op).collect()
    }
}

/// Classifies, extracts, and writes lifecycle events.
///
/// Construct one per configuration; share it across requests. Each call to
/// `record()` takes its own `RequestContext`.
pub struct Recorder {
    classifier: Classifier,
    extractor: DetailExtractor,
    writer: RecordWriter,
}

impl Recorder {
    pub fn new(
        config: &ChangelogConfig,
        store: Arc<dyn ChangelogStore>,
        sanitizer: Arc<dyn Sanitizer>,
    ) -> Self {
        Self {
            classifier: Classifier::from_config(config),
            extractor: DetailExtractor::from_config(sanitizer, config),
            writer: RecordWriter::new(store, config.operations.clone()),
        }
    }

    pub fn classify(&self, event: &LifecycleEvent) -> Classification {
        self.classifier.classify(event)
    }

    /// Record one lifecycle event.
    ///
    /// Yields zero, one, or two records: a primary one and, for saves that
    /// change the publish state, a `published` / `unpublished` one.
    pub fn record(&self, event: &LifecycleEvent, ctx: &RequestContext) -> RecordOutcome {
        let classification = self.classifier.classify(event);
        let page = &event.page;
        let mut outcome = RecordOutcome::default();

        for verdict in std::iter::once(classification.primary).chain(classification.status) {
            let operation = match verdict {
                Verdict::Record(op) => op,
                Verdict::Suppressed(reason) => {
                    debug!(
                        request_id = %ctx.request_id,
                        page_id = page.id,
                        method = %event.method,
                        reason = ?reason,
                        "lifecycle event suppressed"
                    );
                    outcome.suppressed.push(reason);
                    continue;
                }
            };

            let details = self.extractor.extract(operation, event, ctx);

            match self
                .writer
                .write(operation, page.id, page.template.id, &ctx.actor, &details)
            {
                Ok(id) => outcome.written.push((operation, id)),
                Err(e) => {
                    warn!(
                        request_id = %ctx.request_id,
                        page_id = page.id,
                        operation = %operation,
                        error = %e,
                        "changelog record not written"
                    );
                    outcome.warnings.push(format!(
                        "could not log '{}' for page {}: {}",
                        operation, page.id, e
                    ));
                }
            }
        }

        outcome
    }
}
