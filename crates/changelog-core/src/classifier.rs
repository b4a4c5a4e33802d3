//! The event classifier: raw lifecycle event → operation label(s).
//!
//! Classification runs in two independent passes:
//!
//! 1. **Primary**: dispatch on the lifecycle method, then refine:
//!    `saveReady` becomes `edited` only for saved pages with no reported
//!    previous parent and at least one changed field; `moved` becomes
//!    `trashed` or `restored` at the trash boundary; `renamed` at the trash
//!    boundary is dropped because `moved` already covers it.
//! 2. **Status**: for `saveReady` only, a publish-state change yields a
//!    separate `published` / `unpublished` verdict, whether or not the
//!    primary verdict was suppressed.
//!
//! Repeated `saveReady` notifications for a page being created are told
//! apart by page state (zero id, or a pending parent change), not by
//! remembering which pages were already seen. Both passes finish with the
//! operation allow-list.

use tracing::debug;

use changelog_contracts::{
    config::ChangelogConfig,
    event::{LifecycleEvent, LifecycleMethod, PageSnapshot},
    operation::{Operation, OperationSet},
};

/// Why an event produced no record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Suppression {
    /// Repeater item page or admin page.
    ExcludedKind,
    /// `saveReady` for a page that has no id yet.
    NotYetSaved,
    /// `saveReady` while the parent changes; `moved` reports it.
    ParentChanging,
    /// `saveReady` with no changed field.
    NoFieldChanges,
    /// `renamed` into or out of the trash; `moved` reports it.
    TrashRename,
    /// The operation is not in the allow-list.
    Disabled(Operation),
}

/// Outcome of one classification pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Record(Operation),
    Suppressed(Suppression),
}

impl Verdict {
    pub fn operation(&self) -> Option<Operation> {
        match self {
            Verdict::Record(op) => Some(*op),
            Verdict::Suppressed(_) => None,
        }
    }
}

/// Both verdicts for one lifecycle event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    pub primary: Verdict,
    /// Present only when the event changed the publish state.
    pub status: Option<Verdict>,
}

impl Classification {
    /// Operations to record, primary first.
    pub fn operations(&self) -> impl Iterator<Item = Operation> + '_ {
        std::iter::once(self.primary)
            .chain(self.status)
            .filter_map(|verdict| verdict.operation())
    }

    pub fn is_suppressed(&self) -> bool {
        self.operations().next().is_none()
    }
}

/// Classifies lifecycle events against an allow-list and a trash container.
#[derive(Debug, Clone)]
pub struct Classifier {
    operations: OperationSet,
    trash_id: u64,
}

impl Classifier {
    pub fn new(operations: OperationSet, trash_id: u64) -> Self {
        Self { operations, trash_id }
    }

    pub fn from_config(config: &ChangelogConfig) -> Self {
        Self::new(config.operations.clone(), config.trash_id)
    }

    pub fn classify(&self, event: &LifecycleEvent) -> Classification {
        let page = &event.page;

        if page.kind.is_excluded() {
            debug!(page_id = page.id, kind = ?page.kind, "excluded page kind");
            return Classification {
                primary: Verdict::Suppressed(Suppression::ExcludedKind),
                status: None,
            };
        }

        let primary = match event.method {
            LifecycleMethod::Added => Verdict::Record(Operation::Added),
            LifecycleMethod::Deleted => Verdict::Record(Operation::Deleted),
            LifecycleMethod::Moved => Verdict::Record(self.classify_move(page)),
            LifecycleMethod::Renamed => self.classify_rename(page),
            LifecycleMethod::SaveReady => classify_save(page),
        };

        let status = match event.method {
            LifecycleMethod::SaveReady if page.id != 0 => page
                .status_change()
                .map(|published| Verdict::Record(Operation::for_status(published))),
            _ => None,
        };

        let classification = Classification {
            primary: self.allow(primary),
            status: status.map(|verdict| self.allow(verdict)),
        };

        debug!(
            page_id = page.id,
            method = %event.method,
            primary = ?classification.primary,
            status = ?classification.status,
            "lifecycle event classified"
        );

        classification
    }

    fn classify_move(&self, page: &PageSnapshot) -> Operation {
        if page.parent.id == self.trash_id {
            Operation::Trashed
        } else if self.was_in_trash(page) {
            Operation::Restored
        } else {
            Operation::Moved
        }
    }

    fn classify_rename(&self, page: &PageSnapshot) -> Verdict {
        if page.parent.id == self.trash_id || self.was_in_trash(page) {
            Verdict::Suppressed(Suppression::TrashRename)
        } else {
            Verdict::Record(Operation::Renamed)
        }
    }

    fn was_in_trash(&self, page: &PageSnapshot) -> bool {
        page.previous_parent
            .as_ref()
            .is_some_and(|previous| previous.id == self.trash_id)
    }

    fn allow(&self, verdict: Verdict) -> Verdict {
        match verdict {
            Verdict::Record(op) if !self.operations.contains(op) => {
                Verdict::Suppressed(Suppression::Disabled(op))
            }
            other => other,
        }
    }
}

fn classify_save(page: &PageSnapshot) -> Verdict {
    if page.id == 0 {
        Verdict::Suppressed(Suppression::NotYetSaved)
    } else if page.parent_changing() {
        Verdict::Suppressed(Suppression::ParentChanging)
    } else if page.changed_fields().is_empty() {
        Verdict::Suppressed(Suppression::NoFieldChanges)
    } else {
        Verdict::Record(Operation::Edited)
    }
}
