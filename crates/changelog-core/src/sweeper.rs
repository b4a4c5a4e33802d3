//! The retention sweeper.
//!
//! Deletes records older than the configured maximum age. The host drives it
//! from a recurring timer by calling `run_if_due()`; the sweeper makes sure a
//! pass runs at most once per interval. It shares the store with the write
//! path but does not coordinate with it: a record written during a pass may
//! or may not be swept by that pass.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use tracing::{debug, info, warn};

use changelog_contracts::{
    config::ChangelogConfig,
    error::{ChangelogError, ChangelogResult},
    retention::RetentionAge,
};

use crate::traits::ChangelogStore;

/// How often `run_if_due()` lets a pass through.
pub const SWEEP_INTERVAL_HOURS: i64 = 24;

pub struct RetentionSweeper {
    store: Arc<dyn ChangelogStore>,
    max_age: Option<RetentionAge>,
    interval: Duration,
    last_run: Option<DateTime<Utc>>,
}

impl RetentionSweeper {
    pub fn new(store: Arc<dyn ChangelogStore>, max_age: Option<RetentionAge>) -> Self {
        Self {
            store,
            max_age,
            interval: Duration::hours(SWEEP_INTERVAL_HOURS),
            last_run: None,
        }
    }

    /// Build from configuration. Fails when `data_max_age` does not parse.
    pub fn from_config(
        store: Arc<dyn ChangelogStore>,
        config: &ChangelogConfig,
    ) -> ChangelogResult<Self> {
        Ok(Self::new(store, config.retention()?))
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub fn max_age(&self) -> Option<RetentionAge> {
        self.max_age
    }

    pub fn last_run(&self) -> Option<DateTime<Utc>> {
        self.last_run
    }

    /// Delete every record older than `now - max_age`.
    ///
    /// Returns 0 without touching the store when no max age is configured.
    pub fn sweep(&self, now: DateTime<Utc>) -> ChangelogResult<usize> {
        let Some(max_age) = self.max_age else {
            debug!("no retention age configured; sweep skipped");
            return Ok(0);
        };

        let cutoff = max_age.cutoff(now).ok_or_else(|| ChangelogError::ConfigError {
            reason: format!("retention age '{}' is out of range", max_age),
        })?;

        let deleted = self.store.delete_older_than(cutoff)?;

        info!(
            max_age = %max_age,
            cutoff = %cutoff,
            deleted,
            "changelog retention sweep finished"
        );

        Ok(deleted)
    }

    /// Run a pass if at least one interval has passed since the last one.
    ///
    /// Returns `None` when no pass was due. A failed pass is logged and
    /// counts as a run, so it is not retried before the next interval.
    pub fn run_if_due(&mut self, now: DateTime<Utc>) -> Option<ChangelogResult<usize>> {
        if let Some(last) = self.last_run {
            if now - last < self.interval {
                return None;
            }
        }

        self.last_run = Some(now);
        let result = self.sweep(now);
        if let Err(e) = &result {
            warn!(error = %e, "changelog retention sweep failed");
        }
        Some(result)
    }
}
