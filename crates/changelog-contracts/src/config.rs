//! Changelog configuration schema.
//!
//! Every field has a default, so an empty TOML document is a valid
//! configuration: all operations enabled, caller logging off, no retention.

use serde::{Deserialize, Serialize};

use crate::{
    error::ChangelogResult,
    operation::{Operation, OperationSet},
    retention::RetentionAge,
};

/// Page id of the trash container in a default installation.
pub const DEFAULT_TRASH_ID: u64 = 7;

/// Script path of the host's own front controller.
pub const DEFAULT_FRONT_CONTROLLER: &str = "/index.php";

/// Whether and how the triggering caller is added to the details.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CallerLogging {
    #[default]
    Disabled,
    /// Log callers other than the front controller.
    Enabled,
    /// Log every caller, including requests served by the front controller.
    All,
}

/// Settings consumed by the classifier, extractor, writer, and sweeper.
///
/// Example:
/// ```toml
/// operations = ["added", "moved", "trashed", "restored", "deleted"]
/// log_callers = "enabled"
/// data_max_age = "3 MONTH"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChangelogConfig {
    /// Operations that may be written.
    pub operations: OperationSet,

    pub log_callers: CallerLogging,

    /// Maximum record age, e.g. `"1 MONTH"`. Unset or empty disables sweeping.
    pub data_max_age: Option<String>,

    /// Page id of the trash container.
    pub trash_id: u64,

    /// Script path that counts as the host's front controller.
    pub front_controller: String,
}

impl Default for ChangelogConfig {
    fn default() -> Self {
        Self {
            operations: OperationSet::default(),
            log_callers: CallerLogging::default(),
            data_max_age: None,
            trash_id: DEFAULT_TRASH_ID,
            front_controller: DEFAULT_FRONT_CONTROLLER.to_string(),
        }
    }
}

impl ChangelogConfig {
    pub fn is_enabled(&self, operation: Operation) -> bool {
        self.operations.contains(operation)
    }

    /// Parse `data_max_age`. `None` when unset or blank.
    pub fn retention(&self) -> ChangelogResult<Option<RetentionAge>> {
        match self.data_max_age.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(age) => age.parse().map(Some),
        }
    }
}
