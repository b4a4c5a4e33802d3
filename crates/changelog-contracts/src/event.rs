//! Lifecycle events and page snapshots.
//!
//! A host adapter builds one `LifecycleEvent` per lifecycle notification.
//! The event lives for a single classification and extraction pass and is
//! never stored as-is.

use std::{collections::BTreeSet, fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::ChangelogError;

/// The lifecycle hook that fired.
///
/// This is the complete dispatch table: each variant maps to exactly one
/// classifier entry point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LifecycleMethod {
    #[serde(rename = "added")]
    Added,
    #[serde(rename = "moved")]
    Moved,
    #[serde(rename = "renamed")]
    Renamed,
    #[serde(rename = "deleted")]
    Deleted,
    /// Fires on every save, including the first save of a new page.
    #[serde(rename = "saveReady")]
    SaveReady,
}

impl LifecycleMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            LifecycleMethod::Added => "added",
            LifecycleMethod::Moved => "moved",
            LifecycleMethod::Renamed => "renamed",
            LifecycleMethod::Deleted => "deleted",
            LifecycleMethod::SaveReady => "saveReady",
        }
    }
}

impl fmt::Display for LifecycleMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LifecycleMethod {
    type Err = ChangelogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "added" => Ok(LifecycleMethod::Added),
            "moved" => Ok(LifecycleMethod::Moved),
            "renamed" => Ok(LifecycleMethod::Renamed),
            "deleted" => Ok(LifecycleMethod::Deleted),
            "saveReady" => Ok(LifecycleMethod::SaveReady),
            other => Err(ChangelogError::InvalidEvent {
                reason: format!("unknown lifecycle method '{}'", other),
            }),
        }
    }
}

/// What sort of page the snapshot describes.
///
/// Repeater item pages and admin pages are never audited.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageKind {
    #[default]
    Standard,
    /// A sub-page holding one item of a repeating field.
    Repeater,
    /// A page of the administrative interface.
    Admin,
}

impl PageKind {
    pub fn is_excluded(&self) -> bool {
        matches!(self, PageKind::Repeater | PageKind::Admin)
    }
}

/// A reference to a parent page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRef {
    pub id: u64,
    /// Path of the page, with a trailing slash (e.g. `/section/`).
    pub url: String,
}

impl PageRef {
    pub fn new(id: u64, url: impl Into<String>) -> Self {
        Self { id, url: url.into() }
    }
}

/// A reference to a page's template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateRef {
    pub id: u64,
    pub name: String,
}

impl TemplateRef {
    pub fn new(id: u64, name: impl Into<String>) -> Self {
        Self { id, name: name.into() }
    }
}

/// The subject's state at the time the hook fired.
///
/// `previous_*` fields are present only when the host tracked a pending
/// change to that value during the current operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageSnapshot {
    /// Zero while the page is still being created.
    pub id: u64,
    #[serde(default)]
    pub kind: PageKind,
    #[serde(default)]
    pub title: String,
    pub name: String,
    #[serde(default)]
    pub previous_name: Option<String>,
    pub parent: PageRef,
    #[serde(default)]
    pub previous_parent: Option<PageRef>,
    pub template: TemplateRef,
    #[serde(default)]
    pub previous_template: Option<TemplateRef>,
    pub published: bool,
    #[serde(default)]
    pub previous_published: Option<bool>,
    pub url: String,
    /// Field names defined by the template, in template order.
    #[serde(default)]
    pub fields: Vec<String>,
    /// Names of fields with a pending change.
    #[serde(default)]
    pub changed: BTreeSet<String>,
}

impl PageSnapshot {
    /// A published standard page with no pending changes.
    pub fn new(
        id: u64,
        name: impl Into<String>,
        parent: PageRef,
        template: TemplateRef,
    ) -> Self {
        let name = name.into();
        let url = format!("{}{}/", with_trailing_slash(&parent.url), name);
        Self {
            id,
            kind: PageKind::Standard,
            title: String::new(),
            name,
            previous_name: None,
            parent,
            previous_parent: None,
            template,
            previous_template: None,
            published: true,
            previous_published: None,
            url,
            fields: Vec::new(),
            changed: BTreeSet::new(),
        }
    }

    /// True when the host reports a previous parent, i.e. a move is in
    /// flight and `moved` will describe it.
    pub fn parent_changing(&self) -> bool {
        self.previous_parent.is_some()
    }

    /// The previous name, when it differs from the current one.
    pub fn renamed_from(&self) -> Option<&str> {
        self.previous_name
            .as_deref()
            .filter(|previous| *previous != self.name)
    }

    /// The previous template, when it differs from the current one.
    pub fn template_changed_from(&self) -> Option<&TemplateRef> {
        self.previous_template
            .as_ref()
            .filter(|previous| previous.id != self.template.id)
    }

    /// The new publish state, when the current operation changes it.
    pub fn status_change(&self) -> Option<bool> {
        match self.previous_published {
            Some(previous) if previous != self.published => Some(self.published),
            _ => None,
        }
    }

    /// Defined fields with a pending change, in template order.
    pub fn changed_fields(&self) -> Vec<&str> {
        self.fields
            .iter()
            .filter(|field| self.changed.contains(field.as_str()))
            .map(String::as_str)
            .collect()
    }

    /// URL the page had before the current operation.
    ///
    /// Rebuilt from the previous parent (or current parent) and the previous
    /// name (or current name).
    pub fn previous_url(&self) -> String {
        let parent = self.previous_parent.as_ref().unwrap_or(&self.parent);
        let name = self.previous_name.as_deref().unwrap_or(self.name.as_str());
        format!("{}{}/", with_trailing_slash(&parent.url), name)
    }
}

fn with_trailing_slash(url: &str) -> String {
    if url.ends_with('/') {
        url.to_string()
    } else {
        format!("{}/", url)
    }
}

/// A raw lifecycle notification as delivered by the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LifecycleEvent {
    pub method: LifecycleMethod,
    pub page: PageSnapshot,
}

impl LifecycleEvent {
    pub fn new(method: LifecycleMethod, page: PageSnapshot) -> Self {
        Self { method, page }
    }
}
