//! The ordered details payload and its text encoding.
//!
//! `Details` keeps labels in insertion order so the stored payload reads the
//! way it was built (title first, URLs after names). The encoded form is a
//! compact JSON object; an empty payload encodes to `None`, which the store
//! writes as SQL `NULL`.

use std::fmt;

use serde::{
    de::{MapAccess, Visitor},
    ser::SerializeMap,
    Deserialize, Deserializer, Serialize, Serializer,
};

use crate::error::{ChangelogError, ChangelogResult};

/// Well-known labels used by the detail extractor.
pub mod labels {
    pub const PAGE_TITLE: &str = "Page title";
    pub const PAGE_NAME: &str = "Page name";
    pub const PREVIOUS_PAGE_NAME: &str = "Previous page name";
    pub const TEMPLATE_NAME: &str = "Template name";
    pub const PREVIOUS_TEMPLATE_NAME: &str = "Previous template name";
    pub const PAGE_URL: &str = "Page URL";
    pub const PREVIOUS_PAGE_URL: &str = "Previous page URL";
    pub const FIELDS_EDITED: &str = "Fields edited";
    pub const CALLER: &str = "Caller";
}

/// An ordered mapping of human-readable label to text value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Details {
    entries: Vec<(String, String)>,
}

impl Details {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `label` to `value`.
    ///
    /// An existing label keeps its position and takes the new value.
    pub fn insert(&mut self, label: impl Into<String>, value: impl Into<String>) {
        let label = label.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(existing, _)| *existing == label) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((label, value)),
        }
    }

    pub fn get(&self, label: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(existing, _)| existing == label)
            .map(|(_, value)| value.as_str())
    }

    pub fn contains(&self, label: &str) -> bool {
        self.get(label).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(label, value)| (label.as_str(), value.as_str()))
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(label, _)| label.as_str())
    }

    /// Encode for storage. Empty details encode to `None`.
    pub fn encode(&self) -> ChangelogResult<Option<String>> {
        if self.is_empty() {
            return Ok(None);
        }
        serde_json::to_string(self)
            .map(Some)
            .map_err(|e| ChangelogError::Encoding {
                reason: format!("failed to encode details: {}", e),
            })
    }

    /// Decode a stored payload. `None` and an empty string decode to empty
    /// details.
    pub fn decode(encoded: Option<&str>) -> ChangelogResult<Self> {
        match encoded {
            None => Ok(Self::new()),
            Some(text) if text.trim().is_empty() => Ok(Self::new()),
            Some(text) => serde_json::from_str(text).map_err(|e| ChangelogError::Encoding {
                reason: format!("failed to decode details: {}", e),
            }),
        }
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Details {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut details = Details::new();
        for (label, value) in iter {
            details.insert(label, value);
        }
        details
    }
}

impl Serialize for Details {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (label, value) in &self.entries {
            map.serialize_entry(label, value)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Details {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct DetailsVisitor;

        impl<'de> Visitor<'de> for DetailsVisitor {
            type Value = Details;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of label to text value")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Details, A::Error> {
                let mut details = Details::new();
                while let Some((label, value)) = access.next_entry::<String, String>()? {
                    details.insert(label, value);
                }
                Ok(details)
            }
        }

        deserializer.deserialize_map(DetailsVisitor)
    }
}
