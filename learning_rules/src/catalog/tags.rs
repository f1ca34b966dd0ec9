//! Tag sets - the topical labels attached to content units.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeSet;
use tracing::debug;

/// An order-independent set of topical labels.
///
/// Stores may hand tags over as a JSON array, as a string holding a serialized
/// array, or not at all. [`TagSet::from_raw_lossy`] normalizes all of those
/// once at the store boundary so the rest of the system only ever sees a set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TagSet(BTreeSet<String>);

impl TagSet {
    /// Create an empty tag set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a tag set from any collection of labels.
    pub fn from_labels<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(labels.into_iter().map(Into::into).collect())
    }

    /// Parse raw store data into a tag set.
    ///
    /// Returns `None` when the value is present but malformed. A JSON `null`
    /// is treated as "no tags" rather than as malformed.
    pub fn parse_raw(raw: &Value) -> Option<Self> {
        match raw {
            Value::Null => Some(Self::new()),
            Value::Array(items) => Some(Self::from_items(items)),
            Value::String(text) => match serde_json::from_str::<Value>(text) {
                Ok(Value::Array(items)) => Some(Self::from_items(&items)),
                _ => None,
            },
            _ => None,
        }
    }

    /// Parse raw store data, degrading malformed data to an empty set.
    pub fn from_raw_lossy(raw: &Value) -> Self {
        Self::parse_raw(raw).unwrap_or_else(|| {
            debug!(raw = %raw, "Malformed tag data, using empty tag set");
            Self::new()
        })
    }

    fn from_items(items: &[Value]) -> Self {
        // Non-string entries can never match a rule label.
        Self(
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect(),
        )
    }

    /// Add a label.
    pub fn insert(&mut self, label: impl Into<String>) -> bool {
        self.0.insert(label.into())
    }

    pub fn contains(&self, label: &str) -> bool {
        self.0.contains(label)
    }

    /// Check whether at least one label is shared with `labels`.
    pub fn intersects(&self, labels: &BTreeSet<String>) -> bool {
        !self.0.is_disjoint(labels)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

impl<S: Into<String>> FromIterator<S> for TagSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::from_labels(iter)
    }
}

impl std::fmt::Display for TagSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let labels: Vec<_> = self.iter().collect();
        write!(f, "[{}]", labels.join(", "))
    }
}
