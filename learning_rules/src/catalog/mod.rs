//! Catalog definitions - content units and their normalization from store rows.

mod record;
mod tags;

pub use record::*;
pub use tags::*;

use serde::{Deserialize, Serialize};

/// Unique identifier for content units.
///
/// Stores use either numeric or textual keys; both are kept as text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UnitId(pub String);

impl UnitId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for UnitId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for UnitId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<u64> for UnitId {
    fn from(id: u64) -> Self {
        Self(id.to_string())
    }
}

impl std::fmt::Display for UnitId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Lowest difficulty a unit can have.
pub const MIN_DIFFICULTY: u32 = 1;

/// A single piece of catalog content (lesson or topic).
///
/// Deserialization goes through [`RawUnitRecord`], so decoded units are
/// normalized the same way store rows are.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawUnitRecord")]
pub struct ContentUnit {
    pub id: UnitId,
    pub title: String,

    /// Free-form content kind (e.g. "Math", "text").
    #[serde(rename = "type")]
    pub kind: Option<String>,

    /// At least [`MIN_DIFFICULTY`] when built through [`ContentUnit::with_difficulty`]
    /// or decoded. Code assigning the field directly must keep that floor.
    pub difficulty: u32,

    pub tags: TagSet,

    /// Opaque content body.
    pub content: String,

    pub views: u64,
}

impl ContentUnit {
    /// Create a new unit with the lowest difficulty and no tags.
    pub fn new(id: impl Into<UnitId>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            kind: None,
            difficulty: MIN_DIFFICULTY,
            tags: TagSet::new(),
            content: String::new(),
            views: 0,
        }
    }

    /// Set the difficulty, raised to [`MIN_DIFFICULTY`] if lower.
    pub fn with_difficulty(mut self, difficulty: u32) -> Self {
        self.difficulty = difficulty.max(MIN_DIFFICULTY);
        self
    }

    pub fn with_kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = Some(kind.into());
        self
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.insert(tag);
        self
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for tag in tags {
            self.tags.insert(tag);
        }
        self
    }

    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = content.into();
        self
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.contains(tag)
    }

    /// Check whether a learner at `level` may be offered this unit.
    pub fn is_at_or_above(&self, level: u32) -> bool {
        self.difficulty >= level
    }
}
