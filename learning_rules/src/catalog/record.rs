//! Raw catalog records as a store returns them, and their normalization.

use serde::Deserialize;
use serde_json::Value;

use super::{ContentUnit, TagSet, UnitId, MIN_DIFFICULTY};
use crate::error::{Result, RulesError};

/// An untyped unit row.
///
/// Every column is kept as a raw JSON value because drivers disagree on
/// whether `tags` is an array or serialized text and whether `difficulty` is a
/// number or a string.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawUnitRecord {
    #[serde(default)]
    pub id: Value,
    #[serde(default)]
    pub title: Value,
    #[serde(default, rename = "type")]
    pub kind: Value,
    #[serde(default)]
    pub difficulty: Value,
    #[serde(default)]
    pub tags: Value,
    #[serde(default)]
    pub content: Value,
    #[serde(default)]
    pub views: Value,
}

impl RawUnitRecord {
    /// Normalize into a typed unit.
    ///
    /// Only a missing or unusable identifier is an error. Malformed tags become
    /// an empty set and a missing or invalid difficulty becomes the minimum.
    pub fn into_unit(self) -> Result<ContentUnit> {
        let id = match &self.id {
            Value::String(s) if !s.trim().is_empty() => UnitId::new(s.trim()),
            Value::Number(n) => UnitId::new(n.to_string()),
            other => {
                return Err(RulesError::InvalidRecord(format!(
                    "unit id must be a string or number, got {}",
                    other
                )))
            }
        };

        Ok(ContentUnit {
            tags: TagSet::from_raw_lossy(&self.tags),
            difficulty: normalize_difficulty(&self.difficulty),
            title: text_or_empty(&self.title),
            kind: self.kind.as_str().map(str::to_string),
            content: text_or_empty(&self.content),
            views: normalize_count(&self.views),
            id,
        })
    }
}

impl TryFrom<RawUnitRecord> for ContentUnit {
    type Error = RulesError;

    fn try_from(record: RawUnitRecord) -> Result<Self> {
        record.into_unit()
    }
}

/// Fractional difficulties are floored, which keeps `difficulty >= level`
/// comparisons against integer levels unchanged.
fn normalize_difficulty(raw: &Value) -> u32 {
    let value = match raw {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };

    match value {
        Some(v) if v.is_finite() && v >= MIN_DIFFICULTY as f64 => {
            v.floor().min(u32::MAX as f64) as u32
        }
        _ => MIN_DIFFICULTY,
    }
}

fn normalize_count(raw: &Value) -> u64 {
    match raw {
        Value::Number(n) => n.as_u64().unwrap_or(0),
        Value::String(s) => s.trim().parse().unwrap_or(0),
        _ => 0,
    }
}

fn text_or_empty(raw: &Value) -> String {
    match raw {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
