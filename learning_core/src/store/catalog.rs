//! In-memory catalog, seeded from a JSON unit file.

use async_trait::async_trait;
use learning_rules::{ContentUnit, RawUnitRecord, UnitId};
use serde_json::Value;
use std::path::Path;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use super::CatalogStore;
use crate::error::{Result, TutorError};

/// A catalog held in memory, in insertion order.
#[derive(Debug, Default)]
pub struct InMemoryCatalog {
    units: RwLock<Vec<ContentUnit>>,
}

impl InMemoryCatalog {
    /// Create an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a catalog holding the given units, in order.
    pub fn with_units(units: Vec<ContentUnit>) -> Self {
        Self {
            units: RwLock::new(units),
        }
    }

    /// Normalize raw rows into a catalog.
    ///
    /// Rows without a usable id are skipped. All other defects are repaired
    /// by the normalization in `learning_rules`.
    pub fn from_records(records: impl IntoIterator<Item = RawUnitRecord>) -> Self {
        let units = records
            .into_iter()
            .filter_map(|record| match record.into_unit() {
                Ok(unit) => Some(unit),
                Err(e) => {
                    warn!("Skipping catalog record: {}", e);
                    None
                }
            })
            .collect();
        Self::with_units(units)
    }

    /// Parse a JSON array of unit rows.
    pub fn from_json_str(source: &str) -> Result<Self> {
        let rows: Vec<Value> = serde_json::from_str(source)
            .map_err(|e| TutorError::Config(format!("unit seed must be a JSON array: {}", e)))?;

        let records = rows.into_iter().filter_map(|row| {
            if !row.is_object() {
                warn!(row = %row, "Skipping catalog row that is not an object");
                return None;
            }
            match serde_json::from_value::<RawUnitRecord>(row) {
                Ok(record) => Some(record),
                Err(e) => {
                    warn!("Skipping unreadable catalog row: {}", e);
                    None
                }
            }
        });

        Ok(Self::from_records(records))
    }

    /// Load a JSON unit seed file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path)
            .map_err(|e| TutorError::Config(format!("failed to read {}: {}", path.display(), e)))?;
        let catalog = Self::from_json_str(&source)?;
        info!(path = %path.display(), "Loaded unit catalog");
        Ok(catalog)
    }

    /// Append a unit to the end of the catalog.
    pub async fn add_unit(&self, unit: ContentUnit) {
        self.units.write().await.push(unit);
    }

    pub async fn len(&self) -> usize {
        self.units.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.units.read().await.is_empty()
    }
}

#[async_trait]
impl CatalogStore for InMemoryCatalog {
    async fn fetch_all_units(&self) -> Result<Vec<ContentUnit>> {
        let units = self.units.read().await.clone();
        debug!(count = units.len(), "Fetched catalog");
        Ok(units)
    }

    async fn fetch_unit(&self, id: &UnitId) -> Result<Option<ContentUnit>> {
        let units = self.units.read().await;
        Ok(units.iter().find(|u| &u.id == id).cloned())
    }

    async fn update_unit(&self, unit: ContentUnit) -> Result<()> {
        let mut units = self.units.write().await;
        match units.iter_mut().find(|u| u.id == unit.id) {
            Some(existing) => {
                *existing = unit;
                Ok(())
            }
            None => Err(TutorError::UnitNotFound(unit.id)),
        }
    }

    async fn record_view(&self, id: &UnitId) -> Result<()> {
        let mut units = self.units.write().await;
        match units.iter_mut().find(|u| &u.id == id) {
            Some(unit) => {
                unit.views = unit.views.saturating_add(1);
                Ok(())
            }
            None => Err(TutorError::UnitNotFound(id.clone())),
        }
    }
}
