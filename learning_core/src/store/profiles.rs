//! In-memory learner profile store.

use async_trait::async_trait;
use learning_rules::{LearnerId, LearnerRecord, PreferenceUpdate};
use std::collections::BTreeMap;
use std::path::Path;
use tokio::sync::RwLock;
use tracing::{debug, info};

use super::ProfileStore;
use crate::error::{Result, TutorError};

/// Learner records keyed by id.
#[derive(Debug, Default)]
pub struct InMemoryProfiles {
    learners: RwLock<BTreeMap<LearnerId, LearnerRecord>>,
}

impl InMemoryProfiles {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store holding the given learners. Later duplicates of an id
    /// replace earlier ones.
    pub fn with_learners(learners: impl IntoIterator<Item = LearnerRecord>) -> Self {
        Self {
            learners: RwLock::new(learners.into_iter().map(|l| (l.id.clone(), l)).collect()),
        }
    }

    /// Parse a JSON array of learner records.
    pub fn from_json_str(source: &str) -> Result<Self> {
        let learners: Vec<LearnerRecord> = serde_json::from_str(source)
            .map_err(|e| TutorError::Config(format!("invalid learner seed: {}", e)))?;
        Ok(Self::with_learners(learners))
    }

    /// Load a JSON learner seed file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path)
            .map_err(|e| TutorError::Config(format!("failed to read {}: {}", path.display(), e)))?;
        let store = Self::from_json_str(&source)?;
        info!(path = %path.display(), "Loaded learner profiles");
        Ok(store)
    }
}

#[async_trait]
impl ProfileStore for InMemoryProfiles {
    async fn fetch_learner(&self, id: &LearnerId) -> Result<Option<LearnerRecord>> {
        Ok(self.learners.read().await.get(id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<LearnerRecord>> {
        let learners = self.learners.read().await;
        Ok(learners
            .values()
            .find(|l| l.email.eq_ignore_ascii_case(email))
            .cloned())
    }

    async fn list_learners(&self) -> Result<Vec<LearnerRecord>> {
        Ok(self.learners.read().await.values().cloned().collect())
    }

    async fn insert_learner(&self, record: LearnerRecord) -> Result<()> {
        let mut learners = self.learners.write().await;
        if learners
            .values()
            .any(|l| l.email.eq_ignore_ascii_case(&record.email))
        {
            return Err(TutorError::EmailInUse(record.email));
        }

        debug!(learner = %record.id, "Inserted learner");
        learners.insert(record.id.clone(), record);
        Ok(())
    }

    async fn update_preferences(
        &self,
        id: &LearnerId,
        update: &PreferenceUpdate,
    ) -> Result<LearnerRecord> {
        let mut learners = self.learners.write().await;
        let learner = learners
            .get_mut(id)
            .ok_or_else(|| TutorError::LearnerNotFound(id.clone()))?;

        update.apply(&mut learner.profile);
        Ok(learner.clone())
    }
}
