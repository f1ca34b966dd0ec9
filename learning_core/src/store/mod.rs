//! Store contracts - the catalog, learner profiles and interaction history.
//!
//! The engine only depends on these traits. Real deployments back them with a
//! database; the in-memory implementations here serve tests, demos and the CLI.

mod catalog;
mod history;
mod profiles;

pub use catalog::*;
pub use history::*;
pub use profiles::*;

use async_trait::async_trait;
use learning_rules::{ContentUnit, LearnerId, LearnerRecord, PreferenceUpdate, UnitId};

use crate::error::Result;

/// Read/write access to content units.
///
/// Implementations must return units already normalized (see
/// [`learning_rules::RawUnitRecord`]) and in a stable catalog order.
#[async_trait]
pub trait CatalogStore: Send + Sync {
    /// Fetch every unit, in catalog order.
    ///
    /// Fails with [`TutorError::StoreUnavailable`](crate::TutorError::StoreUnavailable)
    /// when the catalog cannot be read.
    async fn fetch_all_units(&self) -> Result<Vec<ContentUnit>>;

    async fn fetch_unit(&self, id: &UnitId) -> Result<Option<ContentUnit>>;

    /// Replace the unit with the same id.
    async fn update_unit(&self, unit: ContentUnit) -> Result<()>;

    /// Increment the view counter of a unit.
    async fn record_view(&self, id: &UnitId) -> Result<()>;
}

/// Learner accounts and preferences.
#[async_trait]
pub trait ProfileStore: Send + Sync {
    async fn fetch_learner(&self, id: &LearnerId) -> Result<Option<LearnerRecord>>;

    async fn find_by_email(&self, email: &str) -> Result<Option<LearnerRecord>>;

    async fn list_learners(&self) -> Result<Vec<LearnerRecord>>;

    /// Insert a new learner. Fails with `EmailInUse` if the email is taken.
    async fn insert_learner(&self, record: LearnerRecord) -> Result<()>;

    /// Apply a preference change and return the updated record.
    async fn update_preferences(
        &self,
        id: &LearnerId,
        update: &PreferenceUpdate,
    ) -> Result<LearnerRecord>;
}

/// Append-only log of generated questions and chat exchanges.
#[async_trait]
pub trait InteractionLog: Send + Sync {
    async fn record(&self, interaction: Interaction) -> Result<()>;

    /// All interactions of one learner, oldest first.
    async fn history_for(&self, learner: &LearnerId) -> Result<Vec<Interaction>>;
}
