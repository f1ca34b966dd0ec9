//! Personalization Engine - builds learning paths from the catalog.
//!
//! Path generation is a single pipeline over one catalog snapshot:
//! 1. **Fetch**: Read the whole catalog (no caching)
//! 2. **Filter**: Keep units at or above the learner's level
//! 3. **Score**: Apply the learning style's boost/penalty tags, if configured
//! 4. **Sort**: Stable, descending by score
//! 5. **Truncate**: Cut to the pacing-adjusted path length

mod scoring;

pub use scoring::*;

use learning_rules::{ContentUnit, LearnerProfile, RuleSet, SharedRules};
use std::sync::Arc;
use tracing::{debug, info};

use crate::error::Result;
use crate::store::CatalogStore;

/// Produces ordered, length-bounded learning paths.
///
/// Holds only read-only state, so one engine can serve concurrent requests.
#[derive(Clone)]
pub struct PersonalizationEngine {
    catalog: Arc<dyn CatalogStore>,
    rules: SharedRules,
}

impl PersonalizationEngine {
    /// Create an engine over a catalog with an already loaded rule set.
    pub fn new(catalog: Arc<dyn CatalogStore>, rules: SharedRules) -> Self {
        Self { catalog, rules }
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    /// Number of units a path holds for the given pacing.
    pub fn path_length(&self, pacing: &str) -> usize {
        self.rules.path_length(pacing)
    }

    /// Fetch the catalog and rank it for a profile, without truncating.
    ///
    /// A catalog read failure is returned as is; no partial ranking is
    /// produced.
    pub async fn rank(&self, profile: &LearnerProfile) -> Result<Vec<ScoredUnit>> {
        let units = self.catalog.fetch_all_units().await?;
        let catalog_size = units.len();

        let ranked = rank_units(units, profile, &self.rules);

        debug!(
            catalog_size,
            eligible = ranked.len(),
            level = profile.effective_level(),
            style = %profile.learning_style,
            style_matched = self.rules.style_rules(&profile.learning_style).is_some(),
            "Ranked catalog"
        );
        Ok(ranked)
    }

    /// Generate the learning path for a profile.
    ///
    /// The result holds at most `ceil(default_path_length * multiplier)` units,
    /// every one of them at or above the learner's level. An empty path means
    /// no unit qualified; a catalog failure is an error instead.
    pub async fn generate_path(&self, profile: &LearnerProfile) -> Result<Vec<ContentUnit>> {
        let ranked = self.rank(profile).await?;
        let limit = self.path_length(&profile.pacing);

        let path: Vec<ContentUnit> = ranked
            .into_iter()
            .take(limit)
            .map(|scored| scored.unit)
            .collect();

        info!(
            style = %profile.learning_style,
            pacing = %profile.pacing,
            limit,
            length = path.len(),
            "Generated learning path"
        );
        Ok(path)
    }
}

impl std::fmt::Debug for PersonalizationEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PersonalizationEngine")
            .field("rules", &self.rules)
            .finish_non_exhaustive()
    }
}
