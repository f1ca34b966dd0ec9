//! Personalization rules: per-style tag preferences and per-pacing path lengths.
//!
//! A [`RuleSet`] can only be obtained through the loader in this module, so
//! every instance already satisfies its invariants: the default path length is
//! positive, every pacing multiplier is positive and finite, and scoring
//! weights are non-negative.

mod loader;

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use crate::catalog::TagSet;

/// A rule set loaded once and shared read-only between request handlers.
pub type SharedRules = Arc<RuleSet>;

/// Multiplier used for pacings the rule set does not mention.
pub const NEUTRAL_MULTIPLIER: f64 = 1.0;

/// Tag preferences of one learning style.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StyleRules {
    pub boost_tags: BTreeSet<String>,
    pub penalty_tags: BTreeSet<String>,
}

impl StyleRules {
    pub fn new<B, P, S>(boost_tags: B, penalty_tags: P) -> Self
    where
        B: IntoIterator<Item = S>,
        P: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            boost_tags: boost_tags.into_iter().map(Into::into).collect(),
            penalty_tags: penalty_tags.into_iter().map(Into::into).collect(),
        }
    }

    /// One shared label is enough; more matches do not count more.
    pub fn boosts(&self, tags: &TagSet) -> bool {
        tags.intersects(&self.boost_tags)
    }

    pub fn penalizes(&self, tags: &TagSet) -> bool {
        tags.intersects(&self.penalty_tags)
    }
}

/// Flat score adjustments applied when a unit matches a style's tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringWeights {
    /// Added when any boost tag matches.
    pub boost: i64,
    /// Subtracted when any penalty tag matches.
    pub penalty: i64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            boost: 5,
            penalty: 2,
        }
    }
}

/// The static personalization configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct RuleSet {
    learning_styles: BTreeMap<String, StyleRules>,
    pacing_multipliers: BTreeMap<String, f64>,
    default_path_length: usize,
    scoring: ScoringWeights,
}

impl RuleSet {
    /// Get the rules for a learning style, if the style is configured.
    pub fn style_rules(&self, learning_style: &str) -> Option<&StyleRules> {
        self.learning_styles.get(learning_style)
    }

    /// Get the multiplier for a pacing, falling back to [`NEUTRAL_MULTIPLIER`].
    pub fn pacing_multiplier(&self, pacing: &str) -> f64 {
        self.pacing_multipliers
            .get(pacing)
            .copied()
            .unwrap_or(NEUTRAL_MULTIPLIER)
    }

    /// Number of units a path may hold for the given pacing:
    /// `ceil(default_path_length * multiplier)`.
    pub fn path_length(&self, pacing: &str) -> usize {
        let length = (self.default_path_length as f64 * self.pacing_multiplier(pacing)).ceil();
        if length.is_finite() && length > 0.0 {
            // `as` saturates for values beyond usize::MAX.
            length as usize
        } else {
            0
        }
    }

    pub fn default_path_length(&self) -> usize {
        self.default_path_length
    }

    pub fn scoring(&self) -> ScoringWeights {
        self.scoring
    }

    pub fn learning_styles(&self) -> impl Iterator<Item = (&str, &StyleRules)> {
        self.learning_styles.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn pacings(&self) -> impl Iterator<Item = (&str, f64)> {
        self.pacing_multipliers.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// Wrap the rule set for sharing.
    pub fn into_shared(self) -> SharedRules {
        Arc::new(self)
    }
}
