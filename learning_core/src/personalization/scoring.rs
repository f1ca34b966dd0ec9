//! Ranking of catalog units for one learner profile.

use learning_rules::{ContentUnit, LearnerProfile, RuleSet, ScoringWeights, StyleRules};
use serde::Serialize;
use std::cmp::Reverse;

/// A unit paired with its personalization score.
///
/// Only lives for the duration of one ranking; paths hand out the bare units.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScoredUnit {
    pub unit: ContentUnit,
    pub score: i64,
}

/// Score a unit against one style's preferences.
///
/// The boost and the penalty are flat and independent: a unit matching both
/// lists gets both, and matching several tags of one list counts once.
pub fn score_unit(unit: &ContentUnit, style: &StyleRules, weights: ScoringWeights) -> i64 {
    let mut score = 0;

    if style.boosts(&unit.tags) {
        score += weights.boost;
    }
    if style.penalizes(&unit.tags) {
        score -= weights.penalty;
    }

    score
}

/// Filter, score and order units for a profile.
///
/// 1. Drop units below the learner's (clamped) level
/// 2. If the learning style is configured, score each unit and sort by score
///    descending; the sort is stable so equal scores keep catalog order
/// 3. Otherwise keep catalog order and leave every score at zero
pub fn rank_units(
    units: Vec<ContentUnit>,
    profile: &LearnerProfile,
    rules: &RuleSet,
) -> Vec<ScoredUnit> {
    let level = profile.effective_level();
    let eligible = units.into_iter().filter(|u| u.is_at_or_above(level));

    let Some(style) = rules.style_rules(&profile.learning_style) else {
        return eligible.map(|unit| ScoredUnit { unit, score: 0 }).collect();
    };

    let weights = rules.scoring();
    let mut scored: Vec<ScoredUnit> = eligible
        .map(|unit| ScoredUnit {
            score: score_unit(&unit, style, weights),
            unit,
        })
        .collect();

    // `sort_by_key` is stable.
    scored.sort_by_key(|s| Reverse(s.score));
    scored
}
