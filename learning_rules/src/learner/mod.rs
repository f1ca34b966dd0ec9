//! Learner definitions - accounts and their personalization preferences.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::catalog::MIN_DIFFICULTY;

/// Unique identifier for learners.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LearnerId(pub String);

impl LearnerId {
    /// Create a new random learner ID.
    pub fn new() -> Self {
        Self(format!("u{}", Uuid::new_v4().simple()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for LearnerId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<&str> for LearnerId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl std::fmt::Display for LearnerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Style assigned to learners who have not taken the placement test.
pub const DEFAULT_LEARNING_STYLE: &str = "visual";

/// Pacing assigned to learners who have not taken the placement test.
pub const DEFAULT_PACING: &str = "moderate";

/// Personalization preferences of one learner.
///
/// `learning_style` and `pacing` are free-form: a value missing from the rule
/// set is valid and simply disables scoring or uses the neutral multiplier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LearnerProfile {
    #[serde(alias = "learning_style")]
    pub learning_style: String,

    pub pacing: String,

    /// Current mastery level. Values below 1 are treated as 1.
    #[serde(alias = "current_level")]
    pub current_level: i64,
}

impl LearnerProfile {
    pub fn new(
        learning_style: impl Into<String>,
        pacing: impl Into<String>,
        current_level: i64,
    ) -> Self {
        Self {
            learning_style: learning_style.into(),
            pacing: pacing.into(),
            current_level,
        }
    }

    /// The level used for difficulty filtering, clamped to the valid range.
    pub fn effective_level(&self) -> u32 {
        self.current_level
            .clamp(i64::from(MIN_DIFFICULTY), i64::from(u32::MAX)) as u32
    }
}

impl Default for LearnerProfile {
    fn default() -> Self {
        Self::new(DEFAULT_LEARNING_STYLE, DEFAULT_PACING, 1)
    }
}

/// An account as held by the profile store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LearnerRecord {
    pub id: LearnerId,
    pub name: String,
    pub email: String,
    #[serde(alias = "preferences")]
    pub profile: LearnerProfile,
}

impl LearnerRecord {
    /// Create a learner with the default profile.
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id: LearnerId::new(),
            name: name.into(),
            email: email.into(),
            profile: LearnerProfile::default(),
        }
    }

    pub fn with_id(mut self, id: impl Into<LearnerId>) -> Self {
        self.id = id.into();
        self
    }

    pub fn with_profile(mut self, profile: LearnerProfile) -> Self {
        self.profile = profile;
        self
    }
}

/// A partial preference change, as submitted by the placement test or the
/// settings page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreferenceUpdate {
    #[serde(default)]
    pub learning_style: Option<String>,
    #[serde(default)]
    pub pacing: Option<String>,
    #[serde(default)]
    pub current_level: Option<i64>,
}

impl PreferenceUpdate {
    pub fn is_empty(&self) -> bool {
        self.learning_style.is_none() && self.pacing.is_none() && self.current_level.is_none()
    }

    /// Apply the present fields to a profile.
    pub fn apply(&self, profile: &mut LearnerProfile) {
        if let Some(style) = &self.learning_style {
            profile.learning_style = style.clone();
        }
        if let Some(pacing) = &self.pacing {
            profile.pacing = pacing.clone();
        }
        if let Some(level) = self.current_level {
            profile.current_level = level;
        }
    }
}
