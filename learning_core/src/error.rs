//! Error types for the personalization core.

use learning_rules::{LearnerId, RulesError, UnitId};
use thiserror::Error;

/// Main error type for core operations.
#[derive(Error, Debug)]
pub enum TutorError {
    /// A store could not be read or written. No partial result is produced.
    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("Unit not found: {0}")]
    UnitNotFound(UnitId),

    #[error("Learner not found: {0}")]
    LearnerNotFound(LearnerId),

    #[error("Email already in use: {0}")]
    EmailInUse(String),

    /// The rule set failed to load or validate.
    #[error(transparent)]
    Rules(#[from] RulesError),

    /// Configuration or seed data could not be loaded.
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type alias for core operations.
pub type Result<T> = std::result::Result<T, TutorError>;
