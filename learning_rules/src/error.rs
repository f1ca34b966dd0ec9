//! Error types for rule loading and record normalization.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RulesError {
    /// The rule set is structurally invalid or violates an invariant.
    #[error("Invalid rule set: {0}")]
    ConfigInvalid(String),

    /// A catalog record could not be turned into a unit at all.
    #[error("Invalid unit record: {0}")]
    InvalidRecord(String),

    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, RulesError>;
