//! Rule set loading and validation.
//!
//! Rule files are JSON by default; files with a `.toml` extension are read as
//! TOML. Both formats share the same document shape:
//!
//! ```json
//! {
//!   "learning_styles": { "<style>": { "boost_tags": [..], "penalty_tags": [..] } },
//!   "pacing_multipliers": { "<pacing>": 1.5 },
//!   "default_path_length": 5,
//!   "scoring": { "boost": 5, "penalty": 2 }
//! }
//! ```
//!
//! `scoring` is optional. Everything else is required.

use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;
use tracing::info;

use super::{RuleSet, ScoringWeights, StyleRules};
use crate::error::{Result, RulesError};

/// The on-disk shape, before invariants are checked.
#[derive(Debug, Deserialize)]
struct RuleDocument {
    learning_styles: BTreeMap<String, StyleRules>,
    pacing_multipliers: BTreeMap<String, f64>,
    /// Signed so that negative values reach validation instead of a type error.
    default_path_length: i64,
    #[serde(default)]
    scoring: ScoringWeights,
}

impl RuleDocument {
    fn validate(self) -> Result<RuleSet> {
        if self.default_path_length <= 0 {
            return Err(RulesError::ConfigInvalid(format!(
                "default_path_length must be positive, got {}",
                self.default_path_length
            )));
        }

        for (pacing, multiplier) in &self.pacing_multipliers {
            if !multiplier.is_finite() || *multiplier <= 0.0 {
                return Err(RulesError::ConfigInvalid(format!(
                    "pacing multiplier for '{}' must be positive, got {}",
                    pacing, multiplier
                )));
            }

            let length = (self.default_path_length as f64 * multiplier).ceil();
            if !length.is_finite() || length > usize::MAX as f64 {
                return Err(RulesError::ConfigInvalid(format!(
                    "pacing multiplier for '{}' gives an unbounded path length ({} x {})",
                    pacing, self.default_path_length, multiplier
                )));
            }
        }

        if self.scoring.boost < 0 || self.scoring.penalty < 0 {
            return Err(RulesError::ConfigInvalid(format!(
                "scoring weights must not be negative, got boost {} and penalty {}",
                self.scoring.boost, self.scoring.penalty
            )));
        }

        let default_path_length = usize::try_from(self.default_path_length).map_err(|_| {
            RulesError::ConfigInvalid(format!(
                "default_path_length {} is too large",
                self.default_path_length
            ))
        })?;

        Ok(RuleSet {
            learning_styles: self.learning_styles,
            pacing_multipliers: self.pacing_multipliers,
            default_path_length,
            scoring: self.scoring,
        })
    }
}

impl RuleSet {
    /// Parse and validate a JSON rule document.
    pub fn from_json_str(source: &str) -> Result<Self> {
        let document: RuleDocument = serde_json::from_str(source)
            .map_err(|e| RulesError::ConfigInvalid(format!("malformed JSON rule set: {}", e)))?;
        document.validate()
    }

    /// Validate an already parsed JSON value.
    pub fn from_json_value(value: serde_json::Value) -> Result<Self> {
        let document: RuleDocument = serde_json::from_value(value)
            .map_err(|e| RulesError::ConfigInvalid(format!("malformed rule set: {}", e)))?;
        document.validate()
    }

    /// Parse and validate a TOML rule document.
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let document: RuleDocument = toml::from_str(source)
            .map_err(|e| RulesError::ConfigInvalid(format!("malformed TOML rule set: {}", e)))?;
        document.validate()
    }

    /// Load a rule file, choosing the format by extension.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| RulesError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let is_toml = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("toml"));

        let rules = if is_toml {
            Self::from_toml_str(&source)?
        } else {
            Self::from_json_str(&source)?
        };

        info!(
            path = %path.display(),
            styles = rules.learning_styles.len(),
            pacings = rules.pacing_multipliers.len(),
            default_path_length = rules.default_path_length,
            "Loaded rule set"
        );
        Ok(rules)
    }
}
