//! Service configuration, read from a TOML file.
//!
//! Every field has a default, so an empty file (or no file) is a valid
//! configuration that runs fully offline.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::error::{Result, TutorError};
use crate::generation::Sampling;

/// Environment variable holding the generation API key.
pub const API_KEY_ENV: &str = "GEMINI_API_KEY";

/// Top-level configuration.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TutorConfig {
    /// Rule set file; `.toml` files are read as TOML, anything else as JSON.
    pub rules_path: PathBuf,

    /// JSON array of catalog unit rows.
    pub catalog_path: PathBuf,

    /// Optional JSON array of learner records.
    pub learners_path: Option<PathBuf>,

    pub generation: GenerationConfig,
}

impl Default for TutorConfig {
    fn default() -> Self {
        Self {
            rules_path: PathBuf::from("data/rules.json"),
            catalog_path: PathBuf::from("data/units.json"),
            learners_path: None,
            generation: GenerationConfig::default(),
        }
    }
}

/// Remote text-generation settings.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    /// Empty means not configured; the adapter answers locally.
    pub api_key: String,

    pub model: String,

    pub base_url: String,

    /// Sampling used for question generation.
    pub temperature: f32,
    pub top_p: f32,
    pub top_k: u32,

    /// Whole-request timeout in seconds; 0 means no timeout.
    pub timeout_secs: u64,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            model: "gemini-2.5-flash".to_string(),
            base_url: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            temperature: 0.9,
            top_p: 0.95,
            top_k: 40,
            timeout_secs: 30,
        }
    }
}

impl GenerationConfig {
    pub fn sampling(&self) -> Sampling {
        Sampling {
            temperature: self.temperature,
            top_p: self.top_p,
            top_k: self.top_k,
        }
    }

    pub fn has_api_key(&self) -> bool {
        !self.api_key.trim().is_empty()
    }
}

impl TutorConfig {
    /// Parse a TOML document.
    pub fn from_toml_str(source: &str) -> Result<Self> {
        toml::from_str(source).map_err(|e| TutorError::Config(format!("invalid config: {}", e)))
    }

    /// Load a TOML config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path)
            .map_err(|e| TutorError::Config(format!("failed to read {}: {}", path.display(), e)))?;
        let config = Self::from_toml_str(&source)?;
        info!(path = %path.display(), "Loaded configuration");
        Ok(config)
    }

    /// Replace the API key with a non-empty override.
    pub fn apply_api_key(&mut self, key: Option<String>) {
        if let Some(key) = key.filter(|k| !k.trim().is_empty()) {
            debug!("Using generation API key from environment");
            self.generation.api_key = key;
        }
    }

    /// Apply overrides from the process environment.
    pub fn apply_env(&mut self) {
        self.apply_api_key(std::env::var(API_KEY_ENV).ok());
    }
}

impl std::fmt::Debug for TutorConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TutorConfig")
            .field("rules_path", &self.rules_path)
            .field("catalog_path", &self.catalog_path)
            .field("learners_path", &self.learners_path)
            .field("generation", &self.generation)
            .finish()
    }
}

impl std::fmt::Debug for GenerationConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let api_key = if self.has_api_key() { "<redacted>" } else { "<unset>" };
        f.debug_struct("GenerationConfig")
            .field("api_key", &api_key)
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("temperature", &self.temperature)
            .field("top_p", &self.top_p)
            .field("top_k", &self.top_k)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = TutorConfig::from_toml_str("").unwrap();
        assert_eq!(config, TutorConfig::default());
        assert_eq!(config.generation.model, "gemini-2.5-flash");
        assert_eq!(config.generation.top_k, 40);
        assert!(!config.generation.has_api_key());
    }

    #[test]
    fn test_partial_config() {
        let config = TutorConfig::from_toml_str(
            r#"
            rules_path = "conf/rules.toml"

            [generation]
            model = "gemini-2.5-pro"
            timeout_secs = 5
            "#,
        )
        .unwrap();

        assert_eq!(config.rules_path, PathBuf::from("conf/rules.toml"));
        assert_eq!(config.catalog_path, PathBuf::from("data/units.json"));
        assert_eq!(config.generation.model, "gemini-2.5-pro");
        assert_eq!(config.generation.timeout_secs, 5);
        assert_eq!(config.generation.temperature, 0.9);
    }

    #[test]
    fn test_invalid_config() {
        let err = TutorConfig::from_toml_str("rules_path = [").unwrap_err();
        assert!(matches!(err, TutorError::Config(_)));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "catalog_path = \"seed/units.json\"").unwrap();

        let config = TutorConfig::load(file.path()).unwrap();
        assert_eq!(config.catalog_path, PathBuf::from("seed/units.json"));

        assert!(TutorConfig::load("/nonexistent/pathwise.toml").is_err());
    }

    #[test]
    fn test_api_key_override() {
        let mut config = TutorConfig::from_toml_str("[generation]\napi_key = \"from-file\"").unwrap();

        config.apply_api_key(Some("   ".to_string()));
        assert_eq!(config.generation.api_key, "from-file");

        config.apply_api_key(None);
        assert_eq!(config.generation.api_key, "from-file");

        config.apply_api_key(Some("from-env".to_string()));
        assert_eq!(config.generation.api_key, "from-env");
    }

    #[test]
    fn test_debug_redacts_key() {
        let mut config = TutorConfig::default();
        config.generation.api_key = "super-secret".to_string();
        let debug = format!("{:?}", config);
        assert!(!debug.contains("super-secret"));
        assert!(debug.contains("<redacted>"));
    }
}
