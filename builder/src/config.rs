//! Builder configuration.

use crate::error::{BuildError, BuildResult};
use serde::{Deserialize, Serialize};
use weft_core::QualifiedName;

const LANGUAGE_CODE_PATTERN: &str = "^[a-z]{2,3}_[A-Z]{2}$";

/// Defaults and policies applied by a `SchemaBuilder`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuilderConfig {
    /// Maximum length of string attributes created without an explicit length.
    pub default_string_length: u32,
    /// Default seed of auto-number attributes.
    pub autonumber_seed: i64,
    /// Default language of language settings created on demand.
    pub fallback_language_code: String,
    /// Microflow that replaces a home page removed with its module.
    pub system_home_microflow: String,
    /// Fail instead of skipping when a module role is bound to an unknown user role.
    pub strict_user_roles: bool,
}

impl Default for BuilderConfig {
    fn default() -> Self {
        Self {
            default_string_length: 200,
            autonumber_seed: 1,
            fallback_language_code: "en_US".to_string(),
            system_home_microflow: "System.ShowHomePage".to_string(),
            strict_user_roles: false,
        }
    }
}

impl BuilderConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a JSON configuration. Missing fields take their defaults.
    pub fn from_json_str(json: &str) -> BuildResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn with_default_string_length(mut self, length: u32) -> Self {
        self.default_string_length = length;
        self
    }

    pub fn with_autonumber_seed(mut self, seed: i64) -> Self {
        self.autonumber_seed = seed;
        self
    }

    pub fn with_fallback_language_code(mut self, code: impl Into<String>) -> Self {
        self.fallback_language_code = code.into();
        self
    }

    pub fn with_system_home_microflow(mut self, microflow: impl Into<String>) -> Self {
        self.system_home_microflow = microflow.into();
        self
    }

    pub fn with_strict_user_roles(mut self, strict: bool) -> Self {
        self.strict_user_roles = strict;
        self
    }

    pub fn validate(&self) -> BuildResult<()> {
        let re = regex_lite::Regex::new(LANGUAGE_CODE_PATTERN)
            .map_err(|e| BuildError::invalid_config(format!("language code pattern: {}", e)))?;
        if !re.is_match(&self.fallback_language_code) {
            return Err(BuildError::invalid_config(format!(
                "fallback_language_code '{}' is not of the form ll_CC",
                self.fallback_language_code
            )));
        }
        self.home_microflow()?;
        Ok(())
    }

    /// The system home microflow as a qualified name.
    pub fn home_microflow(&self) -> BuildResult<QualifiedName> {
        QualifiedName::parse(&self.system_home_microflow).map_err(|e| {
            BuildError::invalid_config(format!("system_home_microflow: {}", e))
        })
    }
}
