//! Project settings.

use serde::{Deserialize, Serialize};

/// Languages configured for the project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LanguageSettings {
    pub default_language_code: String,
    pub languages: Vec<String>,
}

impl LanguageSettings {
    pub fn new(default_language_code: impl Into<String>) -> Self {
        let code = default_language_code.into();
        Self {
            languages: vec![code.clone()],
            default_language_code: code,
        }
    }
}

/// The project settings document. Individual parts are optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectSettings {
    pub language: Option<LanguageSettings>,
}
