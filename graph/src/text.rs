//! Translatable texts.

use serde::{Deserialize, Serialize};

/// One translation of a text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Translation {
    pub language_code: String,
    pub text: String,
}

/// A text with zero or more translations keyed by language code.
///
/// An empty text is a valid placeholder (e.g. an association error message
/// that has not been filled in yet).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Text {
    pub translations: Vec<Translation>,
}

impl Text {
    pub fn new() -> Self {
        Self::default()
    }

    /// A text with a single translation.
    pub fn single(language_code: impl Into<String>, text: impl Into<String>) -> Self {
        let mut t = Self::new();
        t.set(language_code, text);
        t
    }

    /// Get the translation for a language.
    pub fn get(&self, language_code: &str) -> Option<&str> {
        self.translations
            .iter()
            .find(|t| t.language_code == language_code)
            .map(|t| t.text.as_str())
    }

    /// Set (or replace) the translation for a language.
    pub fn set(&mut self, language_code: impl Into<String>, text: impl Into<String>) {
        let language_code = language_code.into();
        let text = text.into();
        match self
            .translations
            .iter_mut()
            .find(|t| t.language_code == language_code)
        {
            Some(existing) => existing.text = text,
            None => self.translations.push(Translation {
                language_code,
                text,
            }),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.translations.is_empty()
    }
}
