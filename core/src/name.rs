//! Identifier sanitization.
//!
//! Every name that enters the model (modules, entities, attributes,
//! associations, enumerations and enumeration keys) goes through
//! [`NameSanitizer::clean`].

use std::collections::HashSet;
use std::sync::Arc;

/// The reserved-word list shipped with the crate, one identifier per line.
const BUNDLED_RESERVED_WORDS: &str = include_str!("../resources/reservedwords.txt");

/// An immutable set of identifiers that may not be used as element names.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReservedWords {
    words: HashSet<String>,
}

impl ReservedWords {
    /// Parse a newline-delimited list. Accepts `\n`, `\r\n` and `\r`
    /// separators; blank lines are ignored. Matching is case-sensitive.
    pub fn parse(text: &str) -> Self {
        let words = text
            .split(['\n', '\r'])
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect();
        Self { words }
    }

    /// The reserved words bundled with this crate.
    pub fn bundled() -> Self {
        Self::parse(BUNDLED_RESERVED_WORDS)
    }

    pub fn contains(&self, word: &str) -> bool {
        self.words.contains(word)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

/// Cleans raw strings into valid element identifiers.
///
/// The reserved-word list is injected at construction and shared; cloning a
/// sanitizer is cheap.
#[derive(Debug, Clone)]
pub struct NameSanitizer {
    reserved: Arc<ReservedWords>,
}

impl NameSanitizer {
    pub fn new(reserved: ReservedWords) -> Self {
        Self {
            reserved: Arc::new(reserved),
        }
    }

    pub fn reserved_words(&self) -> &ReservedWords {
        &self.reserved
    }

    /// Strip every character outside `[A-Za-z0-9_]`, then prefix `_` when the
    /// result is a reserved word or starts with a digit.
    ///
    /// Never fails. An input with no valid characters becomes `_`.
    pub fn clean(&self, raw: &str) -> String {
        let mut result: String = raw
            .chars()
            .filter(|c| c.is_ascii_alphanumeric() || *c == '_')
            .collect();

        let leading_digit = result.starts_with(|c: char| c.is_ascii_digit());
        if result.is_empty() || leading_digit || self.reserved.contains(&result) {
            result.insert(0, '_');
        }
        result
    }
}

impl Default for NameSanitizer {
    fn default() -> Self {
        Self::new(ReservedWords::bundled())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sanitizer() -> NameSanitizer {
        NameSanitizer::default()
    }

    #[test]
    fn test_strips_invalid_characters() {
        assert_eq!(sanitizer().clean("My Entity!"), "MyEntity");
        assert_eq!(sanitizer().clean("Order-Line #2"), "OrderLine2");
        assert_eq!(sanitizer().clean("Straße"), "Strae");
    }

    #[test]
    fn test_prefixes_reserved_words_and_leading_digits() {
        assert_eq!(sanitizer().clean("class"), "_class");
        assert_eq!(sanitizer().clean("1Foo"), "_1Foo");
        assert_eq!(sanitizer().clean("  42 "), "_42");
    }

    #[test]
    fn test_reserved_match_is_case_sensitive() {
        assert_eq!(sanitizer().clean("Class"), "Class");
    }

    #[test]
    fn test_empty_result_becomes_underscore() {
        assert_eq!(sanitizer().clean(""), "_");
        assert_eq!(sanitizer().clean("!!!"), "_");
    }

    #[test]
    fn test_clean_is_idempotent() {
        let s = sanitizer();
        for raw in ["My Entity!", "class", "1Foo", "", "a.b.c", "_x", "new"] {
            let once = s.clean(raw);
            assert_eq!(s.clean(&once), once, "not idempotent for {:?}", raw);
        }
    }

    #[test]
    fn test_output_alphabet() {
        let s = sanitizer();
        for raw in ["héllo wörld", "tab\tsep", "ünïcödé-123", "a+b=c"] {
            let cleaned = s.clean(raw);
            assert!(cleaned
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_'));
        }
    }

    #[test]
    fn test_parse_mixed_line_endings() {
        let words = ReservedWords::parse("alpha\r\nbeta\rgamma\n\ndelta");
        assert_eq!(words.len(), 4);
        assert!(words.contains("gamma"));
        assert!(!words.contains(""));
    }

    #[test]
    fn test_injected_word_list() {
        let s = NameSanitizer::new(ReservedWords::parse("Order"));
        assert_eq!(s.clean("Order"), "_Order");
        assert_eq!(s.clean("class"), "class");
    }
}
