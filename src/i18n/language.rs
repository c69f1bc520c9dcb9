//! Language type: a language code validated against the catalog.

use crate::error::{TranslationError, TranslationResult};
use crate::i18n::{LanguageConfig, LanguageRegistry};
use serde::{Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// A validated language.
///
/// Only codes present in the [`LanguageRegistry`] can be turned into a
/// `Language`, so `name()` never has to handle a missing entry.
#[derive(Debug, Clone, Copy)]
pub struct Language {
    config: &'static LanguageConfig,
}

impl Language {
    /// English, the usual detection fallback.
    pub const ENGLISH: Language = Language {
        config: &LanguageConfig {
            code: "en",
            name: "English",
        },
    };

    /// Spanish.
    pub const SPANISH: Language = Language {
        config: &LanguageConfig {
            code: "es",
            name: "Spanish",
        },
    };

    /// Create a Language from a code string.
    ///
    /// # Returns
    /// * `Ok(Language)` if the code is in the catalog
    /// * `Err(TranslationError::UnsupportedLanguage)` otherwise
    pub fn from_code(code: &str) -> TranslationResult<Language> {
        LanguageRegistry::get()
            .get_by_code(code)
            .map(|config| Language { config })
            .ok_or_else(|| TranslationError::UnsupportedLanguage(code.to_string()))
    }

    /// ISO 639-1 code (e.g., "en").
    pub fn code(&self) -> &'static str {
        self.config.code
    }

    /// English display name (e.g., "English").
    pub fn name(&self) -> &'static str {
        self.config.name
    }
}

impl PartialEq for Language {
    fn eq(&self, other: &Self) -> bool {
        self.code() == other.code()
    }
}

impl Eq for Language {}

impl std::hash::Hash for Language {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.code().hash(state);
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Language {
    type Err = TranslationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Language::from_code(s)
    }
}

impl Serialize for Language {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.code())
    }
}

/// Display name for a code, falling back to the code itself when unknown.
pub fn language_name(code: &str) -> String {
    LanguageRegistry::get()
        .name_of(code)
        .map(str::to_string)
        .unwrap_or_else(|| code.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    // ==================== Constant Tests ====================

    #[test]
    fn test_english_constant() {
        assert_eq!(Language::ENGLISH.code(), "en");
        assert_eq!(Language::ENGLISH.name(), "English");
    }

    #[test]
    fn test_constants_match_registry() {
        assert_eq!(Language::from_code("en").unwrap(), Language::ENGLISH);
        assert_eq!(Language::from_code("es").unwrap(), Language::SPANISH);
        assert_eq!(
            Language::from_code("es").unwrap().name(),
            Language::SPANISH.name()
        );
    }

    // ==================== from_code Tests ====================

    #[test]
    fn test_from_code_french() {
        let language = Language::from_code("fr").unwrap();
        assert_eq!(language.code(), "fr");
        assert_eq!(language.name(), "French");
    }

    #[test]
    fn test_from_code_normalizes_case() {
        assert_eq!(Language::from_code("DE").unwrap().code(), "de");
    }

    #[test]
    fn test_from_code_invalid() {
        let result = Language::from_code("xx");
        assert!(matches!(
            result,
            Err(TranslationError::UnsupportedLanguage(ref code)) if code == "xx"
        ));
    }

    #[test]
    fn test_from_code_empty() {
        assert!(Language::from_code("").is_err());
    }

    #[test]
    fn test_parse_via_from_str() {
        let language: Language = "it".parse().unwrap();
        assert_eq!(language.name(), "Italian");
    }

    // ==================== Trait Tests ====================

    #[test]
    fn test_display_is_code() {
        assert_eq!(Language::SPANISH.to_string(), "es");
    }

    #[test]
    fn test_serializes_as_code() {
        let json = serde_json::to_string(&Language::ENGLISH).unwrap();
        assert_eq!(json, "\"en\"");
    }

    // ==================== language_name Tests ====================

    #[test]
    fn test_language_name_known() {
        assert_eq!(language_name("ko"), "Korean");
    }

    #[test]
    fn test_language_name_unknown_falls_back_to_code() {
        assert_eq!(language_name("klingon"), "klingon");
    }
}
