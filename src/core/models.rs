//! Core data models for monitoring-message translation

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Severity/intent bucket assigned to a monitoring message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// Hard failures: crashes, timeouts, unreachable services
    Error,
    /// Access control and intrusion signals
    Security,
    /// Resource pressure and degradation
    Warning,
    /// Routine lifecycle events
    Info,
    /// No keyword matched
    General,
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Category::Error => write!(f, "error"),
            Category::Security => write!(f, "security"),
            Category::Warning => write!(f, "warning"),
            Category::Info => write!(f, "info"),
            Category::General => write!(f, "general"),
        }
    }
}

/// A supported target language and the engine that serves it
#[derive(Debug, Clone, Serialize)]
pub struct LanguageSpec {
    /// ISO 639-1 language code
    pub code: &'static str,
    /// Native display name
    pub display_name: &'static str,
    /// Identifier the engine loader resolves to a translation model
    pub engine_identifier: &'static str,
}

/// Static language catalog. English is the fixed source language and is not
/// listed here; every engine translates en -> `code`.
pub const LANGUAGE_CATALOG: &[LanguageSpec] = &[
    LanguageSpec { code: "da", display_name: "Danish", engine_identifier: "Helsinki-NLP/opus-mt-en-da" },
    LanguageSpec { code: "de", display_name: "Deutsch", engine_identifier: "Helsinki-NLP/opus-mt-en-de" },
    LanguageSpec { code: "el", display_name: "Greek", engine_identifier: "Helsinki-NLP/opus-mt-en-el" },
    LanguageSpec { code: "es", display_name: "Español", engine_identifier: "Helsinki-NLP/opus-mt-en-es" },
    LanguageSpec { code: "fr", display_name: "Français", engine_identifier: "Helsinki-NLP/opus-mt-en-fr" },
    LanguageSpec { code: "hr", display_name: "Croatian", engine_identifier: "Helsinki-NLP/opus-mt-en-hr" },
    LanguageSpec { code: "it", display_name: "Italiano", engine_identifier: "Helsinki-NLP/opus-mt-en-it" },
    LanguageSpec { code: "pt", display_name: "Português", engine_identifier: "Helsinki-NLP/opus-mt-tc-big-en-pt" },
    LanguageSpec { code: "uk", display_name: "Ukrainian", engine_identifier: "Helsinki-NLP/opus-mt-en-uk" },
];

/// Languages loaded eagerly at startup to cut first-request latency
pub const PRIORITY_LANGUAGES: &[&str] = &["de", "es", "fr"];

/// Fixed source language of all monitoring messages
pub const SOURCE_LANGUAGE: &str = "en";

/// Maximum accepted input length in characters
pub const MAX_TEXT_LENGTH: usize = 1000;

/// Output budget passed to the engine per inference
pub const MAX_OUTPUT_LENGTH: usize = 512;

/// Look up a catalog entry by language code
pub fn find_language(code: &str) -> Option<&'static LanguageSpec> {
    LANGUAGE_CATALOG.iter().find(|spec| spec.code == code)
}

/// Check whether a language code is in the catalog
pub fn is_supported(code: &str) -> bool {
    find_language(code).is_some()
}

/// All catalog codes, in catalog order
pub fn catalog_codes() -> Vec<String> {
    LANGUAGE_CATALOG.iter().map(|spec| spec.code.to_string()).collect()
}

/// Per-language translation map. Always contains the source-language entry;
/// a language whose engine could not be loaded maps to an unavailability
/// marker instead of a translation.
pub type TranslationResult = BTreeMap<String, String>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_language() {
        let spec = find_language("de").unwrap();
        assert_eq!(spec.display_name, "Deutsch");
        assert_eq!(spec.engine_identifier, "Helsinki-NLP/opus-mt-en-de");

        assert!(find_language("xx").is_none());
        assert!(find_language("DE").is_none()); // case sensitive
    }

    #[test]
    fn test_priority_languages_are_in_catalog() {
        for code in PRIORITY_LANGUAGES {
            assert!(is_supported(code), "priority language {code} missing from catalog");
        }
    }

    #[test]
    fn test_catalog_codes_unique() {
        let codes = catalog_codes();
        let mut deduped = codes.clone();
        deduped.sort();
        deduped.dedup();
        assert_eq!(codes.len(), deduped.len());
    }

    #[test]
    fn test_category_display() {
        assert_eq!(Category::Error.to_string(), "error");
        assert_eq!(Category::General.to_string(), "general");
    }
}
