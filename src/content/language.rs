//! Language type for the bilingual content tree.
//!
//! The site content is maintained in exactly two languages: English (the
//! canonical branch) and Bengali. Every content path is rooted at one of the
//! two branches, so the type is a closed enum rather than an open registry.

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

/// A validated language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    En,
    Bn,
}

impl Language {
    /// Create a Language from an ISO 639-1 code string.
    ///
    /// # Returns
    /// * `Ok(Language)` if the code is one of the supported languages
    /// * `Err` otherwise
    pub fn from_code(code: &str) -> Result<Language> {
        match code {
            "en" => Ok(Language::En),
            "bn" => Ok(Language::Bn),
            other => bail!("Unknown language code: '{}'", other),
        }
    }

    /// Get the canonical (source) language.
    ///
    /// The English branch is the one editors treat as the reference shape;
    /// the Bengali branch mirrors its structure.
    pub fn canonical() -> Language {
        Language::En
    }

    /// Get the ISO 639-1 language code.
    pub fn code(&self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Bn => "bn",
        }
    }

    /// Get the English name of the language.
    pub fn name(&self) -> &'static str {
        match self {
            Language::En => "English",
            Language::Bn => "Bengali",
        }
    }

    /// Get the native name of the language.
    pub fn native_name(&self) -> &'static str {
        match self {
            Language::En => "English",
            Language::Bn => "বাংলা",
        }
    }

    /// Check if this is the canonical language.
    pub fn is_canonical(&self) -> bool {
        *self == Language::canonical()
    }

    /// The other language of the pair.
    pub fn counterpart(&self) -> Language {
        match self {
            Language::En => Language::Bn,
            Language::Bn => Language::En,
        }
    }

    /// Both languages, canonical first.
    pub fn all() -> [Language; 2] {
        [Language::En, Language::Bn]
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ==================== from_code Tests ====================

    #[test]
    fn test_from_code_english() {
        let language = Language::from_code("en").expect("Should succeed");
        assert_eq!(language.code(), "en");
        assert_eq!(language.name(), "English");
    }

    #[test]
    fn test_from_code_bengali() {
        let language = Language::from_code("bn").expect("Should succeed");
        assert_eq!(language.code(), "bn");
        assert_eq!(language.name(), "Bengali");
    }

    #[test]
    fn test_from_code_invalid() {
        let result = Language::from_code("fr");
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("Unknown"));
    }

    #[test]
    fn test_from_code_empty() {
        assert!(Language::from_code("").is_err());
    }

    // ==================== canonical Tests ====================

    #[test]
    fn test_canonical_returns_english() {
        let canonical = Language::canonical();
        assert_eq!(canonical.code(), "en");
        assert!(canonical.is_canonical());
        assert!(!Language::Bn.is_canonical());
    }

    // ==================== counterpart Tests ====================

    #[test]
    fn test_counterpart_round_trips() {
        assert_eq!(Language::En.counterpart(), Language::Bn);
        assert_eq!(Language::Bn.counterpart(), Language::En);
        assert_eq!(Language::En.counterpart().counterpart(), Language::En);
    }

    // ==================== Serde Tests ====================

    #[test]
    fn test_serializes_as_lowercase_code() {
        assert_eq!(serde_json::to_string(&Language::En).unwrap(), "\"en\"");
        assert_eq!(serde_json::to_string(&Language::Bn).unwrap(), "\"bn\"");
    }

    #[test]
    fn test_deserializes_from_code() {
        let lang: Language = serde_json::from_str("\"bn\"").unwrap();
        assert_eq!(lang, Language::Bn);
    }

    #[test]
    fn test_native_name() {
        assert_eq!(Language::En.native_name(), "English");
        assert_eq!(Language::Bn.native_name(), "বাংলা");
    }

    #[test]
    fn test_display_matches_code() {
        assert_eq!(Language::Bn.to_string(), "bn");
    }
}
