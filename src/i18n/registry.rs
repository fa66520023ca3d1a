//! Language registry: Single source of truth for all languages the batch can target.
//!
//! The registry is built once on first access (`OnceLock`) and is immutable
//! thereafter. Each entry pairs the internal short code used for output file
//! names with the code the translation API expects. Which entry is the
//! source is decided per run by `SOURCE_LANG`.

use anyhow::{bail, Result};
use serde::Serialize;
use std::sync::OnceLock;

/// Describes one target language of a translation run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LanguageDescriptor {
    /// Internal short code, used as the output file stem (e.g., "zh")
    pub code: String,

    /// Code sent to the translation API as the target half of `langpair` (e.g., "zh-CN")
    pub api_code: String,

    /// English display name, used for logging only
    pub name: String,
}

impl LanguageDescriptor {
    pub fn new(
        code: impl Into<String>,
        api_code: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            api_code: api_code.into(),
            name: name.into(),
        }
    }

    /// Whether `lang` (an internal or API code) names this language.
    pub fn is_source(&self, lang: &str) -> bool {
        self.code.eq_ignore_ascii_case(lang) || self.api_code.eq_ignore_ascii_case(lang)
    }
}

/// Global language registry singleton.
pub struct LanguageRegistry {
    languages: Vec<LanguageDescriptor>,
}

static REGISTRY: OnceLock<LanguageRegistry> = OnceLock::new();

impl LanguageRegistry {
    /// Get the global language registry instance.
    pub fn get() -> &'static LanguageRegistry {
        REGISTRY.get_or_init(|| LanguageRegistry {
            languages: default_languages(),
        })
    }

    /// Look up a language by its internal code.
    pub fn get_by_code(&self, code: &str) -> Option<&LanguageDescriptor> {
        self.languages.iter().find(|lang| lang.code == code)
    }

    /// Get all known languages.
    pub fn list_all(&self) -> Vec<&LanguageDescriptor> {
        self.languages.iter().collect()
    }

    /// Every language except the one the source pack is written in, in registry order.
    pub fn targets(&self, source_lang: &str) -> Vec<LanguageDescriptor> {
        self.languages
            .iter()
            .filter(|lang| !lang.is_source(source_lang))
            .cloned()
            .collect()
    }

    /// Resolve a list of internal codes to descriptors, keeping the caller's order.
    ///
    /// Fails on an unknown code or on the source language, which is never a target.
    pub fn select<S: AsRef<str>>(
        &self,
        codes: &[S],
        source_lang: &str,
    ) -> Result<Vec<LanguageDescriptor>> {
        let mut selected = Vec::with_capacity(codes.len());
        for code in codes {
            let code = code.as_ref();
            match self.get_by_code(code) {
                Some(lang) if lang.is_source(source_lang) => {
                    bail!("Language '{}' is the source language, not a target", code)
                }
                Some(lang) => selected.push(lang.clone()),
                None => bail!("Unknown language code: '{}'", code),
            }
        }
        Ok(selected)
    }
}

/// (internal code, API code, display name)
const LANGUAGE_TABLE: &[(&str, &str, &str)] = &[
    ("es", "es", "Spanish"),
    ("fr", "fr", "French"),
    ("de", "de", "German"),
    ("it", "it", "Italian"),
    ("pt", "pt-PT", "Portuguese"),
    ("pt-br", "pt-BR", "Portuguese (Brazil)"),
    ("nl", "nl", "Dutch"),
    ("pl", "pl", "Polish"),
    ("ru", "ru", "Russian"),
    ("uk", "uk", "Ukrainian"),
    ("cs", "cs", "Czech"),
    ("ro", "ro", "Romanian"),
    ("hu", "hu", "Hungarian"),
    ("el", "el", "Greek"),
    ("sv", "sv", "Swedish"),
    ("da", "da", "Danish"),
    ("fi", "fi", "Finnish"),
    ("no", "no", "Norwegian"),
    ("tr", "tr", "Turkish"),
    ("ar", "ar", "Arabic"),
    ("he", "he", "Hebrew"),
    ("fa", "fa", "Persian"),
    ("hi", "hi", "Hindi"),
    ("bn", "bn", "Bengali"),
    ("ur", "ur", "Urdu"),
    ("id", "id", "Indonesian"),
    ("ms", "ms", "Malay"),
    ("vi", "vi", "Vietnamese"),
    ("th", "th", "Thai"),
    ("tl", "tl", "Filipino"),
    ("sw", "sw", "Swahili"),
    ("ja", "ja", "Japanese"),
    ("ko", "ko", "Korean"),
    ("zh", "zh-CN", "Chinese (Simplified)"),
    ("zh-tw", "zh-TW", "Chinese (Traditional)"),
];

/// Default languages: English plus every entry of the table.
fn default_languages() -> Vec<LanguageDescriptor> {
    let mut languages = vec![LanguageDescriptor::new("en", "en", "English")];
    languages.extend(
        LANGUAGE_TABLE
            .iter()
            .map(|(code, api_code, name)| LanguageDescriptor::new(*code, *api_code, *name)),
    );
    languages
}
