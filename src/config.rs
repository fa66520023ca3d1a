use crate::i18n::{LanguageDescriptor, LanguageRegistry};
use anyhow::{Context, Result};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Config {
    // Files
    pub source_file: PathBuf,
    pub output_dir: PathBuf,

    // Translation API
    pub source_lang: String,
    pub api_url: String,
    pub api_email: Option<String>,
    pub request_timeout: Duration,

    // Batch behavior
    pub pace_interval: Duration,
    pub canary_key: String,
    pub milestone_every: usize,
    pub target_languages: Option<Vec<String>>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            source_file: PathBuf::from("src/i18n/locales/en.json"),
            output_dir: PathBuf::from("src/i18n/locales"),
            source_lang: "en".to_string(),
            api_url: "https://api.mymemory.translated.net/get".to_string(),
            api_email: None,
            request_timeout: Duration::from_secs(10),
            pace_interval: Duration::from_millis(600),
            canary_key: "common.welcome".to_string(),
            milestone_every: 5,
            target_languages: None,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        Ok(Self {
            // Files
            source_file: std::env::var("SOURCE_FILE")
                .map(PathBuf::from)
                .unwrap_or(defaults.source_file),
            output_dir: std::env::var("OUTPUT_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.output_dir),

            // Translation API
            source_lang: std::env::var("SOURCE_LANG").unwrap_or(defaults.source_lang),
            api_url: std::env::var("TRANSLATE_API_URL").unwrap_or(defaults.api_url),
            api_email: std::env::var("TRANSLATE_API_EMAIL")
                .ok()
                .filter(|v| !v.trim().is_empty()),
            request_timeout: match std::env::var("TRANSLATE_TIMEOUT_SECS") {
                Ok(v) => Duration::from_secs(
                    v.parse()
                        .with_context(|| format!("TRANSLATE_TIMEOUT_SECS is not a number: {}", v))?,
                ),
                Err(_) => defaults.request_timeout,
            },

            // Batch behavior
            pace_interval: match std::env::var("TRANSLATE_PACE_MS") {
                Ok(v) => Duration::from_millis(
                    v.parse()
                        .with_context(|| format!("TRANSLATE_PACE_MS is not a number: {}", v))?,
                ),
                Err(_) => defaults.pace_interval,
            },
            canary_key: std::env::var("CANARY_KEY").unwrap_or(defaults.canary_key),
            milestone_every: std::env::var("MILESTONE_EVERY")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.milestone_every)
                .max(1),
            target_languages: std::env::var("TARGET_LANGUAGES")
                .ok()
                .map(|v| parse_code_list(&v))
                .filter(|codes| !codes.is_empty()),
        })
    }

    /// Resolve the configured target languages against the registry.
    ///
    /// Without `TARGET_LANGUAGES`, every registry language except `source_lang` is used.
    pub fn target_languages(&self) -> Result<Vec<LanguageDescriptor>> {
        let registry = LanguageRegistry::get();
        match &self.target_languages {
            Some(codes) => registry
                .select(codes.as_slice(), &self.source_lang)
                .context("Invalid TARGET_LANGUAGES"),
            None => Ok(registry.targets(&self.source_lang)),
        }
    }
}

fn parse_code_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}
