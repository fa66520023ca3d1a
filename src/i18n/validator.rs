//! Translation quality validation module.
//!
//! Machine translation of UI strings tends to mangle the tokens the client
//! substitutes at render time. This module checks that interpolation
//! placeholders, printf-style specifiers, inline markup and URLs of a
//! source string survive in its translation.

use regex::Regex;
use std::sync::OnceLock;

/// Validation report containing errors and warnings about a translation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationReport {
    /// Critical errors that indicate translation issues
    pub errors: Vec<String>,

    /// Non-critical warnings about potential issues
    pub warnings: Vec<String>,
}

impl ValidationReport {
    /// Create a new empty validation report
    pub fn new() -> Self {
        Self {
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    /// Check if the report has any errors
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Check if the report has any warnings
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// Check if the report is clean (no errors or warnings)
    pub fn is_clean(&self) -> bool {
        !self.has_errors() && !self.has_warnings()
    }
}

impl Default for ValidationReport {
    fn default() -> Self {
        Self::new()
    }
}

/// Validator for placeholder preservation in translated UI strings.
pub struct PlaceholderValidator;

static INTERPOLATION_REGEX: OnceLock<Regex> = OnceLock::new();
static FORMAT_SPEC_REGEX: OnceLock<Regex> = OnceLock::new();
static TAG_REGEX: OnceLock<Regex> = OnceLock::new();
static URL_REGEX: OnceLock<Regex> = OnceLock::new();

impl PlaceholderValidator {
    /// Validate that a translation keeps the substitution tokens of the original.
    ///
    /// Tokens are compared as multisets: a translation may legitimately reorder
    /// them, but must neither drop nor invent one.
    pub fn validate(original: &str, translated: &str) -> ValidationReport {
        let mut report = ValidationReport::new();

        // Interpolations are substituted at runtime; losing one breaks the UI string
        let orig_vars = Self::extract_interpolations(original);
        let trans_vars = Self::extract_interpolations(translated);
        if orig_vars != trans_vars {
            report.errors.push(format!(
                "Interpolation mismatch: original has {:?}, translation has {:?}",
                orig_vars, trans_vars
            ));
        }

        let orig_specs = Self::extract_format_specs(original);
        let trans_specs = Self::extract_format_specs(translated);
        if orig_specs != trans_specs {
            report.errors.push(format!(
                "Format specifier mismatch: original has {:?}, translation has {:?}",
                orig_specs, trans_specs
            ));
        }

        let orig_tags = Self::extract_tags(original);
        let trans_tags = Self::extract_tags(translated);
        if orig_tags != trans_tags {
            report.warnings.push(format!(
                "Markup mismatch: original has {:?}, translation has {:?}",
                orig_tags, trans_tags
            ));
        }

        let orig_urls = Self::extract_urls(original);
        let trans_urls = Self::extract_urls(translated);
        if orig_urls != trans_urls {
            report.warnings.push(format!(
                "URL mismatch: original has {} URLs, translation has {} URLs",
                orig_urls.len(),
                trans_urls.len()
            ));
        }

        report
    }

    /// Extract `{{name}}` and `{name}` interpolations, whitespace inside braces removed
    fn extract_interpolations(text: &str) -> Vec<String> {
        let regex = INTERPOLATION_REGEX.get_or_init(|| {
            Regex::new(r"\{\{\s*[\w.\-]+\s*\}\}|\{[\w.\-]+\}").unwrap()
        });

        let mut found: Vec<String> = regex
            .find_iter(text)
            .map(|m| m.as_str().chars().filter(|c| !c.is_whitespace()).collect())
            .collect();
        found.sort();
        found
    }

    /// Extract printf-style specifiers (`%s`, `%d`, `%1$s`)
    fn extract_format_specs(text: &str) -> Vec<String> {
        let regex =
            FORMAT_SPEC_REGEX.get_or_init(|| Regex::new(r"%(?:\d+\$)?[sdif]").unwrap());

        let mut found: Vec<String> = regex
            .find_iter(text)
            .map(|m| m.as_str().to_string())
            .collect();
        found.sort();
        found
    }

    /// Extract inline markup tags (`<b>`, `</b>`, `<br/>`), lowercased
    fn extract_tags(text: &str) -> Vec<String> {
        let regex = TAG_REGEX.get_or_init(|| Regex::new(r"</?[a-zA-Z][a-zA-Z0-9]*\s*/?>").unwrap());

        let mut found: Vec<String> = regex
            .find_iter(text)
            .map(|m| m.as_str().to_lowercase().replace(' ', ""))
            .collect();
        found.sort();
        found
    }

    /// Extract all URLs from text
    fn extract_urls(text: &str) -> Vec<String> {
        let regex = URL_REGEX.get_or_init(|| Regex::new(r"https?://[^\s)\]<]+").unwrap());

        let mut found: Vec<String> = regex
            .find_iter(text)
            .map(|m| m.as_str().to_string())
            .collect();
        found.sort();
        found
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ==================== Interpolation Extraction Tests ====================

    #[test]
    fn test_extract_interpolations_double_braces() {
        let vars = PlaceholderValidator::extract_interpolations("Hello {{name}}, you have {{count}} votes");
        assert_eq!(vars, vec!["{{count}}", "{{name}}"]);
    }

    #[test]
    fn test_extract_interpolations_single_braces() {
        let vars = PlaceholderValidator::extract_interpolations("Ends in {days} days");
        assert_eq!(vars, vec!["{days}"]);
    }

    #[test]
    fn test_extract_interpolations_double_not_counted_as_single() {
        let vars = PlaceholderValidator::extract_interpolations("{{election.title}}");
        assert_eq!(vars, vec!["{{election.title}}"]);
    }

    #[test]
    fn test_extract_interpolations_normalizes_spacing() {
        let vars = PlaceholderValidator::extract_interpolations("Hola {{ name }}");
        assert_eq!(vars, vec!["{{name}}"]);
    }

    #[test]
    fn test_extract_interpolations_none() {
        assert!(PlaceholderValidator::extract_interpolations("Cast your vote").is_empty());
    }

    // ==================== Format Specifier Tests ====================

    #[test]
    fn test_extract_format_specs() {
        let specs = PlaceholderValidator::extract_format_specs("%d of %s ballots (%1$s)");
        assert_eq!(specs, vec!["%1$s", "%d", "%s"]);
    }

    #[test]
    fn test_extract_format_specs_ignores_percentages() {
        assert!(PlaceholderValidator::extract_format_specs("50% turnout").is_empty());
    }

    // ==================== Markup Tests ====================

    #[test]
    fn test_extract_tags() {
        let tags = PlaceholderValidator::extract_tags("Click <b>here</b><br/>");
        assert_eq!(tags, vec!["</b>", "<b>", "<br/>"]);
    }

    #[test]
    fn test_extract_tags_case_insensitive() {
        let tags = PlaceholderValidator::extract_tags("<B>x</B>");
        assert_eq!(tags, vec!["</b>", "<b>"]);
    }

    // ==================== URL Extraction Tests ====================

    #[test]
    fn test_extract_urls_multiple() {
        let urls = PlaceholderValidator::extract_urls("See https://vote.example.com and http://help.example.org");
        assert_eq!(urls, vec!["http://help.example.org", "https://vote.example.com"]);
    }

    // ==================== Validation Tests ====================

    #[test]
    fn test_validate_clean_translation() {
        let report = PlaceholderValidator::validate(
            "Welcome back, {{name}}! You have %d open <b>elections</b>.",
            "¡Bienvenido de nuevo, {{name}}! Tienes %d <b>elecciones</b> abiertas.",
        );
        assert!(report.is_clean());
    }

    #[test]
    fn test_validate_reordered_tokens_are_clean() {
        let report = PlaceholderValidator::validate("{{a}} before {{b}}", "{{b}} antes {{a}}");
        assert!(report.is_clean());
    }

    #[test]
    fn test_validate_missing_interpolation_is_error() {
        let report = PlaceholderValidator::validate("Hello {{name}}", "Hola nombre");
        assert!(report.has_errors());
        assert!(report.errors[0].contains("Interpolation mismatch"));
    }

    #[test]
    fn test_validate_translated_interpolation_is_error() {
        let report = PlaceholderValidator::validate("{{count}} votes", "{{cuenta}} votos");
        assert!(report.has_errors());
    }

    #[test]
    fn test_validate_missing_format_spec_is_error() {
        let report = PlaceholderValidator::validate("%s voted", "alguien votó");
        assert!(report.errors[0].contains("Format specifier mismatch"));
    }

    #[test]
    fn test_validate_missing_tag_is_warning() {
        let report = PlaceholderValidator::validate("<b>Vote</b> now", "Vota ahora");
        assert!(!report.has_errors());
        assert!(report.warnings[0].contains("Markup mismatch"));
    }

    #[test]
    fn test_validate_missing_url_is_warning() {
        let report = PlaceholderValidator::validate("Read https://example.com", "Lee aquí");
        assert!(report.warnings[0].contains("URL mismatch"));
    }

    #[test]
    fn test_validation_report_new() {
        let report = ValidationReport::new();
        assert!(report.is_clean());
        assert!(!report.has_errors());
        assert!(!report.has_warnings());
    }

    #[test]
    fn test_validation_report_with_warning() {
        let mut report = ValidationReport::new();
        report.warnings.push("Test warning".to_string());

        assert!(!report.is_clean());
        assert!(!report.has_errors());
        assert!(report.has_warnings());
    }
}
