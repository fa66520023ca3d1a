use crate::config::Config;
use crate::i18n::{PlaceholderValidator, TranslationStats};
use serde::Deserialize;
use std::future::Future;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

/// Strings shorter than this (in characters) are never sent to the API
const MIN_TRANSLATABLE_CHARS: usize = 2;

/// Something that can translate a single UI string.
///
/// Implementations never fail: when no translation can be produced the
/// original text comes back unchanged.
pub trait Translate {
    fn translate(&self, text: &str, target_api_code: &str) -> impl Future<Output = String> + Send;
}

/// Why a single API call yielded no usable translation.
///
/// Never returned to callers of [`Translate::translate`]; it only shapes the log line.
#[derive(Debug, Error)]
pub enum TranslateError {
    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    #[error("request failed: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("translation API returned HTTP {0}")]
    HttpStatus(reqwest::StatusCode),

    #[error("translation API reported status {0}")]
    ApiStatus(String),

    #[error("failed to parse translation response: {0}")]
    Parse(#[source] serde_json::Error),

    #[error("translation response contained no translated text")]
    Missing,

    #[error("translation identical to input")]
    Unchanged,
}

/// MyMemory-style `GET /get?q=...&langpair=src|dst` response
#[derive(Debug, Deserialize)]
struct ApiResponse {
    #[serde(rename = "responseData")]
    response_data: Option<ResponseData>,
    // Sent as a number on success but as a string on some errors
    #[serde(rename = "responseStatus")]
    response_status: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct ResponseData {
    #[serde(rename = "translatedText")]
    translated_text: Option<String>,
}

/// Translation client backed by the public machine-translation HTTP API.
pub struct HttpTranslator {
    client: reqwest::Client,
    api_url: String,
    source_lang: String,
    api_email: Option<String>,
    timeout: Duration,
    stats: TranslationStats,
}

impl HttpTranslator {
    pub fn new(client: reqwest::Client, config: &Config) -> Self {
        Self {
            client,
            api_url: config.api_url.clone(),
            source_lang: config.source_lang.clone(),
            api_email: config.api_email.clone(),
            timeout: config.request_timeout,
            stats: TranslationStats::new(),
        }
    }

    /// Counters for every call made through this translator.
    pub fn stats(&self) -> &TranslationStats {
        &self.stats
    }

    async fn request(&self, text: &str, target_api_code: &str) -> Result<String, TranslateError> {
        let langpair = format!("{}|{}", self.source_lang, target_api_code);

        let mut query: Vec<(&str, &str)> = vec![("q", text), ("langpair", langpair.as_str())];
        if let Some(email) = &self.api_email {
            query.push(("de", email.as_str()));
        }

        let response = self
            .client
            .get(&self.api_url)
            .query(&query)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        if !response.status().is_success() {
            return Err(TranslateError::HttpStatus(response.status()));
        }

        let body = response.text().await.map_err(|e| self.classify(e))?;
        let parsed: ApiResponse = serde_json::from_str(&body).map_err(TranslateError::Parse)?;

        if let Some(status) = parsed.response_status.as_ref().and_then(non_ok_status) {
            return Err(TranslateError::ApiStatus(status));
        }

        let translated = parsed
            .response_data
            .and_then(|data| data.translated_text)
            .filter(|t| !t.is_empty())
            .ok_or(TranslateError::Missing)?;

        if translated == text {
            return Err(TranslateError::Unchanged);
        }

        Ok(translated)
    }

    fn classify(&self, error: reqwest::Error) -> TranslateError {
        if error.is_timeout() {
            TranslateError::Timeout(self.timeout)
        } else {
            TranslateError::Transport(error)
        }
    }
}

impl Translate for HttpTranslator {
    async fn translate(&self, text: &str, target_api_code: &str) -> String {
        if text.chars().count() < MIN_TRANSLATABLE_CHARS {
            self.stats.record_skipped_short();
            debug!("Skipping short string {:?}", text);
            return text.to_string();
        }

        self.stats.record_api_call();

        match self.request(text, target_api_code).await {
            Ok(translated) => {
                let validation = PlaceholderValidator::validate(text, &translated);
                if !validation.is_clean() {
                    self.stats.record_placeholder_warning();
                    warn!(
                        "Placeholder check for {} failed on {:?}: {:?} {:?}",
                        target_api_code, text, validation.errors, validation.warnings
                    );
                }
                self.stats.record_translated();
                translated
            }
            Err(TranslateError::Unchanged) => {
                self.stats.record_fallback();
                debug!("API echoed input for {}, keeping original", target_api_code);
                text.to_string()
            }
            Err(e) => {
                self.stats.record_fallback();
                warn!(
                    "Translation to {} failed, keeping original: {}",
                    target_api_code, e
                );
                text.to_string()
            }
        }
    }
}

/// Returns the status as a string when the API reported anything but 200
fn non_ok_status(status: &serde_json::Value) -> Option<String> {
    let code = match status {
        serde_json::Value::Number(n) => n.as_u64(),
        serde_json::Value::String(s) => s.trim().parse::<u64>().ok(),
        serde_json::Value::Null => return None,
        _ => None,
    };

    match code {
        Some(200) => None,
        Some(other) => Some(other.to_string()),
        None => Some(status.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::{
        matchers::{method, path, query_param},
        Mock, MockServer, ResponseTemplate,
    };

    fn create_test_translator(api_url: &str) -> HttpTranslator {
        let config = Config {
            api_url: api_url.to_string(),
            request_timeout: Duration::from_secs(2),
            ..Config::default()
        };
        HttpTranslator::new(reqwest::Client::new(), &config)
    }

    fn create_api_response(translated: &str) -> serde_json::Value {
        serde_json::json!({
            "responseData": {
                "translatedText": translated,
                "match": 0.98
            },
            "responseStatus": 200,
            "matches": []
        })
    }

    // ==================== Fast Path Tests ====================

    #[tokio::test]
    async fn test_short_strings_skip_network() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(create_api_response("x")))
            .expect(0)
            .mount(&mock_server)
            .await;

        let translator = create_test_translator(&format!("{}/get", mock_server.uri()));

        assert_eq!(translator.translate("", "es").await, "");
        assert_eq!(translator.translate("A", "es").await, "A");
        assert_eq!(translator.translate("é", "es").await, "é");
        assert_eq!(translator.stats().skipped_short(), 3);
        assert_eq!(translator.stats().api_calls(), 0);
    }

    // ==================== Success Tests ====================

    #[tokio::test]
    async fn test_translate_success_sends_query() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/get"))
            .and(query_param("q", "Cast your vote"))
            .and(query_param("langpair", "en|zh-CN"))
            .respond_with(ResponseTemplate::new(200).set_body_json(create_api_response("投票")))
            .expect(1)
            .mount(&mock_server)
            .await;

        let translator = create_test_translator(&format!("{}/get", mock_server.uri()));
        let result = translator.translate("Cast your vote", "zh-CN").await;

        assert_eq!(result, "投票");
        assert_eq!(translator.stats().translated(), 1);
    }

    #[tokio::test]
    async fn test_translate_sends_email_when_configured() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(query_param("de", "ops@example.com"))
            .respond_with(ResponseTemplate::new(200).set_body_json(create_api_response("Hola")))
            .expect(1)
            .mount(&mock_server)
            .await;

        let config = Config {
            api_url: format!("{}/get", mock_server.uri()),
            api_email: Some("ops@example.com".to_string()),
            ..Config::default()
        };
        let translator = HttpTranslator::new(reqwest::Client::new(), &config);

        assert_eq!(translator.translate("Hello", "es").await, "Hola");
    }

    #[tokio::test]
    async fn test_translate_accepts_placeholder_loss_but_counts_it() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(create_api_response("Hola nombre")),
            )
            .mount(&mock_server)
            .await;

        let translator = create_test_translator(&format!("{}/get", mock_server.uri()));
        let result = translator.translate("Hello {{name}}", "es").await;

        assert_eq!(result, "Hola nombre");
        assert_eq!(translator.stats().placeholder_warnings(), 1);
    }

    // ==================== Fallback Tests ====================

    #[tokio::test]
    async fn test_translate_echo_keeps_original() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(create_api_response("Welcome")))
            .mount(&mock_server)
            .await;

        let translator = create_test_translator(&format!("{}/get", mock_server.uri()));

        assert_eq!(translator.translate("Welcome", "fr").await, "Welcome");
        assert_eq!(translator.stats().fallbacks(), 1);
        assert_eq!(translator.stats().translated(), 0);
    }

    #[tokio::test]
    async fn test_translate_server_error_keeps_original() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500).set_body_string("Internal Server Error"))
            .expect(1)
            .mount(&mock_server)
            .await;

        let translator = create_test_translator(&format!("{}/get", mock_server.uri()));

        // No retry inside the client: exactly one request
        assert_eq!(translator.translate("Results", "de").await, "Results");
    }

    #[tokio::test]
    async fn test_translate_invalid_json_keeps_original() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&mock_server)
            .await;

        let translator = create_test_translator(&format!("{}/get", mock_server.uri()));
        assert_eq!(translator.translate("Ballot", "it").await, "Ballot");
    }

    #[tokio::test]
    async fn test_translate_missing_field_keeps_original() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({ "responseData": {} })),
            )
            .mount(&mock_server)
            .await;

        let translator = create_test_translator(&format!("{}/get", mock_server.uri()));
        assert_eq!(translator.translate("Ballot", "it").await, "Ballot");
    }

    #[tokio::test]
    async fn test_translate_quota_status_keeps_original() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "responseData": {
                    "translatedText": "MYMEMORY WARNING: YOU USED ALL AVAILABLE FREE TRANSLATIONS FOR TODAY"
                },
                "responseStatus": "429"
            })))
            .mount(&mock_server)
            .await;

        let translator = create_test_translator(&format!("{}/get", mock_server.uri()));
        assert_eq!(translator.translate("Ballot", "it").await, "Ballot");
        assert_eq!(translator.stats().fallbacks(), 1);
    }

    #[tokio::test]
    async fn test_translate_timeout_keeps_original() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(create_api_response("Bienvenue"))
                    .set_delay(Duration::from_millis(500)),
            )
            .mount(&mock_server)
            .await;

        let config = Config {
            api_url: format!("{}/get", mock_server.uri()),
            request_timeout: Duration::from_millis(100),
            ..Config::default()
        };
        let translator = HttpTranslator::new(reqwest::Client::new(), &config);

        assert_eq!(translator.translate("Welcome", "fr").await, "Welcome");
    }

    #[tokio::test]
    async fn test_translate_connection_refused_keeps_original() {
        // Port 9 (discard) is essentially never listening on test hosts
        let translator = create_test_translator("http://127.0.0.1:9/get");
        assert_eq!(translator.translate("Welcome", "fr").await, "Welcome");
        assert_eq!(translator.stats().api_calls(), 1);
        assert_eq!(translator.stats().fallbacks(), 1);
    }

    // ==================== Status Parsing Tests ====================

    #[test]
    fn test_non_ok_status() {
        assert_eq!(non_ok_status(&serde_json::json!(200)), None);
        assert_eq!(non_ok_status(&serde_json::json!("200")), None);
        assert_eq!(non_ok_status(&serde_json::Value::Null), None);
        assert_eq!(non_ok_status(&serde_json::json!(403)), Some("403".to_string()));
        assert_eq!(non_ok_status(&serde_json::json!("429")), Some("429".to_string()));
        assert!(non_ok_status(&serde_json::json!(true)).is_some());
    }

    #[test]
    fn test_error_messages() {
        assert!(TranslateError::Timeout(Duration::from_secs(10))
            .to_string()
            .contains("timed out"));
        assert!(TranslateError::ApiStatus("429".to_string())
            .to_string()
            .contains("429"));
    }
}
