//! Recursive language-pack translation.
//!
//! A language pack is a JSON object tree. String leaves are translated one
//! at a time in key order; nested objects are walked recursively; every
//! other value (numbers, booleans, null, arrays) is copied through as-is.

use crate::i18n::LanguageDescriptor;
use crate::pace::Pace;
use crate::translation::Translate;
use futures::future::BoxFuture;
use serde_json::{Map, Value};
use tracing::info;

/// A language pack document (key order preserved)
pub type LanguagePack = Map<String, Value>;

/// Maximum characters of source/translation shown on per-leaf progress lines
const PREVIEW_CHARS: usize = 40;

/// Walks a language pack and translates every string leaf.
pub struct BundleTranslator<'a, T> {
    translator: &'a T,
    pace: Pace,
}

impl<'a, T> BundleTranslator<'a, T>
where
    T: Translate + Sync,
{
    pub fn new(translator: &'a T, pace: Pace) -> Self {
        Self { translator, pace }
    }

    /// Translate every string leaf of `pack` into `language`.
    ///
    /// Leaves are awaited strictly in order, and the pace interval elapses
    /// after each string leaf whether or not the API was actually called.
    /// The result always has the same shape as the input.
    pub async fn translate_bundle(
        &self,
        pack: &LanguagePack,
        language: &LanguageDescriptor,
    ) -> LanguagePack {
        self.translate_node(pack, language, String::new()).await
    }

    fn translate_node<'b>(
        &'b self,
        node: &'b LanguagePack,
        language: &'b LanguageDescriptor,
        prefix: String,
    ) -> BoxFuture<'b, LanguagePack> {
        Box::pin(async move {
            let mut translated = Map::with_capacity(node.len());

            for (key, value) in node {
                let path = if prefix.is_empty() {
                    key.clone()
                } else {
                    format!("{}.{}", prefix, key)
                };

                let output = match value {
                    Value::String(text) => {
                        let result = self.translator.translate(text, &language.api_code).await;
                        info!(
                            "[{}] {}: \"{}\" -> \"{}\"",
                            language.code,
                            path,
                            truncate(text, PREVIEW_CHARS),
                            truncate(&result, PREVIEW_CHARS)
                        );
                        self.pace.wait().await;
                        Value::String(result)
                    }
                    Value::Object(child) => {
                        Value::Object(self.translate_node(child, language, path).await)
                    }
                    other => other.clone(),
                };

                translated.insert(key.clone(), output);
            }

            translated
        })
    }
}

/// Number of string leaves in a pack, i.e. the number of translate calls a run makes.
pub fn count_leaves(node: &LanguagePack) -> usize {
    node.values()
        .map(|value| match value {
            Value::String(_) => 1,
            Value::Object(child) => count_leaves(child),
            _ => 0,
        })
        .sum()
}

/// Whether `translated` is structurally identical to `source`.
///
/// Same keys in the same order at every level, strings where the source has
/// strings, and identical non-string values.
pub fn same_shape(source: &LanguagePack, translated: &LanguagePack) -> bool {
    source.len() == translated.len()
        && source
            .iter()
            .zip(translated.iter())
            .all(|((src_key, src_val), (dst_key, dst_val))| {
                src_key == dst_key
                    && match (src_val, dst_val) {
                        (Value::String(_), Value::String(_)) => true,
                        (Value::Object(a), Value::Object(b)) => same_shape(a, b),
                        (Value::String(_), _) | (Value::Object(_), _) => false,
                        (a, b) => a == b,
                    }
            })
}

/// Dotted path to a nested key, such as `common.welcome`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyPath {
    segments: Vec<String>,
}

impl KeyPath {
    pub fn parse(path: &str) -> Self {
        Self {
            segments: path
                .split('.')
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect(),
        }
    }

    /// Follow the path through nested objects.
    pub fn lookup<'v>(&self, pack: &'v LanguagePack) -> Option<&'v Value> {
        let (last, parents) = self.segments.split_last()?;
        let mut node = pack;
        for segment in parents {
            node = node.get(segment)?.as_object()?;
        }
        node.get(last)
    }
}

impl std::fmt::Display for KeyPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.segments.join("."))
    }
}

/// Shorten text to `max` characters for log output
fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        let head: String = text.chars().take(max).collect();
        format!("{}...", head)
    }
}
