//! Translation counters for one batch run.
//!
//! Unlike a process-wide singleton, a `TranslationStats` is owned by the
//! translator that records into it, so every run (and every test) starts
//! from zero.

use serde::Serialize;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Counters recorded by the translation client.
#[derive(Debug, Default)]
pub struct TranslationStats {
    /// Requests actually sent to the translation API
    api_calls: AtomicUsize,

    /// Calls that produced a usable, different translation
    translated: AtomicUsize,

    /// Calls that fell back to the original text (timeout, error, echo)
    fallbacks: AtomicUsize,

    /// Strings short enough to bypass the API entirely
    skipped_short: AtomicUsize,

    /// Translations accepted despite a placeholder mismatch
    placeholder_warnings: AtomicUsize,
}

impl TranslationStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_api_call(&self) {
        self.api_calls.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_translated(&self) {
        self.translated.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_fallback(&self) {
        self.fallbacks.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_skipped_short(&self) {
        self.skipped_short.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_placeholder_warning(&self) {
        self.placeholder_warnings.fetch_add(1, Ordering::Relaxed);
    }

    pub fn api_calls(&self) -> usize {
        self.api_calls.load(Ordering::Relaxed)
    }

    pub fn translated(&self) -> usize {
        self.translated.load(Ordering::Relaxed)
    }

    pub fn fallbacks(&self) -> usize {
        self.fallbacks.load(Ordering::Relaxed)
    }

    pub fn skipped_short(&self) -> usize {
        self.skipped_short.load(Ordering::Relaxed)
    }

    pub fn placeholder_warnings(&self) -> usize {
        self.placeholder_warnings.load(Ordering::Relaxed)
    }

    /// Snapshot the counters into a serializable report.
    pub fn report(&self) -> StatsReport {
        let calls = self.api_calls();
        let translated = self.translated();
        let success_rate = if calls > 0 {
            (translated as f64 / calls as f64) * 100.0
        } else {
            0.0
        };

        StatsReport {
            api_calls: calls,
            translated,
            fallbacks: self.fallbacks(),
            skipped_short: self.skipped_short(),
            placeholder_warnings: self.placeholder_warnings(),
            success_rate,
        }
    }
}

/// Point-in-time copy of `TranslationStats`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StatsReport {
    pub api_calls: usize,
    pub translated: usize,
    pub fallbacks: usize,
    pub skipped_short: usize,
    pub placeholder_warnings: usize,

    /// Share of API calls that yielded a real translation, as a percentage (0-100)
    pub success_rate: f64,
}
