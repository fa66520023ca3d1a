//! Batch orchestration: translate the source pack into every target language.
//!
//! Languages are processed strictly one after another. Each one moves
//! through `Pending -> Skipped` (a previous run already translated it) or
//! `Pending -> InProgress -> Saved | Failed`. A failure is contained to its
//! language; the batch always continues with the next one.

use crate::bundle::{count_leaves, same_shape, BundleTranslator, KeyPath, LanguagePack};
use crate::config::Config;
use crate::i18n::{LanguageDescriptor, StatsReport};
use crate::pace::Pace;
use crate::store::{load_source, BundleStore, FsBundleStore};
use crate::translation::{HttpTranslator, Translate};
use anyhow::{bail, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashSet;
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tracing::{debug, error, info, warn};

/// Where a language is in its run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LanguageState {
    Pending,
    Skipped,
    InProgress,
    Saved,
    Failed,
}

impl LanguageState {
    fn can_transition_to(self, next: LanguageState) -> bool {
        matches!(
            (self, next),
            (LanguageState::Pending, LanguageState::Skipped)
                | (LanguageState::Pending, LanguageState::InProgress)
                | (LanguageState::InProgress, LanguageState::Saved)
                | (LanguageState::InProgress, LanguageState::Failed)
        )
    }

    fn is_terminal(self) -> bool {
        matches!(
            self,
            LanguageState::Skipped | LanguageState::Saved | LanguageState::Failed
        )
    }
}

/// Final state of one language in a batch.
#[derive(Debug, Clone, Serialize)]
pub struct LanguageOutcome {
    pub code: String,
    pub name: String,
    pub state: LanguageState,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl LanguageOutcome {
    fn new(language: &LanguageDescriptor) -> Self {
        Self {
            code: language.code.clone(),
            name: language.name.clone(),
            state: LanguageState::Pending,
            error: None,
        }
    }

    fn advance(&mut self, next: LanguageState) {
        debug_assert!(
            self.state.can_transition_to(next),
            "illegal transition {:?} -> {:?} for {}",
            self.state,
            next,
            self.code
        );
        debug!("[{}] {:?} -> {:?}", self.code, self.state, next);
        self.state = next;
    }
}

/// Which languages a previous run already finished.
///
/// Built once at batch start from the files on disk and handed to the
/// orchestrator explicitly.
#[derive(Debug, Clone, Default)]
pub struct ResumeIndex {
    completed: HashSet<String>,
}

impl ResumeIndex {
    /// Nothing is complete; every language is translated.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Inspect existing output files.
    ///
    /// A language counts as complete when its file exists and the canary
    /// field holds something other than the source's value for that field.
    /// A file still carrying the source value means an earlier run saved
    /// untranslated text (or never got past the first key) and is redone.
    /// Files without the canary, or that cannot be read, are redone too.
    pub fn scan<S: BundleStore>(
        store: &S,
        languages: &[LanguageDescriptor],
        source: &LanguagePack,
        canary: &KeyPath,
    ) -> Self {
        let mut index = Self::empty();

        let Some(source_canary) = canary.lookup(source) else {
            warn!(
                "Source pack has no canary field '{}'; no language will be skipped",
                canary
            );
            return index;
        };

        for language in languages {
            match store.load(&language.code) {
                Ok(Some(existing)) => match canary.lookup(&existing) {
                    Some(value) if value != source_canary => {
                        index.completed.insert(language.code.clone());
                    }
                    Some(_) => debug!(
                        "[{}] '{}' still untranslated, will retranslate",
                        language.code, canary
                    ),
                    None => debug!(
                        "[{}] existing file has no '{}', will retranslate",
                        language.code, canary
                    ),
                },
                Ok(None) => {}
                Err(e) => warn!(
                    "[{}] ignoring unreadable existing bundle: {:#}",
                    language.code, e
                ),
            }
        }

        index
    }

    pub fn is_complete(&self, code: &str) -> bool {
        self.completed.contains(code)
    }
}

/// Summary of one batch run.
#[derive(Debug, Clone, Serialize)]
pub struct BatchReport {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub elapsed_secs: f64,

    /// Pacing time alone for the languages actually translated
    pub estimated_pacing_secs: f64,
    pub strings_per_language: usize,

    pub saved: usize,
    pub skipped: usize,
    pub failed: usize,
    pub outcomes: Vec<LanguageOutcome>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub translation: Option<StatsReport>,
}

impl BatchReport {
    pub fn with_translation_stats(mut self, stats: StatsReport) -> Self {
        self.translation = Some(stats);
        self
    }

    /// Codes of the languages that ended in `state`, in batch order.
    pub fn codes_in(&self, state: LanguageState) -> Vec<&str> {
        self.outcomes
            .iter()
            .filter(|o| o.state == state)
            .map(|o| o.code.as_str())
            .collect()
    }

    pub fn log_summary(&self) {
        info!("========== Translation batch complete ==========");
        info!(
            "Translated: {}, skipped: {}, failed: {} (of {} languages)",
            self.saved,
            self.skipped,
            self.failed,
            self.outcomes.len()
        );
        info!(
            "Elapsed: {} ({} strings per language, ~{} of pacing)",
            format_duration(self.elapsed_secs),
            self.strings_per_language,
            format_duration(self.estimated_pacing_secs)
        );
        if let Some(stats) = &self.translation {
            info!(
                "API calls: {}, translated: {}, fallbacks: {}, short strings: {}, placeholder warnings: {} ({:.1}% success)",
                stats.api_calls,
                stats.translated,
                stats.fallbacks,
                stats.skipped_short,
                stats.placeholder_warnings,
                stats.success_rate
            );
        }
        let failed = self.codes_in(LanguageState::Failed);
        if !failed.is_empty() {
            warn!("Failed languages: {}", failed.join(", "));
        }
    }
}

/// Drives the translation of one source pack into many languages.
pub struct BatchOrchestrator<'a, T, S> {
    translator: &'a T,
    store: &'a S,
    pace: Pace,
    milestone_every: usize,
}

impl<'a, T, S> BatchOrchestrator<'a, T, S>
where
    T: Translate + Sync,
    S: BundleStore,
{
    pub fn new(translator: &'a T, store: &'a S, pace: Pace) -> Self {
        Self {
            translator,
            store,
            pace,
            milestone_every: 5,
        }
    }

    /// Log a milestone summary after every `every` saved languages.
    pub fn with_milestone_every(mut self, every: usize) -> Self {
        self.milestone_every = every.max(1);
        self
    }

    pub async fn run_batch(
        &self,
        source: &LanguagePack,
        languages: &[LanguageDescriptor],
        resume: &ResumeIndex,
    ) -> BatchReport {
        let started_at = Utc::now();
        let start = Instant::now();

        let strings = count_leaves(source);
        let pending = languages
            .iter()
            .filter(|l| !resume.is_complete(&l.code))
            .count();
        info!(
            "Starting batch: {} languages ({} already done), {} strings each, estimated ~{}",
            languages.len(),
            languages.len() - pending,
            strings,
            format_duration(pacing_secs(strings, self.pace, pending))
        );

        let bundle = BundleTranslator::new(self.translator, self.pace);
        let total = languages.len();
        let mut outcomes = Vec::with_capacity(total);
        let (mut saved, mut skipped, mut failed) = (0usize, 0usize, 0usize);

        for (index, language) in languages.iter().enumerate() {
            let mut outcome = LanguageOutcome::new(language);
            let position = index + 1;

            if resume.is_complete(&language.code) {
                outcome.advance(LanguageState::Skipped);
                skipped += 1;
                info!(
                    "[{}/{}] Skipping {} ({}): already translated",
                    position, total, language.name, language.code
                );
                outcomes.push(outcome);
                continue;
            }

            outcome.advance(LanguageState::InProgress);
            info!(
                "[{}/{}] Translating {} ({})...",
                position, total, language.name, language.code
            );

            match self.translate_language(&bundle, source, language).await {
                Ok(path) => {
                    outcome.advance(LanguageState::Saved);
                    saved += 1;
                    info!(
                        "[{}/{}] Saved {} to {} ({} completed)",
                        position,
                        total,
                        language.code,
                        path.display(),
                        saved
                    );
                    if saved % self.milestone_every == 0 {
                        info!(
                            "Milestone: {} languages translated, {} skipped, {} failed, {} remaining",
                            saved,
                            skipped,
                            failed,
                            total - position
                        );
                    }
                }
                Err(e) => {
                    outcome.advance(LanguageState::Failed);
                    outcome.error = Some(format!("{:#}", e));
                    failed += 1;
                    error!(
                        "[{}/{}] Failed to translate {} ({}): {:#}",
                        position, total, language.name, language.code, e
                    );
                }
            }

            debug_assert!(
                outcome.state.is_terminal(),
                "{} left in {:?}",
                outcome.code,
                outcome.state
            );
            outcomes.push(outcome);
        }

        let elapsed = start.elapsed();
        BatchReport {
            started_at,
            finished_at: Utc::now(),
            elapsed_secs: elapsed.as_secs_f64(),
            estimated_pacing_secs: pacing_secs(strings, self.pace, saved + failed),
            strings_per_language: strings,
            saved,
            skipped,
            failed,
            outcomes,
            translation: None,
        }
    }

    async fn translate_language(
        &self,
        bundle: &BundleTranslator<'_, T>,
        source: &LanguagePack,
        language: &LanguageDescriptor,
    ) -> Result<PathBuf> {
        let translated = bundle.translate_bundle(source, language).await;

        if !same_shape(source, &translated) {
            bail!("Translated pack for {} does not match the source structure", language.code);
        }

        self.store.save(&language.code, &translated)?;
        Ok(self.store.path_for(&language.code))
    }
}

/// Delete every target language's output file before a forced run.
///
/// Returns how many files were removed. Any failure aborts: a forced run
/// must not start with stale bundles still present.
pub fn force_clear<S: BundleStore>(store: &S, languages: &[LanguageDescriptor]) -> Result<usize> {
    let mut removed = 0;
    for language in languages {
        if store.remove(&language.code)? {
            debug!("Deleted {}", store.path_for(&language.code).display());
            removed += 1;
        }
    }
    info!(
        "Force mode: deleted {} existing bundles ({} languages)",
        removed,
        languages.len()
    );
    Ok(removed)
}

/// Whether a run may skip already translated languages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    /// Skip languages a previous run finished
    Resume,
    /// Delete all existing bundles first and translate everything
    Force,
}

/// Run a complete batch as configured: load the source, resolve languages,
/// apply the run mode, translate, and log the summary.
///
/// Only startup problems (bad configuration, unreadable source, failed
/// force deletion) are returned as errors; per-language failures are in the report.
pub async fn run(config: &Config, mode: RunMode) -> Result<BatchReport> {
    let source = load_source(&config.source_file)?;
    let languages = config.target_languages()?;
    let store = FsBundleStore::new(&config.output_dir);
    let canary = KeyPath::parse(&config.canary_key);

    info!(
        "Loaded {} ({} strings); writing to {}",
        config.source_file.display(),
        count_leaves(&source),
        store.dir().display()
    );

    let resume = match mode {
        RunMode::Force => {
            force_clear(&store, &languages)?;
            ResumeIndex::empty()
        }
        RunMode::Resume => ResumeIndex::scan(&store, &languages, &source, &canary),
    };

    let translator = HttpTranslator::new(reqwest::Client::new(), config);
    let pace = Pace::fixed(config.pace_interval);

    let report = BatchOrchestrator::new(&translator, &store, pace)
        .with_milestone_every(config.milestone_every)
        .run_batch(&source, &languages, &resume)
        .await
        .with_translation_stats(translator.stats().report());

    report.log_summary();
    Ok(report)
}

fn pacing_secs(strings: usize, pace: Pace, languages: usize) -> f64 {
    pace.interval().as_secs_f64() * strings as f64 * languages as f64
}

fn format_duration(secs: f64) -> String {
    let duration = Duration::from_secs_f64(secs.max(0.0));
    let total = duration.as_secs();
    if total >= 3600 {
        format!("{}h {:02}m", total / 3600, (total % 3600) / 60)
    } else if total >= 60 {
        format!("{}m {:02}s", total / 60, total % 60)
    } else {
        format!("{:.1}s", duration.as_secs_f64())
    }
}
