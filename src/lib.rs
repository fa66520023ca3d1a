//! Bulk machine translation of the voting client's UI language packs.
//!
//! The canonical (English) pack is walked leaf by leaf, each string is sent
//! to the translation API, and the result is written as one JSON bundle per
//! target language. Runs are resumable: languages whose bundle already holds
//! a translated canary string are skipped.

pub mod batch;
pub mod bundle;
pub mod config;
pub mod i18n;
pub mod pace;
pub mod store;
pub mod translation;
