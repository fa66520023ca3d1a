//! Language metadata and translation quality tooling.
//!
//! # Architecture
//!
//! - `registry`: Single source of truth for every language a pack can be translated into
//! - `validator`: Placeholder preservation checks for translated strings
//! - `metrics`: Per-run translation counters
//!
//! # Example
//!
//! ```rust,ignore
//! use langpack_translator::i18n::LanguageRegistry;
//!
//! let targets = LanguageRegistry::get().targets("en");
//! let subset = LanguageRegistry::get().select(&["es", "fr"], "en")?;
//! ```

mod metrics;
mod registry;
mod validator;

pub use metrics::{StatsReport, TranslationStats};
pub use registry::{LanguageDescriptor, LanguageRegistry};
pub use validator::{PlaceholderValidator, ValidationReport};
