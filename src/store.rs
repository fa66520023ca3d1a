//! Persistence of per-language output bundles.
//!
//! Each language lives in `<output_dir>/<code>.json`, pretty-printed with
//! 2-space indentation. Saves are whole-document and atomic: the JSON is
//! written to a sibling temporary file and renamed over the target, so an
//! interrupted or failed write never leaves a partial bundle behind.

use crate::bundle::LanguagePack;
use anyhow::{bail, Context, Result};
use serde_json::Value;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Storage for translated language packs, keyed by internal language code.
pub trait BundleStore {
    /// Load a previously written pack. `Ok(None)` when none exists.
    fn load(&self, code: &str) -> Result<Option<LanguagePack>>;

    /// Persist a complete pack, replacing any previous one.
    fn save(&self, code: &str, pack: &LanguagePack) -> Result<()>;

    /// Delete a pack. Returns whether a file was actually removed.
    fn remove(&self, code: &str) -> Result<bool>;

    /// Where the pack for `code` lives, for log output.
    fn path_for(&self, code: &str) -> PathBuf;
}

/// Directory-backed store: one JSON file per language.
#[derive(Debug, Clone)]
pub struct FsBundleStore {
    dir: PathBuf,
}

impl FsBundleStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn temp_path_for(&self, code: &str) -> PathBuf {
        self.dir.join(format!(".{}.json.tmp", code))
    }
}

impl BundleStore for FsBundleStore {
    fn load(&self, code: &str) -> Result<Option<LanguagePack>> {
        let path = self.path_for(code);
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(e).with_context(|| format!("Failed to read {}", path.display()))
            }
        };

        parse_pack(&content)
            .with_context(|| format!("Invalid language pack {}", path.display()))
            .map(Some)
    }

    fn save(&self, code: &str, pack: &LanguagePack) -> Result<()> {
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("Failed to create {}", self.dir.display()))?;

        let json = serde_json::to_string_pretty(pack).context("Failed to serialize language pack")?;

        let temp = self.temp_path_for(code);
        let target = self.path_for(code);

        let result = fs::write(&temp, json)
            .with_context(|| format!("Failed to write {}", temp.display()))
            .and_then(|()| {
                fs::rename(&temp, &target)
                    .with_context(|| format!("Failed to move bundle into {}", target.display()))
            });

        // Whatever reached the temp file is partial
        if result.is_err() {
            let _ = fs::remove_file(&temp);
        }
        result
    }

    fn remove(&self, code: &str) -> Result<bool> {
        let path = self.path_for(code);
        match fs::remove_file(&path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e).with_context(|| format!("Failed to delete {}", path.display())),
        }
    }

    fn path_for(&self, code: &str) -> PathBuf {
        self.dir.join(format!("{}.json", code))
    }
}

/// Read the canonical source pack.
///
/// A missing file, invalid JSON or a non-object root is fatal: nothing can be
/// translated without the source.
pub fn load_source(path: &Path) -> Result<LanguagePack> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read source language pack {}", path.display()))?;

    parse_pack(&content)
        .with_context(|| format!("Invalid source language pack {}", path.display()))
}

fn parse_pack(content: &str) -> Result<LanguagePack> {
    match serde_json::from_str::<Value>(content)? {
        Value::Object(pack) => Ok(pack),
        other => bail!("Expected a JSON object at the root, found {}", json_kind(&other)),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
