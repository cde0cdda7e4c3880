//! Merged string-table catalog.
//!
//! Localization text ships as many separate string-table files. They merge
//! into one flat key -> text map; when two files define the same key, the
//! file processed later wins. That override behavior is intentional in the
//! source data (later, more specific tables shadow generic ones), so the
//! merge must stay silent and order-sensitive. The merge order is the
//! directory iteration order, not a sorted order.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde_json::Value;

use crate::tables::{read_json, LoadError};

/// Read-only after construction; shared by reference across every
/// resolution step.
#[derive(Debug, Default, Clone)]
pub struct StringCatalog {
    entries: HashMap<String, String>,
}

/// Per-file merge report, for status output.
#[derive(Debug, Clone)]
pub struct MergeReport {
    pub file: String,
    pub strings: usize,
}

impl StringCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge every `.json` string table in a directory, in the order the
    /// filesystem yields entries. Returns the catalog and one report per
    /// merged file.
    pub fn load_dir(dir: &Path) -> Result<(Self, Vec<MergeReport>), LoadError> {
        let mut catalog = StringCatalog::new();
        let mut reports = Vec::new();

        let entries = fs::read_dir(dir).map_err(|source| LoadError::Io {
            path: dir.to_path_buf(),
            source,
        })?;
        for entry in entries {
            let entry = entry.map_err(|source| LoadError::Io {
                path: dir.to_path_buf(),
                source,
            })?;
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            let strings = catalog.merge_file(&path)?;
            reports.push(MergeReport {
                file: entry.file_name().to_string_lossy().into_owned(),
                strings,
            });
        }

        Ok((catalog, reports))
    }

    /// Merge one string-table file; later keys overwrite earlier ones.
    /// Returns the number of pairs taken from the file.
    pub fn merge_file(&mut self, path: &Path) -> Result<usize, LoadError> {
        let doc = read_json(path)?;
        Ok(self.merge_document(&doc))
    }

    /// Merge the `[key, text]` pairs of a parsed string-table export.
    pub fn merge_document(&mut self, doc: &Value) -> usize {
        let mut merged = 0;
        let Some(exports) = doc.get("Exports").and_then(Value::as_array) else {
            return 0;
        };
        for export in exports {
            let Some(pairs) = export
                .get("Table")
                .and_then(|t| t.get("Value"))
                .and_then(Value::as_array)
            else {
                continue;
            };
            for pair in pairs {
                let Some(pair) = pair.as_array() else { continue };
                if pair.len() != 2 {
                    continue;
                }
                if let (Some(key), Some(text)) = (pair[0].as_str(), pair[1].as_str()) {
                    self.insert(key, text);
                    merged += 1;
                }
            }
        }
        merged
    }

    pub fn insert(&mut self, key: impl Into<String>, text: impl Into<String>) {
        self.entries.insert(key.into(), text.into());
    }

    /// Missing keys are a normal case; callers fall back, they do not error.
    pub fn lookup(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// First text whose key ends with `suffix`. Linear scan over the whole
    /// catalog; the last line of defense for inconsistent key conventions.
    pub fn find_by_suffix(&self, suffix: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(key, _)| key.ends_with(suffix))
            .map(|(_, text)| text.as_str())
    }

    /// Every `(key, text)` pair whose key ends with `suffix`, for
    /// diagnostics.
    pub fn suffix_matches(&self, suffix: &str) -> Vec<(&str, &str)> {
        let mut matches: Vec<(&str, &str)> = self
            .entries
            .iter()
            .filter(|(key, _)| key.ends_with(suffix))
            .map(|(key, text)| (key.as_str(), text.as_str()))
            .collect();
        matches.sort_unstable();
        matches
    }

    /// Case-insensitive variant of [`find_by_suffix`](Self::find_by_suffix).
    pub fn find_by_suffix_ci(&self, suffix: &str) -> Option<&str> {
        let suffix = suffix.to_lowercase();
        self.entries
            .iter()
            .find(|(key, _)| key.to_lowercase().ends_with(&suffix))
            .map(|(_, text)| text.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
