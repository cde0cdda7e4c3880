//! Data table document loading.
//!
//! Every source table is a JSON export wrapper: an `Exports` array whose
//! entries may carry a `Table` with row `Data`. Documents also carry an
//! `Imports` array referenced by index from some properties (use effects).

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value;
use thiserror::Error;

use crate::property::RawRecord;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("table file not found under {dir}: {file}")]
    Missing { dir: PathBuf, file: String },
}

/// A loaded data table: flattened rows plus the document's import names.
#[derive(Debug, Default)]
pub struct TableDocument {
    pub rows: Vec<RawRecord>,
    pub imports: Vec<String>,
}

impl TableDocument {
    /// Load a table file and flatten every export's `Table.Data` rows.
    pub fn load(path: &Path) -> Result<Self, LoadError> {
        let doc = read_json(path)?;
        Ok(Self::from_value(&doc))
    }

    /// Extract rows and imports from an already-parsed export document.
    pub fn from_value(doc: &Value) -> Self {
        let mut rows = Vec::new();
        if let Some(exports) = doc.get("Exports").and_then(Value::as_array) {
            for export in exports {
                let Some(data) = export
                    .get("Table")
                    .and_then(|t| t.get("Data"))
                    .and_then(Value::as_array)
                else {
                    continue;
                };
                for row in data {
                    let Some(name) = row.get("Name").and_then(Value::as_str) else {
                        continue;
                    };
                    let properties = row.get("Value").cloned().unwrap_or(Value::Null);
                    rows.push(RawRecord::new(name, properties));
                }
            }
        }

        let imports = doc
            .get("Imports")
            .and_then(Value::as_array)
            .map(|imports| {
                imports
                    .iter()
                    .filter_map(|imp| imp.get("ObjectName").and_then(Value::as_str))
                    .map(String::from)
                    .collect()
            })
            .unwrap_or_default();

        TableDocument { rows, imports }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Read and parse one JSON document.
pub fn read_json(path: &Path) -> Result<Value, LoadError> {
    let contents = fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&contents).map_err(|source| LoadError::Json {
        path: path.to_path_buf(),
        source,
    })
}

/// Locate a table file by name anywhere under the source tree.
///
/// Export layouts have moved files between flat and nested directories
/// across game versions, so the search walks the whole tree and takes the
/// first match.
pub fn find_table_file(source_dir: &Path, file_name: &str) -> Result<PathBuf, LoadError> {
    let direct = source_dir.join(file_name);
    if direct.is_file() {
        return Ok(direct);
    }
    for entry in walkdir::WalkDir::new(source_dir)
        .into_iter()
        .filter_map(Result::ok)
    {
        if entry.file_type().is_file() && entry.file_name().to_str() == Some(file_name) {
            return Ok(entry.into_path());
        }
    }
    Err(LoadError::Missing {
        dir: source_dir.to_path_buf(),
        file: file_name.to_string(),
    })
}
