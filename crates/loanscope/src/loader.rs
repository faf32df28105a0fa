//! Dataset loading.
//!
//! Loading is the one blocking step of a dashboard: it reads the raw rows,
//! normalizes them once, and hands out an immutable [`Dataset`].

use loanscope_core::{normalize, NormalizeError, Record};
use loanscope_yaml::DataSource;
use serde_json::Value;
use std::io::Read;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

/// Errors that can occur while loading a dataset.
#[derive(Debug, Error)]
pub enum LoadError {
    /// Reading the source failed.
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The source is not valid JSON.
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// The JSON does not have the shape of a row sequence.
    #[error("invalid dataset: {0}")]
    Normalize(#[from] NormalizeError),

    /// URI scheme other than `file://`.
    #[error("unsupported data source: {0}")]
    UnsupportedSource(String),

    /// Format other than `json`.
    #[error("unsupported data format: {0}")]
    UnsupportedFormat(String),
}

/// Normalized records in load order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Dataset {
    records: Vec<Record>,
}

impl Dataset {
    /// Wrap already-normalized records.
    #[must_use]
    pub fn from_records(records: Vec<Record>) -> Self {
        Self { records }
    }

    /// Normalize a parsed JSON value.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::Normalize`] if `raw` is not an array of objects.
    pub fn from_value(raw: &Value) -> Result<Self, LoadError> {
        let records = normalize(raw)?;
        info!(records = records.len(), "dataset normalized");
        Ok(Self { records })
    }

    /// Parse and normalize a JSON document.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not JSON or not a row sequence.
    pub fn from_json_str(json: &str) -> Result<Self, LoadError> {
        let raw: Value = serde_json::from_str(json)?;
        Self::from_value(&raw)
    }

    /// Parse and normalize a JSON document from a reader.
    ///
    /// # Errors
    ///
    /// Returns an error if reading or parsing fails, or the document is not a
    /// row sequence.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, LoadError> {
        let raw: Value = serde_json::from_reader(reader)?;
        Self::from_value(&raw)
    }

    /// Load the dataset named by a manifest's data source.
    ///
    /// Accepts `file://` URIs and bare paths. Only the `json` format is read.
    ///
    /// # Errors
    ///
    /// Returns an error for other schemes or formats, unreadable files, and
    /// malformed content.
    pub fn load(source: &DataSource) -> Result<Self, LoadError> {
        if !source.format.eq_ignore_ascii_case("json") {
            return Err(LoadError::UnsupportedFormat(source.format.clone()));
        }
        let path = local_path(&source.source)?;
        info!(path = %path.display(), "loading dataset");

        let file = std::fs::File::open(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_reader(std::io::BufReader::new(file))
    }

    /// Records in load order.
    #[must_use]
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Check whether the dataset has no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

fn local_path(uri: &str) -> Result<&Path, LoadError> {
    if let Some(path) = uri.strip_prefix("file://") {
        return Ok(Path::new(path));
    }
    match uri.split_once("://") {
        Some(_) => Err(LoadError::UnsupportedSource(uri.to_string())),
        None => Ok(Path::new(uri)),
    }
}
