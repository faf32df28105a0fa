//! Manifest errors.
//!
//! Validation failures name the offending chart by position and id, so a
//! dashboard author can find it in a long manifest.

use thiserror::Error;

/// A manifest could not be parsed or failed validation.
#[derive(Debug, Error)]
pub enum ParseError {
    /// The document is not valid YAML or does not match the manifest shape.
    #[error("invalid manifest YAML: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),

    /// A top-level field is missing or blank.
    #[error("missing required field: {0}")]
    MissingField(&'static str),

    /// A chart has a blank id.
    #[error("chart {index} has no id")]
    EmptyChartId {
        /// Position in `charts`
        index: usize,
    },

    /// Two charts share an id, so one of them could never be rendered.
    #[error("duplicate chart id: {id}")]
    DuplicateChartId { id: String },

    /// A chart setting the engine cannot work with.
    #[error("chart {index} ({id}): {field} {reason}")]
    InvalidChart {
        /// Position in `charts`
        index: usize,
        /// Chart id
        id: String,
        /// Offending setting
        field: &'static str,
        reason: &'static str,
    },
}
