//! YAML manifest parser for loanscope dashboards.
//!
//! A manifest names the dataset to load and lists the charts to compute.
//! Charts left out of a manifest default to the standard credit-decision
//! dashboard.

mod error;
mod manifest;

pub use error::ParseError;
pub use manifest::{DataSource, Manifest, MANIFEST_VERSION};
