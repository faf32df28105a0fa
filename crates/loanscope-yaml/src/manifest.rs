//! YAML manifest types for loanscope dashboards.

use crate::error::ParseError;
use loanscope_core::config::default_charts;
use loanscope_core::{ChartKind, ChartSpec};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Manifest format version written by [`Manifest::default_dashboard`].
pub const MANIFEST_VERSION: &str = "0.1";

/// Dashboard manifest loaded from `dashboard.yaml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Manifest {
    /// Manifest format version
    pub loanscope: String,
    /// Dashboard name
    pub name: String,
    /// Dashboard description
    #[serde(default)]
    pub description: String,
    /// Dataset to load
    pub data: DataSource,
    /// Charts, in rendering order
    #[serde(default = "default_charts")]
    pub charts: Vec<ChartSpec>,
}

/// Data source configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataSource {
    /// Source URI (`file://` or a bare path)
    pub source: String,
    /// Data format
    #[serde(default = "default_format")]
    pub format: String,
}

fn default_format() -> String {
    "json".to_string()
}

impl Manifest {
    /// The standard credit-decision dashboard over `source`.
    pub fn default_dashboard(source: impl Into<String>) -> Self {
        Self {
            loanscope: MANIFEST_VERSION.to_string(),
            name: "Credit decisions".to_string(),
            description: String::new(),
            data: DataSource {
                source: source.into(),
                format: default_format(),
            },
            charts: default_charts(),
        }
    }

    /// Parse and validate a manifest from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the YAML is invalid or the manifest fails
    /// [`Manifest::validate`].
    pub fn from_yaml(yaml: &str) -> Result<Self, ParseError> {
        let manifest: Self = serde_yaml_ng::from_str(yaml)?;
        manifest.validate()?;
        Ok(manifest)
    }

    /// Serialize manifest to YAML string.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_yaml(&self) -> Result<String, serde_yaml_ng::Error> {
        serde_yaml_ng::to_string(self)
    }

    /// Look up a chart by id.
    #[must_use]
    pub fn chart(&self, id: &str) -> Option<&ChartSpec> {
        self.charts.iter().find(|c| c.id == id)
    }

    /// Check the manifest for values the engine cannot work with.
    ///
    /// # Errors
    ///
    /// Returns the first problem found.
    pub fn validate(&self) -> Result<(), ParseError> {
        if self.name.trim().is_empty() {
            return Err(ParseError::MissingField("name"));
        }
        if self.data.source.trim().is_empty() {
            return Err(ParseError::MissingField("data.source"));
        }

        let mut seen = HashSet::new();
        for (index, chart) in self.charts.iter().enumerate() {
            if chart.id.trim().is_empty() {
                return Err(ParseError::EmptyChartId { index });
            }
            if !seen.insert(chart.id.as_str()) {
                return Err(ParseError::DuplicateChartId {
                    id: chart.id.clone(),
                });
            }
            if let Some((field, reason)) = chart_problem(&chart.kind) {
                return Err(ParseError::InvalidChart {
                    index,
                    id: chart.id.clone(),
                    field,
                    reason,
                });
            }
        }
        Ok(())
    }
}

/// First unusable setting of a chart, as `(field, reason)`.
fn chart_problem(kind: &ChartKind) -> Option<(&'static str, &'static str)> {
    match kind {
        ChartKind::Rollup(spec) if spec.top_k == Some(0) => Some(("top_k", "must be positive")),
        ChartKind::Histogram(spec) => {
            if spec.bins == 0 {
                Some(("bins", "must be positive"))
            } else if spec.split_values.is_empty() {
                Some(("split_values", "must not be empty"))
            } else if spec
                .domain_cap
                .is_some_and(|cap| !cap.is_finite() || cap <= 0.0)
            {
                Some(("domain_cap", "must be a positive number"))
            } else {
                None
            }
        }
        ChartKind::Flow(spec) if spec.stages.len() < 2 => {
            Some(("stages", "needs at least two stages"))
        }
        ChartKind::Table(spec) if spec.limit == 0 => Some(("limit", "must be positive")),
        _ => None,
    }
}
