//! Chart definitions and their named thresholds.
//!
//! Every chart on a dashboard is a [`ChartSpec`]: an id plus a typed
//! description of which aggregation feeds it. Thresholds left out of a
//! manifest fall back to the constants below.

use crate::record::{CategoricalField, Decision, NumericField};
use serde::{Deserialize, Serialize};

/// Minimum group size for categorical rollups (groups at or below are dropped).
pub const DEFAULT_ROLLUP_MIN_SAMPLES: usize = 50;
/// Minimum group size for quantile box plots.
pub const DEFAULT_QUANTILE_MIN_SAMPLES: usize = 10;
/// Minimum bucket size for rate curves.
pub const DEFAULT_RATE_MIN_SAMPLES: usize = 5;
/// Number of largest groups kept by the commune rollup.
pub const DEFAULT_TOP_K: usize = 30;
/// Upper histogram bound for monthly income.
pub const INCOME_DOMAIN_CAP: f64 = 3_000_000.0;
/// Upper histogram bound for requested amounts.
pub const AMOUNT_DOMAIN_CAP: f64 = 10_000_000.0;
/// Rows shown by the table view.
pub const DEFAULT_TABLE_ROWS: usize = 50;
/// Bins per histogram.
pub const DEFAULT_HISTOGRAM_BINS: usize = 20;

/// Statistic used as a rollup's central value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CentralStat {
    #[default]
    Median,
    Mean,
}

/// Group-by rollup with a decision rate and a central value per group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RollupSpec {
    /// Field to group by
    pub group: CategoricalField,
    /// Decision counted by the rate
    #[serde(default = "default_positive")]
    pub positive: Decision,
    /// Field summarised by the central value
    pub central_field: NumericField,
    /// Median or mean
    #[serde(default)]
    pub central_stat: CentralStat,
    #[serde(default = "default_rollup_min_samples")]
    pub min_samples: usize,
    /// Drop the [`crate::UNKNOWN`] group
    #[serde(default)]
    pub exclude_unknown: bool,
    /// Keep only the largest `top_k` groups
    #[serde(default)]
    pub top_k: Option<usize>,
}

/// Five-number summary per group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuantileSpec {
    pub group: CategoricalField,
    pub value: NumericField,
    #[serde(default = "default_quantile_min_samples")]
    pub min_samples: usize,
}

/// Decision rate per exact value of a numeric field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateCurveSpec {
    pub bucket: NumericField,
    #[serde(default = "default_positive")]
    pub positive: Decision,
    #[serde(default = "default_rate_min_samples")]
    pub min_samples: usize,
}

/// Stacked histogram over the full dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistogramSpec {
    /// Binned field
    pub field: NumericField,
    #[serde(default = "default_bins")]
    pub bins: usize,
    /// Upper bound applied to the data extent
    #[serde(default)]
    pub domain_cap: Option<f64>,
    /// Field whose values form the stacks
    #[serde(default = "default_split")]
    pub split: CategoricalField,
    /// Stack order
    #[serde(default = "default_split_values")]
    pub split_values: Vec<String>,
}

/// Multi-stage flow between categorical fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlowSpec {
    pub stages: Vec<CategoricalField>,
}

/// First rows of the filtered view, in load order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableSpec {
    #[serde(default = "default_table_rows")]
    pub limit: usize,
}

impl Default for TableSpec {
    fn default() -> Self {
        Self {
            limit: DEFAULT_TABLE_ROWS,
        }
    }
}

/// Which aggregation feeds a chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ChartKind {
    Kpi,
    Rollup(RollupSpec),
    Quantiles(QuantileSpec),
    RateCurve(RateCurveSpec),
    Histogram(HistogramSpec),
    Flow(FlowSpec),
    Table(TableSpec),
}

impl ChartKind {
    /// Histograms are computed once at load and kept while brushing.
    #[must_use]
    pub const fn recomputes_on_filter(&self) -> bool {
        !matches!(self, Self::Histogram(_))
    }
}

/// A chart on the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSpec {
    /// Rendering target id
    pub id: String,
    #[serde(flatten)]
    pub kind: ChartKind,
}

impl ChartSpec {
    /// Create a chart spec.
    pub fn new(id: impl Into<String>, kind: ChartKind) -> Self {
        Self {
            id: id.into(),
            kind,
        }
    }
}

/// Charts of the standard credit-decision dashboard.
#[must_use]
pub fn default_charts() -> Vec<ChartSpec> {
    vec![
        ChartSpec::new("kpi-cards", ChartKind::Kpi),
        ChartSpec::new(
            "commune-chart",
            ChartKind::Rollup(RollupSpec {
                group: CategoricalField::Commune,
                positive: Decision::Rejected,
                central_field: NumericField::Income,
                central_stat: CentralStat::Median,
                min_samples: DEFAULT_ROLLUP_MIN_SAMPLES,
                exclude_unknown: true,
                top_k: Some(DEFAULT_TOP_K),
            }),
        ),
        ChartSpec::new(
            "contract-chart",
            ChartKind::Rollup(RollupSpec {
                group: CategoricalField::ContractType,
                positive: Decision::Rejected,
                central_field: NumericField::RequestedAmount,
                central_stat: CentralStat::Mean,
                min_samples: DEFAULT_QUANTILE_MIN_SAMPLES,
                exclude_unknown: false,
                top_k: None,
            }),
        ),
        ChartSpec::new(
            "nationality-chart",
            ChartKind::Quantiles(QuantileSpec {
                group: CategoricalField::Nationality,
                value: NumericField::RiskScore,
                min_samples: DEFAULT_QUANTILE_MIN_SAMPLES,
            }),
        ),
        ChartSpec::new(
            "age-chart",
            ChartKind::RateCurve(RateCurveSpec {
                bucket: NumericField::Age,
                positive: Decision::Rejected,
                min_samples: DEFAULT_RATE_MIN_SAMPLES,
            }),
        ),
        ChartSpec::new(
            "flow-chart",
            ChartKind::Flow(FlowSpec {
                stages: vec![
                    CategoricalField::Nationality,
                    CategoricalField::ContractType,
                    CategoricalField::Decision,
                ],
            }),
        ),
        histogram("score-histogram", NumericField::RiskScore, None),
        histogram("age-histogram", NumericField::Age, None),
        histogram("income-histogram", NumericField::Income, Some(INCOME_DOMAIN_CAP)),
        histogram(
            "amount-histogram",
            NumericField::RequestedAmount,
            Some(AMOUNT_DOMAIN_CAP),
        ),
        ChartSpec::new("records-table", ChartKind::Table(TableSpec::default())),
    ]
}

fn histogram(id: &str, field: NumericField, domain_cap: Option<f64>) -> ChartSpec {
    ChartSpec::new(
        id,
        ChartKind::Histogram(HistogramSpec {
            field,
            bins: DEFAULT_HISTOGRAM_BINS,
            domain_cap,
            split: default_split(),
            split_values: default_split_values(),
        }),
    )
}

const fn default_positive() -> Decision {
    Decision::Rejected
}

const fn default_rollup_min_samples() -> usize {
    DEFAULT_ROLLUP_MIN_SAMPLES
}

const fn default_quantile_min_samples() -> usize {
    DEFAULT_QUANTILE_MIN_SAMPLES
}

const fn default_rate_min_samples() -> usize {
    DEFAULT_RATE_MIN_SAMPLES
}

const fn default_bins() -> usize {
    DEFAULT_HISTOGRAM_BINS
}

const fn default_table_rows() -> usize {
    DEFAULT_TABLE_ROWS
}

const fn default_split() -> CategoricalField {
    CategoricalField::Decision
}

fn default_split_values() -> Vec<String> {
    vec![Decision::APPROVED.to_string(), Decision::REJECTED.to_string()]
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_default_charts_have_unique_ids() {
        let charts = default_charts();
        let mut ids: Vec<&str> = charts.iter().map(|c| c.id.as_str()).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), charts.len());
    }

    #[test]
    fn test_only_histograms_skip_filter_recompute() {
        for chart in default_charts() {
            let is_histogram = matches!(chart.kind, ChartKind::Histogram(_));
            assert_eq!(chart.kind.recomputes_on_filter(), !is_histogram, "{}", chart.id);
        }
    }

    #[test]
    fn test_rollup_defaults_from_json() {
        let chart: ChartSpec = serde_json::from_value(json!({
            "id": "commune-chart",
            "kind": "rollup",
            "group": "comuna",
            "central_field": "ingresos_mensuales"
        }))
        .unwrap();
        let ChartKind::Rollup(spec) = chart.kind else {
            panic!("expected rollup");
        };
        assert_eq!(spec.min_samples, DEFAULT_ROLLUP_MIN_SAMPLES);
        assert_eq!(spec.positive, Decision::Rejected);
        assert_eq!(spec.central_stat, CentralStat::Median);
        assert!(!spec.exclude_unknown);
        assert_eq!(spec.top_k, None);
    }

    #[test]
    fn test_histogram_defaults_from_json() {
        let chart: ChartSpec = serde_json::from_value(json!({
            "id": "h",
            "kind": "histogram",
            "field": "ingresos_mensuales",
            "domain_cap": 3000000
        }))
        .unwrap();
        let ChartKind::Histogram(spec) = chart.kind else {
            panic!("expected histogram");
        };
        assert_eq!(spec.bins, DEFAULT_HISTOGRAM_BINS);
        assert_eq!(spec.domain_cap, Some(INCOME_DOMAIN_CAP));
        assert_eq!(spec.split, CategoricalField::Decision);
        assert_eq!(spec.split_values, vec!["APROBADO", "RECHAZADO"]);
    }

    #[test]
    fn test_unit_kind_from_json() {
        let chart: ChartSpec =
            serde_json::from_value(json!({ "id": "kpis", "kind": "kpi" })).unwrap();
        assert_eq!(chart.kind, ChartKind::Kpi);
    }

    #[test]
    fn test_table_default_limit() {
        assert_eq!(TableSpec::default().limit, 50);
    }
}
