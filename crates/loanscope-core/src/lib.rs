//! Core types and algorithms for loanscope dashboards.
//!
//! This crate provides everything between the raw dataset and chart-ready
//! data:
//! - Record normalization: [`normalize`] into [`Record`]s
//! - Brush filtering: [`FilterState`], [`FilterMessage`], [`FilteredView`]
//! - Aggregations: [`kpi_summary`], [`category_rollup`], [`quantile_stats`],
//!   [`rate_curve`], [`histogram`]
//! - Flow graphs: [`build_flow_graph`]
//! - Chart definitions: [`ChartSpec`], [`ChartKind`]
//!
//! Everything here is synchronous and free of I/O.
//!
//! # Example
//!
//! ```
//! use loanscope_core::{kpi_summary, normalize, FilterMessage, FilterState, State};
//! use serde_json::json;
//!
//! let records = normalize(&json!([
//!     { "edad": 23, "score_riesgo": 410, "decision_legacy": "APROBADO" },
//!     { "edad": 51, "score_riesgo": 720, "decision_legacy": "RECHAZADO" },
//! ]))
//! .unwrap();
//!
//! let mut filter = FilterState::default();
//! filter.update(FilterMessage::apply("edad", [18.0, 30.0])).unwrap();
//!
//! let view = filter.view(&records);
//! let kpis = kpi_summary(&view);
//! assert_eq!(kpis.total, 1);
//! assert_eq!(kpis.approval_rate_pct, 100.0);
//! ```

mod aggregate;
pub mod config;
mod error;
mod filter;
mod flow;
mod histogram;
mod normalize;
mod record;
pub mod stats;

pub use aggregate::{
    category_rollup, group_by, kpi_summary, quantile_stats, rate_curve, CategoryRollup,
    KpiSummary, QuantileStats, RateCurvePoint,
};
pub use config::{
    CentralStat, ChartKind, ChartSpec, FlowSpec, HistogramSpec, QuantileSpec, RateCurveSpec,
    RollupSpec, TableSpec,
};
pub use error::{FilterError, NormalizeError};
pub use filter::{FilterMessage, FilterState, FilteredView, RangeFilter, State, Transition};
pub use flow::{build_flow_graph, FlowGraph, FlowLink, FlowNode, NodeKey};
pub use histogram::{domain, histogram, HistogramBin, SplitCount};
pub use normalize::{normalize, normalize_row};
pub use record::{CategoricalField, Decision, NumericField, Record, UNKNOWN};
