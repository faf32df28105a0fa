//! Loanscope: brush-filtered analytics over loan-application records.
//!
//! A [`Dashboard`] owns a normalized [`Dataset`] and a single range filter.
//! Every filter transition reruns the filter-dependent charts of its
//! [`Manifest`](yaml::Manifest) and pushes the results to the registered
//! [`ChartRenderer`]s. Histograms are computed at load only.
//!
//! # Example
//!
//! ```
//! use loanscope::yaml::Manifest;
//! use loanscope::{ChartPayload, Dashboard, Dataset, RecordingRenderer};
//!
//! let dataset = Dataset::from_json_str(
//!     r#"[
//!         {"edad": 24, "score_riesgo": 410, "decision_legacy": "APROBADO"},
//!         {"edad": 52, "score_riesgo": 730, "decision_legacy": "RECHAZADO"}
//!     ]"#,
//! )
//! .unwrap();
//!
//! let recorder = RecordingRenderer::new();
//! let mut dashboard = Dashboard::new(dataset, Manifest::default_dashboard("inline"));
//! dashboard.register_renderer("kpi-cards", recorder.clone());
//! dashboard.initialize();
//!
//! dashboard.apply_range_filter("edad", [18.0, 30.0]).unwrap();
//! let Some(ChartPayload::Kpi(kpis)) = recorder.last("kpi-cards") else {
//!     panic!("kpis not delivered");
//! };
//! assert_eq!(kpis.total, 1);
//! assert_eq!(recorder.count("kpi-cards"), 2);
//! ```

pub use loanscope_core::*;
pub use loanscope_yaml as yaml;

mod coordinator;
mod loader;
mod render;
mod table;

pub use coordinator::{compute_chart, ChartOutput, Dashboard, DashboardContext, ViewSummary};
pub use loader::{Dataset, LoadError};
pub use render::{ChartPayload, ChartRenderer, Delivery, RecordingRenderer, RenderError, RenderTargets};
pub use table::{table_page, CellValue, TableColumn, TablePage, TableRow, TextAlign};
