//! Seam between the coordinator and whatever draws the charts.
//!
//! Renderers receive plain data and may fail independently: one failing or
//! absent renderer never prevents the remaining charts from being delivered.

use crate::table::TablePage;
use loanscope_core::{
    CategoryRollup, FlowGraph, HistogramBin, KpiSummary, QuantileStats, RateCurvePoint,
};
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use thiserror::Error;

/// Chart-ready data for one chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "data", rename_all = "snake_case")]
pub enum ChartPayload {
    Kpi(KpiSummary),
    Rollup(Vec<CategoryRollup>),
    Quantiles(Vec<QuantileStats>),
    RateCurve(Vec<RateCurvePoint>),
    Histogram(Vec<HistogramBin>),
    Flow(FlowGraph),
    Table(TablePage),
}

impl ChartPayload {
    /// Payload kind, as used in serialized output.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Kpi(_) => "kpi",
            Self::Rollup(_) => "rollup",
            Self::Quantiles(_) => "quantiles",
            Self::RateCurve(_) => "rate_curve",
            Self::Histogram(_) => "histogram",
            Self::Flow(_) => "flow",
            Self::Table(_) => "table",
        }
    }
}

/// Errors reported by a renderer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RenderError {
    /// The renderer cannot draw this kind of payload.
    #[error("renderer cannot draw {0} payloads")]
    UnsupportedPayload(&'static str),

    /// Drawing failed.
    #[error("render failed: {0}")]
    Failed(String),
}

/// Something that draws a chart from its payload.
pub trait ChartRenderer {
    /// Draw `payload` into the target `chart_id`.
    ///
    /// # Errors
    ///
    /// Returns an error if the chart could not be drawn.
    fn render(&mut self, chart_id: &str, payload: &ChartPayload) -> Result<(), RenderError>;
}

impl<F> ChartRenderer for F
where
    F: FnMut(&str, &ChartPayload) -> Result<(), RenderError>,
{
    fn render(&mut self, chart_id: &str, payload: &ChartPayload) -> Result<(), RenderError> {
        self(chart_id, payload)
    }
}

/// What happened when a payload was pushed to its target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Delivery {
    Rendered,
    /// No renderer registered for the chart id
    Missing,
    Failed(RenderError),
}

/// Renderers keyed by chart id.
#[derive(Default)]
pub struct RenderTargets {
    targets: HashMap<String, Box<dyn ChartRenderer>>,
}

impl RenderTargets {
    /// Create an empty target set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a renderer, replacing any previous one for `chart_id`.
    pub fn register(&mut self, chart_id: impl Into<String>, renderer: impl ChartRenderer + 'static) {
        self.targets.insert(chart_id.into(), Box::new(renderer));
    }

    /// Remove the renderer for `chart_id`.
    pub fn unregister(&mut self, chart_id: &str) -> bool {
        self.targets.remove(chart_id).is_some()
    }

    /// Check whether `chart_id` has a renderer.
    #[must_use]
    pub fn contains(&self, chart_id: &str) -> bool {
        self.targets.contains_key(chart_id)
    }

    /// Hand `payload` to the renderer for `chart_id`.
    pub fn deliver(&mut self, chart_id: &str, payload: &ChartPayload) -> Delivery {
        match self.targets.get_mut(chart_id) {
            None => Delivery::Missing,
            Some(renderer) => match renderer.render(chart_id, payload) {
                Ok(()) => Delivery::Rendered,
                Err(err) => Delivery::Failed(err),
            },
        }
    }
}

impl std::fmt::Debug for RenderTargets {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut ids: Vec<&String> = self.targets.keys().collect();
        ids.sort();
        f.debug_struct("RenderTargets").field("targets", &ids).finish()
    }
}

/// Renderer that records every payload it receives.
///
/// Clones share one log, so a clone can be registered while the original is
/// kept for inspection.
#[derive(Debug, Clone, Default)]
pub struct RecordingRenderer {
    log: Rc<RefCell<Vec<(String, ChartPayload)>>>,
}

impl RecordingRenderer {
    /// Create a renderer with an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything received so far, oldest first.
    #[must_use]
    pub fn received(&self) -> Vec<(String, ChartPayload)> {
        self.log.borrow().clone()
    }

    /// Number of payloads received for `chart_id`.
    #[must_use]
    pub fn count(&self, chart_id: &str) -> usize {
        self.log.borrow().iter().filter(|(id, _)| id == chart_id).count()
    }

    /// Most recent payload for `chart_id`.
    #[must_use]
    pub fn last(&self, chart_id: &str) -> Option<ChartPayload> {
        self.log
            .borrow()
            .iter()
            .rev()
            .find(|(id, _)| id == chart_id)
            .map(|(_, payload)| payload.clone())
    }

    /// Forget everything received.
    pub fn clear(&self) {
        self.log.borrow_mut().clear();
    }
}

impl ChartRenderer for RecordingRenderer {
    fn render(&mut self, chart_id: &str, payload: &ChartPayload) -> Result<(), RenderError> {
        self.log
            .borrow_mut()
            .push((chart_id.to_string(), payload.clone()));
        Ok(())
    }
}
