//! View coordination: which charts rerun on a filter transition, and where
//! their results go.
//!
//! A [`Dashboard`] owns the dataset and the filter as one
//! [`DashboardContext`]; nothing else holds mutable dashboard state. Every
//! transition reruns all filter-dependent charts from scratch. Histograms are
//! the exception: they are computed over the full dataset at load and left
//! alone while the user brushes, so the control being dragged stays put.

use crate::loader::{Dataset, LoadError};
use crate::render::{ChartPayload, ChartRenderer, Delivery, RenderTargets};
use crate::table::table_page;
use loanscope_core::{
    build_flow_graph, category_rollup, domain, histogram, kpi_summary, quantile_stats, rate_curve,
    ChartKind, ChartSpec, FilterError, FilterMessage, FilterState, FilteredView, Record, State,
    Transition,
};
use loanscope_yaml::Manifest;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};

/// A computed chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartOutput {
    /// Chart id from the manifest
    pub id: String,
    pub payload: ChartPayload,
}

/// Filter-dependent chart results for one filter state.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ViewSummary {
    /// Filter the charts were computed under
    pub filter: FilterState,
    /// Records in the filtered view
    pub visible: usize,
    /// Charts in manifest order, histograms excluded
    pub charts: Vec<ChartOutput>,
}

impl ViewSummary {
    /// Look up a chart payload by id.
    #[must_use]
    pub fn chart(&self, id: &str) -> Option<&ChartPayload> {
        self.charts.iter().find(|c| c.id == id).map(|c| &c.payload)
    }
}

/// Dataset plus the single active filter.
#[derive(Debug, Clone, Default)]
pub struct DashboardContext {
    dataset: Dataset,
    filter: FilterState,
}

impl DashboardContext {
    /// Create an unfiltered context.
    #[must_use]
    pub fn new(dataset: Dataset) -> Self {
        Self {
            dataset,
            filter: FilterState::Unfiltered,
        }
    }

    /// Records passing the current filter, in load order.
    #[must_use]
    pub fn view(&self) -> FilteredView<'_> {
        self.filter.view(self.dataset.records())
    }

    /// Every record, ignoring the filter.
    #[must_use]
    pub fn full(&self) -> FilteredView<'_> {
        FilteredView::all(self.dataset.records())
    }

    #[must_use]
    pub const fn filter(&self) -> &FilterState {
        &self.filter
    }

    #[must_use]
    pub const fn dataset(&self) -> &Dataset {
        &self.dataset
    }
}

/// Compute the payload of one chart over `view`.
///
/// Histograms take their domain from `full`, the unfiltered dataset.
#[must_use]
pub fn compute_chart(kind: &ChartKind, view: &[&Record], full: &[&Record]) -> ChartPayload {
    match kind {
        ChartKind::Kpi => ChartPayload::Kpi(kpi_summary(view)),
        ChartKind::Rollup(spec) => ChartPayload::Rollup(category_rollup(view, spec)),
        ChartKind::Quantiles(spec) => ChartPayload::Quantiles(quantile_stats(view, spec)),
        ChartKind::RateCurve(spec) => ChartPayload::RateCurve(rate_curve(view, spec)),
        ChartKind::Histogram(spec) => {
            let extent = domain(full, spec.field, spec.domain_cap);
            ChartPayload::Histogram(histogram(view, spec, extent))
        }
        ChartKind::Flow(spec) => ChartPayload::Flow(build_flow_graph(view, &spec.stages)),
        ChartKind::Table(spec) => ChartPayload::Table(table_page(view, spec.limit)),
    }
}

/// The view coordinator of one dashboard.
#[derive(Debug)]
pub struct Dashboard {
    context: DashboardContext,
    manifest: Manifest,
    renderers: RenderTargets,
    histograms: Vec<ChartOutput>,
    snapshot: ViewSummary,
}

impl Dashboard {
    /// Build an unfiltered dashboard over a loaded dataset.
    ///
    /// Nothing is computed or delivered until [`Dashboard::initialize`];
    /// until then [`Dashboard::snapshot`] and [`Dashboard::histograms`] are
    /// empty.
    #[must_use]
    pub fn new(dataset: Dataset, manifest: Manifest) -> Self {
        Self {
            context: DashboardContext::new(dataset),
            manifest,
            renderers: RenderTargets::new(),
            histograms: Vec::new(),
            snapshot: ViewSummary::default(),
        }
    }

    /// Load the manifest's data source and build a dashboard over it.
    ///
    /// # Errors
    ///
    /// Returns an error if the dataset cannot be loaded.
    pub fn open(manifest: Manifest) -> Result<Self, LoadError> {
        let dataset = Dataset::load(&manifest.data)?;
        Ok(Self::new(dataset, manifest))
    }

    /// Register the renderer for a chart id.
    pub fn register_renderer(
        &mut self,
        chart_id: impl Into<String>,
        renderer: impl ChartRenderer + 'static,
    ) {
        self.renderers.register(chart_id, renderer);
    }

    /// Mutable access to the renderer set.
    pub fn renderers_mut(&mut self) -> &mut RenderTargets {
        &mut self.renderers
    }

    /// Initial load: recompute everything, histograms included, and deliver
    /// every chart.
    pub fn initialize(&mut self) -> &ViewSummary {
        info!(
            dashboard = %self.manifest.name,
            records = self.context.dataset.len(),
            charts = self.manifest.charts.len(),
            "initializing dashboard"
        );
        self.recompute_histograms();
        self.recompute();
        self.deliver(true);
        &self.snapshot
    }

    /// Swap in a new dataset and reinitialize. The active filter is kept.
    pub fn replace_dataset(&mut self, dataset: Dataset) -> &ViewSummary {
        self.context.dataset = dataset;
        self.initialize()
    }

    /// Replace the active filter with a range on `field` and deliver every
    /// filter-dependent chart.
    ///
    /// # Errors
    ///
    /// Returns an error for unknown fields and non-finite bounds; the filter
    /// and every chart are left as they were.
    pub fn apply_range_filter(
        &mut self,
        field: &str,
        range: [f64; 2],
    ) -> Result<Transition, FilterError> {
        self.transition(FilterMessage::apply(field, range))
    }

    /// Drop the active filter and deliver every filter-dependent chart.
    pub fn clear_filter(&mut self) -> Transition {
        match self.transition(FilterMessage::Clear) {
            Ok(transition) => transition,
            // clearing has no failure mode
            Err(_) => Transition::Unchanged,
        }
    }

    /// Records passing the current filter, in load order.
    #[must_use]
    pub fn current_view(&self) -> FilteredView<'_> {
        self.context.view()
    }

    #[must_use]
    pub const fn filter_state(&self) -> &FilterState {
        self.context.filter()
    }

    /// Charts from the last recompute.
    #[must_use]
    pub const fn snapshot(&self) -> &ViewSummary {
        &self.snapshot
    }

    /// Histograms from the last full load.
    #[must_use]
    pub fn histograms(&self) -> &[ChartOutput] {
        &self.histograms
    }

    #[must_use]
    pub const fn context(&self) -> &DashboardContext {
        &self.context
    }

    #[must_use]
    pub const fn manifest(&self) -> &Manifest {
        &self.manifest
    }

    fn transition(&mut self, msg: FilterMessage) -> Result<Transition, FilterError> {
        let transition = self.context.filter.update(msg).map_err(|err| {
            warn!(error = %err, "filter request rejected");
            err
        })?;
        debug!(filter = ?self.context.filter, ?transition, "filter transition");
        self.recompute();
        self.deliver(false);
        Ok(transition)
    }

    fn recompute_histograms(&mut self) {
        let full = self.context.full();
        self.histograms = self
            .manifest
            .charts
            .iter()
            .filter(|chart| !chart.kind.recomputes_on_filter())
            .map(|chart| ChartOutput {
                id: chart.id.clone(),
                payload: compute_chart(&chart.kind, &full, &full),
            })
            .collect();
    }

    fn recompute(&mut self) {
        let view = self.context.view();
        let full = self.context.full();
        let charts: Vec<ChartOutput> = self
            .manifest
            .charts
            .iter()
            .filter(|chart| chart.kind.recomputes_on_filter())
            .map(|chart| ChartOutput {
                id: chart.id.clone(),
                payload: compute_chart(&chart.kind, &view, &full),
            })
            .collect();
        debug!(visible = view.len(), charts = charts.len(), "view recomputed");
        self.snapshot = ViewSummary {
            filter: self.context.filter,
            visible: view.len(),
            charts,
        };
    }

    fn deliver(&mut self, with_histograms: bool) {
        for chart in &self.manifest.charts {
            let output = if chart.kind.recomputes_on_filter() {
                self.snapshot.charts.iter().find(|c| c.id == chart.id)
            } else if with_histograms {
                self.histograms.iter().find(|c| c.id == chart.id)
            } else {
                None
            };
            if let Some(output) = output {
                deliver_one(&mut self.renderers, chart, &output.payload);
            }
        }
    }
}

fn deliver_one(renderers: &mut RenderTargets, chart: &ChartSpec, payload: &ChartPayload) {
    match renderers.deliver(&chart.id, payload) {
        Delivery::Rendered => debug!(chart = %chart.id, "chart delivered"),
        Delivery::Missing => warn!(chart = %chart.id, "no renderer registered, chart skipped"),
        Delivery::Failed(err) => error!(chart = %chart.id, error = %err, "renderer failed"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::RecordingRenderer;
    use loanscope_core::{normalize, KpiSummary};
    use loanscope_test::fixture::sample_rows;

    fn dashboard(n: usize) -> Dashboard {
        let dataset = Dataset::from_records(normalize(&sample_rows(n)).unwrap());
        Dashboard::new(dataset, Manifest::default_dashboard("data.json"))
    }

    fn kpi(summary: &ViewSummary) -> KpiSummary {
        match summary.chart("kpi-cards") {
            Some(ChartPayload::Kpi(kpi)) => *kpi,
            other => panic!("expected kpi payload, got {other:?}"),
        }
    }

    #[test]
    fn test_new_defers_computation_to_initialize() {
        let recorder = RecordingRenderer::new();
        let mut dash = dashboard(40);
        dash.register_renderer("kpi-cards", recorder.clone());

        assert!(dash.snapshot().charts.is_empty());
        assert!(dash.histograms().is_empty());
        assert!(recorder.received().is_empty());

        dash.initialize();
        assert_eq!(kpi(dash.snapshot()).total, 40);
        assert_eq!(dash.histograms().len(), 4);
        assert_eq!(recorder.count("kpi-cards"), 1);
    }

    #[test]
    fn test_snapshot_excludes_histograms() {
        let mut dash = dashboard(40);
        dash.initialize();
        let ids: Vec<&str> = dash.snapshot().charts.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(
            ids,
            vec![
                "kpi-cards",
                "commune-chart",
                "contract-chart",
                "nationality-chart",
                "age-chart",
                "flow-chart",
                "records-table",
            ]
        );
        assert!(dash.snapshot().chart("score-histogram").is_none());
    }

    #[test]
    fn test_filter_narrows_view() {
        let mut dash = dashboard(60);
        let transition = dash.apply_range_filter("edad", [18.0, 30.0]).unwrap();

        assert_eq!(transition, Transition::Changed);
        assert!(dash.filter_state().is_filtered());
        assert!(dash
            .current_view()
            .iter()
            .all(|r| (18.0..=30.0).contains(&r.age)));
        assert_eq!(kpi(dash.snapshot()).total, dash.current_view().len());
        assert_eq!(dash.snapshot().visible, dash.current_view().len());
    }

    #[test]
    fn test_rejected_filter_keeps_state_and_charts() {
        let mut dash = dashboard(60);
        dash.apply_range_filter("edad", [18.0, 30.0]).unwrap();
        let before = dash.snapshot().clone();

        let err = dash.apply_range_filter("salary", [0.0, 1.0]).unwrap_err();
        assert_eq!(err, FilterError::UnknownField("salary".to_string()));
        assert!(dash.apply_range_filter("edad", [f64::NAN, 1.0]).is_err());
        assert_eq!(dash.snapshot(), &before);
        assert_eq!(*dash.filter_state(), before.filter);
    }

    #[test]
    fn test_clear_filter() {
        let mut dash = dashboard(60);
        assert_eq!(dash.clear_filter(), Transition::Unchanged);
        dash.apply_range_filter("score_riesgo", [300.0, 500.0]).unwrap();
        assert_eq!(dash.clear_filter(), Transition::Changed);
        assert_eq!(*dash.filter_state(), FilterState::Unfiltered);
        assert_eq!(dash.current_view().len(), 60);
    }

    #[test]
    fn test_compute_chart_histogram_uses_full_domain() {
        let records = normalize(&sample_rows(30)).unwrap();
        let full = FilteredView::all(&records);
        let view: FilteredView<'_> = full.iter().copied().filter(|r| r.age < 30.0).collect();
        let spec = Manifest::default_dashboard("x")
            .chart("age-histogram")
            .map(|c| c.kind.clone())
            .unwrap();

        let ChartPayload::Histogram(bins) = compute_chart(&spec, &view, &full) else {
            panic!("expected histogram");
        };
        let extent = domain(&full, loanscope_core::NumericField::Age, None);
        assert_eq!(bins.first().map(|b| b.x0), Some(extent[0]));
        assert_eq!(bins.last().map(|b| b.x1), Some(extent[1]));
    }
}
