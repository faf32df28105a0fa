//! Aggregations from a record view to chart-ready summaries.
//!
//! Every function is pure and returns freshly built values. Rate-based
//! outputs drop groups whose size is at or below the configured
//! `min_samples`, so small noisy groups never reach a chart.

use crate::config::{CentralStat, QuantileSpec, RateCurveSpec, RollupSpec};
use crate::record::{CategoricalField, Decision, NumericField, Record, UNKNOWN};
use crate::stats;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::HashMap;

/// Headline numbers for the current view.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KpiSummary {
    /// Records in the view
    pub total: usize,
    /// Share of approved applications, 0-100
    pub approval_rate_pct: f64,
    pub mean_risk_score: f64,
    /// Total debt over total requested amount, 0 when nothing was requested
    pub debt_to_requested_ratio_pct: f64,
}

/// One group of a categorical rollup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryRollup {
    /// Group label
    pub key: String,
    /// Records in the group
    pub count: usize,
    /// Share of the group with the positive decision, 0-100
    pub rate_pct: f64,
    /// Median or mean of the central field
    pub central_value: f64,
}

/// Five-number summary of one group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuantileStats {
    /// Group label
    pub key: String,
    pub min: f64,
    /// 25th percentile
    pub q1: f64,
    pub median: f64,
    /// 75th percentile
    pub q3: f64,
    pub max: f64,
}

/// Decision rate at one exact bucket value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RateCurvePoint {
    /// Exact field value shared by the bucket
    pub bucket_key: f64,
    /// Share of the bucket with the positive decision, 0-100
    pub rate_pct: f64,
}

/// Group records by a categorical field, in first-seen order.
#[must_use]
pub fn group_by<'a>(view: &[&'a Record], field: CategoricalField) -> Vec<(&'a str, Vec<&'a Record>)> {
    let mut index: HashMap<&'a str, usize> = HashMap::new();
    let mut groups: Vec<(&'a str, Vec<&'a Record>)> = Vec::new();

    for &record in view {
        let key = record.categorical(field);
        let slot = *index.entry(key).or_insert_with(|| {
            groups.push((key, Vec::new()));
            groups.len() - 1
        });
        groups[slot].1.push(record);
    }

    groups
}

fn rate_pct(members: &[&Record], positive: &Decision) -> f64 {
    let hits = members.iter().filter(|r| r.decision == *positive).count();
    stats::percent(hits as f64, members.len() as f64)
}

fn values(members: &[&Record], field: NumericField) -> Vec<f64> {
    members.iter().map(|r| r.numeric(field)).collect()
}

/// Ascending by value, ties by key.
fn by_value_then_key(a: (f64, &str), b: (f64, &str)) -> Ordering {
    a.0.total_cmp(&b.0).then_with(|| a.1.cmp(b.1))
}

/// Headline totals. An empty view yields all zeros.
#[must_use]
pub fn kpi_summary(view: &[&Record]) -> KpiSummary {
    let total = view.len();
    let debt: f64 = view.iter().map(|r| r.total_debt).sum();
    let requested: f64 = view.iter().map(|r| r.requested_amount).sum();

    KpiSummary {
        total,
        approval_rate_pct: rate_pct(view, &Decision::Approved),
        mean_risk_score: stats::mean(&values(view, NumericField::RiskScore)),
        debt_to_requested_ratio_pct: stats::percent(debt, requested),
    }
}

/// Rate and central value per group, sorted by central value ascending.
///
/// When more than `top_k` groups survive the sample filter, the `top_k`
/// largest are kept before the final sort.
#[must_use]
pub fn category_rollup(view: &[&Record], spec: &RollupSpec) -> Vec<CategoryRollup> {
    let mut rows: Vec<CategoryRollup> = group_by(view, spec.group)
        .into_iter()
        .filter(|(key, members)| {
            members.len() > spec.min_samples && !(spec.exclude_unknown && *key == UNKNOWN)
        })
        .map(|(key, members)| {
            let central = values(&members, spec.central_field);
            CategoryRollup {
                key: key.to_string(),
                count: members.len(),
                rate_pct: rate_pct(&members, &spec.positive),
                central_value: match spec.central_stat {
                    CentralStat::Median => stats::median(&central),
                    CentralStat::Mean => stats::mean(&central),
                },
            }
        })
        .collect();

    if let Some(k) = spec.top_k {
        if rows.len() > k {
            rows.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.key.cmp(&b.key)));
            rows.truncate(k);
        }
    }

    rows.sort_by(|a, b| by_value_then_key((a.central_value, &a.key), (b.central_value, &b.key)));
    rows
}

/// Five-number summary per group, sorted by median ascending.
///
/// A single-member group reports its only value for every statistic.
#[must_use]
pub fn quantile_stats(view: &[&Record], spec: &QuantileSpec) -> Vec<QuantileStats> {
    let mut rows: Vec<QuantileStats> = group_by(view, spec.group)
        .into_iter()
        .filter(|(_, members)| members.len() > spec.min_samples)
        .filter_map(|(key, members)| {
            let mut sorted = values(&members, spec.value);
            stats::sort_ascending(&mut sorted);
            let q = |p| stats::quantile_sorted(&sorted, p);
            Some(QuantileStats {
                key: key.to_string(),
                min: q(0.0)?,
                q1: q(0.25)?,
                median: q(0.5)?,
                q3: q(0.75)?,
                max: q(1.0)?,
            })
        })
        .collect();

    rows.sort_by(|a, b| by_value_then_key((a.median, &a.key), (b.median, &b.key)));
    rows
}

/// Decision rate per exact value of `spec.bucket`, ascending by bucket.
#[must_use]
pub fn rate_curve(view: &[&Record], spec: &RateCurveSpec) -> Vec<RateCurvePoint> {
    let mut pairs: Vec<(f64, bool)> = view
        .iter()
        .map(|r| (r.numeric(spec.bucket), r.decision == spec.positive))
        .collect();
    pairs.sort_by(|a, b| a.0.total_cmp(&b.0));

    let mut points = Vec::new();
    let mut start = 0;
    while start < pairs.len() {
        let key = pairs[start].0;
        let end = pairs[start..]
            .iter()
            .position(|(v, _)| *v != key)
            .map_or(pairs.len(), |offset| start + offset);

        let size = end - start;
        if size > spec.min_samples {
            let hits = pairs[start..end].iter().filter(|(_, hit)| *hit).count();
            points.push(RateCurvePoint {
                bucket_key: key,
                rate_pct: stats::percent(hits as f64, size as f64),
            });
        }
        start = end;
    }

    points
}
