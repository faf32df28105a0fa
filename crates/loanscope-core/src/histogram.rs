//! Stacked fixed-width histograms.
//!
//! Bins are half-open `[x0, x1)` except the last one, which also includes its
//! upper edge. Values outside the domain are not counted in any bin, so a
//! capped domain never piles outliers into the last bar.

use crate::config::HistogramSpec;
use crate::record::{NumericField, Record};
use crate::stats;
use serde::{Deserialize, Serialize};

/// Count of one stack within a bin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SplitCount {
    /// Split value
    pub value: String,
    /// Records in the bin with this split value
    pub count: usize,
}

/// One histogram bar with its per-split counts in stacking order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistogramBin {
    /// Lower edge
    pub x0: f64,
    /// Upper edge
    pub x1: f64,
    /// One entry per split value, in stacking order
    pub counts_by_split: Vec<SplitCount>,
}

impl HistogramBin {
    /// Count for a split value, `0` if it is not a stack of this bin.
    #[must_use]
    pub fn count(&self, split: &str) -> usize {
        self.counts_by_split
            .iter()
            .find(|c| c.value == split)
            .map_or(0, |c| c.count)
    }

    /// Sum over all stacks.
    #[must_use]
    pub fn total(&self) -> usize {
        self.counts_by_split.iter().map(|c| c.count).sum()
    }

    /// Bin center.
    #[must_use]
    pub fn center(&self) -> f64 {
        (self.x0 + self.x1) / 2.0
    }
}

/// Domain of `field` over `records`, with the upper bound capped.
///
/// An empty dataset yields `[0, 0]`. A cap below the smallest value yields
/// `[cap, cap]`, so nothing above the cap is ever counted.
#[must_use]
pub fn domain(records: &[&Record], field: NumericField, cap: Option<f64>) -> [f64; 2] {
    let (lo, hi) = stats::extent(records.iter().map(|r| r.numeric(field))).unwrap_or((0.0, 0.0));
    let hi = cap.map_or(hi, |cap| hi.min(cap));
    [lo.min(hi), hi]
}

/// Bin `spec.field` over `domain` into `spec.bins` equal-width bins.
///
/// A `bins` of zero is treated as one. If `max <= min` the result is a single
/// bin `[min, min]` holding the values equal to `min`.
#[must_use]
pub fn histogram(records: &[&Record], spec: &HistogramSpec, domain: [f64; 2]) -> Vec<HistogramBin> {
    let [min, max] = domain;
    let degenerate = max <= min;
    let num_bins = if degenerate { 1 } else { spec.bins.max(1) };
    let bin_width = if degenerate { 0.0 } else { (max - min) / num_bins as f64 };

    let mut counts = vec![vec![0usize; spec.split_values.len()]; num_bins];
    for record in records {
        let Some(split) = spec
            .split_values
            .iter()
            .position(|v| v == record.categorical(spec.split))
        else {
            continue;
        };

        let value = record.numeric(spec.field);
        let bin = if degenerate {
            if value != min {
                continue;
            }
            0
        } else {
            if value < min || value > max {
                continue;
            }
            // value == max lands on the last bin
            (((value - min) / bin_width).floor() as usize).min(num_bins - 1)
        };
        counts[bin][split] += 1;
    }

    counts
        .into_iter()
        .enumerate()
        .map(|(i, bin_counts)| {
            let (x0, x1) = if degenerate {
                (min, min)
            } else {
                (
                    (i as f64).mul_add(bin_width, min),
                    if i + 1 == num_bins {
                        max
                    } else {
                        ((i + 1) as f64).mul_add(bin_width, min)
                    },
                )
            };
            HistogramBin {
                x0,
                x1,
                counts_by_split: spec
                    .split_values
                    .iter()
                    .zip(bin_counts)
                    .map(|(value, count)| SplitCount {
                        value: value.clone(),
                        count,
                    })
                    .collect(),
            }
        })
        .collect()
}
