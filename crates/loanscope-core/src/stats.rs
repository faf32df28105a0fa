//! Scalar statistics over `f64` slices.
//!
//! Empty inputs produce `0.0` (or `None` where a missing answer must be
//! distinguishable) rather than NaN.

/// Sum of values.
#[must_use]
pub fn sum(values: &[f64]) -> f64 {
    values.iter().sum()
}

/// Arithmetic mean, `0.0` for an empty slice.
#[must_use]
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        sum(values) / values.len() as f64
    }
}

/// `numerator / denominator * 100`, or `0.0` when the denominator is zero.
#[must_use]
pub fn percent(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 {
        0.0
    } else {
        numerator / denominator * 100.0
    }
}

/// Sort values ascending in place using a total order.
pub fn sort_ascending(values: &mut [f64]) {
    values.sort_by(f64::total_cmp);
}

/// Quantile of an ascending-sorted slice using linear interpolation between
/// closest ranks (`(n - 1) * p`). Returns `None` for an empty slice.
///
/// `p` is clamped to `[0, 1]`.
#[must_use]
pub fn quantile_sorted(sorted: &[f64], p: f64) -> Option<f64> {
    let last = sorted.len().checked_sub(1)?;
    let idx = p.clamp(0.0, 1.0) * last as f64;
    let lower = idx.floor() as usize;
    let upper = (lower + 1).min(last);
    let frac = idx - lower as f64;

    Some((sorted[upper] - sorted[lower]).mul_add(frac, sorted[lower]))
}

/// Median of unsorted values, `0.0` for an empty slice.
#[must_use]
pub fn median(values: &[f64]) -> f64 {
    let mut sorted = values.to_vec();
    sort_ascending(&mut sorted);
    quantile_sorted(&sorted, 0.5).unwrap_or(0.0)
}

/// Minimum and maximum of values.
#[must_use]
pub fn extent(values: impl IntoIterator<Item = f64>) -> Option<(f64, f64)> {
    values.into_iter().fold(None, |acc, v| match acc {
        None => Some((v, v)),
        Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
    })
}
