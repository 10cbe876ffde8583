//! Descriptive statistics over a single parameter's values.
//!
//! Every function takes finite values; filtering NaN/Infinity is the caller's
//! job (the [`crate::snapshot`] adapter already drops them). Empty input is a
//! precondition violation answered with the sentinel `0.0`, never a panic, so
//! a view can render an empty state.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ---------------------------------------------------------------------------
// Result types
// ---------------------------------------------------------------------------

/// Which side of a threshold counts as passing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Direction {
    /// Pass when `x >= threshold` (fidelities, coherence times).
    HigherIsBetter,
    /// Pass when `x <= threshold` (error rates, readout noise).
    LowerIsBetter,
}

impl Direction {
    pub fn as_str(self) -> &'static str {
        match self {
            Direction::HigherIsBetter => "higher-is-better",
            Direction::LowerIsBetter => "lower-is-better",
        }
    }

    /// Whether `x` passes `threshold` in this direction.
    pub fn passes(self, x: f64, threshold: f64) -> bool {
        match self {
            Direction::HigherIsBetter => x >= threshold,
            Direction::LowerIsBetter => x <= threshold,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Direction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "higher-is-better" | "higher" | "max" => Ok(Direction::HigherIsBetter),
            "lower-is-better" | "lower" | "min" => Ok(Direction::LowerIsBetter),
            other => Err(format!(
                "unknown direction '{other}' (expected higher-is-better or lower-is-better)"
            )),
        }
    }
}

/// Mean/median/spread summary of one sample.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct DescriptiveStats {
    pub count: usize,
    pub mean: f64,
    /// Statistical median (even counts average the middle pair).
    pub median: f64,
    /// Population standard deviation.
    pub stddev: f64,
    pub min: f64,
    pub max: f64,
}

impl DescriptiveStats {
    /// Summarize `xs`. Empty input yields the all-zero default with `count == 0`.
    pub fn from_values(xs: &[f64]) -> Self {
        let Some((min, max)) = min_max(xs) else {
            return Self::default();
        };
        Self {
            count: xs.len(),
            mean: mean(xs),
            median: median(xs),
            stddev: stddev(xs),
            min,
            max,
        }
    }
}

/// Equal-width histogram.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Histogram {
    /// Bin edges, `counts.len() + 1` of them.
    pub edges: Vec<f64>,
    pub counts: Vec<usize>,
}

impl Histogram {
    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }
}

/// Stats plus an optional yield against a pass/fail threshold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricSummary {
    #[serde(flatten)]
    pub stats: DescriptiveStats,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub threshold: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub direction: Option<Direction>,
    /// Percentage of values passing the threshold, in [0, 100].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub yield_percent: Option<f64>,
}

// ---------------------------------------------------------------------------
// Statistics
// ---------------------------------------------------------------------------

/// Arithmetic mean. Returns `0.0` for empty input.
pub fn mean(xs: &[f64]) -> f64 {
    if xs.is_empty() {
        return 0.0;
    }
    xs.iter().sum::<f64>() / xs.len() as f64
}

/// Median: middle element for odd counts, average of the two middle elements
/// for even counts. Returns `0.0` for empty input.
///
/// The CDF uses a different median rule; see [`crate::cdf::CdfCurve::median`].
pub fn median(xs: &[f64]) -> f64 {
    if xs.is_empty() {
        return 0.0;
    }
    let sorted = sorted_copy(xs);
    let n = sorted.len();
    if n % 2 == 1 {
        sorted[n / 2]
    } else {
        (sorted[n / 2 - 1] + sorted[n / 2]) / 2.0
    }
}

/// Population standard deviation (divides by `n`). Returns `0.0` for empty input.
pub fn stddev(xs: &[f64]) -> f64 {
    if xs.is_empty() {
        return 0.0;
    }
    let m = mean(xs);
    let var = xs.iter().map(|&x| (x - m).powi(2)).sum::<f64>() / xs.len() as f64;
    var.sqrt()
}

/// First and last element of the sorted sample, `None` when empty.
pub fn min_max(xs: &[f64]) -> Option<(f64, f64)> {
    let sorted = sorted_copy(xs);
    Some((*sorted.first()?, *sorted.last()?))
}

/// Percentage of `xs` passing `threshold` in `direction`, in [0, 100].
/// Returns `0.0` for empty input.
pub fn yield_rate(xs: &[f64], threshold: f64, direction: Direction) -> f64 {
    if xs.is_empty() {
        return 0.0;
    }
    let passing = xs.iter().filter(|&&x| direction.passes(x, threshold)).count();
    passing as f64 / xs.len() as f64 * 100.0
}

/// Percentile `p` (0–100, clamped) with linear interpolation between closest
/// ranks. Returns `0.0` for empty input.
pub fn percentile(xs: &[f64], p: f64) -> f64 {
    if xs.is_empty() {
        return 0.0;
    }
    let sorted = sorted_copy(xs);
    let rank = p.clamp(0.0, 100.0) / 100.0 * (sorted.len() - 1) as f64;
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    if lo == hi {
        return sorted[lo];
    }
    let frac = rank - lo as f64;
    sorted[lo] + (sorted[hi] - sorted[lo]) * frac
}

/// Upper bound on the bin count accepted by [`histogram`].
pub const MAX_HISTOGRAM_BINS: usize = 1000;

/// Bin `xs` into `bins` equal-width bins spanning `[min, max]`.
///
/// The maximum lands in the last bin. A zero-width range collapses to one bin
/// holding every value. Empty input or `bins == 0` gives an empty histogram;
/// `bins` above [`MAX_HISTOGRAM_BINS`] is clamped to it.
pub fn histogram(xs: &[f64], bins: usize) -> Histogram {
    let Some((min, max)) = min_max(xs) else {
        return Histogram::default();
    };
    if bins == 0 {
        return Histogram::default();
    }
    let bins = bins.min(MAX_HISTOGRAM_BINS);

    let range = max - min;
    if range == 0.0 {
        return Histogram {
            edges: vec![min, max],
            counts: vec![xs.len()],
        };
    }

    let width = range / bins as f64;
    let edges: Vec<f64> = (0..=bins)
        .map(|i| if i == bins { max } else { min + width * i as f64 })
        .collect();
    let mut counts = vec![0usize; bins];
    for &x in xs {
        let idx = (((x - min) / width) as usize).min(bins - 1);
        counts[idx] += 1;
    }

    Histogram { edges, counts }
}

/// Stats plus yield when a threshold is configured for the parameter.
pub fn summarize(xs: &[f64], threshold: Option<(f64, Direction)>) -> MetricSummary {
    let stats = DescriptiveStats::from_values(xs);
    match threshold {
        Some((threshold, direction)) => MetricSummary {
            stats,
            threshold: Some(threshold),
            direction: Some(direction),
            yield_percent: Some(yield_rate(xs, threshold, direction)),
        },
        None => MetricSummary {
            stats,
            threshold: None,
            direction: None,
            yield_percent: None,
        },
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn sorted_copy(xs: &[f64]) -> Vec<f64> {
    let mut sorted = xs.to_vec();
    sorted.sort_by(f64::total_cmp);
    sorted
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
