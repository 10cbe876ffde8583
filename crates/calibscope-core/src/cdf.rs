//! Empirical cumulative distribution curves.
//!
//! Curves are meant to be drawn as right-continuous steps ("hold the value
//! until the next jump"), with flat lead-in and trail-out tails padded by 5%
//! of the sample range on each side.

use serde::{Deserialize, Serialize};

/// Fraction of the sample range added before the first and after the last point.
pub const TAIL_EXTENSION: f64 = 0.05;

/// One step of the curve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CdfPoint {
    pub value: f64,
    /// Percentage of samples `<= value`, in [0, 100].
    pub cumulative_percent: f64,
}

/// Empirical CDF of one parameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CdfCurve {
    /// `count + 2` points: lead-in at 0%, one per sample, trail-out at 100%.
    pub points: Vec<CdfPoint>,
    /// The sorted value at index `floor(count / 2)`.
    ///
    /// For even counts this is the upper of the two middle values, not their
    /// average; it intentionally differs from [`crate::stats::median`].
    pub median: f64,
    pub count: usize,
}

/// Build the empirical CDF of the finite values in `values`.
///
/// Returns `None` ("no data") when no finite value remains.
pub fn empirical_cdf(values: &[f64]) -> Option<CdfCurve> {
    let mut sorted: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    if sorted.is_empty() {
        return None;
    }
    sorted.sort_by(f64::total_cmp);

    let n = sorted.len();
    let min = sorted[0];
    let max = sorted[n - 1];
    let range = if n == 1 { 0.0 } else { max - min };
    let extension = range * TAIL_EXTENSION;

    let mut points = Vec::with_capacity(n + 2);
    points.push(CdfPoint {
        value: min - extension,
        cumulative_percent: 0.0,
    });
    points.extend(sorted.iter().enumerate().map(|(i, &value)| CdfPoint {
        value,
        cumulative_percent: (i + 1) as f64 / n as f64 * 100.0,
    }));
    points.push(CdfPoint {
        value: max + extension,
        cumulative_percent: 100.0,
    });

    Some(CdfCurve {
        points,
        median: sorted[n / 2],
        count: n,
    })
}

impl CdfCurve {
    /// Sample points only, without the padding tails.
    ///
    /// Empty when the curve has fewer than the two padding points.
    pub fn samples(&self) -> &[CdfPoint] {
        self.points
            .get(1..self.points.len().saturating_sub(1))
            .unwrap_or_default()
    }

    /// Step evaluation: percentage of samples `<= x`.
    pub fn cumulative_at(&self, x: f64) -> f64 {
        self.samples()
            .iter()
            .take_while(|p| p.value <= x)
            .last()
            .map_or(0.0, |p| p.cumulative_percent)
    }

    /// Smallest sample whose cumulative percentage reaches `percent`.
    pub fn value_at_percent(&self, percent: f64) -> f64 {
        let samples = self.samples();
        samples
            .iter()
            .find(|p| p.cumulative_percent >= percent)
            .or(samples.last())
            .map_or(self.median, |p| p.value)
    }

    pub fn min(&self) -> Option<f64> {
        self.samples().first().map(|p| p.value)
    }

    pub fn max(&self) -> Option<f64> {
        self.samples().last().map(|p| p.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cdf_five_points() {
        let curve = empirical_cdf(&[5.0, 3.0, 1.0, 4.0, 2.0]).unwrap();
        assert_eq!(curve.count, 5);
        assert_eq!(curve.median, 3.0);
        assert_eq!(curve.points.len(), 7);

        let first = curve.points[0];
        let last = curve.points[6];
        assert_eq!(first.cumulative_percent, 0.0);
        assert_eq!(last.cumulative_percent, 100.0);
        // Range 4 → extension 0.2.
        assert!((first.value - 0.8).abs() < 1e-12);
        assert!((last.value - 5.2).abs() < 1e-12);

        let percents: Vec<f64> = curve.samples().iter().map(|p| p.cumulative_percent).collect();
        assert_eq!(percents, vec![20.0, 40.0, 60.0, 80.0, 100.0]);
    }

    #[test]
    fn test_cdf_single_point() {
        let curve = empirical_cdf(&[5.0]).unwrap();
        let pts: Vec<(f64, f64)> = curve
            .points
            .iter()
            .map(|p| (p.value, p.cumulative_percent))
            .collect();
        assert_eq!(pts, vec![(5.0, 0.0), (5.0, 100.0), (5.0, 100.0)]);
        assert_eq!(curve.median, 5.0);
    }

    #[test]
    fn test_cdf_no_data() {
        assert!(empirical_cdf(&[]).is_none());
        assert!(empirical_cdf(&[f64::NAN, f64::INFINITY]).is_none());
    }

    #[test]
    fn test_cdf_median_is_upper_middle() {
        let curve = empirical_cdf(&[1.0, 2.0, 3.0, 4.0]).unwrap();
        assert_eq!(curve.median, 3.0);
        assert_eq!(crate::stats::median(&[1.0, 2.0, 3.0, 4.0]), 2.5);
    }

    #[test]
    fn test_cdf_monotone_with_duplicates() {
        let curve = empirical_cdf(&[2.0, 1.0, 2.0, 2.0, 9.0, f64::NAN]).unwrap();
        assert_eq!(curve.count, 5);
        for w in curve.points.windows(2) {
            assert!(w[0].value <= w[1].value);
            assert!(w[0].cumulative_percent <= w[1].cumulative_percent);
        }
    }

    #[test]
    fn test_step_evaluation() {
        let curve = empirical_cdf(&[10.0, 20.0, 30.0, 40.0]).unwrap();
        assert_eq!(curve.cumulative_at(5.0), 0.0);
        assert_eq!(curve.cumulative_at(10.0), 25.0);
        assert_eq!(curve.cumulative_at(19.999), 25.0);
        assert_eq!(curve.cumulative_at(20.0), 50.0);
        assert_eq!(curve.cumulative_at(100.0), 100.0);

        assert_eq!(curve.value_at_percent(50.0), 20.0);
        assert_eq!(curve.value_at_percent(51.0), 30.0);
        assert_eq!(curve.value_at_percent(0.0), 10.0);
        assert_eq!(curve.min(), Some(10.0));
        assert_eq!(curve.max(), Some(40.0));
    }

    #[test]
    fn test_hand_built_curve_without_samples() {
        let raw = r#"{
            "points": [{"value": 1.0, "cumulative_percent": 0.0}],
            "median": 1.0,
            "count": 4
        }"#;
        let curve: CdfCurve = serde_json::from_str(raw).unwrap();
        assert!(curve.samples().is_empty());
        assert_eq!(curve.min(), None);
        assert_eq!(curve.max(), None);
        assert_eq!(curve.cumulative_at(5.0), 0.0);
        assert_eq!(curve.value_at_percent(50.0), 1.0);

        let empty = CdfCurve {
            points: Vec::new(),
            median: 0.0,
            count: 0,
        };
        assert!(empty.samples().is_empty());
        assert_eq!(empty.max(), None);
    }
}
