//! Pearson correlation and the cross-parameter correlation matrix.
//!
//! The matrix builder only emits the upper triangle (one result per unordered
//! parameter pair). Mirroring and the unit diagonal belong to presentation and
//! are provided separately by [`CorrelationTable`].

use std::collections::{BTreeMap, HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::snapshot::{ParameterSet, Sample};

/// Pairs sharing fewer entities than this are omitted from the matrix.
pub const MIN_PAIR_SAMPLES: usize = 3;

// ---------------------------------------------------------------------------
// Result types
// ---------------------------------------------------------------------------

/// Correlation coefficient together with the number of aligned samples.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pearson {
    pub r: f64,
    pub n: usize,
}

impl Pearson {
    const DEGENERATE: Pearson = Pearson { r: 0.0, n: 0 };
}

/// Correlation between two parameters over their shared entities.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrelationResult {
    pub parameter_a: String,
    pub parameter_b: String,
    pub r: f64,
    pub sample_size: usize,
}

// ---------------------------------------------------------------------------
// Kernel
// ---------------------------------------------------------------------------

/// Pearson correlation coefficient of two equal-length vectors.
///
/// Empty or mismatched inputs give `{ r: 0, n: 0 }`. Zero variance in either
/// vector gives `r = 0` with the real `n`.
pub fn pearson(x: &[f64], y: &[f64]) -> Pearson {
    let n = x.len();
    if n == 0 || n != y.len() {
        return Pearson::DEGENERATE;
    }

    let mean_x = x.iter().sum::<f64>() / n as f64;
    let mean_y = y.iter().sum::<f64>() / n as f64;

    let mut cov = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for (&a, &b) in x.iter().zip(y) {
        let dx = a - mean_x;
        let dy = b - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }

    let denom = (var_x * var_y).sqrt();
    let r = if denom == 0.0 {
        0.0
    } else {
        (cov / denom).clamp(-1.0, 1.0)
    };
    Pearson { r, n }
}

/// Pairwise correlation across `keys`, aligned by entity id.
///
/// For every `i < j` over `keys`, entities with a finite value in both
/// parameters are paired up; pairs sharing fewer than `min_samples` entities
/// are skipped entirely. Output follows the pair loop order. Keys missing from
/// `params` behave as empty samples. Repeated keys are dropped after their
/// first occurrence, so no self-pair and no reversed pair is produced.
pub fn correlation_matrix(
    params: &ParameterSet,
    keys: &[&str],
    min_samples: usize,
) -> Vec<CorrelationResult> {
    let mut seen = HashSet::new();
    let keys: Vec<&str> = keys.iter().copied().filter(|k| seen.insert(*k)).collect();

    let columns: Vec<BTreeMap<&str, f64>> = keys
        .iter()
        .map(|key| params.get(key).map(valid_by_entity).unwrap_or_default())
        .collect();

    let mut results = Vec::new();
    for i in 0..keys.len() {
        for j in (i + 1)..keys.len() {
            let (xs, ys) = align(&columns[i], &columns[j]);
            if xs.len() < min_samples {
                continue;
            }
            let p = pearson(&xs, &ys);
            results.push(CorrelationResult {
                parameter_a: keys[i].to_string(),
                parameter_b: keys[j].to_string(),
                r: p.r,
                sample_size: p.n,
            });
        }
    }
    results
}

// ---------------------------------------------------------------------------
// Presentation helper
// ---------------------------------------------------------------------------

/// Symmetric lookup over matrix results, for rendering a full grid.
#[derive(Debug, Clone, Default)]
pub struct CorrelationTable {
    results: Vec<CorrelationResult>,
    index: HashMap<(String, String), usize>,
}

impl CorrelationTable {
    pub fn new(results: Vec<CorrelationResult>) -> Self {
        let index = results
            .iter()
            .enumerate()
            .map(|(i, r)| ((r.parameter_a.clone(), r.parameter_b.clone()), i))
            .collect();
        Self { results, index }
    }

    /// Correlation for `(a, b)` in either order, `1.0` on the diagonal, `None`
    /// for omitted pairs.
    pub fn get(&self, a: &str, b: &str) -> Option<f64> {
        if a == b {
            return Some(1.0);
        }
        self.lookup(a, b).map(|r| r.r)
    }

    /// Sample size behind `(a, b)` in either order.
    pub fn sample_size(&self, a: &str, b: &str) -> Option<usize> {
        self.lookup(a, b).map(|r| r.sample_size)
    }

    /// The `k` strongest pairs by `|r|`, strongest first.
    pub fn strongest(&self, k: usize) -> Vec<&CorrelationResult> {
        let mut sorted: Vec<&CorrelationResult> = self.results.iter().collect();
        sorted.sort_by(|a, b| b.r.abs().total_cmp(&a.r.abs()));
        sorted.truncate(k);
        sorted
    }

    pub fn results(&self) -> &[CorrelationResult] {
        &self.results
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    fn lookup(&self, a: &str, b: &str) -> Option<&CorrelationResult> {
        let idx = self
            .index
            .get(&(a.to_string(), b.to_string()))
            .or_else(|| self.index.get(&(b.to_string(), a.to_string())))?;
        self.results.get(*idx)
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Finite values keyed by entity id; the first entry for an entity wins.
fn valid_by_entity(sample: &Sample) -> BTreeMap<&str, f64> {
    let mut out = BTreeMap::new();
    for m in &sample.entries {
        if let Some(v) = m.value.filter(|v| v.is_finite()) {
            out.entry(m.entity_id.as_str()).or_insert(v);
        }
    }
    out
}

/// Value vectors for entities present in both columns, in entity-id order.
fn align(a: &BTreeMap<&str, f64>, b: &BTreeMap<&str, f64>) -> (Vec<f64>, Vec<f64>) {
    a.iter()
        .filter_map(|(entity, &va)| b.get(entity).map(|&vb| (va, vb)))
        .unzip()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(pairs: &[(&str, Option<f64>)]) -> Sample {
        let mut s = Sample::default();
        for &(id, v) in pairs {
            s.push(id, v);
        }
        s
    }

    #[test]
    fn test_pearson_perfect() {
        let p = pearson(&[1.0, 2.0, 3.0, 4.0], &[2.0, 4.0, 6.0, 8.0]);
        assert!((p.r - 1.0).abs() < 1e-12);
        assert_eq!(p.n, 4);

        let p = pearson(&[1.0, 2.0, 3.0], &[3.0, 2.0, 1.0]);
        assert!((p.r + 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_matrix_ignores_repeated_keys() {
        let mut params = ParameterSet::default();
        let ids = ["0", "1", "2", "3"];
        let a = [1.0, 2.0, 3.0, 5.0];
        let b = [2.0, 3.0, 7.0, 8.0];
        params.insert("a", sample(&ids.iter().zip(a).map(|(&i, v)| (i, Some(v))).collect::<Vec<_>>()));
        params.insert("b", sample(&ids.iter().zip(b).map(|(&i, v)| (i, Some(v))).collect::<Vec<_>>()));

        let results = correlation_matrix(&params, &["a", "b", "a"], MIN_PAIR_SAMPLES);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].parameter_a, "a");
        assert_eq!(results[0].parameter_b, "b");
        assert_eq!(results[0].sample_size, 4);

        assert_eq!(
            correlation_matrix(&params, &["b", "b", "a", "b"], MIN_PAIR_SAMPLES),
            correlation_matrix(&params, &["b", "a"], MIN_PAIR_SAMPLES)
        );
        assert!(correlation_matrix(&params, &["a", "a"], MIN_PAIR_SAMPLES).is_empty());
    }

    #[test]
    fn test_pearson_degenerate_inputs() {
        assert_eq!(pearson(&[], &[]), Pearson { r: 0.0, n: 0 });
        assert_eq!(pearson(&[1.0, 2.0], &[1.0]), Pearson { r: 0.0, n: 0 });
    }

    #[test]
    fn test_pearson_zero_variance() {
        let p = pearson(&[5.0, 5.0, 5.0], &[1.0, 2.0, 3.0]);
        assert_eq!(p.r, 0.0);
        assert_eq!(p.n, 3);
        assert!(!p.r.is_nan());
    }

    #[test]
    fn test_pearson_symmetry() {
        let x = [1.0, 3.5, 2.2, 8.1, 4.4];
        let y = [0.3, 0.9, 0.1, 1.7, 0.8];
        assert_eq!(pearson(&x, &y).r, pearson(&y, &x).r);
    }

    #[test]
    fn test_matrix_skips_low_overlap_pairs() {
        let mut params = ParameterSet::default();
        params.insert(
            "a",
            sample(&[
                ("0", Some(1.0)),
                ("1", Some(2.0)),
                ("2", Some(3.0)),
                ("3", Some(4.0)),
                ("4", Some(5.0)),
            ]),
        );
        params.insert(
            "b",
            sample(&[
                ("0", Some(2.0)),
                ("1", Some(4.1)),
                ("2", Some(5.9)),
                ("3", Some(8.2)),
                ("4", Some(9.9)),
            ]),
        );
        params.insert("c", sample(&[("0", Some(1.0)), ("9", Some(3.0)), ("1", Some(2.0))]));

        let results = correlation_matrix(&params, &["a", "b", "c"], MIN_PAIR_SAMPLES);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].parameter_a, "a");
        assert_eq!(results[0].parameter_b, "b");
        assert_eq!(results[0].sample_size, 5);
        assert!(results[0].r > 0.99);
        assert!(
            !results
                .iter()
                .any(|r| r.parameter_a == "a" && r.parameter_b == "c")
        );
    }

    #[test]
    fn test_matrix_excludes_absent_and_non_finite() {
        let mut params = ParameterSet::default();
        params.insert(
            "t1",
            sample(&[
                ("0", Some(10.0)),
                ("1", None),
                ("2", Some(30.0)),
                ("3", Some(f64::NAN)),
                ("4", Some(50.0)),
            ]),
        );
        params.insert(
            "t2",
            sample(&[
                ("0", Some(1.0)),
                ("1", Some(2.0)),
                ("2", Some(3.0)),
                ("3", Some(4.0)),
                ("4", Some(5.0)),
            ]),
        );
        let results = correlation_matrix(&params, &["t1", "t2"], MIN_PAIR_SAMPLES);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].sample_size, 3);
    }

    #[test]
    fn test_matrix_aligns_by_entity_not_position() {
        let mut params = ParameterSet::default();
        params.insert(
            "x",
            sample(&[("a", Some(1.0)), ("b", Some(2.0)), ("c", Some(3.0))]),
        );
        // Same entities, reversed insertion order.
        params.insert(
            "y",
            sample(&[("c", Some(30.0)), ("b", Some(20.0)), ("a", Some(10.0))]),
        );
        let results = correlation_matrix(&params, &["x", "y"], MIN_PAIR_SAMPLES);
        assert!((results[0].r - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_matrix_pair_order_and_missing_keys() {
        let mut params = ParameterSet::default();
        let full = sample(&[("0", Some(1.0)), ("1", Some(5.0)), ("2", Some(2.0))]);
        params.insert("p", full.clone());
        params.insert("q", full.clone());
        params.insert("r", full);
        let results = correlation_matrix(&params, &["r", "missing", "p", "q"], MIN_PAIR_SAMPLES);
        let order: Vec<(&str, &str)> = results
            .iter()
            .map(|r| (r.parameter_a.as_str(), r.parameter_b.as_str()))
            .collect();
        assert_eq!(order, vec![("r", "p"), ("r", "q"), ("p", "q")]);
    }

    #[test]
    fn test_table_mirrors_and_diagonal() {
        let table = CorrelationTable::new(vec![
            CorrelationResult {
                parameter_a: "t1".into(),
                parameter_b: "t2".into(),
                r: 0.42,
                sample_size: 12,
            },
            CorrelationResult {
                parameter_a: "t1".into(),
                parameter_b: "fidelity".into(),
                r: -0.8,
                sample_size: 9,
            },
        ]);
        assert_eq!(table.get("t1", "t2"), Some(0.42));
        assert_eq!(table.get("t2", "t1"), Some(0.42));
        assert_eq!(table.get("t2", "t2"), Some(1.0));
        assert_eq!(table.get("t2", "fidelity"), None);
        assert_eq!(table.sample_size("fidelity", "t1"), Some(9));
        let top = table.strongest(1);
        assert_eq!(top[0].parameter_b, "fidelity");
    }
}
