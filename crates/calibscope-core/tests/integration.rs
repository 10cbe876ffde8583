//! Integration tests for calibscope-core.
//!
//! These tests drive the full pipeline a dashboard refresh goes through:
//! backend snapshot → normalization → kernel → chart data.

use calibscope_core::{
    CorrelationTable, DashboardConfig, Direction, MIN_PAIR_SAMPLES, Placement, Snapshot,
    Topology, correlation_matrix, empirical_cdf, pearson, summarize,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn chip_snapshot() -> Snapshot {
    Snapshot::from_json_str(
        r#"{
            "0": {"t1": 52.1, "t2": 40.2, "fidelity": 0.9991},
            "1": {"t1": 61.4, "t2": 47.9, "fidelity": {"value": 0.9987}},
            "2": {"t1": 38.0, "t2": 29.1, "fidelity": null},
            "3": {"t1": 70.3, "t2": 55.6},
            "4": {"t1": 44.9, "t2": 33.0, "fidelity": 0.9978},
            "0-1": {"zz": 12.5},
            "1-3": {"zz": 40.1}
        }"#,
    )
    .unwrap()
}

#[test]
fn snapshot_to_correlation_matrix() {
    let params = chip_snapshot().to_parameter_set().unwrap();
    let results = correlation_matrix(&params, &["t1", "t2", "fidelity", "zz"], MIN_PAIR_SAMPLES);

    let pairs: Vec<(&str, &str, usize)> = results
        .iter()
        .map(|r| (r.parameter_a.as_str(), r.parameter_b.as_str(), r.sample_size))
        .collect();
    // fidelity has 3 entities in common with t1/t2; zz shares none.
    assert_eq!(
        pairs,
        vec![("t1", "t2", 5), ("t1", "fidelity", 3), ("t2", "fidelity", 3)]
    );
    assert!(results[0].r > 0.99, "t1/t2 should track: {}", results[0].r);

    let table = CorrelationTable::new(results);
    assert_eq!(table.get("fidelity", "t1"), table.get("t1", "fidelity"));
    assert_eq!(table.get("t1", "zz"), None);
}

#[test]
fn snapshot_to_cdf_and_summary() {
    let params = chip_snapshot().to_parameter_set().unwrap();
    let t1 = params.values_of("t1");

    let curve = empirical_cdf(&t1).unwrap();
    assert_eq!(curve.points.len(), t1.len() + 2);
    assert_eq!(curve.median, 52.1);

    let summary = summarize(&t1, Some((50.0, Direction::HigherIsBetter)));
    assert_eq!(summary.stats.count, 5);
    assert_eq!(summary.yield_percent, Some(60.0));
    assert_eq!(summary.stats.median, 52.1);
}

#[test]
fn snapshot_entities_place_on_grid() {
    let snapshot = chip_snapshot();
    let topo = Topology::default();
    let placements: Vec<Placement> = snapshot.entity_ids().map(|id| topo.place(id)).collect();
    assert!(placements.iter().all(Placement::is_mapped));
    assert_eq!(
        placements
            .iter()
            .filter(|p| matches!(p, Placement::Coupling { .. }))
            .count(),
        2
    );
}

#[test]
fn config_drives_palette_and_thresholds() {
    let cfg = DashboardConfig::from_json_str(
        r##"{"palette": ["#000000", "#ffffff"],
             "thresholds": {"t1": {"threshold": 60.0, "direction": "higher-is-better"}}}"##,
    )
    .unwrap();
    assert_eq!(cfg.palette.color_for(50.0, 0.0, 100.0).to_hex(), "#808080");
    let t = cfg.threshold_for("t1").unwrap();
    let summary = summarize(&[55.0, 65.0], Some((t.threshold, t.direction)));
    assert_eq!(summary.yield_percent, Some(50.0));
}

#[test]
fn pearson_properties_hold_on_random_vectors() {
    let mut rng = StdRng::seed_from_u64(0x5eed);
    for _ in 0..200 {
        let n = rng.random_range(2..40);
        let x: Vec<f64> = (0..n).map(|_| rng.random_range(-100.0..100.0)).collect();
        let y: Vec<f64> = (0..n).map(|_| rng.random_range(-1.0..1.0)).collect();

        let xy = pearson(&x, &y);
        let yx = pearson(&y, &x);
        assert_eq!(xy.r, yx.r);
        assert_eq!(xy.n, n);
        assert!((-1.0..=1.0).contains(&xy.r));
        assert!((pearson(&x, &x).r - 1.0).abs() < 1e-9);
    }
}

#[test]
fn kernel_is_idempotent() {
    let params = chip_snapshot().to_parameter_set().unwrap();
    let keys = ["t1", "t2", "fidelity"];

    let first = serde_json::to_string(&correlation_matrix(&params, &keys, MIN_PAIR_SAMPLES)).unwrap();
    let second =
        serde_json::to_string(&correlation_matrix(&params, &keys, MIN_PAIR_SAMPLES)).unwrap();
    assert_eq!(first, second);

    let t2 = params.values_of("t2");
    assert_eq!(
        serde_json::to_string(&empirical_cdf(&t2)).unwrap(),
        serde_json::to_string(&empirical_cdf(&t2)).unwrap()
    );
    let topo = Topology::default();
    assert_eq!(topo.place("1-3"), topo.place("1-3"));
}

#[test]
fn malformed_backend_record_is_rejected() {
    let snapshot = Snapshot::from_json_str(r#"{"0": {"t1": {"result": 3.0}}}"#).unwrap();
    let err = snapshot.to_parameter_set().unwrap_err();
    assert!(err.to_string().contains("lacks 'value'"), "{err}");
}
