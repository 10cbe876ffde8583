//! # calibscope-core
//!
//! **The numbers behind a quantum-chip calibration dashboard.**
//!
//! `calibscope-core` is the pure computation kernel that turns calibration
//! snapshots (per-qubit and per-coupling parameters such as T1, T2 or gate
//! fidelity) into the things a dashboard draws: correlation matrices, CDF
//! curves, descriptive statistics with yield, histogram bins, grid positions
//! and heatmap colors.
//!
//! ## Quick Start
//!
//! ```
//! use calibscope_core::{Snapshot, correlation_matrix, empirical_cdf, MIN_PAIR_SAMPLES};
//!
//! let snapshot = Snapshot::from_json_str(r#"{
//!     "0": {"t1": 41.0, "t2": 30.5},
//!     "1": {"t1": 55.2, "t2": 39.0},
//!     "2": {"t1": 61.8, "t2": {"value": 44.1}},
//!     "3": {"t1": 47.3, "t2": null}
//! }"#).unwrap();
//!
//! let params = snapshot.to_parameter_set().unwrap();
//! let pairs = correlation_matrix(&params, &["t1", "t2"], MIN_PAIR_SAMPLES);
//! assert_eq!(pairs.len(), 1);
//! assert_eq!(pairs[0].sample_size, 3);
//!
//! let cdf = empirical_cdf(&params.values_of("t1")).unwrap();
//! assert_eq!(cdf.points.len(), 4 + 2);
//! ```
//!
//! ## Architecture
//!
//! Backend JSON → [`Snapshot`] (normalize) → [`ParameterSet`] → kernel → chart data
//!
//! Only the boundary ([`snapshot`], [`config`]) can fail. Every kernel function
//! is pure and answers insufficient data with a documented sentinel (`r = 0`,
//! `None` for "no data" or "unmapped") instead of an error, so a view can
//! always render an empty state.

pub mod cdf;
pub mod color;
pub mod config;
pub mod correlation;
pub mod error;
pub mod layout;
pub mod snapshot;
pub mod stats;

pub use cdf::{CdfCurve, CdfPoint, empirical_cdf};
pub use color::{Palette, RED_YELLOW_GREEN, Rgb, VIRIDIS};
pub use config::{DashboardConfig, Threshold};
pub use correlation::{
    CorrelationResult, CorrelationTable, MIN_PAIR_SAMPLES, Pearson, correlation_matrix, pearson,
};
pub use error::{CalibError, Result};
pub use layout::{
    CouplingPlacement, EntityId, GridCoordinate, MAX_GRID_SIZE, Placement, RegionIndex, Topology,
    region_of,
};
pub use snapshot::{Measurement, ParameterSet, Sample, Snapshot, normalize_value};
pub use stats::{
    DescriptiveStats, Direction, Histogram, MAX_HISTOGRAM_BINS, MetricSummary, histogram, mean,
    median, min_max, percentile, stddev, summarize, yield_rate,
};

/// Library version (from Cargo.toml).
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
