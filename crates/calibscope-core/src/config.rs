//! Dashboard configuration.
//!
//! A single JSON document, every field optional:
//!
//! ```json
//! {
//!   "topology": { "grid_size": 8, "mux_size": 2, "region_size": 4 },
//!   "palette": ["#440154", "#21918c", "#fde725"],
//!   "min_pair_samples": 3,
//!   "thresholds": { "t1": { "threshold": 50.0, "direction": "higher-is-better" } }
//! }
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::color::Palette;
use crate::correlation::MIN_PAIR_SAMPLES;
use crate::error::Result;
use crate::layout::Topology;
use crate::stats::Direction;

/// Pass/fail rule for one parameter's yield.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Threshold {
    pub threshold: f64,
    pub direction: Direction,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub topology: Topology,
    pub palette: Palette,
    pub min_pair_samples: usize,
    pub thresholds: BTreeMap<String, Threshold>,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            topology: Topology::default(),
            palette: Palette::default(),
            min_pair_samples: MIN_PAIR_SAMPLES,
            thresholds: BTreeMap::new(),
        }
    }
}

impl DashboardConfig {
    pub fn from_json_str(raw: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(raw)?;
        config.topology.validate()?;
        Ok(config)
    }

    /// Load a config file.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        let config = Self::from_json_str(&raw)?;
        log::info!(
            "loaded config {}: {}x{} grid, {} thresholds",
            path.display(),
            config.topology.grid_size,
            config.topology.grid_size,
            config.thresholds.len()
        );
        Ok(config)
    }

    /// Load `path` when given, otherwise defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(p) => Self::load(p),
            None => Ok(Self::default()),
        }
    }

    pub fn threshold_for(&self, parameter: &str) -> Option<Threshold> {
        self.thresholds.get(parameter).copied()
    }
}
