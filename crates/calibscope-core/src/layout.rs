//! Grid placement of qubits and couplings.
//!
//! Qubits sit on an `N×N` square lattice. With multiplexer (MUX) grouping of
//! size `M`, indices are assigned MUX-block first: block `k` covers qubits
//! `k·M²..(k+1)·M²`, blocks are laid out row-major over an `(N/M)×(N/M)`
//! block grid, and the `M×M` positions inside a block are row-major too.
//!
//! ```text
//!  N=4, M=2        col 0  1  2  3
//!          row 0      0  1  4  5
//!          row 1      2  3  6  7
//!          row 2      8  9 12 13
//!          row 3     10 11 14 15
//! ```
//!
//! A coupling `"a-b"` is drawn at the midpoint of its two qubits. Anything that
//! does not resolve is "unmapped" and rendered as a placeholder by the caller.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{CalibError, Result};

pub const DEFAULT_GRID_SIZE: usize = 8;
pub const DEFAULT_MUX_SIZE: usize = 2;
pub const DEFAULT_REGION_SIZE: usize = 4;
/// Largest lattice edge whose qubit ids all fit in a `u32`.
pub const MAX_GRID_SIZE: usize = 65_535;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GridCoordinate {
    pub row: usize,
    pub col: usize,
}

impl GridCoordinate {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

/// Fractional grid position, used for coupling anchors.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridPoint {
    pub row: f64,
    pub col: f64,
}

/// Zoom region index: `(row / R, col / R)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RegionIndex {
    pub row: usize,
    pub col: usize,
}

/// A parsed entity identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityId {
    Qubit(u32),
    /// Coupling between two qubits, written `"a-b"`.
    Coupling(u32, u32),
}

impl EntityId {
    /// Parse `"12"` or `"3-4"`. Anything else is `None`.
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        match raw.split_once('-') {
            Some((a, b)) => Some(EntityId::Coupling(a.parse().ok()?, b.parse().ok()?)),
            None => raw.parse().ok().map(EntityId::Qubit),
        }
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityId::Qubit(q) => write!(f, "{q}"),
            EntityId::Coupling(a, b) => write!(f, "{a}-{b}"),
        }
    }
}

/// Both endpoints of a coupling plus its visual anchor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CouplingPlacement {
    pub from: GridCoordinate,
    pub to: GridCoordinate,
    pub anchor: GridPoint,
}

/// Where an entity goes on the grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Placement {
    Qubit {
        id: String,
        position: GridCoordinate,
    },
    Coupling {
        id: String,
        #[serde(flatten)]
        placement: CouplingPlacement,
    },
    Unmapped {
        id: String,
    },
}

impl Placement {
    pub fn is_mapped(&self) -> bool {
        !matches!(self, Placement::Unmapped { .. })
    }
}

// ---------------------------------------------------------------------------
// Topology
// ---------------------------------------------------------------------------

/// Chip layout parameters, read-only input to the mapper.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Topology {
    /// Edge length `N` of the square lattice.
    pub grid_size: usize,
    /// MUX block edge `M`. `None`, `0`, `1`, or a value not dividing `N`
    /// means plain row-major placement.
    pub mux_size: Option<usize>,
    /// Region edge `R` for zoomed views.
    pub region_size: usize,
    /// Explicit qubit → coordinate table; wins over the computed mapping.
    pub positions: BTreeMap<u32, GridCoordinate>,
}

impl Default for Topology {
    fn default() -> Self {
        Self {
            grid_size: DEFAULT_GRID_SIZE,
            mux_size: Some(DEFAULT_MUX_SIZE),
            region_size: DEFAULT_REGION_SIZE,
            positions: BTreeMap::new(),
        }
    }
}

impl Topology {
    /// Square lattice with MUX grouping `mux_size`.
    pub fn square(grid_size: usize, mux_size: Option<usize>) -> Self {
        Self {
            grid_size,
            mux_size,
            ..Self::default()
        }
    }

    pub fn qubit_count(&self) -> usize {
        self.grid_size.saturating_mul(self.grid_size)
    }

    /// Reject lattices too large to index with `u32` qubit ids.
    pub fn validate(&self) -> Result<()> {
        if self.grid_size > MAX_GRID_SIZE {
            return Err(CalibError::InvalidConfig(format!(
                "grid_size {} exceeds {MAX_GRID_SIZE}",
                self.grid_size
            )));
        }
        Ok(())
    }

    /// Position of qubit `q`, or `None` when unmapped.
    pub fn qubit_position(&self, q: u32) -> Option<GridCoordinate> {
        if let Some(&pos) = self.positions.get(&q) {
            return Some(pos);
        }
        let q = q as usize;
        let n = self.grid_size;
        if q >= self.qubit_count() {
            return None;
        }
        match self.mux_block() {
            Some(m) => {
                let per_block = m * m;
                let blocks_per_row = n / m;
                let (block, local) = (q / per_block, q % per_block);
                Some(GridCoordinate::new(
                    (block / blocks_per_row) * m + local / m,
                    (block % blocks_per_row) * m + local % m,
                ))
            }
            None => Some(GridCoordinate::new(q / n, q % n)),
        }
    }

    /// Endpoints and midpoint anchor of coupling `a-b`.
    pub fn coupling_position(&self, a: u32, b: u32) -> Option<CouplingPlacement> {
        let from = self.qubit_position(a)?;
        let to = self.qubit_position(b)?;
        Some(CouplingPlacement {
            from,
            to,
            anchor: GridPoint {
                row: (from.row + to.row) as f64 / 2.0,
                col: (from.col + to.col) as f64 / 2.0,
            },
        })
    }

    /// Resolve a raw id string into a placement; never fails.
    pub fn place(&self, raw: &str) -> Placement {
        let id = raw.trim().to_string();
        match EntityId::parse(raw) {
            Some(EntityId::Qubit(q)) => match self.qubit_position(q) {
                Some(position) => Placement::Qubit { id, position },
                None => Placement::Unmapped { id },
            },
            Some(EntityId::Coupling(a, b)) => match self.coupling_position(a, b) {
                Some(placement) => Placement::Coupling { id, placement },
                None => Placement::Unmapped { id },
            },
            None => Placement::Unmapped { id },
        }
    }

    /// MUX block a qubit belongs to, when MUX grouping is active.
    pub fn mux_index(&self, q: u32) -> Option<usize> {
        let m = self.mux_block()?;
        let q = q as usize;
        (q < self.qubit_count()).then_some(q / (m * m))
    }

    /// Region containing qubit `q`.
    pub fn region_of_qubit(&self, q: u32) -> Option<RegionIndex> {
        self.qubit_position(q)
            .map(|pos| region_of(pos, self.region_size))
    }

    /// Regions per grid side.
    pub fn regions_per_side(&self) -> usize {
        self.grid_size.div_ceil(self.region_size.max(1))
    }

    /// Qubits placed inside `region`, ascending.
    ///
    /// Visits only the cells of `region`, plus the explicit position table.
    pub fn region_qubits(&self, region: RegionIndex) -> Vec<u32> {
        let r = self.region_size.max(1);
        let n = self.grid_size;
        let span = |i: usize| {
            let start = i.saturating_mul(r).min(n);
            let end = i.saturating_add(1).saturating_mul(r).min(n);
            start..end
        };

        let mut ids = BTreeSet::new();
        for row in span(region.row) {
            for col in span(region.col) {
                match self.computed_qubit_at(GridCoordinate::new(row, col)) {
                    Some(q) if !self.positions.contains_key(&q) => {
                        ids.insert(q);
                    }
                    _ => {}
                }
            }
        }
        ids.extend(
            self.positions
                .iter()
                .filter(|&(_, &pos)| region_of(pos, r) == region)
                .map(|(&q, _)| q),
        );
        ids.into_iter().collect()
    }

    /// Inverse of the computed mapping, ignoring the explicit table.
    fn computed_qubit_at(&self, coord: GridCoordinate) -> Option<u32> {
        let n = self.grid_size;
        if coord.row >= n || coord.col >= n {
            return None;
        }
        let q = match self.mux_block() {
            Some(m) => {
                let block = (coord.row / m) * (n / m) + coord.col / m;
                let local = (coord.row % m) * m + coord.col % m;
                block.checked_mul(m * m)?.checked_add(local)?
            }
            None => coord.row.checked_mul(n)?.checked_add(coord.col)?,
        };
        u32::try_from(q).ok()
    }

    fn mux_block(&self) -> Option<usize> {
        self.mux_size
            .filter(|&m| m > 1 && m <= self.grid_size && self.grid_size % m == 0)
    }
}

/// Region index of `coord` for region edge `region_size` (0 is treated as 1).
pub fn region_of(coord: GridCoordinate, region_size: usize) -> RegionIndex {
    let r = region_size.max(1);
    RegionIndex {
        row: coord.row / r,
        col: coord.col / r,
    }
}
