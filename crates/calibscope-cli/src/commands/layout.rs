//! `calibscope layout`: the qubit/coupling grid, optionally colored by one parameter.

use std::collections::HashMap;

use calibscope_core::{
    DashboardConfig, GridCoordinate, ParameterSet, Placement, RegionIndex, Snapshot, min_max,
};
use serde::Serialize;

#[derive(Serialize)]
struct Cell {
    #[serde(flatten)]
    placement: Placement,
    #[serde(skip_serializing_if = "Option::is_none")]
    value: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    color: Option<String>,
}

pub fn run(
    config: &DashboardConfig,
    input: &str,
    parameter: Option<&str>,
    regions: bool,
    output_path: Option<&str>,
) {
    let (snapshot, params) = super::load_snapshot(input);
    let cells = build_cells(config, &snapshot, &params, parameter);

    let unmapped: Vec<&str> = cells
        .iter()
        .filter_map(|c| match &c.placement {
            Placement::Unmapped { id } => Some(id.as_str()),
            _ => None,
        })
        .collect();

    if regions {
        print_regions(config, &cells);
    } else {
        print_grid(config, &cells, parameter.is_some());
    }
    if !unmapped.is_empty() {
        println!("\n{} unmapped: {}", unmapped.len(), unmapped.join(", "));
    }

    if let Some(path) = output_path {
        super::write_json(path, &cells);
    }
}

fn build_cells(
    config: &DashboardConfig,
    snapshot: &Snapshot,
    params: &ParameterSet,
    parameter: Option<&str>,
) -> Vec<Cell> {
    let sample = parameter.and_then(|p| params.get(p));
    let domain = parameter.and_then(|p| min_max(&params.values_of(p)));

    snapshot
        .entity_ids()
        .map(|id| {
            let value = sample.and_then(|s| s.get(id)).filter(|v| v.is_finite());
            let color = match (value, domain) {
                (Some(v), Some((min, max))) => Some(config.palette.color_for(v, min, max).to_hex()),
                _ => None,
            };
            Cell {
                placement: config.topology.place(id),
                value,
                color,
            }
        })
        .collect()
}

fn print_grid(config: &DashboardConfig, cells: &[Cell], with_values: bool) {
    let n = config.topology.grid_size;
    let mut by_pos: HashMap<GridCoordinate, &Cell> = HashMap::new();
    for cell in cells {
        if let Placement::Qubit { position, .. } = &cell.placement {
            by_pos.insert(*position, cell);
        }
    }

    println!("{n}x{n} grid ({} qubits placed)\n", by_pos.len());
    for row in 0..n {
        let line: Vec<String> = (0..n)
            .map(|col| {
                let cell = by_pos.get(&GridCoordinate::new(row, col)).copied();
                cell_label(cell, with_values)
            })
            .collect();
        println!("{}", line.join(" "));
    }
}

/// One grid cell: the qubit id, or its value and heatmap color.
fn cell_label(cell: Option<&Cell>, with_values: bool) -> String {
    match cell {
        Some(cell) if with_values => match (cell.value, cell.color.as_deref()) {
            (Some(v), Some(color)) => format!("{v:>9.3} {color}"),
            (Some(v), None) => format!("{v:>9.3} {:7}", ""),
            _ => format!("{:>9} {:7}", "-", ""),
        },
        Some(Cell {
            placement: Placement::Qubit { id, .. },
            ..
        }) => format!("{id:>5}"),
        _ if with_values => format!("{:>9} {:7}", "·", ""),
        _ => format!("{:>5}", "·"),
    }
}

fn print_regions(config: &DashboardConfig, cells: &[Cell]) {
    let topo = &config.topology;
    let present: Vec<&str> = cells
        .iter()
        .filter_map(|c| match &c.placement {
            Placement::Qubit { id, .. } => Some(id.as_str()),
            _ => None,
        })
        .collect();

    let per_side = topo.regions_per_side();
    println!(
        "{per_side}x{per_side} regions of {0}x{0}\n",
        topo.region_size.max(1)
    );
    for row in 0..per_side {
        for col in 0..per_side {
            let region = RegionIndex { row, col };
            let members: Vec<String> = topo
                .region_qubits(region)
                .into_iter()
                .map(|q| q.to_string())
                .filter(|q| present.contains(&q.as_str()))
                .collect();
            println!("  region ({row},{col}): {}", members.join(" "));
        }
    }
}
