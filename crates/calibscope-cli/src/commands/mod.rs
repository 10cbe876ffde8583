pub mod cdf;
pub mod color;
pub mod correlate;
pub mod export;
pub mod histogram;
pub mod inspect;
pub mod layout;
pub mod server;
pub mod stats;

use std::path::Path;

use calibscope_core::{DashboardConfig, ParameterSet, Snapshot};
use serde::Serialize;

/// Load the dashboard config, or defaults when no path is given. Exits on error.
pub fn load_config(path: Option<&str>) -> DashboardConfig {
    match DashboardConfig::load_or_default(path.map(Path::new)) {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Failed to load config: {e}");
            std::process::exit(1);
        }
    }
}

/// Load and normalize a snapshot. Exits on error.
pub fn load_snapshot(path: &str) -> (Snapshot, ParameterSet) {
    let snapshot = match Snapshot::load(Path::new(path)) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Failed to read snapshot {path}: {e}");
            std::process::exit(1);
        }
    };
    match snapshot.to_parameter_set() {
        Ok(params) => (snapshot, params),
        Err(e) => {
            eprintln!("Snapshot {path} rejected: {e}");
            std::process::exit(1);
        }
    }
}

/// Split a comma-separated key filter; `None` or `"all"` selects every key.
pub fn select_parameters(filter: Option<&str>, snapshot: &Snapshot) -> Vec<String> {
    match filter {
        Some(f) if f.trim() != "all" => f
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect(),
        _ => snapshot.parameter_keys(),
    }
}

/// Pretty-print `value` as JSON to `path`, reporting the outcome.
pub fn write_json<T: Serialize>(path: &str, value: &T) {
    let json = match serde_json::to_string_pretty(value) {
        Ok(j) => j,
        Err(e) => {
            eprintln!("Failed to serialize results: {e}");
            return;
        }
    };
    match std::fs::write(path, json) {
        Ok(()) => println!("\nResults written to {path}"),
        Err(e) => eprintln!("Failed to write {path}: {e}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot() -> Snapshot {
        Snapshot::from_json_str(r#"{"0": {"t2": 1.0, "t1": 2.0}, "1": {"fidelity": 0.99}}"#)
            .unwrap()
    }

    #[test]
    fn test_select_all_by_default() {
        assert_eq!(select_parameters(None, &snapshot()), vec!["fidelity", "t1", "t2"]);
        assert_eq!(
            select_parameters(Some("all"), &snapshot()),
            vec!["fidelity", "t1", "t2"]
        );
    }

    #[test]
    fn test_select_comma_separated_keeps_order() {
        assert_eq!(
            select_parameters(Some("t2, t1,,"), &snapshot()),
            vec!["t2", "t1"]
        );
    }

    #[test]
    fn test_write_json_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.json");
        let path = path.to_str().unwrap();
        write_json(path, &serde_json::json!({"r": 0.5}));
        let back: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap();
        assert_eq!(back["r"], 0.5);
    }
}
