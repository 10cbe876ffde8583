use std::path::Path;

use calibscope_core::{DashboardConfig, Direction, MetricSummary, summarize};

pub struct StatsCommandConfig<'a> {
    pub config: &'a DashboardConfig,
    pub input: &'a str,
    pub parameters: Option<&'a str>,
    pub threshold: Option<f64>,
    pub direction: &'a str,
    pub output_path: Option<&'a str>,
    pub csv_path: Option<&'a str>,
}

pub fn run(cfg: StatsCommandConfig<'_>) {
    let (snapshot, params) = super::load_snapshot(cfg.input);
    let keys = super::select_parameters(cfg.parameters, &snapshot);
    let direction = parse_direction(cfg.direction);

    let mut rows: Vec<(String, MetricSummary)> = Vec::with_capacity(keys.len());
    for key in &keys {
        let values = params.values_of(key);
        let threshold = match cfg.threshold {
            Some(t) => Some((t, direction)),
            None => cfg
                .config
                .threshold_for(key)
                .map(|t| (t.threshold, t.direction)),
        };
        rows.push((key.clone(), summarize(&values, threshold)));
    }

    println!(
        "{:<24} {:>5} {:>12} {:>12} {:>12} {:>12} {:>12} {:>8}",
        "Parameter", "N", "Mean", "Median", "Stddev", "Min", "Max", "Yield"
    );
    println!("{}", "-".repeat(104));
    for (key, s) in &rows {
        if s.stats.count == 0 {
            println!("{key:<24} {:>5}  (no data)", 0);
            continue;
        }
        let yield_str = s
            .yield_percent
            .map(|y| format!("{y:.1}%"))
            .unwrap_or_else(|| "-".to_string());
        println!(
            "{:<24} {:>5} {:>12.4} {:>12.4} {:>12.4} {:>12.4} {:>12.4} {:>8}",
            key,
            s.stats.count,
            s.stats.mean,
            s.stats.median,
            s.stats.stddev,
            s.stats.min,
            s.stats.max,
            yield_str
        );
    }

    if let Some(path) = cfg.output_path {
        let json: serde_json::Map<String, serde_json::Value> = rows
            .iter()
            .filter_map(|(k, s)| serde_json::to_value(s).ok().map(|v| (k.clone(), v)))
            .collect();
        super::write_json(path, &json);
    }
    if let Some(path) = cfg.csv_path {
        match super::export::write_stats_csv(Path::new(path), &rows) {
            Ok(()) => println!("CSV written to {path}"),
            Err(e) => eprintln!("Failed to write {path}: {e}"),
        }
    }
}

fn parse_direction(s: &str) -> Direction {
    s.parse().unwrap_or_else(|e| {
        eprintln!("{e}; using higher-is-better");
        Direction::HigherIsBetter
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_direction() {
        assert_eq!(parse_direction("lower-is-better"), Direction::LowerIsBetter);
        assert_eq!(parse_direction("higher-is-better"), Direction::HigherIsBetter);
        assert_eq!(parse_direction("bogus"), Direction::HigherIsBetter);
    }
}
