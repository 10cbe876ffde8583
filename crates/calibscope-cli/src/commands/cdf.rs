use std::path::Path;

use calibscope_core::{empirical_cdf, percentile};

pub fn run(input: &str, parameter: &str, output_path: Option<&str>, csv_path: Option<&str>) {
    let (_, params) = super::load_snapshot(input);
    let values = params.values_of(parameter);

    let Some(curve) = empirical_cdf(&values) else {
        println!("{parameter}: no data");
        return;
    };

    println!(
        "{parameter}: {} samples, min {:.4}, median {:.4}, max {:.4}",
        curve.count,
        curve.min().unwrap_or(curve.median),
        curve.median,
        curve.max().unwrap_or(curve.median)
    );
    println!(
        "  p10 {:.4}   p25 {:.4}   p75 {:.4}   p90 {:.4}\n",
        percentile(&values, 10.0),
        percentile(&values, 25.0),
        percentile(&values, 75.0),
        percentile(&values, 90.0)
    );
    println!("{:>14} {:>8}", "value", "cum %");
    for p in &curve.points {
        println!("{:>14.4} {:>7.1}%", p.value, p.cumulative_percent);
    }

    if let Some(path) = output_path {
        super::write_json(path, &curve);
    }
    if let Some(path) = csv_path {
        match super::export::write_cdf_csv(Path::new(path), &curve) {
            Ok(()) => println!("CSV written to {path}"),
            Err(e) => eprintln!("Failed to write {path}: {e}"),
        }
    }
}
