//! `calibscope correlate`: pairwise Pearson correlation between parameters.

use std::path::Path;

use calibscope_core::{CorrelationTable, correlation_matrix};

pub struct CorrelateCommandConfig<'a> {
    pub input: &'a str,
    pub parameters: Option<&'a str>,
    pub min_samples: usize,
    pub matrix: bool,
    pub output_path: Option<&'a str>,
    pub csv_path: Option<&'a str>,
}

pub fn run(cfg: CorrelateCommandConfig<'_>) {
    let (snapshot, params) = super::load_snapshot(cfg.input);
    let names = super::select_parameters(cfg.parameters, &snapshot);
    if names.len() < 2 {
        eprintln!("Need at least two parameters to correlate (found {}).", names.len());
        std::process::exit(1);
    }
    let keys: Vec<&str> = names.iter().map(String::as_str).collect();
    log::debug!("correlating {} parameters: {}", keys.len(), keys.join(","));
    let results = correlation_matrix(&params, &keys, cfg.min_samples);

    let total_pairs = keys.len() * (keys.len() - 1) / 2;
    println!(
        "Correlation over {} parameters: {} of {} pairs with >= {} shared entities\n",
        keys.len(),
        results.len(),
        total_pairs,
        cfg.min_samples
    );

    let table = CorrelationTable::new(results);
    if cfg.matrix {
        print_matrix(&table, &keys);
    } else {
        for r in table.results() {
            println!(
                "  {:20} x {:20}  r = {:+.4}  (n = {})",
                r.parameter_a, r.parameter_b, r.r, r.sample_size
            );
        }
    }

    if let Some(path) = cfg.output_path {
        super::write_json(path, &table.results());
    }
    if let Some(path) = cfg.csv_path {
        match super::export::write_correlation_csv(Path::new(path), table.results()) {
            Ok(()) => println!("CSV written to {path}"),
            Err(e) => eprintln!("Failed to write {path}: {e}"),
        }
    }
}

fn print_matrix(table: &CorrelationTable, keys: &[&str]) {
    print!("{:>14}", "");
    for k in keys {
        print!(" {:>9}", truncate(k, 9));
    }
    println!();
    for a in keys {
        print!("{:>14}", truncate(a, 14));
        for b in keys {
            match table.get(a, b) {
                Some(r) => print!(" {r:>+9.3}"),
                None => print!(" {:>9}", "·"),
            }
        }
        println!();
    }
}

fn truncate(s: &str, width: usize) -> &str {
    match s.char_indices().nth(width) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}
