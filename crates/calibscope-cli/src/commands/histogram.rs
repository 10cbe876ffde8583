use calibscope_core::histogram;

const BAR_WIDTH: usize = 40;

pub fn run(input: &str, parameter: &str, bins: usize, output_path: Option<&str>) {
    let (_, params) = super::load_snapshot(input);
    let values = params.values_of(parameter);
    let hist = histogram(&values, bins);

    if hist.counts.is_empty() {
        println!("{parameter}: no data");
        return;
    }

    println!("{parameter}: {} samples in {} bins\n", hist.total(), hist.counts.len());
    let peak = hist.counts.iter().copied().max().unwrap_or(0);
    for (i, &count) in hist.counts.iter().enumerate() {
        println!(
            "  [{:>10.4}, {:>10.4}{} {:>5}  {}",
            hist.edges[i],
            hist.edges[i + 1],
            if i + 1 == hist.counts.len() { "]" } else { ")" },
            count,
            "█".repeat(bar_len(count, peak))
        );
    }

    if let Some(path) = output_path {
        super::write_json(path, &hist);
    }
}

fn bar_len(count: usize, peak: usize) -> usize {
    if peak == 0 {
        0
    } else {
        (count * BAR_WIDTH).div_ceil(peak)
    }
}
