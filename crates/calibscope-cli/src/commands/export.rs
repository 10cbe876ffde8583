//! CSV export of kernel outputs.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use calibscope_core::{CdfCurve, CorrelationResult, MetricSummary};

/// `parameter,count,mean,median,stddev,min,max,threshold,direction,yield_percent`
pub fn write_stats_csv(path: &Path, rows: &[(String, MetricSummary)]) -> io::Result<()> {
    let mut w = BufWriter::new(File::create(path)?);
    writeln!(
        w,
        "parameter,count,mean,median,stddev,min,max,threshold,direction,yield_percent"
    )?;
    for (name, s) in rows {
        writeln!(
            w,
            "{},{},{},{},{},{},{},{},{},{}",
            escape(name),
            s.stats.count,
            s.stats.mean,
            s.stats.median,
            s.stats.stddev,
            s.stats.min,
            s.stats.max,
            opt(s.threshold),
            s.direction.map(|d| d.as_str()).unwrap_or(""),
            opt(s.yield_percent),
        )?;
    }
    w.flush()
}

/// `parameter_a,parameter_b,r,sample_size`
pub fn write_correlation_csv(path: &Path, results: &[CorrelationResult]) -> io::Result<()> {
    let mut w = BufWriter::new(File::create(path)?);
    writeln!(w, "parameter_a,parameter_b,r,sample_size")?;
    for r in results {
        writeln!(
            w,
            "{},{},{},{}",
            escape(&r.parameter_a),
            escape(&r.parameter_b),
            r.r,
            r.sample_size
        )?;
    }
    w.flush()
}

/// `value,cumulative_percent`, padding points included.
pub fn write_cdf_csv(path: &Path, curve: &CdfCurve) -> io::Result<()> {
    let mut w = BufWriter::new(File::create(path)?);
    writeln!(w, "value,cumulative_percent")?;
    for p in &curve.points {
        writeln!(w, "{},{}", p.value, p.cumulative_percent)?;
    }
    w.flush()
}

fn opt(v: Option<f64>) -> String {
    v.map(|x| x.to_string()).unwrap_or_default()
}

/// Quote a field when it contains a delimiter, quote or newline.
fn escape(field: &str) -> String {
    if field.contains([',', '"', '\n']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}
