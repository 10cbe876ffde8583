//! CLI for calibscope: statistics, correlation and grid layout for qubit calibration data.

mod commands;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "calibscope")]
#[command(about = "calibscope: statistics and layout for quantum-chip calibration snapshots")]
#[command(version = calibscope_core::VERSION)]
struct Cli {
    /// Dashboard config JSON (topology, palette, thresholds)
    #[arg(long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List entities and parameters present in a snapshot
    Inspect {
        /// Snapshot JSON: { entity_id: { parameter: value } }
        #[arg(long)]
        input: String,
    },

    /// Descriptive statistics and yield per parameter
    Stats {
        #[arg(long)]
        input: String,

        /// Comma-separated parameter keys (default: all)
        #[arg(long)]
        parameters: Option<String>,

        /// Yield threshold, applied to every selected parameter (overrides config)
        #[arg(long)]
        threshold: Option<f64>,

        /// Which side of the threshold passes
        #[arg(long, default_value = "higher-is-better", value_parser = ["higher-is-better", "lower-is-better"])]
        direction: String,

        /// Write results as JSON
        #[arg(long)]
        output: Option<String>,

        /// Write results as CSV
        #[arg(long)]
        csv: Option<String>,
    },

    /// Pairwise Pearson correlation between parameters over shared entities
    Correlate {
        #[arg(long)]
        input: String,

        /// Comma-separated parameter keys (default: all)
        #[arg(long)]
        parameters: Option<String>,

        /// Minimum shared entities per pair (default: config, 3)
        #[arg(long)]
        min_samples: Option<usize>,

        /// Render the mirrored matrix instead of the pair list
        #[arg(long)]
        matrix: bool,

        #[arg(long)]
        output: Option<String>,

        #[arg(long)]
        csv: Option<String>,
    },

    /// Empirical CDF of one parameter
    Cdf {
        #[arg(long)]
        input: String,

        /// Parameter key
        #[arg(long)]
        parameter: String,

        #[arg(long)]
        output: Option<String>,

        #[arg(long)]
        csv: Option<String>,
    },

    /// Equal-width histogram of one parameter
    Histogram {
        #[arg(long)]
        input: String,

        #[arg(long)]
        parameter: String,

        /// Number of bins
        #[arg(long, default_value = "10")]
        bins: usize,

        #[arg(long)]
        output: Option<String>,
    },

    /// Grid placement of every entity, with a heatmap of one parameter
    Layout {
        #[arg(long)]
        input: String,

        /// Parameter to color cells by
        #[arg(long)]
        parameter: Option<String>,

        /// Print region membership instead of the grid
        #[arg(long)]
        regions: bool,

        #[arg(long)]
        output: Option<String>,
    },

    /// Heatmap color for a value on a [min, max] domain
    Color {
        value: f64,

        #[arg(long)]
        min: f64,

        #[arg(long)]
        max: f64,
    },

    /// Start the HTTP JSON API
    Server {
        /// Port to listen on
        #[arg(long, default_value = "8043")]
        port: u16,

        /// Bind address
        #[arg(long, default_value = "127.0.0.1")]
        host: String,
    },
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    let config = commands::load_config(cli.config.as_deref());

    match cli.command {
        Commands::Inspect { input } => commands::inspect::run(&input),
        Commands::Stats {
            input,
            parameters,
            threshold,
            direction,
            output,
            csv,
        } => commands::stats::run(commands::stats::StatsCommandConfig {
            config: &config,
            input: &input,
            parameters: parameters.as_deref(),
            threshold,
            direction: &direction,
            output_path: output.as_deref(),
            csv_path: csv.as_deref(),
        }),
        Commands::Correlate {
            input,
            parameters,
            min_samples,
            matrix,
            output,
            csv,
        } => commands::correlate::run(commands::correlate::CorrelateCommandConfig {
            input: &input,
            parameters: parameters.as_deref(),
            min_samples: min_samples.unwrap_or(config.min_pair_samples),
            matrix,
            output_path: output.as_deref(),
            csv_path: csv.as_deref(),
        }),
        Commands::Cdf {
            input,
            parameter,
            output,
            csv,
        } => commands::cdf::run(&input, &parameter, output.as_deref(), csv.as_deref()),
        Commands::Histogram {
            input,
            parameter,
            bins,
            output,
        } => commands::histogram::run(&input, &parameter, bins, output.as_deref()),
        Commands::Layout {
            input,
            parameter,
            regions,
            output,
        } => commands::layout::run(
            &config,
            &input,
            parameter.as_deref(),
            regions,
            output.as_deref(),
        ),
        Commands::Color { value, min, max } => commands::color::run(&config, value, min, max),
        Commands::Server { port, host } => commands::server::run(config, &host, port),
    }
}
