//! wigwin: fixed-width signal windows from WIG tracks
//!
//! Usage: wigwin <COMMAND> [OPTIONS]

use clap::{Parser, Subcommand};
use log::info;
use std::io;
use std::path::PathBuf;
use std::process;

use wigwin::commands::{GenerateCommand, GenerateConfig, PercentileCommand, WindowsCommand};
use wigwin::config::{ConfigError, Mode, ScanConfig};
use wigwin::streaming::{create_output, WindowWriter};
use wigwin::wig::{open_input, WigError};

#[derive(Parser)]
#[command(name = "wigwin")]
#[command(version)]
#[command(about = "Fixed-width signal windows from WIG tracks", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Cut a signal track into binned windows and write them as CSV
    Windows {
        /// Input WIG track (two header lines, then position<TAB>signal)
        #[arg(short, long)]
        input: PathBuf,

        /// Bin size (resolution) in coordinate units
        #[arg(short, long, visible_alias = "resolution")]
        bin_size: u64,

        /// Keep windows with at least one bin strictly above this value
        #[arg(short, long, allow_negative_numbers = true)]
        cutoff: Option<f32>,

        /// Derive the cutoff from this signal percentile of the input (0-1)
        #[arg(long, conflicts_with = "cutoff")]
        cutoff_percentile: Option<f64>,

        /// Y for training windows, N for annotation windows
        #[arg(short, long)]
        mode: Mode,

        /// Chromosome label written to every row
        #[arg(long)]
        chrom: String,

        /// Output CSV file (created or truncated)
        #[arg(short, long)]
        output: PathBuf,

        /// Base region size in coordinate units
        #[arg(short, long)]
        region_size: u64,

        /// Print scan statistics to stderr
        #[arg(long)]
        stats: bool,
    },

    /// Report the signal value at a percentile of a track
    Percentile {
        /// Input WIG track
        #[arg(short, long)]
        input: PathBuf,

        /// Percentile as a fraction (0-1)
        #[arg(short, long, default_value = "0.99")]
        percentile: f64,
    },

    /// Generate a synthetic WIG track
    Generate {
        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Chromosome name used in the header
        #[arg(long, default_value = "chr1")]
        chrom: String,

        /// Number of positions
        #[arg(short = 'n', long, default_value = "100000")]
        records: u64,

        /// First position
        #[arg(long, default_value = "0")]
        start: u64,

        /// Distance between positions
        #[arg(long, default_value = "10")]
        step: u64,

        /// Random seed
        #[arg(long, default_value = "42")]
        seed: u64,

        /// Upper bound of background noise
        #[arg(long, default_value = "0.5")]
        baseline: f32,

        /// Probability that a peak starts at a position
        #[arg(long, default_value = "0.01")]
        peak_rate: f64,

        /// Mean peak height
        #[arg(long, default_value = "10.0")]
        peak_height: f32,

        /// Peak width in positions
        #[arg(long, default_value = "20")]
        peak_width: u32,

        /// Probability that a position is dropped
        #[arg(long, default_value = "0.0")]
        gap_rate: f64,
    },
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Windows {
            input,
            bin_size,
            cutoff,
            cutoff_percentile,
            mode,
            chrom,
            output,
            region_size,
            stats,
        } => run_windows(
            input,
            bin_size,
            cutoff,
            cutoff_percentile,
            mode,
            chrom,
            output,
            region_size,
            stats,
        ),
        Commands::Percentile { input, percentile } => run_percentile(input, percentile),
        Commands::Generate {
            output,
            chrom,
            records,
            start,
            step,
            seed,
            baseline,
            peak_rate,
            peak_height,
            peak_width,
            gap_rate,
        } => run_generate(
            output,
            GenerateConfig {
                chrom,
                records,
                start,
                step,
                seed,
                baseline,
                peak_rate,
                peak_height,
                peak_width,
                gap_rate,
            },
        ),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

#[allow(clippy::too_many_arguments)]
fn run_windows(
    input: PathBuf,
    bin_size: u64,
    cutoff: Option<f32>,
    cutoff_percentile: Option<f64>,
    mode: Mode,
    chrom: String,
    output: PathBuf,
    region_size: u64,
    stats: bool,
) -> Result<(), WigError> {
    let track = open_input(&input)?;

    let cutoff = match (cutoff, cutoff_percentile) {
        (Some(c), _) => c,
        (None, Some(p)) => {
            let result = PercentileCommand::new(p)?.run(&input)?;
            info!("cutoff from {}", result);
            result.value
        }
        (None, None) => return Err(ConfigError::MissingCutoff.into()),
    };

    let config = ScanConfig::new(chrom, bin_size, region_size, cutoff, mode)?;
    let out = create_output(&output)?;
    let cmd = WindowsCommand::new(config);
    let result = cmd.run_reader(track, out)?;

    println!("Input generated for chromosome {}", cmd.config().chrom());
    if stats {
        eprintln!("Windows stats: {}", result);
    }
    Ok(())
}

fn run_percentile(input: PathBuf, percentile: f64) -> Result<(), WigError> {
    let result = PercentileCommand::new(percentile)?.run(&input)?;
    info!("{}", result);

    let stdout = io::stdout();
    let mut writer = WindowWriter::new(stdout.lock());
    writer.write_float(result.value as f64)?;
    writer.write_bytes(b"\n")?;
    writer.flush()
}

fn run_generate(output: Option<PathBuf>, config: GenerateConfig) -> Result<(), WigError> {
    let cmd = GenerateCommand::new(config)?;
    let stats = match output {
        Some(path) => cmd.run(create_output(&path)?)?,
        None => cmd.run(io::stdout().lock())?,
    };
    eprintln!("Generated: {}", stats);
    Ok(())
}
