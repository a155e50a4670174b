//! driftclust CLI - cluster drift trajectories from a CSV table
//!
//! Usage:
//!   driftclust-cli cluster <file> [--backend hex] [--eps 0.8] [--output <file>]
//!   driftclust-cli resolution <file> [--backend hex] [--quantile 0.5]
//!
//! The input table needs `traj,obs,latitude,longitude` columns (`lat`/`lon`
//! also accepted); extra columns are ignored. Cluster labels are written as
//! `traj,cluster` CSV, with -1 marking noise trajectories.

use std::error::Error;
use std::io::Write;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand, ValueEnum};
use log::{info, warn};
use serde::Deserialize;

use driftclust::{
    cluster_sequences, Cell, ClusterAlgorithm, ClusterConfig, GridScheme, HexScheme, Observation,
    SequenceCollection, SeriesEntry, TrajectoryTable,
};

#[derive(Parser)]
#[command(name = "driftclust-cli")]
#[command(about = "Cluster drift trajectories by discrete sequence similarity", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose debug output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Backend {
    Grid,
    Hex,
}

#[derive(Subcommand)]
enum Commands {
    /// Discretize trajectories and cluster them by sequence similarity
    Cluster {
        /// CSV file with traj,obs,latitude,longitude columns
        file: PathBuf,

        /// Output CSV for cluster labels (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Discretization backend
        #[arg(long, value_enum, default_value_t = Backend::Hex)]
        backend: Backend,

        /// Cell resolution; estimated from the data when omitted
        #[arg(short, long)]
        resolution: Option<u8>,

        /// Neighborhood radius
        #[arg(long, default_value = "0.8")]
        eps: f64,

        /// Minimum neighborhood size (the point itself included)
        #[arg(long, default_value = "5")]
        min_samples: usize,

        /// Use raw metric values instead of length-normalized ones
        #[arg(long)]
        no_normalize: bool,

        /// Use the ordering-based variant instead of fixed-radius
        #[arg(long)]
        ordering: bool,
    },

    /// Estimate the finest useful resolution for a table
    Resolution {
        /// CSV file with traj,obs,latitude,longitude columns
        file: PathBuf,

        /// Discretization backend
        #[arg(long, value_enum, default_value_t = Backend::Hex)]
        backend: Backend,

        /// Quantile defining the typical step length
        #[arg(long, default_value = "0.5")]
        quantile: f64,
    },
}

fn main() {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .format(|buf, record| writeln!(buf, "[{:5}] {}", record.level(), record.args()))
        .init();

    let result = match cli.command {
        Commands::Cluster {
            file,
            output,
            backend,
            resolution,
            eps,
            min_samples,
            no_normalize,
            ordering,
        } => run_cluster(
            &file,
            output.as_deref(),
            backend,
            resolution,
            eps,
            min_samples,
            !no_normalize,
            ordering,
        ),
        Commands::Resolution {
            file,
            backend,
            quantile,
        } => run_resolution(&file, backend, quantile),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

/// One row of the input table; extra columns are ignored.
#[derive(Debug, Deserialize)]
struct CsvRow {
    traj: u64,
    obs: u32,
    #[serde(alias = "lat")]
    latitude: f64,
    #[serde(alias = "lon")]
    longitude: f64,
}

fn load_table(path: &Path) -> Result<TrajectoryTable, Box<dyn Error>> {
    let mut reader = csv::Reader::from_path(path)?;
    let mut rows = Vec::new();
    let mut skipped = 0usize;

    for record in reader.deserialize() {
        let row: CsvRow = record?;
        let observation = Observation::new(row.traj, row.obs, row.latitude, row.longitude);
        if observation.is_valid() {
            rows.push(observation);
        } else {
            skipped += 1;
        }
    }
    if skipped > 0 {
        warn!("skipped {skipped} rows with invalid coordinates");
    }

    let table = TrajectoryTable::from_rows(rows);
    info!(
        "loaded {} observations across {} trajectories from {}",
        table.len(),
        table.trajectory_count(),
        path.display()
    );
    Ok(table)
}

fn discretize(
    table: &TrajectoryTable,
    backend: Backend,
    resolution: Option<u8>,
) -> Result<(u8, Vec<SeriesEntry<Cell>>), Box<dyn Error>> {
    match backend {
        Backend::Grid => {
            let scheme = GridScheme::default();
            let resolution = match resolution {
                Some(r) => r,
                None => scheme.estimate_max_resolution(table, 0.5)?,
            };
            Ok((resolution, scheme.to_cells(table, resolution)))
        }
        Backend::Hex => {
            let scheme = HexScheme::new();
            let resolution = match resolution {
                Some(r) => r,
                None => scheme.estimate_max_resolution(table, 0.5)?,
            };
            Ok((resolution, scheme.to_cells(table, resolution)))
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn run_cluster(
    file: &Path,
    output: Option<&Path>,
    backend: Backend,
    resolution: Option<u8>,
    eps: f64,
    min_samples: usize,
    normalize: bool,
    ordering: bool,
) -> Result<(), Box<dyn Error>> {
    let table = load_table(file)?;
    let (resolution, cells) = discretize(&table, backend, resolution)?;
    info!("discretized at resolution {resolution} ({backend:?} backend)");

    let sequences = SequenceCollection::from_series(&cells)?
        .collapse_repeats()?
        .fill_gaps()?;

    let config = ClusterConfig {
        eps,
        min_samples,
        normalize,
        algorithm: if ordering {
            ClusterAlgorithm::Ordering
        } else {
            ClusterAlgorithm::FixedRadius
        },
        ..ClusterConfig::default()
    };
    let assignment = cluster_sequences(&sequences, &config)?;

    println!(
        "{} trajectories -> {} clusters, {} noise",
        assignment.len(),
        assignment.cluster_count(),
        assignment.noise_count()
    );

    let out: Box<dyn Write> = match output {
        Some(path) => Box::new(std::fs::File::create(path)?),
        None => Box::new(std::io::stdout()),
    };
    let mut writer = csv::Writer::from_writer(out);
    writer.write_record(["traj", "cluster"])?;
    for (trajectory, label) in assignment.iter() {
        writer.write_record([trajectory.to_string(), label.to_string()])?;
    }
    writer.flush()?;

    Ok(())
}

fn run_resolution(file: &Path, backend: Backend, quantile: f64) -> Result<(), Box<dyn Error>> {
    let table = load_table(file)?;
    let resolution = match backend {
        Backend::Grid => GridScheme::default().estimate_max_resolution(&table, quantile)?,
        Backend::Hex => HexScheme::new().estimate_max_resolution(&table, quantile)?,
    };
    println!("{resolution}");
    Ok(())
}
