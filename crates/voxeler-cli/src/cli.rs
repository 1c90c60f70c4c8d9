use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    author = "Julien Lenoir, Anna Spampinato",
    version,
    about = "Voxeler CLI - A command-line interface for Voxeler, a voxel-grid engine for comparing molecular structures and solvating them with empirically scored water placements.",
    help_template = HELP_TEMPLATE,
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output except for errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Set the number of threads for parallel computation.
    /// Defaults to the number of available logical cores.
    #[arg(short = 'j', long, global = true, value_name = "NUM")]
    pub threads: Option<usize>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Compare a batch of PDB structures by volumetric overlap on a shared voxel grid.
    Compare(CompareArgs),
    /// Place water molecules around PDB structures using empirical density scores.
    Solvate(SolvateArgs),
}

/// Arguments for the `compare` subcommand.
#[derive(Args, Debug)]
pub struct CompareArgs {
    // --- Core Arguments ---
    /// Directory containing the input PDB structures (at least two).
    #[arg(short, long, required = true, value_name = "DIR")]
    pub input: PathBuf,

    /// Directory receiving the similarity matrix CSV.
    #[arg(short, long, required = true, value_name = "DIR")]
    pub output: PathBuf,

    /// Path to a run configuration file in TOML format.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    // --- Grid Overrides ---
    /// Override the grid spacing in Angstroms.
    #[arg(short, long, value_name = "FLOAT")]
    pub spacing: Option<f64>,

    /// Override the stamped sphere geometry (taxicab, uniform, sphere).
    #[arg(short, long, value_name = "NAME")]
    pub geometry: Option<String>,

    // --- Scoring Overrides ---
    /// Override the overlap normalizer (min, max, global_min, global_max, or a constant).
    #[arg(short, long, value_name = "NAME_OR_FLOAT")]
    pub normalization: Option<String>,

    /// Compare occupied volume only, ignoring element identity.
    #[arg(long)]
    pub volume_only: bool,

    /// Override the memory budget for concurrent grids, in GiB.
    #[arg(short, long, value_name = "FLOAT")]
    pub memory_budget: Option<f64>,
}

/// Arguments for the `solvate` subcommand.
#[derive(Args, Debug)]
pub struct SolvateArgs {
    // --- Core Arguments ---
    /// Directory containing the input PDB structures.
    #[arg(short, long, required = true, value_name = "DIR")]
    pub input: PathBuf,

    /// Directory receiving the solvated PDB structures.
    #[arg(short, long, required = true, value_name = "DIR")]
    pub output: PathBuf,

    /// Path to a run configuration file in TOML format.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    // --- Grid Overrides ---
    /// Override the grid spacing in Angstroms.
    #[arg(short, long, value_name = "FLOAT")]
    pub spacing: Option<f64>,

    /// Override the stamped sphere geometry (taxicab, uniform, sphere).
    #[arg(short, long, value_name = "NAME")]
    pub geometry: Option<String>,

    // --- Placement Overrides ---
    /// Override the solubilization method (itermax, randomax).
    #[arg(short, long, value_name = "NAME")]
    pub method: Option<String>,

    /// Override the number of stochastic runs for the randomax method.
    #[arg(short, long, value_name = "INT")]
    pub runs: Option<u32>,

    /// Override the minimum score a placed water must reach.
    #[arg(long, value_name = "FLOAT")]
    pub min_water_score: Option<f64>,

    /// Override the directory holding the empirical density files.
    #[arg(short, long, value_name = "DIR")]
    pub densities: Option<PathBuf>,
}
