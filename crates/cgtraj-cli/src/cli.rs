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
    author = "Forrest Bicker",
    version,
    about = "cgtraj - Coarse-grain molecular dynamics trajectories and measure bonded parameters (bonds, angles, dihedrals) across them.",
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
    /// Collapse an atomistic trajectory into coarse-grained beads placed at
    /// per-segment centers of mass.
    CoarseGrain(CoarseGrainArgs),
    /// Measure templated bonds, angles, and dihedrals over a coarse-grained
    /// trajectory and export one dataset per measurement.
    Measure(MeasureArgs),
}

/// Arguments for the `coarse-grain` subcommand.
#[derive(Args, Debug)]
pub struct CoarseGrainArgs {
    /// Path to the input topology file (PDB).
    #[arg(short, long, required = true, value_name = "PATH")]
    pub topology: PathBuf,

    /// Path to the input trajectory file (DCD).
    #[arg(short = 'f', long, required = true, value_name = "PATH")]
    pub trajectory: PathBuf,

    /// Path to the residue-to-bead mapping file in TOML format.
    #[arg(short, long, required = true, value_name = "PATH")]
    pub mapping: PathBuf,

    /// Directory the coarse-grained topology and trajectory are written to.
    #[arg(short, long, required = true, value_name = "DIR")]
    pub output_dir: PathBuf,

    /// Base name for the output files (<name>.pdb and <name>.dcd).
    #[arg(short, long, default_value = "cg", value_name = "NAME")]
    pub name: String,

    /// Residue names to coarse-grain; residues not listed are dropped.
    #[arg(short, long, required = true, num_args(1..), value_name = "RESNAME")]
    pub residues: Vec<String>,
}

/// Arguments for the `measure` subcommand.
#[derive(Args, Debug)]
pub struct MeasureArgs {
    /// Path to the coarse-grained topology file (PDB).
    #[arg(short, long, required = true, value_name = "PATH")]
    pub topology: PathBuf,

    /// Path to the coarse-grained trajectory file (DCD).
    #[arg(short = 'f', long, required = true, value_name = "PATH")]
    pub trajectory: PathBuf,

    /// Path to the residue measurement template file in TOML format.
    #[arg(short = 'T', long, required = true, value_name = "PATH")]
    pub templates: PathBuf,

    /// Directory the measurement datasets are written to.
    #[arg(short, long, required = true, value_name = "DIR")]
    pub output_dir: PathBuf,

    /// Stop after this many frames instead of reading the whole trajectory.
    #[arg(long, value_name = "INT")]
    pub max_frame: Option<usize>,

    /// Sample every Nth frame of the trajectory.
    #[arg(short, long, default_value_t = 1, value_name = "INT")]
    pub stride: usize,

    /// Number of frame blocks processed in parallel.
    /// Defaults to a single block (serial processing).
    #[arg(short, long, default_value_t = 1, value_name = "INT")]
    pub blocks: usize,
}
