use clap::{Args, Parser, Subcommand, ValueEnum};
use molmin::core::forcefield::verlet::ExclusionPolicy;
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "molmin - Evaluate molecular-mechanics energies of protein structures and relax them by steepest descent.",
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
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the energy breakdown of a structure.
    Energy(EnergyArgs),
    /// Relax a structure by steepest descent and write the result.
    Minimize(MinimizeArgs),
}

/// Input files and non-bonded settings shared by every subcommand.
#[derive(Args, Debug, Clone)]
pub struct InputArgs {
    /// Path to the input structure in PDB format.
    #[arg(short, long, required = true, value_name = "PATH")]
    pub input: PathBuf,

    /// Optional configuration file in TOML format.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    // --- Parameter Tables ---
    /// Residue charge table (.rtp).
    #[arg(long, value_name = "PATH")]
    pub charges: Option<PathBuf>,

    /// Bond parameter table (.itp).
    #[arg(long, value_name = "PATH")]
    pub bonds: Option<PathBuf>,

    /// Angle parameter table (.itp).
    #[arg(long, value_name = "PATH")]
    pub angles: Option<PathBuf>,

    /// Proper dihedral parameter table (.itp).
    #[arg(long, value_name = "PATH")]
    pub dihedrals: Option<PathBuf>,

    /// Lennard-Jones pair parameter table (.itp).
    #[arg(long, value_name = "PATH")]
    pub nonbonded: Option<PathBuf>,

    // --- Non-bonded Overrides ---
    /// Override the non-bonded cutoff in Angstroms.
    #[arg(long, value_name = "FLOAT")]
    pub cutoff: Option<f64>,

    /// Override the Verlet list buffer in Angstroms.
    #[arg(long, value_name = "FLOAT")]
    pub buffer: Option<f64>,

    /// Override the permittivity used in the Coulomb term.
    #[arg(long, value_name = "FLOAT")]
    pub permittivity: Option<f64>,

    /// Override how bonded neighbors are excluded from non-bonded pairs.
    #[arg(long, value_enum, value_name = "POLICY")]
    pub exclusion: Option<ExclusionArg>,

    /// Set a specific configuration value, overriding the config file.
    /// Can be used multiple times. Example: -S minimization.max-iterations=500
    #[arg(short = 'S', long = "set", value_name = "KEY=VALUE", num_args(0..))]
    pub set_values: Vec<String>,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExclusionArg {
    /// Skip pairs whose serial numbers differ by three or less.
    SequentialIndex,
    /// Skip pairs connected by three or fewer bonds.
    BondGraph,
}

impl From<ExclusionArg> for ExclusionPolicy {
    fn from(arg: ExclusionArg) -> Self {
        match arg {
            ExclusionArg::SequentialIndex => ExclusionPolicy::SequentialIndex,
            ExclusionArg::BondGraph => ExclusionPolicy::BondGraph,
        }
    }
}

/// Arguments for the `energy` subcommand.
#[derive(Args, Debug)]
pub struct EnergyArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Also print the net force on every atom.
    #[arg(long)]
    pub forces: bool,
}

/// Arguments for the `minimize` subcommand.
#[derive(Args, Debug)]
pub struct MinimizeArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Path for the minimized structure (PDB).
    #[arg(short, long, required = true, value_name = "PATH")]
    pub output: PathBuf,

    #[command(flatten)]
    pub minimization: MinimizationOverrides,
}

#[derive(Args, Debug, Clone, Copy, Default)]
pub struct MinimizationOverrides {
    /// Override the number of steepest-descent iterations.
    #[arg(short = 'n', long, value_name = "INT")]
    pub max_iterations: Option<usize>,

    /// Override the initial step size in Angstroms.
    #[arg(long, value_name = "FLOAT")]
    pub initial_step: Option<f64>,

    /// Override the factor applied to the step size after an accepted step.
    #[arg(long, value_name = "FLOAT")]
    pub step_growth: Option<f64>,

    /// Override the factor applied to the squared step size after a rejected step.
    #[arg(long, value_name = "FLOAT")]
    pub step_shrink: Option<f64>,
}
