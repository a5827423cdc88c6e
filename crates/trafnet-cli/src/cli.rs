use clap::{CommandFactory, Parser, Subcommand, ValueEnum, ValueHint};
use std::path::PathBuf;
use trafnet_core::SolverKind;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Set the logging level
    #[arg(long, default_value = "info")]
    pub log_level: tracing::Level,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Project traffic over the horizon and report the first overloaded segments
    Run {
        /// Road table (CSV)
        #[arg(value_hint = ValueHint::FilePath)]
        network: PathBuf,
        #[command(flatten)]
        scenario: ScenarioArgs,
        /// Directory for the rated network, yearly series and JSON report
        #[arg(short, long, value_hint = ValueHint::DirPath)]
        out: Option<PathBuf>,
        /// Output format for stdout
        #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
        /// Also find the lanes the first overloaded segment needs
        #[arg(long)]
        upgrade: bool,
    },
    /// Print the projected entering demand per year
    Project {
        #[command(flatten)]
        scenario: ScenarioArgs,
        /// Output format for stdout
        #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },
    /// Write adjacency, incidence and conductance matrices as CSV
    Matrices {
        /// Road table (CSV)
        #[arg(value_hint = ValueHint::FilePath)]
        network: PathBuf,
        /// Output directory
        #[arg(short, long, value_hint = ValueHint::DirPath)]
        out: PathBuf,
        /// Peak-hour factor used to derive missing capacities
        #[arg(long, default_value_t = 0.8)]
        peak_hour_factor: f64,
    },
    /// Graph utilities
    Graph {
        #[command(subcommand)]
        command: GraphCommands,
    },
}

#[derive(Subcommand, Debug)]
pub enum GraphCommands {
    /// Graph stats summary
    Stats {
        /// Road table (CSV)
        network: PathBuf,
    },
    /// Find disconnected parts of the road network
    Islands {
        /// Road table (CSV)
        network: PathBuf,
        /// Emit island IDs per location
        #[arg(long)]
        emit: bool,
    },
    /// Export graph to various formats
    Export {
        /// Road table (CSV)
        network: PathBuf,
        /// Output format (currently: graphviz/dot)
        #[arg(long, default_value = "graphviz")]
        format: String,
        /// Optional output file (defaults to stdout)
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
}

/// Scenario parameters; flags override the values of `--config`.
#[derive(clap::Args, Debug, Clone, Default)]
pub struct ScenarioArgs {
    /// Scenario file (TOML)
    #[arg(long, value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,
    /// First projected year
    #[arg(long)]
    pub start_year: Option<i32>,
    /// Last projected year (inclusive)
    #[arg(long)]
    pub end_year: Option<i32>,
    /// Entering volume in the first year (veh/hr)
    #[arg(long)]
    pub demand: Option<f64>,
    /// Yearly growth rate (0.1 = 10%)
    #[arg(long, allow_negative_numbers = true)]
    pub growth: Option<f64>,
    /// Peak-hour factor used to derive missing capacities
    #[arg(long)]
    pub peak_hour_factor: Option<f64>,
    /// Location where traffic enters
    #[arg(long)]
    pub entry: Option<String>,
    /// Location where traffic leaves
    #[arg(long)]
    pub exit: Option<String>,
    /// Linear solver (gauss or faer)
    #[arg(long)]
    pub solver: Option<SolverKind>,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
}

pub fn build_cli_command() -> clap::Command {
    Cli::command()
}
