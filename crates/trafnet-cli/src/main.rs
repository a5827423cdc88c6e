use anyhow::Result;
use clap::Parser;
use tracing::debug;
use tracing_subscriber::FmtSubscriber;
use trafnet_cli::cli::{Cli, Commands};

mod commands;

fn main() -> Result<()> {
    let cli = Cli::parse();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(cli.log_level)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    debug!("trafnet {}", env!("CARGO_PKG_VERSION"));

    match &cli.command {
        Commands::Run {
            network,
            scenario,
            out,
            format,
            upgrade,
        } => commands::run::handle(network, scenario, out.as_deref(), *format, *upgrade),
        Commands::Project { scenario, format } => commands::project::handle(scenario, *format),
        Commands::Matrices {
            network,
            out,
            peak_hour_factor,
        } => commands::matrices::handle(network, out, *peak_hour_factor),
        Commands::Graph { command } => commands::graph::handle(command),
    }
}
