use std::fs;

use anyhow::Result;
use trafnet_cli::cli::GraphCommands;
use trafnet_core::graph_utils;

use super::load_logged;

// Graph views only need topology; ratings use the usual factor.
const PEAK_HOUR_FACTOR: f64 = 0.8;

pub fn handle(command: &GraphCommands) -> Result<()> {
    match command {
        GraphCommands::Stats { network } => {
            let roads = load_logged(network, PEAK_HOUR_FACTOR)?.network;
            let stats = graph_utils::graph_stats(&roads);
            println!("Road graph of {}:", network.display());
            println!("  Locations  : {}", stats.locations);
            println!("  Segments   : {}", stats.segments);
            println!("  Components : {}", stats.components);
            println!(
                "  Degree     : min {} / mean {:.2} / max {}",
                stats.degree.min, stats.degree.mean, stats.degree.max
            );
            println!("  Density    : {:.4}", stats.density);
            Ok(())
        }
        GraphCommands::Islands { network, emit } => {
            let roads = load_logged(network, PEAK_HOUR_FACTOR)?.network;
            let islands = graph_utils::find_islands(&roads);
            for (island, names) in islands.members.iter().enumerate() {
                println!("Island {island}: {} location(s)", names.len());
            }
            if *emit {
                println!();
                for (index, name) in roads.locations().names().iter().enumerate() {
                    println!(
                        "  {index:>3}  {name:<20} island {}",
                        islands.island_of[index]
                    );
                }
            }
            Ok(())
        }
        GraphCommands::Export {
            network,
            format,
            out,
        } => {
            let roads = load_logged(network, PEAK_HOUR_FACTOR)?.network;
            let dot = graph_utils::export_graph(&roads, format)?;
            if let Some(path) = out {
                fs::write(path, &dot)?;
                println!("Graph exported to {}", path.display());
            } else {
                println!("{dot}");
            }
            Ok(())
        }
    }
}
