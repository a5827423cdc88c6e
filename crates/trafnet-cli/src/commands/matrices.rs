use std::path::Path;

use anyhow::Result;
use trafnet_core::NetworkMatrices;
use trafnet_io::exporters::write_matrices;

use super::load_logged;

pub fn handle(network_path: &Path, out: &Path, peak_hour_factor: f64) -> Result<()> {
    let network = load_logged(network_path, peak_hour_factor)?.network;
    let matrices = NetworkMatrices::build(&network)?;
    let files = write_matrices(&network, &matrices, out)?;
    println!(
        "Adjacency   {}x{} -> {}",
        network.location_count(),
        network.location_count(),
        files.adjacency.display()
    );
    println!(
        "Incidence   {}x{} -> {}",
        network.segment_count(),
        network.location_count(),
        files.incidence.display()
    );
    println!(
        "Conductance {}x{} -> {}",
        network.segment_count(),
        network.segment_count(),
        files.conductance.display()
    );
    Ok(())
}
