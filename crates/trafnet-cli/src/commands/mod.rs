pub mod graph;
pub mod matrices;
pub mod project;
pub mod run;

use anyhow::Result;
use std::path::Path;
use tracing::{info, warn};
use trafnet_io::{load_network, ImportResult};

/// Load a road table and log what the importer noticed.
pub fn load_logged(path: &Path, peak_hour_factor: f64) -> Result<ImportResult> {
    info!("Loading road table {}", path.display());
    let result = load_network(path, peak_hour_factor)?;
    if !result.diagnostics.is_empty() {
        for issue in &result.diagnostics.issues {
            warn!("{issue}");
        }
        warn!("Road table import: {}", result.diagnostics.summary());
    }
    info!(
        "Loaded {} segment(s) between {} location(s)",
        result.network.segment_count(),
        result.network.location_count()
    );
    Ok(result)
}
