//! Network table export: the input road table with both rating columns
//! filled in.

use crate::importers::RoadRecord;
use anyhow::{anyhow, Context, Result};
use std::path::Path;
use trafnet_core::RoadNetwork;

/// Road table rows for a network, in segment order.
pub fn network_records(network: &RoadNetwork) -> Result<Vec<RoadRecord>> {
    network
        .segments()
        .iter()
        .map(|segment| {
            let geometry = segment
                .geometry
                .ok_or_else(|| anyhow!("segment '{}' has no lane/speed data", segment.name))?;
            Ok(RoadRecord {
                segment: segment.name.clone(),
                from: segment.from.clone(),
                to: segment.to.clone(),
                lanes: geometry.lanes,
                speed_kmh: geometry.speed.value(),
                capacity: Some(segment.capacity.value()),
                conductivity: Some(segment.conductivity),
            })
        })
        .collect()
}

/// Write the rated road table to `path`.
pub fn write_network_table(network: &RoadNetwork, path: &Path) -> Result<()> {
    let records = network_records(network)?;
    let mut wtr = csv::Writer::from_path(path)
        .with_context(|| format!("creating CSV writer for {}", path.display()))?;
    for record in &records {
        wtr.serialize(record).context("writing CSV record")?;
    }
    wtr.flush().context("flushing CSV writer")?;
    Ok(())
}
