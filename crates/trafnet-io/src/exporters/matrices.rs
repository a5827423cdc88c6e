//! Matrix export. Each matrix is written as a labelled CSV grid: the first
//! column names the row (location or segment), the header names the columns.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use trafnet_core::{NetworkMatrices, RoadNetwork};

/// Paths written by [`write_matrices`].
#[derive(Debug, Clone)]
pub struct MatrixFiles {
    pub adjacency: PathBuf,
    pub incidence: PathBuf,
    pub conductance: PathBuf,
}

/// Write `adjacency.csv`, `incidence.csv` and `conductance.csv` into `dir`,
/// creating it if needed.
pub fn write_matrices(
    network: &RoadNetwork,
    matrices: &NetworkMatrices,
    dir: &Path,
) -> Result<MatrixFiles> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("creating output directory {}", dir.display()))?;

    let locations = network.locations().names();
    let segments: Vec<String> = network
        .segments()
        .iter()
        .map(|segment| segment.name.clone())
        .collect();

    let files = MatrixFiles {
        adjacency: dir.join("adjacency.csv"),
        incidence: dir.join("incidence.csv"),
        conductance: dir.join("conductance.csv"),
    };

    write_labelled_grid(
        &files.adjacency,
        "location",
        locations,
        locations,
        &matrices.adjacency.to_rows(),
    )?;
    write_labelled_grid(
        &files.incidence,
        "segment",
        locations,
        &segments,
        &matrices.incidence.to_rows(),
    )?;
    write_labelled_grid(
        &files.conductance,
        "segment",
        &segments,
        &segments,
        &matrices.conductance.to_rows(),
    )?;
    Ok(files)
}

fn write_labelled_grid<T: ToString>(
    path: &Path,
    corner: &str,
    columns: &[String],
    rows: &[String],
    values: &[Vec<T>],
) -> Result<()> {
    let mut wtr = csv::Writer::from_path(path)
        .with_context(|| format!("creating CSV writer for {}", path.display()))?;
    let mut header = Vec::with_capacity(columns.len() + 1);
    header.push(corner.to_string());
    header.extend(columns.iter().cloned());
    wtr.write_record(&header).context("writing CSV header")?;

    for (label, row) in rows.iter().zip(values) {
        let mut record = Vec::with_capacity(row.len() + 1);
        record.push(label.clone());
        record.extend(row.iter().map(ToString::to_string));
        wtr.write_record(&record).context("writing CSV record")?;
    }
    wtr.flush().context("flushing CSV writer")?;
    Ok(())
}
