//! Yearly result tables in long form, plus a JSON writer for whole reports.

use anyhow::{bail, Context, Result};
use serde::Serialize;
use std::path::Path;

#[derive(Serialize)]
struct FlowRow<'a> {
    year: i32,
    segment: &'a str,
    flow: f64,
    vcr: f64,
}

#[derive(Serialize)]
struct PotentialRow<'a> {
    year: i32,
    location: &'a str,
    potential: f64,
}

/// Write `year,segment,flow,vcr` rows, one per year and segment.
pub fn write_flow_series(
    path: &Path,
    years: &[i32],
    segments: &[String],
    flows: &[Vec<f64>],
    vcr: &[Vec<f64>],
) -> Result<()> {
    if flows.len() != years.len() || vcr.len() != years.len() {
        bail!(
            "{} years but {} flow rows and {} VCR rows",
            years.len(),
            flows.len(),
            vcr.len()
        );
    }
    let mut wtr = csv::Writer::from_path(path)
        .with_context(|| format!("creating CSV writer for {}", path.display()))?;
    for ((year, flow_row), vcr_row) in years.iter().zip(flows).zip(vcr) {
        for ((segment, flow), ratio) in segments.iter().zip(flow_row).zip(vcr_row) {
            wtr.serialize(FlowRow {
                year: *year,
                segment,
                flow: *flow,
                vcr: *ratio,
            })
            .context("writing CSV record")?;
        }
    }
    wtr.flush().context("flushing CSV writer")?;
    Ok(())
}

/// Write `year,location,potential` rows, one per year and location.
pub fn write_potential_series(
    path: &Path,
    years: &[i32],
    locations: &[String],
    potentials: &[Vec<f64>],
) -> Result<()> {
    if potentials.len() != years.len() {
        bail!(
            "{} years but {} potential rows",
            years.len(),
            potentials.len()
        );
    }
    let mut wtr = csv::Writer::from_path(path)
        .with_context(|| format!("creating CSV writer for {}", path.display()))?;
    for (year, row) in years.iter().zip(potentials) {
        for (location, potential) in locations.iter().zip(row) {
            wtr.serialize(PotentialRow {
                year: *year,
                location,
                potential: *potential,
            })
            .context("writing CSV record")?;
        }
    }
    wtr.flush().context("flushing CSV writer")?;
    Ok(())
}

/// Pretty-printed JSON of any serializable value.
pub fn write_json_pretty<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("serializing report to JSON")?;
    std::fs::write(path, json).with_context(|| format!("writing JSON to {}", path.display()))?;
    Ok(())
}
