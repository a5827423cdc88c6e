//! CSV road table importer.

use anyhow::{anyhow, bail, Context, Result};
use csv::{ReaderBuilder, Trim};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::io::Read;
use std::path::Path;
use trafnet_core::ratings::rate;
use trafnet_core::{Diagnostics, IssueCategory, RoadGeometry, RoadNetwork, Segment};

/// Lane counts outside this range are accepted but reported.
const USUAL_LANES: (f64, f64) = (1.0, 10.0);
/// Posted speeds (km/hr) outside this range are accepted but reported.
const USUAL_SPEED_KMH: (f64, f64) = (10.0, 130.0);
/// Relative gap between a stored and a derived rating worth reporting.
const RATING_TOLERANCE: f64 = 1e-6;

/// One row of a road table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoadRecord {
    #[serde(rename = "Segment")]
    pub segment: String,
    #[serde(rename = "From")]
    pub from: String,
    #[serde(rename = "To")]
    pub to: String,
    #[serde(rename = "Lanes (-)")]
    pub lanes: f64,
    #[serde(rename = "Speed (km/hr)")]
    pub speed_kmh: f64,
    #[serde(rename = "Capacity (veh/hr)", default)]
    pub capacity: Option<f64>,
    #[serde(rename = "Conductivity (-)", default)]
    pub conductivity: Option<f64>,
}

/// A network together with what the importer noticed while building it.
#[derive(Debug)]
pub struct ImportResult {
    pub network: RoadNetwork,
    pub diagnostics: Diagnostics,
}

/// Read every row of a road table file.
pub fn load_road_table(path: impl AsRef<Path>) -> Result<Vec<RoadRecord>> {
    let path = path.as_ref();
    let file = std::fs::File::open(path)
        .with_context(|| format!("opening road table {}", path.display()))?;
    read_road_table(file).with_context(|| format!("reading road table {}", path.display()))
}

/// Read every row of a road table from any reader.
pub fn read_road_table<R: Read>(reader: R) -> Result<Vec<RoadRecord>> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .trim(Trim::All)
        .from_reader(reader);
    let mut records = Vec::new();
    for (row, result) in rdr.deserialize().enumerate() {
        // header is line 1
        let record: RoadRecord = result.with_context(|| format!("parsing line {}", row + 2))?;
        records.push(record);
    }
    if records.is_empty() {
        bail!("road table has no segments");
    }
    Ok(records)
}

/// Load a road table and build its network, deriving any rating the table
/// does not carry with `peak_hour_factor`.
pub fn load_network(path: impl AsRef<Path>, peak_hour_factor: f64) -> Result<ImportResult> {
    let path = path.as_ref();
    let records = load_road_table(path)?;
    records_to_network(&records, peak_hour_factor)
        .with_context(|| format!("building network from {}", path.display()))
}

/// Build a network from road table rows.
///
/// Duplicate segment names and geometry that cannot be rated are errors;
/// parallel segments, unusual lane counts or speeds, and stored ratings that
/// disagree with the geometry are warnings.
pub fn records_to_network(records: &[RoadRecord], peak_hour_factor: f64) -> Result<ImportResult> {
    let mut diagnostics = Diagnostics::new();
    let mut segments = Vec::with_capacity(records.len());
    let mut seen_names: HashMap<&str, usize> = HashMap::new();
    let mut seen_pairs: HashMap<(&str, &str), &str> = HashMap::new();

    for (row, record) in records.iter().enumerate() {
        let line = row + 2;
        if let Some(first) = seen_names.insert(record.segment.as_str(), line) {
            diagnostics.error_at_line(
                IssueCategory::Topology,
                line,
                format!(
                    "duplicate segment name '{}' (first at line {first})",
                    record.segment
                ),
            );
            continue;
        }

        let pair = if record.from <= record.to {
            (record.from.as_str(), record.to.as_str())
        } else {
            (record.to.as_str(), record.from.as_str())
        };
        if let Some(other) = seen_pairs.insert(pair, record.segment.as_str()) {
            diagnostics.warn_segment(
                IssueCategory::Topology,
                &record.segment,
                format!("parallel to segment '{other}'"),
            );
        }

        check_geometry(record, &mut diagnostics);

        let geometry = RoadGeometry::new(record.lanes, record.speed_kmh);
        let derived = match rate(geometry, peak_hour_factor) {
            Ok(rating) => rating,
            Err(err) => {
                diagnostics.error_at_line(IssueCategory::Rating, line, err.to_string());
                continue;
            }
        };

        let capacity = stored_or_derived(
            record,
            "capacity",
            record.capacity,
            derived.capacity.value(),
            &mut diagnostics,
        );
        let conductivity = stored_or_derived(
            record,
            "conductivity",
            record.conductivity,
            derived.conductivity,
            &mut diagnostics,
        );

        segments.push(
            Segment::new(
                record.segment.clone(),
                record.from.clone(),
                record.to.clone(),
                capacity,
                conductivity,
            )
            .with_geometry(geometry),
        );
    }

    if diagnostics.has_errors() {
        let listing: Vec<String> = diagnostics.errors().map(ToString::to_string).collect();
        return Err(anyhow!(
            "road table has {} error(s):\n  {}",
            listing.len(),
            listing.join("\n  ")
        ));
    }

    let network = RoadNetwork::new(segments)?;
    Ok(ImportResult {
        network,
        diagnostics,
    })
}

fn check_geometry(record: &RoadRecord, diagnostics: &mut Diagnostics) {
    let lanes = record.lanes;
    if lanes.fract() != 0.0 || lanes < USUAL_LANES.0 || lanes > USUAL_LANES.1 {
        diagnostics.warn_segment(
            IssueCategory::Rating,
            &record.segment,
            format!("unusual lane count {lanes}"),
        );
    }
    let speed = record.speed_kmh;
    if speed < USUAL_SPEED_KMH.0 || speed > USUAL_SPEED_KMH.1 {
        diagnostics.warn_segment(
            IssueCategory::Rating,
            &record.segment,
            format!("unusual speed {speed} km/hr"),
        );
    }
}

fn stored_or_derived(
    record: &RoadRecord,
    what: &str,
    stored: Option<f64>,
    derived: f64,
    diagnostics: &mut Diagnostics,
) -> f64 {
    match stored {
        Some(value) => {
            if (value - derived).abs() > RATING_TOLERANCE * derived.abs().max(1.0) {
                diagnostics.warn_segment(
                    IssueCategory::Rating,
                    &record.segment,
                    format!("stored {what} {value} differs from {derived} derived from lanes/speed"),
                );
            }
            value
        }
        None => derived,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TABLE: &str = "\
Segment,From,To,Lanes (-),Speed (km/hr)
1,Gate,Junction,4,80
2,Junction,Port,2,60
";

    #[test]
    fn ratings_are_derived_when_absent() {
        let records = read_road_table(TABLE.as_bytes()).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].capacity, None);

        let result = records_to_network(&records, 0.8).unwrap();
        let network = result.network;
        let first = network.segment_by_name("1").unwrap();
        assert!((first.capacity.value() - 4900.0).abs() < 1e-9);
        assert!((first.conductivity - 2.0).abs() < 1e-12);
        assert_eq!(first.geometry.unwrap().lanes, 4.0);
        assert!(result.diagnostics.is_empty());
        assert_eq!(network.locations().names(), ["Gate", "Junction", "Port"]);
    }

    #[test]
    fn stored_ratings_win_with_warning() {
        let table = "\
Segment,From,To,Lanes (-),Speed (km/hr),Capacity (veh/hr),Conductivity (-)
A,Gate,Port,2,60,3000,0.75
";
        let records = read_road_table(table.as_bytes()).unwrap();
        let result = records_to_network(&records, 0.8).unwrap();
        let segment = &result.network.segments()[0];
        assert_eq!(segment.capacity.value(), 3000.0);
        assert_eq!(result.diagnostics.warning_count(), 1);
    }

    #[test]
    fn duplicate_names_fail_the_import() {
        let table = "\
Segment,From,To,Lanes (-),Speed (km/hr)
A,Gate,Junction,2,60
A,Junction,Port,2,60
";
        let records = read_road_table(table.as_bytes()).unwrap();
        let err = records_to_network(&records, 0.8).unwrap_err();
        assert!(err.to_string().contains("duplicate segment name 'A'"));
    }

    #[test]
    fn parallel_and_unusual_rows_are_warnings() {
        let table = "\
Segment,From,To,Lanes (-),Speed (km/hr)
A,Gate,Port,2,60
B,Port,Gate,3,150
";
        let records = read_road_table(table.as_bytes()).unwrap();
        let result = records_to_network(&records, 0.8).unwrap();
        // parallel, odd speed
        assert_eq!(result.diagnostics.warning_count(), 2);
        assert_eq!(result.network.segment_count(), 2);
    }

    #[test]
    fn zero_lanes_are_an_error() {
        let table = "\
Segment,From,To,Lanes (-),Speed (km/hr)
A,Gate,Port,0,60
";
        let records = read_road_table(table.as_bytes()).unwrap();
        let err = records_to_network(&records, 0.8).unwrap_err();
        assert!(err.to_string().contains("lane count must be positive"));
    }

    #[test]
    fn malformed_row_reports_line() {
        let table = "\
Segment,From,To,Lanes (-),Speed (km/hr)
A,Gate,Port,two,60
";
        let err = read_road_table(table.as_bytes()).unwrap_err();
        assert!(format!("{err:#}").contains("line 2"));
    }
}
