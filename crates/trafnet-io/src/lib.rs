//! # trafnet-io: Road Network Data I/O
//!
//! Reads road tables into a [`trafnet_core::RoadNetwork`] and writes the
//! analysis tables back out.
//!
//! ## Road table format
//!
//! One row per segment, comma separated, with a header row:
//!
//! | column              | meaning                                   |
//! |---------------------|-------------------------------------------|
//! | `Segment`           | unique segment name                       |
//! | `From`, `To`        | location names (orientation only)         |
//! | `Lanes (-)`         | lanes, both directions                    |
//! | `Speed (km/hr)`     | posted speed                              |
//! | `Capacity (veh/hr)` | optional; derived from lanes/speed if absent |
//! | `Conductivity (-)`  | optional; derived from lanes/speed if absent |
//!
//! The exporter writes the same format with both rating columns filled, so
//! an exported table loads back unchanged.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use trafnet_io::importers::load_network;
//!
//! fn main() -> anyhow::Result<()> {
//!     let result = load_network("road_network_data.csv", 0.8)?;
//!     for issue in &result.diagnostics.issues {
//!         eprintln!("{issue}");
//!     }
//!     println!("{} segments", result.network.segment_count());
//!     Ok(())
//! }
//! ```

pub mod exporters;
pub mod importers;

pub use importers::{load_network, load_road_table, ImportResult, RoadRecord};
