//! Road table importers.
//!
//! Importers return the network together with [`trafnet_core::Diagnostics`]
//! describing anything unusual in the input. Rows that make the network
//! unusable fail the import with every such problem listed.

pub mod road_csv;

pub use road_csv::{
    load_network, load_road_table, read_road_table, records_to_network, ImportResult, RoadRecord,
};
