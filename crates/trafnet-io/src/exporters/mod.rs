//! CSV and JSON writers for networks, matrices and yearly results.

pub mod matrices;
pub mod network_table;
pub mod series;

pub use matrices::{write_matrices, MatrixFiles};
pub use network_table::{network_records, write_network_table};
pub use series::{write_flow_series, write_json_pretty, write_potential_series};
