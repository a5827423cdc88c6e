//! # trafnet-algo: Traffic Flow Algorithms
//!
//! Solves hourly traffic on a road network with the circuit analogy of
//! `trafnet-core` and projects it across years of traffic growth.
//!
//! | Module         | Contents                                                  |
//! |----------------|-----------------------------------------------------------|
//! | [`flow`]       | pinned-reference Laplacian solve, flows and VCRs          |
//! | [`projection`] | geometric growth of the entering volume                   |
//! | [`multi_year`] | one solve per projected year, first-overload scan         |
//! | [`upgrade`]    | smallest lane addition that removes an overload           |
//! | [`workflows`]  | builder facade running a whole scenario                   |
//!
//! ## Example
//!
//! ```rust
//! use trafnet_algo::ScenarioAnalysis;
//! use trafnet_core::{RoadNetwork, ScenarioConfig, Segment};
//!
//! let network = RoadNetwork::new(vec![
//!     Segment::new("A", "Gate", "Junction", 4000.0, 2.0),
//!     Segment::new("B", "Junction", "Port", 2500.0, 1.5),
//! ])
//! .unwrap();
//!
//! let report = ScenarioAnalysis::new(&network)
//!     .with_config(ScenarioConfig {
//!         initial_demand: 2000.0,
//!         ..ScenarioConfig::default()
//!     })
//!     .run()
//!     .unwrap();
//!
//! let first = report.first_exceedance.unwrap();
//! assert_eq!(first.segment_name, "B");
//! assert_eq!(first.crossing.year, 2024);
//! ```

pub mod flow;
pub mod multi_year;
pub mod projection;
pub mod test_utils;
pub mod upgrade;
pub mod workflows;

pub use flow::{solve_flows, volume_capacity_ratios, FlowSolution, FlowSolver};
pub use multi_year::{run_years, Exceedance, ExceedanceReport, YearlySeries, OVERLOAD_VCR};
pub use projection::{project, DemandProjection};
pub use upgrade::{minimum_additional_lanes, LaneUpgrade};
pub use workflows::{scenario_terminals, NamedExceedance, ScenarioAnalysis, ScenarioReport};
