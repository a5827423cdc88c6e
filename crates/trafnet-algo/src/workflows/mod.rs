//! High-level workflow facades for common traffic analysis tasks.
//!
//! These facades wire the network matrices, flow solver, projection and
//! exceedance scan together from a single [`ScenarioConfig`](trafnet_core::ScenarioConfig).

pub mod scenario;

pub use scenario::{scenario_terminals, NamedExceedance, ScenarioAnalysis, ScenarioReport};
