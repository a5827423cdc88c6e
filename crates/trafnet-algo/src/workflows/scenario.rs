//! Scenario analysis facade
//!
//! Provides a builder-style API for running the full multi-year analysis of
//! one road network under one [`ScenarioConfig`].

use crate::flow::FlowSolver;
use crate::multi_year::{run_years, Exceedance, ExceedanceReport, YearlySeries};
use crate::projection::DemandProjection;
use crate::upgrade::{minimum_additional_lanes, LaneUpgrade};
use serde::Serialize;
use tracing::{debug, info, info_span};
use trafnet_core::graph_utils::ensure_connected;
use trafnet_core::{
    LocationId, NetworkMatrices, RoadNetwork, ScenarioConfig, Terminals, TrafficError,
    TrafficResult,
};

/// Reference and exit nodes for a scenario: named ones if the config gives
/// them, otherwise the first and last indexed locations.
pub fn scenario_terminals(
    network: &RoadNetwork,
    config: &ScenarioConfig,
) -> TrafficResult<Terminals> {
    network
        .locations()
        .terminals(config.entry.as_deref(), config.exit.as_deref())
}

/// An exceedance with the segment's name attached.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NamedExceedance {
    pub segment_name: String,
    #[serde(flatten)]
    pub crossing: Exceedance,
}

/// Everything a scenario run produces.
#[derive(Debug, Clone, Serialize)]
pub struct ScenarioReport {
    pub config: ScenarioConfig,
    pub locations: Vec<String>,
    pub segments: Vec<String>,
    pub entry: String,
    pub exit: String,
    pub series: YearlySeries,
    pub exceedances: ExceedanceReport,
    pub first_exceedance: Option<NamedExceedance>,
    pub next_exceedance: Option<NamedExceedance>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub upgrade: Option<LaneUpgrade>,
}

/// Fluent builder for a scenario run
pub struct ScenarioAnalysis<'a> {
    network: &'a RoadNetwork,
    config: ScenarioConfig,
    upgrade: bool,
}

impl<'a> ScenarioAnalysis<'a> {
    pub fn new(network: &'a RoadNetwork) -> Self {
        Self {
            network,
            config: ScenarioConfig::default(),
            upgrade: false,
        }
    }

    pub fn with_config(mut self, config: ScenarioConfig) -> Self {
        self.config = config;
        self
    }

    /// Also search for the lane upgrade of the first overloaded segment.
    pub fn with_upgrade(mut self, upgrade: bool) -> Self {
        self.upgrade = upgrade;
        self
    }

    pub fn run(self) -> TrafficResult<ScenarioReport> {
        self.config.validate()?;
        let span = info_span!(
            "scenario",
            start_year = self.config.start_year,
            end_year = self.config.end_year
        );
        let _guard = span.enter();

        ensure_connected(self.network)?;
        let projection = DemandProjection::from_config(&self.config)?;
        let matrices = NetworkMatrices::build(self.network)?;
        let terminals = scenario_terminals(self.network, &self.config)?;
        let backend = self.config.solver.build_solver();
        let capacities = self.network.capacities();
        let solver = FlowSolver::new(
            &matrices.incidence,
            &matrices.conductance,
            &capacities,
            terminals,
            backend.as_ref(),
        )?;

        let locations = self.network.locations();
        let entry = location_name(self.network, terminals.reference)?;
        let exit = location_name(self.network, terminals.exit)?;
        debug!(
            locations = locations.len(),
            segments = self.network.segment_count(),
            solver = self.config.solver.as_str(),
            "solving {} year(s) from {entry} to {exit}",
            projection.len()
        );

        let series = run_years(&projection, &solver)?;
        let exceedances = series.exceedances();
        let first_exceedance = exceedances.first.map(|c| self.named(c));
        let next_exceedance = exceedances.next.map(|c| self.named(c));

        match &first_exceedance {
            Some(first) => info!(
                "segment {} first exceeds capacity in {} (VCR {:.3})",
                first.segment_name, first.crossing.year, first.crossing.vcr
            ),
            None => info!("no segment exceeds capacity through {}", self.config.end_year),
        }

        let upgrade = match (self.upgrade, exceedances.first) {
            (true, Some(first)) => {
                let upgrade = minimum_additional_lanes(
                    self.network,
                    first.segment,
                    &projection,
                    &self.config,
                    backend.as_ref(),
                )?;
                info!(
                    "segment {} needs {} additional lane(s)",
                    self.segment_name(first),
                    upgrade.additional_lanes
                );
                Some(upgrade)
            }
            _ => None,
        };

        Ok(ScenarioReport {
            config: self.config.clone(),
            locations: locations.names().to_vec(),
            segments: self
                .network
                .segments()
                .iter()
                .map(|segment| segment.name.clone())
                .collect(),
            entry,
            exit,
            series,
            exceedances,
            first_exceedance,
            next_exceedance,
            upgrade,
        })
    }

    fn segment_name(&self, crossing: Exceedance) -> String {
        self.network
            .segment(crossing.segment)
            .map(|segment| segment.name.clone())
            .unwrap_or_else(|| crossing.segment.to_string())
    }

    fn named(&self, crossing: Exceedance) -> NamedExceedance {
        NamedExceedance {
            segment_name: self.segment_name(crossing),
            crossing,
        }
    }
}

fn location_name(network: &RoadNetwork, id: LocationId) -> TrafficResult<String> {
    network
        .locations()
        .name(id)
        .map(str::to_string)
        .ok_or_else(|| TrafficError::DataIntegrity(format!("unknown {id}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{bridge, disconnected, rated_single_road};
    use trafnet_core::SolverKind;

    #[test]
    fn bridge_scenario_reports_terminals_and_tables() {
        let network = bridge();
        let config = ScenarioConfig {
            start_year: 2021,
            end_year: 2025,
            initial_demand: 500.0,
            growth_rate: 0.2,
            ..ScenarioConfig::default()
        };
        let report = ScenarioAnalysis::new(&network)
            .with_config(config)
            .run()
            .unwrap();
        assert_eq!(report.entry, "Source");
        assert_eq!(report.exit, "Sink");
        assert_eq!(report.series.year_count(), 5);
        assert_eq!(report.series.flows[0].len(), 5);
        assert_eq!(report.series.potentials[0].len(), 4);
        assert!(report.upgrade.is_none());
    }

    #[test]
    fn named_exit_overrides_default() {
        let network = bridge();
        let config = ScenarioConfig {
            exit: Some("Q".to_string()),
            end_year: 2022,
            ..ScenarioConfig::default()
        };
        let report = ScenarioAnalysis::new(&network)
            .with_config(config)
            .run()
            .unwrap();
        assert_eq!(report.exit, "Q");
    }

    #[test]
    fn upgrade_runs_for_first_overload() {
        let network = rated_single_road();
        let config = ScenarioConfig {
            start_year: 2021,
            end_year: 2023,
            initial_demand: 2000.0,
            growth_rate: 0.2,
            solver: SolverKind::Faer,
            ..ScenarioConfig::default()
        };
        // 2000, 2400, 2880 against 2150 veh/hr
        let report = ScenarioAnalysis::new(&network)
            .with_config(config)
            .with_upgrade(true)
            .run()
            .unwrap();
        let first = report.first_exceedance.unwrap();
        assert_eq!(first.segment_name, "R");
        assert_eq!(first.crossing.year, 2022);
        assert_eq!(report.upgrade.unwrap().additional_lanes, 1);
    }

    #[test]
    fn disconnected_network_fails_whole_run() {
        let network = disconnected();
        let err = ScenarioAnalysis::new(&network).run().unwrap_err();
        assert!(matches!(err, TrafficError::SingularSystem(_)));
    }

    #[test]
    fn invalid_config_fails_before_solving() {
        let network = bridge();
        let config = ScenarioConfig {
            growth_rate: -2.0,
            ..ScenarioConfig::default()
        };
        let err = ScenarioAnalysis::new(&network)
            .with_config(config)
            .run()
            .unwrap_err();
        assert!(matches!(err, TrafficError::Config(_)));
    }

    #[test]
    fn report_serializes_to_json() {
        let network = rated_single_road();
        let config = ScenarioConfig {
            end_year: 2022,
            initial_demand: 3000.0,
            ..ScenarioConfig::default()
        };
        let report = ScenarioAnalysis::new(&network)
            .with_config(config)
            .run()
            .unwrap();
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["entry"], "Gate");
        assert_eq!(json["first_exceedance"]["segment_name"], "R");
        assert_eq!(json["first_exceedance"]["year"], 2021);
        assert!(json.get("upgrade").is_none());
    }
}
