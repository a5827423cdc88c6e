//! Lane-upgrade search for an overloaded segment.
//!
//! Widening a road raises both its capacity and its conductivity, and the
//! higher conductivity draws more traffic onto it, so each candidate lane
//! count is re-solved over the whole projection rather than scaled.

use crate::flow::FlowSolver;
use crate::multi_year::{run_years, OVERLOAD_VCR};
use crate::projection::DemandProjection;
use crate::workflows::scenario_terminals;
use serde::Serialize;
use trafnet_core::ratings::rate;
use trafnet_core::{
    LinearSystemBackend, NetworkMatrices, RoadNetwork, ScenarioConfig, SegmentId, TrafficError,
    TrafficResult,
};

/// Smallest widening that keeps a segment under capacity for every year.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LaneUpgrade {
    pub segment: SegmentId,
    pub base_lanes: f64,
    pub additional_lanes: u32,
    /// Peak VCR of the segment before widening
    pub peak_vcr_before: f64,
    /// Peak VCR of the segment after widening
    pub peak_vcr_after: f64,
}

/// Peak VCR of `segment` over the projection on `network`.
pub fn peak_segment_vcr(
    network: &RoadNetwork,
    segment: SegmentId,
    projection: &DemandProjection,
    config: &ScenarioConfig,
    backend: &dyn LinearSystemBackend,
) -> TrafficResult<f64> {
    let matrices = NetworkMatrices::build(network)?;
    let terminals = scenario_terminals(network, config)?;
    let capacities = network.capacities();
    let solver = FlowSolver::new(
        &matrices.incidence,
        &matrices.conductance,
        &capacities,
        terminals,
        backend,
    )?;
    Ok(run_years(projection, &solver)?.peak_vcr(segment))
}

/// Search 1..=`config.max_additional_lanes` added lanes for the first count
/// that keeps the segment's VCR below 1 in every projected year.
pub fn minimum_additional_lanes(
    network: &RoadNetwork,
    segment: SegmentId,
    projection: &DemandProjection,
    config: &ScenarioConfig,
    backend: &dyn LinearSystemBackend,
) -> TrafficResult<LaneUpgrade> {
    let road = network
        .segment(segment)
        .ok_or_else(|| TrafficError::DataIntegrity(format!("unknown segment {segment}")))?;
    let geometry = road.geometry.ok_or_else(|| {
        TrafficError::Config(format!(
            "segment '{}' has no lane/speed data to upgrade",
            road.name
        ))
    })?;

    let peak_vcr_before = peak_segment_vcr(network, segment, projection, config, backend)?;

    for additional_lanes in 1..=config.max_additional_lanes {
        let widened = geometry.with_additional_lanes(additional_lanes);
        let rating = rate(widened, config.peak_hour_factor)?;
        let upgraded = network.with_segment_rating(segment, rating)?;
        let peak_vcr_after = peak_segment_vcr(&upgraded, segment, projection, config, backend)?;
        if peak_vcr_after < OVERLOAD_VCR {
            return Ok(LaneUpgrade {
                segment,
                base_lanes: geometry.lanes,
                additional_lanes,
                peak_vcr_before,
                peak_vcr_after,
            });
        }
    }

    Err(TrafficError::Config(format!(
        "segment '{}' stays over capacity even with {} additional lanes",
        road.name, config.max_additional_lanes
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{rated_single_road, two_node};
    use trafnet_core::GaussSolver;

    fn config() -> ScenarioConfig {
        ScenarioConfig {
            peak_hour_factor: 0.8,
            max_additional_lanes: 10,
            ..ScenarioConfig::default()
        }
    }

    #[test]
    fn one_lane_is_enough_for_three_thousand() {
        // 2 lanes → 2150 veh/hr; 3 lanes → 3225 veh/hr
        let network = rated_single_road();
        let projection = DemandProjection::new(vec![2021, 2022], vec![2000.0, 3000.0]).unwrap();
        let upgrade = minimum_additional_lanes(
            &network,
            SegmentId::new(0),
            &projection,
            &config(),
            &GaussSolver,
        )
        .unwrap();
        assert_eq!(upgrade.additional_lanes, 1);
        assert!((upgrade.peak_vcr_before - 3000.0 / 2150.0).abs() < 1e-9);
        assert!((upgrade.peak_vcr_after - 3000.0 / 3225.0).abs() < 1e-9);
    }

    #[test]
    fn larger_demand_needs_three_lanes() {
        // 4 lanes → 4300 veh/hr (still short), 5 lanes → 5375 veh/hr
        let network = rated_single_road();
        let projection = DemandProjection::new(vec![2030], vec![4400.0]).unwrap();
        let upgrade = minimum_additional_lanes(
            &network,
            SegmentId::new(0),
            &projection,
            &config(),
            &GaussSolver,
        )
        .unwrap();
        assert_eq!(upgrade.additional_lanes, 3);
        assert_eq!(upgrade.base_lanes, 2.0);
    }

    #[test]
    fn search_bound_is_respected() {
        let network = rated_single_road();
        let projection = DemandProjection::new(vec![2030], vec![100_000.0]).unwrap();
        let err = minimum_additional_lanes(
            &network,
            SegmentId::new(0),
            &projection,
            &config(),
            &GaussSolver,
        )
        .unwrap_err();
        assert!(matches!(err, TrafficError::Config(_)));
    }

    #[test]
    fn segments_without_geometry_cannot_be_upgraded() {
        let projection = DemandProjection::new(vec![2021], vec![2000.0]).unwrap();
        let err = minimum_additional_lanes(
            &two_node(),
            SegmentId::new(0),
            &projection,
            &config(),
            &GaussSolver,
        )
        .unwrap_err();
        assert!(err.to_string().contains("no lane/speed data"));
    }
}
