//! Integration tests for the multi-year driver and the exceedance scan.

use trafnet_algo::test_utils::{series_corridor, two_node};
use trafnet_algo::{project, run_years, DemandProjection, FlowSolver};
use trafnet_core::{FaerSolver, GaussSolver, NetworkMatrices, SegmentId};

#[test]
fn test_two_node_first_exceedance_year() {
    let network = two_node();
    let matrices = NetworkMatrices::build(&network).unwrap();
    let terminals = network.locations().default_terminals().unwrap();
    let capacities = network.capacities();
    let solver = FlowSolver::new(
        &matrices.incidence,
        &matrices.conductance,
        &capacities,
        terminals,
        &GaussSolver,
    )
    .unwrap();

    let projection =
        DemandProjection::new(vec![2021, 2022, 2023, 2024], vec![600.0, 800.0, 1000.0, 1200.0])
            .unwrap();
    let series = run_years(&projection, &solver).unwrap();
    assert_eq!(series.year_count(), 4);

    let report = series.exceedances();
    let first = report.first.unwrap();
    assert_eq!(first.segment, SegmentId::new(0));
    assert_eq!(first.year_index, 2);
    assert_eq!(first.year, 2023);
    assert!((first.vcr - 1.0).abs() < 1e-12);
    assert!(report.next.is_none());
}

#[test]
fn test_corridor_first_and_next_exceedance() {
    // VCR crossings: AB in year 2, BC in year 3, CD in year 1
    let network = series_corridor([1000.0, 1500.0, 800.0]);
    let matrices = NetworkMatrices::build(&network).unwrap();
    let terminals = network.locations().default_terminals().unwrap();
    let capacities = network.capacities();
    let solver = FlowSolver::new(
        &matrices.incidence,
        &matrices.conductance,
        &capacities,
        terminals,
        &FaerSolver,
    )
    .unwrap();

    let projection = DemandProjection::new(
        vec![2021, 2022, 2023, 2024],
        vec![500.0, 900.0, 1200.0, 1600.0],
    )
    .unwrap();
    let report = run_years(&projection, &solver).unwrap().exceedances();

    let first = report.first.unwrap();
    assert_eq!(first.segment, SegmentId::new(2));
    assert_eq!(first.year_index, 1);
    let next = report.next.unwrap();
    assert_eq!(next.segment, SegmentId::new(0));
    assert_eq!(next.year_index, 2);
    assert_eq!(report.crossings[1].unwrap().year, 2024);
}

#[test]
fn test_projected_rows_follow_demand() {
    let network = two_node();
    let matrices = NetworkMatrices::build(&network).unwrap();
    let terminals = network.locations().default_terminals().unwrap();
    let capacities = network.capacities();
    let solver = FlowSolver::new(
        &matrices.incidence,
        &matrices.conductance,
        &capacities,
        terminals,
        &GaussSolver,
    )
    .unwrap();

    let projection = project(2021, 2030, 100.0, 0.1).unwrap();
    let series = run_years(&projection, &solver).unwrap();
    assert_eq!(series.years, (2021..=2030).collect::<Vec<_>>());
    for (row, demand) in series.flows.iter().zip(&series.demand) {
        assert!((row[0] - demand).abs() < 1e-9 * demand);
    }
    // conductivity 5: potential drop is demand / 5
    for (row, demand) in series.potentials.iter().zip(&series.demand) {
        assert_eq!(row[0], 0.0);
        assert!((row[1] + demand / 5.0).abs() < 1e-9);
    }
    assert!(series.exceedances().first.is_none());
}
