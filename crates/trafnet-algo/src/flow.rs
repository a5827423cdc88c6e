//! Potential-based traffic flow on a fixed road network.
//!
//! Demand enters at the reference node and leaves at the exit node. With
//! incidence `A`, conductance `G` and external flow vector `q`
//! (`+demand` at the reference, `-demand` at the exit):
//!
//! ```text
//! L = Aᵀ · G · A                      weighted graph Laplacian
//! L · p = q                           node potentials (singular: constants)
//! p[ref] = 0                          pin the reference, drop its row/column
//! f = -G · A · p                      segment flows, positive start → end
//! vcr = |f| / capacity
//! ```
//!
//! `L` depends only on the network, so a [`FlowSolver`] assembles and reduces
//! it once and then solves for any number of demand values.

use petgraph::algo::connected_components;
use petgraph::graph::{NodeIndex, UnGraph};
use serde::Serialize;
use trafnet_core::{
    ConductanceMatrix, IncidenceMatrix, LinearSystemBackend, LocationId, Terminals, TrafficError,
    TrafficResult,
};

/// Potentials, flows and VCRs for one demand value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlowSolution {
    pub demand: f64,
    /// Per location; the reference entry is exactly 0.
    pub potentials: Vec<f64>,
    /// Per segment; sign follows the segment's start → end orientation.
    pub flows: Vec<f64>,
    /// Per segment; `|flow| / capacity`.
    pub vcr: Vec<f64>,
}

impl FlowSolution {
    /// Net flow leaving `location` through the network's segments.
    pub fn net_outflow(&self, incidence: &IncidenceMatrix, location: LocationId) -> f64 {
        self.flows
            .iter()
            .enumerate()
            .filter_map(|(segment, flow)| {
                let (start, end) = incidence.endpoints(segment)?;
                if start == location {
                    Some(*flow)
                } else if end == location {
                    Some(-*flow)
                } else {
                    None
                }
            })
            .sum()
    }
}

/// External flow vector: `+demand` at the reference, `-demand` at the exit.
pub fn external_flows(location_count: usize, terminals: Terminals, demand: f64) -> Vec<f64> {
    let mut injections = vec![0.0; location_count];
    injections[terminals.reference.value()] = demand;
    injections[terminals.exit.value()] = -demand;
    injections
}

/// Remove row and column `pinned` from a square system.
pub fn pin_reference(matrix: &[Vec<f64>], pinned: usize) -> Vec<Vec<f64>> {
    matrix
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != pinned)
        .map(|(_, row)| {
            row.iter()
                .enumerate()
                .filter(|(j, _)| *j != pinned)
                .map(|(_, value)| *value)
                .collect()
        })
        .collect()
}

/// Remove entry `pinned` from a vector.
pub fn pin_vector(values: &[f64], pinned: usize) -> Vec<f64> {
    values
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != pinned)
        .map(|(_, value)| *value)
        .collect()
}

/// Inverse of [`pin_vector`]: put a zero back at `pinned`.
pub fn reinsert_pinned(mut reduced: Vec<f64>, pinned: usize) -> Vec<f64> {
    reduced.insert(pinned, 0.0);
    reduced
}

/// Reusable solver over a fixed network.
pub struct FlowSolver<'a> {
    incidence: &'a IncidenceMatrix,
    conductance: &'a ConductanceMatrix,
    capacities: Vec<f64>,
    terminals: Terminals,
    reduced_laplacian: Vec<Vec<f64>>,
    backend: &'a dyn LinearSystemBackend,
}

impl<'a> FlowSolver<'a> {
    /// Assemble and reduce the Laplacian.
    ///
    /// Fails with `SingularSystem` when the reference and exit coincide or
    /// when the network is not connected, and with `DataIntegrity` for
    /// mismatched dimensions or negative capacities.
    pub fn new(
        incidence: &'a IncidenceMatrix,
        conductance: &'a ConductanceMatrix,
        capacities: &[f64],
        terminals: Terminals,
        backend: &'a dyn LinearSystemBackend,
    ) -> TrafficResult<Self> {
        let n_locations = incidence.n_locations();
        if capacities.len() != incidence.n_segments() {
            return Err(TrafficError::DataIntegrity(format!(
                "{} capacities for {} segments",
                capacities.len(),
                incidence.n_segments()
            )));
        }
        if let Some((segment, capacity)) = capacities
            .iter()
            .enumerate()
            .find(|(_, c)| !c.is_finite() || **c < 0.0)
        {
            return Err(TrafficError::DataIntegrity(format!(
                "segment {segment} has invalid capacity {capacity}"
            )));
        }
        for id in [terminals.reference, terminals.exit] {
            if id.value() >= n_locations {
                return Err(TrafficError::DataIntegrity(format!(
                    "{id} is outside the {n_locations} indexed locations"
                )));
            }
        }
        if terminals.reference == terminals.exit {
            return Err(TrafficError::SingularSystem(format!(
                "reference and exit are both {}",
                terminals.reference
            )));
        }
        ensure_connected(incidence)?;

        let laplacian = incidence.laplacian(conductance)?;
        let reduced_laplacian = pin_reference(&laplacian, terminals.reference.value());

        Ok(Self {
            incidence,
            conductance,
            capacities: capacities.to_vec(),
            terminals,
            reduced_laplacian,
            backend,
        })
    }

    pub fn terminals(&self) -> Terminals {
        self.terminals
    }

    pub fn incidence(&self) -> &IncidenceMatrix {
        self.incidence
    }

    /// Potentials, flows and VCRs for one demand value.
    pub fn solve(&self, demand: f64) -> TrafficResult<FlowSolution> {
        if !demand.is_finite() {
            return Err(TrafficError::DataIntegrity(format!(
                "demand must be finite, got {demand}"
            )));
        }
        let pinned = self.terminals.reference.value();
        let injections = external_flows(self.incidence.n_locations(), self.terminals, demand);
        let reduced_rhs = pin_vector(&injections, pinned);

        let reduced = self.backend.solve(&self.reduced_laplacian, &reduced_rhs)?;
        let potentials = reinsert_pinned(reduced, pinned);

        let flows: Vec<f64> = self
            .conductance
            .apply(&self.incidence.apply(&potentials)?)
            .into_iter()
            .map(|value| -value)
            .collect();
        let vcr = volume_capacity_ratios(&flows, &self.capacities)?;

        Ok(FlowSolution {
            demand,
            potentials,
            flows,
            vcr,
        })
    }
}

/// `|flow| / capacity` per segment; a zero capacity is an error, not infinity.
pub fn volume_capacity_ratios(flows: &[f64], capacities: &[f64]) -> TrafficResult<Vec<f64>> {
    if flows.len() != capacities.len() {
        return Err(TrafficError::DataIntegrity(format!(
            "{} flows for {} capacities",
            flows.len(),
            capacities.len()
        )));
    }
    flows
        .iter()
        .zip(capacities)
        .enumerate()
        .map(|(segment, (flow, capacity))| {
            if *capacity == 0.0 {
                Err(TrafficError::DivisionByZero { segment })
            } else {
                Ok(flow.abs() / capacity)
            }
        })
        .collect()
}

/// One-shot solve; see [`FlowSolver`] for repeated demands.
pub fn solve_flows(
    demand: f64,
    incidence: &IncidenceMatrix,
    conductance: &ConductanceMatrix,
    capacities: &[f64],
    terminals: Terminals,
    backend: &dyn LinearSystemBackend,
) -> TrafficResult<FlowSolution> {
    FlowSolver::new(incidence, conductance, capacities, terminals, backend)?.solve(demand)
}

fn ensure_connected(incidence: &IncidenceMatrix) -> TrafficResult<()> {
    let mut graph: UnGraph<(), ()> =
        UnGraph::with_capacity(incidence.n_locations(), incidence.n_segments());
    for _ in 0..incidence.n_locations() {
        graph.add_node(());
    }
    for segment in 0..incidence.n_segments() {
        if let Some((start, end)) = incidence.endpoints(segment) {
            graph.add_edge(NodeIndex::new(start.value()), NodeIndex::new(end.value()), ());
        }
    }
    let components = connected_components(&graph);
    if components != 1 {
        return Err(TrafficError::SingularSystem(format!(
            "reduced Laplacian is singular: network has {components} disconnected parts"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{parallel_pair, series_corridor, two_node};
    use trafnet_core::{GaussSolver, NetworkMatrices};

    #[test]
    fn pinning_helpers_round_trip() {
        let matrix = vec![
            vec![1.0, 2.0, 3.0],
            vec![4.0, 5.0, 6.0],
            vec![7.0, 8.0, 9.0],
        ];
        assert_eq!(pin_reference(&matrix, 1), vec![vec![1.0, 3.0], vec![7.0, 9.0]]);
        assert_eq!(pin_vector(&[1.0, 2.0, 3.0], 0), vec![2.0, 3.0]);
        assert_eq!(reinsert_pinned(vec![2.0, 3.0], 1), vec![2.0, 0.0, 3.0]);
    }

    #[test]
    fn external_flows_balance() {
        let terminals = Terminals::new(LocationId::new(0), LocationId::new(3));
        let q = external_flows(4, terminals, 250.0);
        assert_eq!(q, vec![250.0, 0.0, 0.0, -250.0]);
        assert_eq!(q.iter().sum::<f64>(), 0.0);
    }

    #[test]
    fn parallel_segments_split_by_conductivity() {
        let network = parallel_pair();
        let matrices = NetworkMatrices::build(&network).unwrap();
        let terminals = network.locations().default_terminals().unwrap();
        let solution = solve_flows(
            100.0,
            &matrices.incidence,
            &matrices.conductance,
            &network.capacities(),
            terminals,
            &GaussSolver,
        )
        .unwrap();
        assert!((solution.flows[0] - 25.0).abs() < 1e-9);
        assert!((solution.flows[1] - 75.0).abs() < 1e-9);
        assert!((solution.potentials[1] + 25.0).abs() < 1e-9);
    }

    #[test]
    fn series_corridor_carries_full_demand() {
        let network = series_corridor([1000.0, 1500.0, 800.0]);
        let matrices = NetworkMatrices::build(&network).unwrap();
        let terminals = network.locations().default_terminals().unwrap();
        let solver = FlowSolver::new(
            &matrices.incidence,
            &matrices.conductance,
            &network.capacities(),
            terminals,
            &GaussSolver,
        )
        .unwrap();
        let solution = solver.solve(400.0).unwrap();
        for flow in &solution.flows {
            assert!((flow - 400.0).abs() < 1e-9);
        }
        assert!((solution.vcr[2] - 0.5).abs() < 1e-12);
        // potentials fall monotonically along the corridor
        assert!(solution.potentials.windows(2).all(|w| w[1] < w[0]));
    }

    #[test]
    fn zero_capacity_reaches_division_by_zero() {
        let network = two_node();
        let matrices = NetworkMatrices::build(&network).unwrap();
        let terminals = network.locations().default_terminals().unwrap();
        let err = solve_flows(
            500.0,
            &matrices.incidence,
            &matrices.conductance,
            &[0.0],
            terminals,
            &GaussSolver,
        )
        .unwrap_err();
        assert!(matches!(err, TrafficError::DivisionByZero { segment: 0 }));
    }

    #[test]
    fn reference_equal_to_exit_is_singular() {
        let network = two_node();
        let matrices = NetworkMatrices::build(&network).unwrap();
        let same = Terminals::new(LocationId::new(1), LocationId::new(1));
        let result = FlowSolver::new(
            &matrices.incidence,
            &matrices.conductance,
            &network.capacities(),
            same,
            &GaussSolver,
        );
        assert!(matches!(result, Err(TrafficError::SingularSystem(_))));
    }

    #[test]
    fn mismatched_capacities_are_rejected() {
        let network = two_node();
        let matrices = NetworkMatrices::build(&network).unwrap();
        let terminals = network.locations().default_terminals().unwrap();
        let result = FlowSolver::new(
            &matrices.incidence,
            &matrices.conductance,
            &[1000.0, 1000.0],
            terminals,
            &GaussSolver,
        );
        assert!(matches!(result, Err(TrafficError::DataIntegrity(_))));
    }
}
