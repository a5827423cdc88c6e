//! Graph matrices of the road network.
//!
//! Three matrices are derived once from the static segment table:
//!
//! ```text
//! A  incidence    (segments × locations)  A[s, start] = -1, A[s, end] = +1
//! G  conductance  (segments × segments)   diagonal of conductivities
//!    adjacency    (locations × locations) symmetric 0/1 connectivity
//! ```
//!
//! The weighted graph Laplacian used by the flow solver is `Aᵀ · G · A`,
//! assembled from the sparse rows of `A` by [`IncidenceMatrix::laplacian`].
//! It is symmetric positive semi-definite with a one-dimensional null space
//! (constant potentials) on a connected network.

use crate::{LocationId, LocationIndex, RoadNetwork, Segment, TrafficError, TrafficResult};
use sprs::{CsMat, CsMatView, TriMat};
use std::collections::HashSet;

/// Sparse segment × location incidence matrix in CSR format.
#[derive(Debug, Clone)]
pub struct IncidenceMatrix {
    matrix: CsMat<f64>,
    endpoints: Vec<(LocationId, LocationId)>,
}

impl IncidenceMatrix {
    /// Get matrix view for linear algebra operations.
    pub fn view(&self) -> CsMatView<'_, f64> {
        self.matrix.view()
    }

    /// Entry A[segment, location].
    pub fn get(&self, segment: usize, location: usize) -> f64 {
        self.matrix.get(segment, location).copied().unwrap_or(0.0)
    }

    pub fn n_segments(&self) -> usize {
        self.matrix.rows()
    }

    pub fn n_locations(&self) -> usize {
        self.matrix.cols()
    }

    /// Start and end location of a row.
    pub fn endpoints(&self, segment: usize) -> Option<(LocationId, LocationId)> {
        self.endpoints.get(segment).copied()
    }

    /// Sum of one row; zero for every well-formed segment.
    pub fn row_sum(&self, segment: usize) -> f64 {
        self.matrix
            .outer_view(segment)
            .map(|row| row.iter().map(|(_, value)| *value).sum())
            .unwrap_or(0.0)
    }

    /// Matrix-vector product `A · x` (one entry per segment).
    pub fn apply(&self, x: &[f64]) -> TrafficResult<Vec<f64>> {
        if x.len() != self.n_locations() {
            return Err(TrafficError::DataIntegrity(format!(
                "vector length {} does not match {} locations",
                x.len(),
                self.n_locations()
            )));
        }
        Ok(self
            .matrix
            .outer_iterator()
            .map(|row| row.iter().map(|(col, value)| value * x[col]).sum())
            .collect())
    }

    /// Dense weighted Laplacian `Aᵀ · G · A`.
    ///
    /// Each incidence row has exactly two non-zeros, so the triple product is
    /// accumulated row by row instead of through two sparse products.
    pub fn laplacian(&self, conductance: &ConductanceMatrix) -> TrafficResult<Vec<Vec<f64>>> {
        if conductance.len() != self.n_segments() {
            return Err(TrafficError::DataIntegrity(format!(
                "conductance has {} entries for {} segments",
                conductance.len(),
                self.n_segments()
            )));
        }
        let n = self.n_locations();
        let mut laplacian = vec![vec![0.0; n]; n];
        for (segment, row) in self.matrix.outer_iterator().enumerate() {
            let g = conductance.diagonal()[segment];
            for (i, a_i) in row.iter() {
                for (j, a_j) in row.iter() {
                    laplacian[i][j] += a_i * g * a_j;
                }
            }
        }
        Ok(laplacian)
    }

    /// Dense row-major copy, for export.
    pub fn to_rows(&self) -> Vec<Vec<f64>> {
        let mut rows = vec![vec![0.0; self.n_locations()]; self.n_segments()];
        for (segment, row) in self.matrix.outer_iterator().enumerate() {
            for (location, value) in row.iter() {
                rows[segment][location] = *value;
            }
        }
        rows
    }
}

/// Diagonal conductance matrix, stored as its diagonal.
#[derive(Debug, Clone, PartialEq)]
pub struct ConductanceMatrix {
    diagonal: Vec<f64>,
}

impl ConductanceMatrix {
    pub fn diagonal(&self) -> &[f64] {
        &self.diagonal
    }

    pub fn len(&self) -> usize {
        self.diagonal.len()
    }

    pub fn is_empty(&self) -> bool {
        self.diagonal.is_empty()
    }

    /// Entry G[i, j].
    pub fn get(&self, i: usize, j: usize) -> f64 {
        if i == j {
            self.diagonal.get(i).copied().unwrap_or(0.0)
        } else {
            0.0
        }
    }

    /// `G · x`.
    pub fn apply(&self, x: &[f64]) -> Vec<f64> {
        self.diagonal.iter().zip(x).map(|(g, v)| g * v).collect()
    }

    pub fn to_rows(&self) -> Vec<Vec<f64>> {
        let n = self.diagonal.len();
        (0..n)
            .map(|i| (0..n).map(|j| self.get(i, j)).collect())
            .collect()
    }
}

/// Binary, symmetric location × location adjacency matrix.
///
/// Informational only; the flow solver never reads it.
#[derive(Debug, Clone)]
pub struct AdjacencyMatrix {
    matrix: CsMat<u8>,
}

impl AdjacencyMatrix {
    pub fn get(&self, i: usize, j: usize) -> u8 {
        self.matrix.get(i, j).copied().unwrap_or(0)
    }

    pub fn n_locations(&self) -> usize {
        self.matrix.rows()
    }

    /// Number of set entries (twice the number of connected location pairs).
    pub fn nnz(&self) -> usize {
        self.matrix.nnz()
    }

    pub fn is_symmetric(&self) -> bool {
        self.matrix
            .outer_iterator()
            .enumerate()
            .all(|(i, row)| row.iter().all(|(j, value)| self.get(j, i) == *value))
    }

    pub fn to_rows(&self) -> Vec<Vec<u8>> {
        let n = self.n_locations();
        let mut rows = vec![vec![0u8; n]; n];
        for (i, row) in self.matrix.outer_iterator().enumerate() {
            for (j, value) in row.iter() {
                rows[i][j] = *value;
            }
        }
        rows
    }
}

/// All three matrices of a network.
#[derive(Debug, Clone)]
pub struct NetworkMatrices {
    pub adjacency: AdjacencyMatrix,
    pub incidence: IncidenceMatrix,
    pub conductance: ConductanceMatrix,
}

impl NetworkMatrices {
    pub fn build(network: &RoadNetwork) -> TrafficResult<Self> {
        Ok(Self {
            adjacency: build_adjacency(network.segments(), network.locations())?,
            incidence: build_incidence(network.segments(), network.locations())?,
            conductance: build_conductance(network.segments())?,
        })
    }
}

fn segment_endpoints(
    position: usize,
    segment: &Segment,
    locations: &LocationIndex,
) -> TrafficResult<(LocationId, LocationId)> {
    let start = locations.resolve(&segment.from)?;
    let end = locations.resolve(&segment.to)?;
    if start == end {
        return Err(TrafficError::DataIntegrity(format!(
            "segment {position} ('{}') starts and ends at '{}'",
            segment.name, segment.from
        )));
    }
    Ok((start, end))
}

/// Incidence matrix with one row per segment, in table order.
pub fn build_incidence(
    segments: &[Segment],
    locations: &LocationIndex,
) -> TrafficResult<IncidenceMatrix> {
    let mut triplets = TriMat::new((segments.len(), locations.len()));
    let mut endpoints = Vec::with_capacity(segments.len());
    for (position, segment) in segments.iter().enumerate() {
        let (start, end) = segment_endpoints(position, segment, locations)?;
        triplets.add_triplet(position, start.value(), -1.0);
        triplets.add_triplet(position, end.value(), 1.0);
        endpoints.push((start, end));
    }
    Ok(IncidenceMatrix {
        matrix: triplets.to_csr(),
        endpoints,
    })
}

/// Diagonal conductance matrix in segment order.
pub fn build_conductance(segments: &[Segment]) -> TrafficResult<ConductanceMatrix> {
    let mut diagonal = Vec::with_capacity(segments.len());
    for (position, segment) in segments.iter().enumerate() {
        if !(segment.conductivity.is_finite() && segment.conductivity > 0.0) {
            return Err(TrafficError::DataIntegrity(format!(
                "segment {position} ('{}') has non-positive conductivity {}",
                segment.name, segment.conductivity
            )));
        }
        diagonal.push(segment.conductivity);
    }
    Ok(ConductanceMatrix { diagonal })
}

/// Symmetric adjacency matrix; parallel segments collapse to one entry.
pub fn build_adjacency(
    segments: &[Segment],
    locations: &LocationIndex,
) -> TrafficResult<AdjacencyMatrix> {
    let n = locations.len();
    let mut pairs = HashSet::new();
    for (position, segment) in segments.iter().enumerate() {
        let (start, end) = segment_endpoints(position, segment, locations)?;
        pairs.insert((start.value().min(end.value()), start.value().max(end.value())));
    }
    let mut triplets = TriMat::new((n, n));
    for (i, j) in pairs {
        triplets.add_triplet(i, j, 1u8);
        triplets.add_triplet(j, i, 1u8);
    }
    Ok(AdjacencyMatrix {
        matrix: triplets.to_csr(),
    })
}
