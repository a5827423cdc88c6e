//! # trafnet-core: Road Network Modeling Core
//!
//! Data structures for modelling hourly traffic on a road network with an
//! electrical-circuit analogy: segments are conductors, intersections are
//! nodes and traffic potential plays the role of voltage.
//!
//! ## Quick Start
//!
//! ```rust
//! use trafnet_core::*;
//!
//! let network = RoadNetwork::new(vec![
//!     Segment::new("A", "Depot", "Junction", 2150.0, 0.75),
//!     Segment::new("B", "Junction", "Harbour", 2150.0, 0.75),
//! ])
//! .unwrap();
//!
//! assert_eq!(network.locations().names(), ["Depot", "Junction", "Harbour"]);
//!
//! let matrices = NetworkMatrices::build(&network).unwrap();
//! assert_eq!(matrices.incidence.get(0, 0), -1.0);
//! assert_eq!(matrices.incidence.get(0, 1), 1.0);
//! ```
//!
//! ## Core Data Structures
//!
//! - [`RoadNetwork`] - validated segment table, location index and topology graph
//! - [`Segment`] - a road link with capacity and conductivity
//! - [`LocationIndex`] - first-seen ordering of location names
//! - [`NetworkMatrices`] - adjacency, incidence and conductance matrices
//! - Type-safe IDs: [`LocationId`], [`SegmentId`]
//!
//! ## Modules
//!
//! - [`matrices`] - graph matrix construction
//! - [`solver`] - dense linear-system backends
//! - [`graph_utils`] - connectivity statistics and island detection
//! - [`ratings`] - capacity/conductivity from lanes and speed
//! - [`config`] - scenario parameters
//! - [`diagnostics`] - import warnings and errors

use petgraph::graph::{NodeIndex, UnGraph};
use serde::{Deserialize, Serialize};
use std::fmt;

pub mod config;
pub mod diagnostics;
pub mod error;
pub mod graph_utils;
pub mod location;
pub mod matrices;
pub mod ratings;
pub mod solver;
pub mod units;

pub use config::ScenarioConfig;
pub use diagnostics::{DiagnosticIssue, Diagnostics, IssueCategory, Severity};
pub use error::{TrafficError, TrafficResult};
pub use location::{LocationIndex, Terminals};
pub use matrices::{
    build_adjacency, build_conductance, build_incidence, AdjacencyMatrix, ConductanceMatrix,
    IncidenceMatrix, NetworkMatrices,
};
pub use ratings::{RoadGeometry, SegmentRating};
pub use solver::{FaerSolver, GaussSolver, LinearSystemBackend, SolverKind};
pub use units::{KilometresPerHour, VehiclesPerHour};

// Newtype wrappers for IDs for type safety
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LocationId(usize);
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SegmentId(usize);

impl LocationId {
    #[inline]
    pub fn new(value: usize) -> Self {
        LocationId(value)
    }
    #[inline]
    pub fn value(&self) -> usize {
        self.0
    }
}

impl SegmentId {
    #[inline]
    pub fn new(value: usize) -> Self {
        SegmentId(value)
    }
    #[inline]
    pub fn value(&self) -> usize {
        self.0
    }
}

impl fmt::Display for LocationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Location#{}", self.0)
    }
}

impl fmt::Display for SegmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Segment#{}", self.0)
    }
}

/// A road link between two locations.
///
/// `from`/`to` fix the segment's orientation for bookkeeping only: traffic
/// may flow either way, and the sign of a computed flow is relative to this
/// orientation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub id: SegmentId,
    pub name: String,
    pub from: String,
    pub to: String,
    pub capacity: VehiclesPerHour,
    pub conductivity: f64,
    /// Lanes and speed, when the segment came from a road table.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub geometry: Option<RoadGeometry>,
}

impl Segment {
    pub fn new(
        name: impl Into<String>,
        from: impl Into<String>,
        to: impl Into<String>,
        capacity: f64,
        conductivity: f64,
    ) -> Self {
        Self {
            id: SegmentId::default_unassigned(),
            name: name.into(),
            from: from.into(),
            to: to.into(),
            capacity: VehiclesPerHour(capacity),
            conductivity,
            geometry: None,
        }
    }

    pub fn with_geometry(mut self, geometry: RoadGeometry) -> Self {
        self.geometry = Some(geometry);
        self
    }

    /// Replace capacity and conductivity.
    pub fn with_rating(mut self, rating: SegmentRating) -> Self {
        self.capacity = rating.capacity;
        self.conductivity = rating.conductivity;
        self
    }

    /// Check the segment's own attributes (endpoints and ratings).
    pub fn validate(&self) -> TrafficResult<()> {
        if self.from == self.to {
            return Err(TrafficError::DataIntegrity(format!(
                "segment '{}' is a self-loop at '{}'",
                self.name, self.from
            )));
        }
        if !(self.capacity.is_finite() && self.capacity.value() > 0.0) {
            return Err(TrafficError::DataIntegrity(format!(
                "segment '{}' has non-positive capacity {}",
                self.name,
                self.capacity.value()
            )));
        }
        if !(self.conductivity.is_finite() && self.conductivity > 0.0) {
            return Err(TrafficError::DataIntegrity(format!(
                "segment '{}' has non-positive conductivity {}",
                self.name, self.conductivity
            )));
        }
        Ok(())
    }
}

impl SegmentId {
    // Placeholder until the segment is placed in a network table.
    fn default_unassigned() -> Self {
        SegmentId(usize::MAX)
    }
}

/// The static road network: segment table, location index and a petgraph
/// view of the topology.
///
/// Graph node `i` is location `i` of the index, and each graph edge carries
/// the id of the segment it represents.
#[derive(Debug, Clone)]
pub struct RoadNetwork {
    segments: Vec<Segment>,
    locations: LocationIndex,
    endpoints: Vec<(LocationId, LocationId)>,
    pub graph: UnGraph<String, SegmentId>,
}

impl RoadNetwork {
    /// Build a network from a segment table. Segment ids are reassigned to
    /// table positions.
    pub fn new(mut segments: Vec<Segment>) -> TrafficResult<Self> {
        if segments.is_empty() {
            return Err(TrafficError::DataIntegrity(
                "network has no segments".to_string(),
            ));
        }
        for (position, segment) in segments.iter_mut().enumerate() {
            segment.id = SegmentId::new(position);
        }

        let locations = LocationIndex::from_endpoints(
            segments
                .iter()
                .map(|segment| (segment.from.as_str(), segment.to.as_str())),
        )?;

        let mut endpoints = Vec::with_capacity(segments.len());
        for segment in &segments {
            segment.validate()?;
            endpoints.push((
                locations.resolve(&segment.from)?,
                locations.resolve(&segment.to)?,
            ));
        }

        let mut graph = UnGraph::with_capacity(locations.len(), segments.len());
        for name in locations.names() {
            graph.add_node(name.clone());
        }
        for (segment, (start, end)) in segments.iter().zip(&endpoints) {
            graph.add_edge(
                NodeIndex::new(start.value()),
                NodeIndex::new(end.value()),
                segment.id,
            );
        }

        Ok(Self {
            segments,
            locations,
            endpoints,
            graph,
        })
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn segment(&self, id: SegmentId) -> Option<&Segment> {
        self.segments.get(id.value())
    }

    pub fn segment_by_name(&self, name: &str) -> Option<&Segment> {
        self.segments.iter().find(|segment| segment.name == name)
    }

    pub fn locations(&self) -> &LocationIndex {
        &self.locations
    }

    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }

    pub fn location_count(&self) -> usize {
        self.locations.len()
    }

    /// Start and end location of a segment.
    pub fn endpoints(&self, id: SegmentId) -> Option<(LocationId, LocationId)> {
        self.endpoints.get(id.value()).copied()
    }

    /// Capacities in segment order.
    pub fn capacities(&self) -> Vec<f64> {
        self.segments
            .iter()
            .map(|segment| segment.capacity.value())
            .collect()
    }

    /// A copy of this network with one segment re-rated.
    pub fn with_segment_rating(
        &self,
        id: SegmentId,
        rating: SegmentRating,
    ) -> TrafficResult<RoadNetwork> {
        let mut segments = self.segments.clone();
        let segment = segments
            .get_mut(id.value())
            .ok_or_else(|| TrafficError::DataIntegrity(format!("unknown segment {id}")))?;
        *segment = segment.clone().with_rating(rating);
        RoadNetwork::new(segments)
    }
}
