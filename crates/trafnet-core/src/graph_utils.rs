//! Topology checks over the road graph.
//!
//! A flow solve needs every location reachable from the reference node, so
//! [`ensure_connected`] runs before any matrix is factorised. The other
//! helpers back the `graph` subcommands.

use crate::{RoadNetwork, TrafficError, TrafficResult};
use petgraph::algo::connected_components;
use petgraph::visit::{Bfs, EdgeRef};
use std::fmt::Write;

/// Degree spread across locations.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DegreeRange {
    pub min: usize,
    pub mean: f64,
    pub max: usize,
}

/// Size and shape of a road network.
#[derive(Debug, Clone, PartialEq)]
pub struct NetworkStats {
    pub locations: usize,
    pub segments: usize,
    pub components: usize,
    pub degree: DegreeRange,
    /// Segments over the number of distinct location pairs
    pub density: f64,
}

/// Locations grouped by the connected part of the network they sit in.
///
/// `members[k]` lists location names of island `k`; islands are numbered
/// in order of their lowest location index.
#[derive(Debug, Clone, PartialEq)]
pub struct Islands {
    pub members: Vec<Vec<String>>,
    /// Island of each location, by location index
    pub island_of: Vec<usize>,
}

impl Islands {
    pub fn count(&self) -> usize {
        self.members.len()
    }
}

pub fn graph_stats(network: &RoadNetwork) -> NetworkStats {
    let graph = &network.graph;
    let locations = graph.node_count();
    let segments = graph.edge_count();

    let degrees = graph.node_indices().map(|node| graph.edges(node).count());
    let (min, max, total) = degrees.fold((usize::MAX, 0, 0), |(lo, hi, sum), d| {
        (lo.min(d), hi.max(d), sum + d)
    });
    let degree = if locations == 0 {
        DegreeRange {
            min: 0,
            mean: 0.0,
            max: 0,
        }
    } else {
        DegreeRange {
            min,
            mean: total as f64 / locations as f64,
            max,
        }
    };

    let pairs = locations * locations.saturating_sub(1) / 2;
    NetworkStats {
        locations,
        segments,
        components: connected_components(graph),
        degree,
        density: if pairs == 0 {
            0.0
        } else {
            segments as f64 / pairs as f64
        },
    }
}

pub fn find_islands(network: &RoadNetwork) -> Islands {
    let graph = &network.graph;
    let mut island_of = vec![usize::MAX; graph.node_count()];
    let mut members: Vec<Vec<String>> = Vec::new();

    for root in graph.node_indices() {
        if island_of[root.index()] != usize::MAX {
            continue;
        }
        let island = members.len();
        let mut names = Vec::new();
        let mut walk = Bfs::new(graph, root);
        while let Some(node) = walk.next(graph) {
            island_of[node.index()] = island;
            names.push(graph[node].clone());
        }
        members.push(names);
    }

    Islands { members, island_of }
}

/// Fail unless every location is reachable from every other one.
pub fn ensure_connected(network: &RoadNetwork) -> TrafficResult<()> {
    let components = connected_components(&network.graph);
    if components != 1 {
        return Err(TrafficError::SingularSystem(format!(
            "road network splits into {components} disconnected parts"
        )));
    }
    Ok(())
}

/// Render the topology for external tools. Only Graphviz DOT is supported.
pub fn export_graph(network: &RoadNetwork, format: &str) -> TrafficResult<String> {
    match format.to_ascii_lowercase().as_str() {
        "graphviz" | "dot" => Ok(to_dot(network)),
        other => Err(TrafficError::Config(format!(
            "unsupported graph export format '{other}'"
        ))),
    }
}

fn to_dot(network: &RoadNetwork) -> String {
    let graph = &network.graph;
    let mut dot = String::from("graph road_network {\n");
    // writing into a String cannot fail
    for node in graph.node_indices() {
        let _ = writeln!(dot, "  n{} [label=\"{}\"];", node.index(), quoted(&graph[node]));
    }
    for road in graph.edge_references() {
        let name = network
            .segment(*road.weight())
            .map(|segment| quoted(&segment.name))
            .unwrap_or_default();
        let _ = writeln!(
            dot,
            "  n{} -- n{} [label=\"{name}\"];",
            road.source().index(),
            road.target().index()
        );
    }
    dot.push('}');
    dot
}

fn quoted(text: &str) -> String {
    text.replace('"', "\\\"")
}
