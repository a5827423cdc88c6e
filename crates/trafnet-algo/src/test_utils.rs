//! Small road networks with hand-checkable solutions, shared by unit and
//! integration tests.

use trafnet_core::{RoadGeometry, RoadNetwork, Segment};

/// `Entry → Exit`, capacity 1000, conductivity 5.
pub fn two_node() -> RoadNetwork {
    RoadNetwork::new(vec![Segment::new("S", "Entry", "Exit", 1000.0, 5.0)])
        .expect("two-node fixture")
}

/// Two parallel `A → B` segments with conductivities 1 and 3.
pub fn parallel_pair() -> RoadNetwork {
    RoadNetwork::new(vec![
        Segment::new("slow", "A", "B", 1000.0, 1.0),
        Segment::new("fast", "A", "B", 1000.0, 3.0),
    ])
    .expect("parallel fixture")
}

/// `A → B → C → D` with the given capacities and conductivities 1, 2, 4.
pub fn series_corridor(capacities: [f64; 3]) -> RoadNetwork {
    RoadNetwork::new(vec![
        Segment::new("AB", "A", "B", capacities[0], 1.0),
        Segment::new("BC", "B", "C", capacities[1], 2.0),
        Segment::new("CD", "C", "D", capacities[2], 4.0),
    ])
    .expect("corridor fixture")
}

/// Wheatstone bridge `Source → {P, Q} → Sink` with a `P → Q` cross link.
///
/// Index order is `Source, P, Q, Sink`.
pub fn bridge() -> RoadNetwork {
    RoadNetwork::new(vec![
        Segment::new("SP", "Source", "P", 2000.0, 2.0),
        Segment::new("SQ", "Source", "Q", 1500.0, 1.0),
        Segment::new("PQ", "P", "Q", 800.0, 0.5),
        Segment::new("PT", "P", "Sink", 1500.0, 1.0),
        Segment::new("QT", "Q", "Sink", 2000.0, 3.0),
    ])
    .expect("bridge fixture")
}

/// Two separate road pairs with no link between them.
pub fn disconnected() -> RoadNetwork {
    RoadNetwork::new(vec![
        Segment::new("west", "A", "B", 1000.0, 1.0),
        Segment::new("east", "C", "D", 1000.0, 1.0),
    ])
    .expect("disconnected fixture")
}

/// Single two-lane 60 km/hr road rated with peak-hour factor 0.8
/// (capacity 2150 veh/hr, conductivity 0.75).
pub fn rated_single_road() -> RoadNetwork {
    let geometry = RoadGeometry::new(2.0, 60.0);
    let rating = trafnet_core::ratings::rate(geometry, 0.8).expect("valid geometry");
    RoadNetwork::new(vec![Segment::new(
        "R",
        "Gate",
        "Port",
        rating.capacity.value(),
        rating.conductivity,
    )
    .with_geometry(geometry)])
    .expect("rated fixture")
}
