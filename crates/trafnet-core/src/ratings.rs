//! Segment ratings derived from road geometry.
//!
//! These are the ingestion-side formulas that turn a lane count and a posted
//! speed into the two numbers the flow solver consumes:
//!
//! ```text
//! capacity     = (lanes / 2) / peak_hour_factor × (1000 + 12 × speed)
//! conductivity = speed × (lanes / 2) / 80
//! ```
//!
//! `lanes` counts both directions, so `lanes / 2` is the per-direction lane
//! count. The solver never calls these directly; importers and the
//! lane-upgrade search do.

use crate::units::{KilometresPerHour, VehiclesPerHour};
use crate::{TrafficError, TrafficResult};
use serde::{Deserialize, Serialize};

/// Lane count and posted speed of a road segment.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RoadGeometry {
    /// Total lanes across both directions.
    pub lanes: f64,
    pub speed: KilometresPerHour,
}

impl RoadGeometry {
    pub fn new(lanes: f64, speed_kmh: f64) -> Self {
        Self {
            lanes,
            speed: KilometresPerHour(speed_kmh),
        }
    }

    /// Same road with `extra` lanes added.
    pub fn with_additional_lanes(self, extra: u32) -> Self {
        Self {
            lanes: self.lanes + f64::from(extra),
            ..self
        }
    }
}

/// Capacity and conductivity of a segment.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SegmentRating {
    pub capacity: VehiclesPerHour,
    pub conductivity: f64,
}

/// Hourly capacity of a road given its geometry and the peak-hour factor.
pub fn capacity(geometry: RoadGeometry, peak_hour_factor: f64) -> VehiclesPerHour {
    let per_direction = geometry.lanes / 2.0;
    VehiclesPerHour(per_direction / peak_hour_factor * (1000.0 + 12.0 * geometry.speed.value()))
}

/// Conductivity of a road given its geometry.
pub fn conductivity(geometry: RoadGeometry) -> f64 {
    geometry.speed.value() * (geometry.lanes / 2.0) / 80.0
}

/// Derive both ratings, rejecting geometry that would produce a non-positive
/// capacity or conductivity.
pub fn rate(geometry: RoadGeometry, peak_hour_factor: f64) -> TrafficResult<SegmentRating> {
    if !(peak_hour_factor.is_finite() && peak_hour_factor > 0.0) {
        return Err(TrafficError::Config(format!(
            "peak-hour factor must be positive, got {peak_hour_factor}"
        )));
    }
    if !(geometry.lanes.is_finite() && geometry.lanes > 0.0) {
        return Err(TrafficError::DataIntegrity(format!(
            "lane count must be positive, got {}",
            geometry.lanes
        )));
    }
    if !(geometry.speed.is_finite() && geometry.speed.value() > 0.0) {
        return Err(TrafficError::DataIntegrity(format!(
            "speed must be positive, got {}",
            geometry.speed
        )));
    }
    Ok(SegmentRating {
        capacity: capacity(geometry, peak_hour_factor),
        conductivity: conductivity(geometry),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn two_lane_sixty_kmh_road() {
        let rating = rate(RoadGeometry::new(2.0, 60.0), 0.8).unwrap();
        assert!((rating.capacity.value() - 2150.0).abs() < 1e-9);
        assert!((rating.conductivity - 0.75).abs() < 1e-12);
    }

    #[test]
    fn four_lane_hundred_kmh_road() {
        let geometry = RoadGeometry::new(4.0, 100.0);
        assert!((capacity(geometry, 0.8).value() - 5500.0).abs() < 1e-9);
        assert!((conductivity(geometry) - 2.5).abs() < 1e-12);
    }

    #[test]
    fn additional_lanes_scale_both_ratings() {
        let base = RoadGeometry::new(2.0, 60.0);
        let widened = base.with_additional_lanes(2);
        assert_eq!(widened.lanes, 4.0);
        assert_eq!(widened.speed, base.speed);
        assert!((conductivity(widened) - 2.0 * conductivity(base)).abs() < 1e-12);
    }

    #[test]
    fn rejects_degenerate_geometry() {
        assert!(matches!(
            rate(RoadGeometry::new(0.0, 60.0), 0.8),
            Err(TrafficError::DataIntegrity(_))
        ));
        assert!(matches!(
            rate(RoadGeometry::new(2.0, -5.0), 0.8),
            Err(TrafficError::DataIntegrity(_))
        ));
        assert!(matches!(
            rate(RoadGeometry::new(2.0, 60.0), 0.0),
            Err(TrafficError::Config(_))
        ));
    }
}
